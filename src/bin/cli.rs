//! fileshare CLI Client
//!
//! Command-line interface for interacting with a fileshare server, either
//! one command at a time or through an interactive menu.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fileshare::protocol::Status;
use fileshare::{Client, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// fileshare CLI
#[derive(Parser, Debug)]
#[command(name = "fileshare-cli")]
#[command(about = "CLI for a fileshare server")]
#[command(version)]
struct Args {
    /// Server host
    host: String,

    /// Server port
    port: u16,

    /// Directory downloads are saved to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Defaults to the interactive shell
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display the names of all files
    List,

    /// Download a file by number
    Get {
        /// File number from `list`
        number: i8,
    },

    /// Remove a file by number
    Remove {
        /// File number from `list`
        number: i8,
    },

    /// Upload a local file
    Add {
        /// Path of the file to upload
        path: PathBuf,
    },

    /// Interactive menu
    Shell,
}

const MENU: &str = "1. Display the names of all files\n\
                    2. Get file\n\
                    3. Remove a file\n\
                    4. Add a file\n\
                    5. Exit";

/// Typed at any prompt to return to the menu
const BACK: &str = "back";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let addr = format!("{}:{}", args.host, args.port);
    let mut client = Client::connect(&addr).map_err(|e| {
        tracing::error!("Could not connect to {}; is the server running?", addr);
        e
    })?;

    match args.command.unwrap_or(Commands::Shell) {
        Commands::List => print!("{}", client.list()?),
        Commands::Get { number } => {
            get(&mut client, number, &args.out)?;
        }
        Commands::Remove { number } => remove(&mut client, number)?,
        Commands::Add { path } => add(&mut client, &path)?,
        Commands::Shell => shell(&mut client, &args.out)?,
    }

    client.exit()
}

fn get(client: &mut Client, number: i8, out: &Path) -> Result<bool> {
    match client.get(number, out)? {
        Some(download) => {
            println!(
                "Saved {} ({} bytes) to {}",
                download.name,
                download.size,
                download.path.display()
            );
            Ok(true)
        }
        None => {
            println!("The file you requested was not found.");
            Ok(false)
        }
    }
}

fn remove(client: &mut Client, number: i8) -> Result<()> {
    match client.remove(number)? {
        Status::AllOk => println!("File {} removed.", number),
        Status::Error => println!("There is no file {}.", number),
    }
    Ok(())
}

fn add(client: &mut Client, path: &Path) -> Result<()> {
    match client.add(path)? {
        Status::AllOk => println!("File added to the server successfully."),
        Status::Error => println!("The server rejected {}.", path.display()),
    }
    Ok(())
}

// =============================================================================
// Interactive shell
// =============================================================================

fn shell(client: &mut Client, out: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("======\n{}\n======", MENU);
        let Some(choice) = prompt(&mut input, "Enter the number of your choice: ")? else {
            return Ok(());
        };

        match choice.parse::<u8>() {
            Ok(1) => print_listing(client)?,
            Ok(2) => shell_get(client, &mut input, out)?,
            Ok(3) => shell_remove(client, &mut input)?,
            Ok(4) => shell_add(client, &mut input)?,
            Ok(5) => return Ok(()),
            _ => println!("Please choose an option from 1 to 5."),
        }
    }
}

fn shell_get(client: &mut Client, input: &mut impl BufRead, out: &Path) -> Result<()> {
    loop {
        print_listing(client)?;
        let Some(number) = prompt_number(input, "Enter the number of the file: ")? else {
            return Ok(());
        };
        if get(client, number, out)? {
            return Ok(());
        }
    }
}

fn shell_remove(client: &mut Client, input: &mut impl BufRead) -> Result<()> {
    if let Some(number) = prompt_number(input, "Enter the file number to remove: ")? {
        remove(client, number)?;
    }
    Ok(())
}

fn shell_add(client: &mut Client, input: &mut impl BufRead) -> Result<()> {
    let mut message = "Enter the path to the file you want to add: ";
    loop {
        let Some(path) = prompt(input, message)? else {
            return Ok(());
        };
        if path == BACK {
            return Ok(());
        }

        let path = PathBuf::from(path);
        if path.is_file() {
            return add(client, &path);
        }

        println!("File not found.");
        message = "Enter 'back' to go to the main menu or re-enter the file path: ";
    }
}

fn print_listing(client: &mut Client) -> Result<()> {
    println!("======");
    print!("{}", client.list()?);
    println!("======");
    Ok(())
}

/// Ask for a file number until one parses or the user types `back`
fn prompt_number(input: &mut impl BufRead, message: &str) -> Result<Option<i8>> {
    loop {
        let Some(line) = prompt(input, message)? else {
            return Ok(None);
        };
        if line == BACK {
            return Ok(None);
        }
        match line.parse::<i8>() {
            Ok(number) if number >= 1 => return Ok(Some(number)),
            _ => println!("Please enter a number from 1 to 127, or '{}'.", BACK),
        }
    }
}

/// Print `message` and read one trimmed line; `None` at end of input
fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
