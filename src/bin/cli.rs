//! PageKV CLI
//!
//! Command-line interface over a single database file.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pagekv::{Config, Database};
use tracing_subscriber::{fmt, EnvFilter};

/// PageKV CLI
#[derive(Parser, Debug)]
#[command(name = "pagekv")]
#[command(about = "Single-file slotted-page key-value store")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "test.db")]
    db: String,

    /// Sync every page write to disk
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Store a key-value pair
    Put {
        /// The key to store
        key: String,

        /// The value to store
        value: String,
    },

    /// List every record in storage order
    Scan,

    /// Show page allocation metadata
    Stats,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,pagekv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> pagekv::Result<ExitCode> {
    let config = Config::builder()
        .path(&args.db)
        .sync_writes(args.sync)
        .build();

    let db = Database::open(config)?;

    let code = match args.command {
        Commands::Get { key } => match db.get(key.as_bytes())? {
            Some(value) => {
                println!("{}", String::from_utf8_lossy(&value));
                ExitCode::SUCCESS
            }
            None => {
                println!("(not found)");
                ExitCode::FAILURE
            }
        },
        Commands::Put { key, value } => {
            db.put(key.as_bytes(), value.as_bytes())?;
            println!("OK");
            ExitCode::SUCCESS
        }
        Commands::Scan => {
            for (key, value) in db.scan()? {
                println!(
                    "{}\t{}",
                    String::from_utf8_lossy(&key),
                    String::from_utf8_lossy(&value)
                );
            }
            ExitCode::SUCCESS
        }
        Commands::Stats => {
            let meta = db.meta();
            println!("next_page_id: {}", meta.next_page_id);
            println!("page_count:   {}", meta.page_count);
            println!("last_page_id: {}", meta.last_page_id);
            ExitCode::SUCCESS
        }
    };

    db.close()?;
    Ok(code)
}
