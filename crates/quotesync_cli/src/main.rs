//! QuoteSync CLI
//!
//! Command-line front end for the QuoteSync engine.
//!
//! # Commands
//!
//! - `show` - Display a random quote from the selected category
//! - `add` - Add a quote and submit it to the remote endpoint
//! - `list` / `categories` - Inspect the local collection
//! - `export` / `import` - Move the collection through JSON files
//! - `sync` - Run one sync pass, or watch on an interval
//! - `conflicts` / `resolve` - Review and settle sync divergences

mod client;
mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use client::ReqwestClient;
use quotesync_core::QuoteStore;
use quotesync_storage::FileStateStore;
use quotesync_sync::{HttpGateway, Resolution, SyncConfig, SyncService};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The concrete service the CLI drives.
pub(crate) type Service = SyncService<HttpGateway<ReqwestClient>>;

/// QuoteSync command-line tools.
#[derive(Parser)]
#[command(name = "quotesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the state file
    #[arg(global = true, long, default_value = "quotesync.json")]
    data: PathBuf,

    /// Base URL of the remote endpoint
    #[arg(global = true, long, default_value = "https://jsonplaceholder.typicode.com")]
    server: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a random quote
    Show {
        /// Category to draw from (remembered for next time)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add a new quote
    Add {
        /// The quote text
        text: String,

        /// The category it belongs to
        category: String,

        /// Skip submitting the quote to the remote endpoint
        #[arg(long)]
        local_only: bool,
    },

    /// List quotes, optionally filtered by category
    List {
        /// Category to filter by
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List the categories present in the collection
    Categories,

    /// Export the collection to a JSON file
    Export {
        /// Destination path
        path: PathBuf,
    },

    /// Import quotes from a JSON file
    Import {
        /// Source path
        path: PathBuf,

        /// Replace the collection instead of merging into it
        #[arg(long)]
        replace: bool,
    },

    /// Reconcile the collection with the remote endpoint
    Sync {
        /// Keep syncing on a fixed interval until Enter is pressed
        #[arg(long)]
        watch: bool,

        /// Seconds between watched passes
        #[arg(long, default_value = "30")]
        interval_secs: u64,
    },

    /// List unresolved sync conflicts
    Conflicts,

    /// Resolve one queued conflict
    Resolve {
        /// Index of the conflict, as shown by `conflicts`
        index: usize,

        /// Which side to keep
        #[arg(value_enum)]
        choice: Choice,
    },

    /// Show version information
    Version,
}

/// Which side of a conflict to keep.
#[derive(Clone, Copy, ValueEnum)]
enum Choice {
    /// Restore the local version
    Local,
    /// Keep the remote version
    Remote,
}

impl From<Choice> for Resolution {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Local => Resolution::KeepLocal,
            Choice::Remote => Resolution::AcceptRemote,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SyncConfig::new(&cli.server);
    let client = ReqwestClient::new(config.timeout)?;
    let gateway = HttpGateway::new(&config.server_url, client).with_batch_size(config.batch_size);
    let backend = FileStateStore::open_with_create_dirs(&cli.data)?;
    let store = QuoteStore::open(Box::new(backend))?;
    let service = Service::new(config, gateway, store);

    match cli.command {
        Commands::Show { category } => commands::show::run(&service, category)?,
        Commands::Add {
            text,
            category,
            local_only,
        } => commands::add::run(&service, &text, &category, local_only)?,
        Commands::List { category } => commands::list::run(&service, category)?,
        Commands::Categories => commands::list::categories(&service)?,
        Commands::Export { path } => commands::transfer::export(&service, &path)?,
        Commands::Import { path, replace } => commands::transfer::import(&service, &path, replace)?,
        Commands::Sync {
            watch,
            interval_secs,
        } => commands::sync::run(&service, watch, interval_secs)?,
        Commands::Conflicts => commands::conflicts::list(&service)?,
        Commands::Resolve { index, choice } => {
            commands::conflicts::resolve(&service, index, choice.into())?
        }
        Commands::Version => {
            println!("QuoteSync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("QuoteSync Core v{}", quotesync_core::VERSION);
        }
    }

    Ok(())
}
