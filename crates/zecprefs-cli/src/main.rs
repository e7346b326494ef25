//! zecprefs - inspect and edit Zcash light wallet settings from the terminal.

mod commands;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use zecprefs_core::config::{get_db_path, get_settings_path};
use zecprefs_core::{
    BlockHeight, JsonFileStore, MemoryStore, NetworkMode, PreferenceStore, Settings, SqliteStore,
};

/// Wallet settings, amount formatting and address checks.
#[derive(Parser, Debug)]
#[command(name = "zecprefs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use testnet address formats, token name and explorer links
    #[arg(long, global = true)]
    testnet: bool,

    /// Preference storage backend: json, sqlite or memory
    #[arg(long, global = true, default_value = "json")]
    store: StoreArg,

    /// Storage file location (defaults to the platform config/data directory)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Chain tip height, used for the Sapling activation check
    #[arg(long, global = true)]
    height: Option<BlockHeight>,

    /// ZEC price in USD, used for fiat display
    #[arg(long, global = true)]
    price: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify an address for the selected network
    Validate { address: String },

    /// Parse a zcash: payment URI
    ParseUri { uri: String },

    /// Format an amount given in base units
    Format {
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Parse a decimal amount into base units
    ParseAmount {
        #[arg(allow_hyphen_values = true)]
        text: String,
    },

    /// Show or change the lightwalletd server
    Server {
        /// New server URL; an empty value restores the default
        #[arg(long)]
        set: Option<String>,
    },

    /// Show or change persisted options
    Options {
        #[arg(long)]
        check_updates: Option<bool>,
        #[arg(long)]
        fetch_prices: Option<bool>,
        #[arg(long)]
        theme: Option<String>,
    },

    /// Print a block explorer link
    Explorer {
        #[command(subcommand)]
        target: ExplorerTarget,
    },

    /// Print a summary of the current settings
    Info,
}

#[derive(Subcommand, Debug)]
enum ExplorerTarget {
    /// Link to an address page
    Address { address: String },
    /// Link to a transaction page
    Tx { txid: String },
}

/// Storage backend selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreArg {
    Json,
    Sqlite,
    Memory,
}

impl std::str::FromStr for StoreArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "file" => Ok(StoreArg::Json),
            "sqlite" | "db" => Ok(StoreArg::Sqlite),
            "memory" | "mem" => Ok(StoreArg::Memory),
            _ => Err(format!(
                "Unknown store '{}'. Valid options: json, sqlite, memory",
                s
            )),
        }
    }
}

fn open_store(kind: StoreArg, path: Option<PathBuf>) -> Result<Box<dyn PreferenceStore>> {
    let store: Box<dyn PreferenceStore> = match kind {
        StoreArg::Json => {
            let path = match path {
                Some(path) => path,
                None => get_settings_path()?,
            };
            Box::new(JsonFileStore::open(path)?)
        }
        StoreArg::Sqlite => {
            let path = match path {
                Some(path) => path,
                None => get_db_path()?,
            };
            Box::new(SqliteStore::open(&path)?)
        }
        StoreArg::Memory => Box::new(MemoryStore::new()),
    };
    Ok(store)
}

fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Log to stderr so command output on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("zecprefs=info".parse()?)
        .add_directive("zecprefs_core=info".parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = open_store(args.store, args.path)?;
    let mut settings = Settings::new(store, NetworkMode::from_testnet(args.testnet))?;
    if let Some(height) = args.height {
        settings.set_block_height(height);
    }
    if let Some(price) = args.price {
        settings.set_zec_price(price);
    }

    commands::run(&mut settings, args.command)
}
