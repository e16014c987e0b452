use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hbnb_core::models::EntityKind;
use hbnb_core::storage::Backend;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hbnb::api;
use hbnb::config::Config;
use hbnb::state::AppState;

/// hbnb - inspect and maintain the listing store
#[derive(Parser, Debug)]
#[command(name = "hbnb")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Storage backend (overrides HBNB_TYPE_STORAGE)
    #[arg(long, value_enum, global = true)]
    storage: Option<StorageArg>,

    /// JSON store path (overrides HBNB_FILE_PATH)
    #[arg(long, global = true)]
    file_path: Option<String>,

    /// SQLite database path (overrides HBNB_SQLITE_PATH)
    #[arg(long, global = true)]
    sqlite_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StorageArg {
    File,
    Db,
}

impl From<StorageArg> for Backend {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::File => Backend::File,
            StorageArg::Db => Backend::Db,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every record of a kind
    List {
        /// Entity kind (state, city, place, user, review, amenity)
        kind: EntityKind,
    },
    /// Show one record
    Show { kind: EntityKind, id: String },
    /// Search places; reads the filter from stdin when omitted
    Search {
        /// Filter body, e.g. '{"states": ["<id>"]}'
        filter: Option<String>,
    },
    /// Delete a record and everything that depends on it
    Delete { kind: EntityKind, id: String },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(storage) = self.storage {
            config.storage = storage.into();
        }
        if let Some(path) = &self.file_path {
            config.file_path = path.into();
        }
        if let Some(path) = &self.sqlite_path {
            config.sqlite_path = path.into();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hbnb=debug,hbnb_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();
    tracing::debug!(?config, "Loaded configuration");

    let state = AppState::from_config(&config)
        .await
        .with_context(|| format!("cannot open {} storage", config.storage))?;

    let output = match cli.command {
        Command::List { kind } => serde_json::to_value(api::list_records(&state, kind).await?)?,
        Command::Show { kind, id } => {
            serde_json::to_value(api::get_record(&state, kind, &id).await?)?
        }
        Command::Search { filter } => {
            let body = read_filter(filter)?;
            serde_json::to_value(api::places_search::places_search(&state, &body).await?)?
        }
        Command::Delete { kind, id } => {
            serde_json::to_value(api::delete_record(&state, kind, &id).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_filter(filter: Option<String>) -> Result<Value> {
    let raw = match filter {
        Some(raw) => raw,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("cannot read filter from stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("filter is not valid JSON")
}
