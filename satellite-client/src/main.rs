//! Satellite test client
//!
//! Drives a replicated database from the command line the way integration
//! scenarios do.
//!
//! Usage:
//!   satellite-client --db client.db -m migrations.json items insert a b
//!   satellite-client token <client-id>
//!
//! Signing settings come from `SATELLITE_AUTH_SIGNING_ISS` and
//! `SATELLITE_AUTH_SIGNING_KEY` when set.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use satellite_client::{
    delete_items, delete_other_items, get_items, get_other_items, insert_items,
    insert_other_items, open_database_with, read_migrations, register_subscribers,
    AuthConfig, ElectricClient, ElectricConfig, MockConsoleClient, OpenOptions,
    ReplicationConfig, TokenRequest,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "satellite-client")]
#[command(about = "Replicated-database test client")]
struct Args {
    /// Local database file
    #[arg(long, default_value = "satellite.db")]
    db: PathBuf,

    /// Replication service host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Replication service port
    #[arg(short, long, default_value = "5133")]
    port: u16,

    /// JSON file with a `migrations` array
    #[arg(short, long)]
    migrations: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Operate on the `items` table
    Items {
        #[command(subcommand)]
        action: Action,
    },
    /// Operate on the `other_items` table
    OtherItems {
        #[command(subcommand)]
        action: Action,
    },
    /// Print a mock access token for a client id
    Token { client_id: String },
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print every record
    List,
    /// Create one record per key
    Insert { keys: Vec<String> },
    /// Delete records whose content matches each key
    Delete { keys: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let auth = AuthConfig::from_env();

    if let Command::Token { client_id } = &args.command {
        let response = MockConsoleClient::new(auth)
            .issue(&TokenRequest::for_client(client_id.as_str()))
            .context("Failed to issue token")?;
        return print_json(&response);
    }

    let migrations = match &args.migrations {
        Some(path) => read_migrations(path)
            .with_context(|| format!("Failed to load migrations from {:?}", path))?,
        None => Vec::new(),
    };
    let config = ElectricConfig::new(migrations, ReplicationConfig::new(&args.host, args.port));
    let options = OpenOptions::new(&args.db, config).with_auth_config(auth);
    let db = open_database_with(options)
        .await
        .with_context(|| format!("Failed to open database {:?}", args.db))?;
    register_subscribers(&db);
    info!("Opened {} as client {}", db.db_name(), db.client_id());

    match args.command {
        Command::Items { action } => run_items(&db, action).await?,
        Command::OtherItems { action } => run_other_items(&db, action).await?,
        Command::Token { .. } => {}
    }

    db.close().await?;
    Ok(())
}

async fn run_items(db: &ElectricClient, action: Action) -> Result<()> {
    match action {
        Action::List => print_json(&get_items(db).await?),
        Action::Insert { keys } => {
            let created = insert_items(db, &keys).await?;
            info!("Inserted {} items", created);
            Ok(())
        }
        Action::Delete { keys } => {
            let removed = delete_items(db, &keys).await?;
            info!("Deleted {} items", removed);
            Ok(())
        }
    }
}

async fn run_other_items(db: &ElectricClient, action: Action) -> Result<()> {
    match action {
        Action::List => print_json(&get_other_items(db).await?),
        Action::Insert { keys } => {
            let created = insert_other_items(db, &keys).await?;
            info!("Inserted {} other items", created);
            Ok(())
        }
        Action::Delete { keys } => {
            let removed = delete_other_items(db, &keys).await?;
            info!("Deleted {} other items", removed);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
