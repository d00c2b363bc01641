mod commands;
mod config;
mod db;
mod errors;
mod models;
mod remote;
mod sync;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::remote::GitlabClient;

/// Sync GitLab projects into a local SQLite database and manage them
#[derive(Debug, Parser)]
#[command(name = "project-sync", version, arg_required_else_help = true)]
struct Cli {
    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch projects from GitLab API
    Fetch {
        #[arg(long, default_value_t = 10)]
        per_page: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List projects in database
    List,
    /// Add a project manually
    Add {
        id: i64,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update project description
    Update { id: i64, description: String },
    /// Delete a project by ID
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::init(cli.database_url)?;

    // Open the local store
    let db = db::init(&config).await?;

    match cli.command {
        Command::Fetch { per_page, page } => match GitlabClient::from_config(&config) {
            Ok(client) => {
                commands::fetch(&db, &client, per_page, page).await;
            }
            Err(err) => tracing::error!("Error fetching projects: {err}"),
        },
        Command::List => {
            commands::list(&db, &mut io::stdout().lock()).await;
        }
        Command::Add {
            id,
            name,
            description,
        } => {
            commands::add(&db, id, &name, description).await;
        }
        Command::Update { id, description } => {
            commands::update(&db, id, &description).await;
        }
        Command::Delete { id } => {
            commands::delete(&db, id).await;
        }
    }

    db.close().await;

    Ok(())
}
