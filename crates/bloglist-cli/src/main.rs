//! Bloglist CLI - Command-line interface
//!
//! Usage:
//!   bloglist stats [--file <path>]
//!   bloglist blogs
//!   bloglist users

use anyhow::{bail, Context};
use bloglist_core::{
    summarize, AppConfig, BlogRepository, PgStore, Rated, UserRepository,
};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bloglist")]
#[command(about = "Bloglist maintenance and reporting CLI")]
#[command(version)]
struct Cli {
    /// TOML configuration file (defaults to BLOGLIST_CONFIG, then environment)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate likes and authors
    Stats {
        /// JSON file holding an array of blogs; the database is used when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print every stored blog
    Blogs,
    /// Print every user with their blogs
    Users,
}

/// Blog entry as read from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlogRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    likes: u64,
}

impl Rated for BlogRecord {
    fn author(&self) -> &str {
        &self.author
    }

    fn likes(&self) -> u64 {
        self.likes
    }
}

fn read_records(path: &Path) -> anyhow::Result<Vec<BlogRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid blog list in {}", path.display()))
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let path = path.or_else(|| std::env::var("BLOGLIST_CONFIG").ok().map(PathBuf::from));
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgStore> {
    let Some(url) = config.database.url.as_deref() else {
        bail!("DATABASE_URL is not set");
    };
    let store = PgStore::connect(url, config.database.max_connections).await?;
    tracing::debug!("Connected to PostgreSQL");
    Ok(store)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { file: Some(path) } => {
            let records = read_records(&path)?;
            print_json(&summarize(&records))?;
        }
        Commands::Stats { file: None } => {
            let store = connect(&load_config(cli.config)?).await?;
            let blogs = store.list_blogs().await?;
            print_json(&summarize(&blogs))?;
        }
        Commands::Blogs => {
            let store = connect(&load_config(cli.config)?).await?;
            for blog in store.list_blogs().await? {
                println!("{}", serde_json::to_string(&blog)?);
            }
        }
        Commands::Users => {
            let store = connect(&load_config(cli.config)?).await?;
            for user in store.list_users().await? {
                let blogs = store.list_blogs_by_owner(user.id).await?;
                print_json(&serde_json::json!({
                    "id": user.id,
                    "username": user.username,
                    "name": user.name,
                    "blogs": blogs.len(),
                }))?;
            }
        }
    }

    Ok(())
}
