use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use snip::config::Config;
use snip::shortener::{self, ShortenerError};
use snip::{storage, telemetry};

#[derive(Parser)]
#[command(name = "snip-admin")]
#[command(about = "snip URL shortener management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Shorten a URL
    Shorten {
        /// Absolute http(s) URL to shorten
        url: String,
        /// Custom short code instead of a derived one
        #[arg(long)]
        custom: Option<String>,
    },
    /// Print the original URL behind a short code
    Resolve {
        /// Short code to look up
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    telemetry::init_tracing(&config.logging)?;

    let storage = storage::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    // Ensure database is initialized
    storage.init().await?;

    match cli.command {
        Commands::Init => {
            println!("✅ Database schema is ready at {}", config.database.url);
        }
        Commands::Shorten { url, custom } => {
            let assignment = shortener::assign_code(
                storage.as_ref(),
                &config.short_codes,
                &url,
                custom.as_deref(),
            )
            .await?;
            let record = assignment.record;
            let origin = if assignment.created { "created" } else { "existing" };
            println!(
                "{} -> {} ({}, custom: {}, created at {})",
                record.short_code,
                record.original_url,
                origin,
                record.is_custom,
                record.created_at.to_rfc3339()
            );
        }
        Commands::Resolve { code } => match shortener::resolve(storage.as_ref(), &code).await {
            Ok(url) => println!("{url}"),
            Err(ShortenerError::NotFound(_)) => {
                eprintln!("No URL found for short code '{code}'");
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}
