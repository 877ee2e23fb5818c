use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use diario::app::AppContext;
use diario::cli::{commands, Cli, Commands};
use diario::config::Config;
use diario::domain::today_key;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(workers) = cli.workers {
        config.http.workers = workers;
    }
    let ctx = AppContext::from_config(config)?;

    match cli.command {
        Commands::Load => {
            commands::load(&ctx).await?;
        }
        Commands::Dates => {
            commands::list_dates(&ctx).await?;
        }
        Commands::Sections { date } => {
            let date = date.unwrap_or_else(today_key);
            commands::list_sections(&ctx, &date).await?;
        }
        Commands::Items { date, section } => {
            commands::list_items(&ctx, &date, &section).await?;
        }
    }

    Ok(())
}
