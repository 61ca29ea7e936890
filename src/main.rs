use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dirscout::app::AppContext;
use dirscout::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let ctx = AppContext::new(cli.config.as_deref())?;

    match cli.command {
        Commands::Industries => {
            commands::list_industries(&ctx).await?;
        }
        Commands::Countries { industry } => {
            commands::list_countries(&ctx, &industry).await?;
        }
        Commands::Scrape { url, max, output } => {
            commands::scrape(&ctx, &url, max, output.as_deref()).await?;
        }
        Commands::Search(args) => {
            commands::search(&ctx, &args).await?;
        }
    }

    Ok(())
}
