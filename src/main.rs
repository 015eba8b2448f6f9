mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use reelshelf::build_services;
use reelshelf::modules::browse::home_page_requests;
use reelshelf::shared::config::AppConfig;
use reelshelf::shared::utils::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let services = build_services(&config).context("Failed to initialize services")?;

    match cli.command {
        Commands::Search { query, limit } => {
            let query = query.join(" ");
            let mut response = services
                .search
                .search(&query)
                .await
                .with_context(|| format!("Search for '{}' failed", query))?;
            response.results.truncate(limit);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Browse { all } => {
            let shelves: Vec<_> = services
                .browse
                .get_categorized_shows(&home_page_requests())
                .await
                .into_iter()
                .filter(|shelf| all || shelf.visible)
                .collect();
            println!("{}", serde_json::to_string_pretty(&shelves)?);
        }
    }

    Ok(())
}
