use std::io;

use baglan::receipt::write_catalog;
use baglan_app::config::AppConfig;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// Print every catalog entry with its price
    Show,
}

pub(crate) fn run(config: &AppConfig, command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::Show => {
            let catalog = config
                .shop
                .catalog()
                .map_err(|error| format!("failed to load catalog: {error}"))?;

            write_catalog(io::stdout().lock(), &catalog)
                .map_err(|error| format!("failed to print catalog: {error}"))
        }
    }
}
