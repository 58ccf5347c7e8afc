use baglan_app::{
    client::{ApiClient, ApiError},
    config::AppConfig,
    observability::init_subscriber,
};
use clap::{Parser, Subcommand};

mod catalog;
mod dashboard;
mod expenses;
mod login;
mod order;
mod personnel;

#[derive(Debug, Parser)]
#[command(name = "baglan", about = "Bağlan Oto Bakım CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and print a bearer token
    Login(login::LoginArgs),
    /// Inspect the service catalog
    Catalog(catalog::CatalogCommand),
    /// Quote, create and manage orders
    Order(order::OrderCommand),
    /// Manage staff
    Personnel(personnel::PersonnelCommand),
    /// Manage the income and expense ledger
    Expenses(expenses::ExpensesCommand),
    /// Print headline figures
    Dashboard,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        init_subscriber(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Login(args) => login::run(&self.config, args).await,
            Commands::Catalog(command) => catalog::run(&self.config, command),
            Commands::Order(command) => order::run(&self.config, command).await,
            Commands::Personnel(command) => personnel::run(&self.config, command).await,
            Commands::Expenses(command) => expenses::run(&self.config, command).await,
            Commands::Dashboard => dashboard::run(&self.config).await,
        }
    }
}

pub(crate) fn client(config: &AppConfig) -> Result<ApiClient, String> {
    ApiClient::new(&config.api).map_err(|error| format!("failed to create API client: {error}"))
}

pub(crate) fn request_failed(action: &str, error: &ApiError) -> String {
    format!("failed to {action}: {}", error.user_message())
}
