use baglan_app::config::AppConfig;
use clap::{Args, Subcommand};

mod create;
mod list;
mod manage;
mod quote;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Price a draft and show which wizard steps are complete
    Quote(quote::QuoteArgs),
    /// Walk a draft through the wizard and submit it
    Create(create::CreateOrderArgs),
    /// List orders
    List(list::ListOrdersArgs),
    /// Look up customer and vehicle details by plate
    Search(list::SearchArgs),
    /// Delete an order
    Delete(manage::DeleteArgs),
    /// Assign staff to an order
    Assign(manage::AssignArgs),
    /// Change an order's status
    Status(manage::StatusArgs),
}

pub(crate) async fn run(config: &AppConfig, command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Quote(args) => quote::run(config, args),
        OrderSubcommand::Create(args) => create::run(config, args).await,
        OrderSubcommand::List(args) => list::run(config, args).await,
        OrderSubcommand::Search(args) => list::search(config, args).await,
        OrderSubcommand::Delete(args) => manage::delete(config, args).await,
        OrderSubcommand::Assign(args) => manage::assign(config, args).await,
        OrderSubcommand::Status(args) => manage::status(config, args).await,
    }
}
