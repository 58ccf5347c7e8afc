use baglan_app::{
    config::AppConfig,
    expenses::{ExpensesService, HttpExpensesService, NewTransaction, TransactionKind},
};
use clap::{Args, Subcommand, ValueEnum};
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::cli::{client, request_failed};

#[derive(Debug, Args)]
pub(crate) struct ExpensesCommand {
    #[command(subcommand)]
    command: ExpensesSubcommand,
}

#[derive(Debug, Subcommand)]
enum ExpensesSubcommand {
    /// List ledger entries, newest first
    List,
    /// Record an income or expense
    Add(AddTransactionArgs),
    /// Delete a ledger entry
    Remove(RemoveTransactionArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Income,
    Expense,
}

impl From<Kind> for TransactionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Income => TransactionKind::Income,
            Kind::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Debug, Args)]
struct AddTransactionArgs {
    /// Entry direction
    #[arg(long, value_enum)]
    kind: Kind,

    /// Short title
    #[arg(long)]
    title: String,

    /// Longer description; the title is used when omitted
    #[arg(long)]
    description: Option<String>,

    /// Amount in lira
    #[arg(long)]
    amount: Decimal,

    /// When the money moved; now when omitted
    #[arg(long)]
    date: Option<Timestamp>,
}

#[derive(Debug, Args)]
struct RemoveTransactionArgs {
    /// Entry id
    #[arg(long)]
    id: String,
}

pub(crate) async fn run(config: &AppConfig, command: ExpensesCommand) -> Result<(), String> {
    let time_zone = config.shop.time_zone().map_err(|error| error.to_string())?;
    let service = HttpExpensesService::new(client(config)?, time_zone.clone());

    match command.command {
        ExpensesSubcommand::List => {
            let entries = service
                .list_transactions()
                .await
                .map_err(|error| request_failed("list ledger entries", &error))?;

            if entries.is_empty() {
                println!("no ledger entries found");
                return Ok(());
            }

            for entry in entries {
                println!("id: {}", entry.id);
                println!("kind: {}", entry.kind);
                println!("title: {}", entry.title);
                println!("category: {}", entry.category);
                println!("amount: ₺{}", entry.amount.round_dp(2));
                println!(
                    "date: {}",
                    entry.date.map_or_else(
                        || "unknown".to_string(),
                        |date| date.to_zoned(time_zone.clone()).to_string()
                    )
                );
                println!();
            }

            Ok(())
        }
        ExpensesSubcommand::Add(args) => {
            if args.title.trim().is_empty() {
                return Err("title cannot be empty".to_string());
            }

            if args.amount <= Decimal::ZERO {
                return Err("amount must be positive".to_string());
            }

            let entry = NewTransaction::new(
                args.kind.into(),
                args.title.trim(),
                args.description,
                args.amount,
                args.date.unwrap_or_else(Timestamp::now),
            );

            service
                .create_transaction(&entry)
                .await
                .map_err(|error| request_failed("record ledger entry", &error))?;

            println!("recorded: {} ₺{}", entry.title, entry.amount.round_dp(2));

            Ok(())
        }
        ExpensesSubcommand::Remove(args) => {
            service
                .delete_transaction(&args.id)
                .await
                .map_err(|error| request_failed("delete ledger entry", &error))?;

            println!("removed: {}", args.id);

            Ok(())
        }
    }
}
