use std::{io, path::PathBuf, sync::Arc};

use baglan::{draft::DraftFixture, gate::WizardStep, receipt::Receipt};
use baglan_app::{config::AppConfig, orders::HttpOrdersService, session::OrderWizard};
use clap::Args;

use crate::cli::{client, request_failed};

#[derive(Debug, Args)]
pub(crate) struct CreateOrderArgs {
    /// Draft YAML file
    #[arg(long)]
    draft: PathBuf,

    /// Staff member to assign on creation
    #[arg(long)]
    personnel_id: Option<u64>,

    /// Fill blank customer and vehicle fields from earlier orders for the plate
    #[arg(long)]
    prefill: bool,
}

pub(crate) async fn run(config: &AppConfig, args: CreateOrderArgs) -> Result<(), String> {
    let catalog = config
        .shop
        .catalog()
        .map_err(|error| format!("failed to load catalog: {error}"))?;
    let time_zone = config.shop.time_zone().map_err(|error| error.to_string())?;

    let updates = DraftFixture::load(&args.draft)
        .and_then(DraftFixture::into_updates)
        .map_err(|error| format!("failed to load draft {}: {error}", args.draft.display()))?;

    let orders = HttpOrdersService::new(client(config)?, time_zone.clone());
    let mut session = OrderWizard::new(catalog, Arc::new(orders), time_zone.clone());

    if let Some(personnel_id) = args.personnel_id {
        session = session.with_personnel(personnel_id);
    }

    for update in updates {
        session
            .update(update)
            .map_err(|error| format!("failed to edit draft: {error}"))?;
    }

    if args.prefill {
        let found = session
            .prefill_from_plate()
            .await
            .map_err(|error| request_failed("look up plate", &error))?;

        println!("plate_lookup: {}", if found { "found" } else { "no match" });
    }

    while session.wizard().step() != Some(WizardStep::Payment) {
        let step = session.advance().map_err(|error| error.to_string())?;

        println!("step: {step}");
    }

    let line_items = session
        .quote()
        .map_err(|error| format!("failed to price draft: {error}"))?;

    Receipt::new(&line_items)
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print quote: {error}"))?;

    let order = session
        .submit()
        .await
        .map_err(|failure| format!("failed to create order: {failure}"))?;

    println!("order_id: {}", order.id);

    if order.id.is_provisional() {
        println!("the server did not return an id; refresh the order list to see it");
    }

    println!("customer: {}", order.customer_name);
    println!("vehicle: {}", order.vehicle);
    println!("plate: {}", order.plate);
    println!("status: {}", order.status);
    println!("date: {}", order.date.to_zoned(time_zone));
    println!("total_price: ₺{}", order.total_price.round_dp(2));
    println!("payment: {}", order.payment_status);

    for service in &order.services {
        println!("service: {service}");
    }

    Ok(())
}
