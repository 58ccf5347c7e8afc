use baglan_app::{
    config::AppConfig,
    orders::{HttpOrdersService, OrderSummary, OrdersService},
};
use clap::Args;
use jiff::tz::TimeZone;

use crate::cli::{client, request_failed};

#[derive(Debug, Args)]
pub(crate) struct ListOrdersArgs {
    /// Only orders whose plate contains this text; spacing and case are ignored
    #[arg(long)]
    plate: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Licence plate
    #[arg(long)]
    plate: String,
}

pub(crate) async fn run(config: &AppConfig, args: ListOrdersArgs) -> Result<(), String> {
    let time_zone = config.shop.time_zone().map_err(|error| error.to_string())?;
    let service = HttpOrdersService::new(client(config)?, time_zone.clone());

    let mut orders = service
        .list_orders()
        .await
        .map_err(|error| request_failed("list orders", &error))?;

    if let Some(plate) = args.plate.as_deref().map(normalize_plate) {
        orders.retain(|order| normalize_plate(&order.plate).contains(&plate));
    }

    if orders.is_empty() {
        println!("no orders found");
        return Ok(());
    }

    for order in &orders {
        print_order(order, &time_zone);
    }

    Ok(())
}

pub(crate) async fn search(config: &AppConfig, args: SearchArgs) -> Result<(), String> {
    let time_zone = config.shop.time_zone().map_err(|error| error.to_string())?;
    let service = HttpOrdersService::new(client(config)?, time_zone);

    let lookup = service
        .search_plate(&args.plate)
        .await
        .map_err(|error| request_failed("search plate", &error))?;

    let Some(lookup) = lookup else {
        println!("no customer found for plate {}", args.plate.trim());
        return Ok(());
    };

    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    println!("customer: {}", show(lookup.customer_name));
    println!("phone: {}", show(lookup.phone));
    println!("brand: {}", show(lookup.brand));
    println!("model: {}", show(lookup.model));

    Ok(())
}

fn print_order(order: &OrderSummary, time_zone: &TimeZone) {
    println!("order_id: {}", order.id);
    println!("customer: {}", order.customer);
    println!("vehicle: {}", order.vehicle);
    println!("plate: {}", order.plate);
    println!("status: {}", order.status);
    println!(
        "date: {}",
        order.date.map_or_else(
            || "unknown".to_string(),
            |date| date.to_zoned(time_zone.clone()).to_string()
        )
    );
    println!("total_price: ₺{}", order.total_price.round_dp(2));
    println!("services: {}", order.services.join(", "));
    println!(
        "assigned_staff: {}",
        if order.assigned_staff.is_empty() {
            "none".to_string()
        } else {
            order.assigned_staff.join(", ")
        }
    );
    println!();
}

fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
