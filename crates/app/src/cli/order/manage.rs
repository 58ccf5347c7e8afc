use baglan::order::{OrderStatus, OrderUpdate};
use baglan_app::{
    config::AppConfig,
    orders::{HttpOrdersService, OrdersService},
};
use clap::Args;

use crate::cli::{client, request_failed};

#[derive(Debug, Args)]
pub(crate) struct DeleteArgs {
    /// Order id
    #[arg(long)]
    id: String,
}

#[derive(Debug, Args)]
pub(crate) struct AssignArgs {
    /// Order id
    #[arg(long)]
    id: String,

    /// Staff ids; replaces the current assignment
    #[arg(long = "personnel-id", required = true, num_args = 1..)]
    personnel_ids: Vec<u64>,
}

#[derive(Debug, Args)]
pub(crate) struct StatusArgs {
    /// Order id
    #[arg(long)]
    id: String,

    /// New status: pending, in-progress, completed, cancelled, their Turkish
    /// names, or 1-4
    #[arg(long)]
    status: OrderStatus,

    /// Staff ids to keep assigned
    #[arg(long = "personnel-id", num_args = 1..)]
    personnel_ids: Vec<u64>,
}

pub(crate) async fn delete(config: &AppConfig, args: DeleteArgs) -> Result<(), String> {
    let service = orders_service(config)?;

    service
        .delete_order(args.id.trim())
        .await
        .map_err(|error| request_failed("delete order", &error))?;

    println!("deleted: {}", args.id.trim());

    Ok(())
}

pub(crate) async fn assign(config: &AppConfig, args: AssignArgs) -> Result<(), String> {
    let service = orders_service(config)?;
    let id = args.id.trim();

    let orders = service
        .list_orders()
        .await
        .map_err(|error| request_failed("load order", &error))?;

    let status = orders
        .iter()
        .find(|order| order.id == id)
        .map(|order| order.status)
        .ok_or_else(|| format!("order {id} not found"))?;

    service
        .update_order(&OrderUpdate::new(id, status, args.personnel_ids))
        .await
        .map_err(|error| request_failed("assign staff", &error))?;

    println!("assigned: {id}");

    Ok(())
}

pub(crate) async fn status(config: &AppConfig, args: StatusArgs) -> Result<(), String> {
    let service = orders_service(config)?;
    let id = args.id.trim();

    service
        .update_order(&OrderUpdate::new(id, args.status, args.personnel_ids))
        .await
        .map_err(|error| request_failed("update status", &error))?;

    println!("order_id: {id}");
    println!("status: {}", args.status);

    Ok(())
}

fn orders_service(config: &AppConfig) -> Result<HttpOrdersService, String> {
    let time_zone = config.shop.time_zone().map_err(|error| error.to_string())?;

    Ok(HttpOrdersService::new(client(config)?, time_zone))
}
