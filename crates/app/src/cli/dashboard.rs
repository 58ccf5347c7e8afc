use baglan_app::{
    config::AppConfig,
    dashboard::{DashboardService, HttpDashboardService},
};

use crate::cli::{client, request_failed};

pub(crate) async fn run(config: &AppConfig) -> Result<(), String> {
    let service = HttpDashboardService::new(client(config)?);

    let stats = service
        .stats()
        .await
        .map_err(|error| request_failed("load dashboard", &error))?;

    println!("total_orders: {}", stats.total_orders);
    println!("completed_orders: {}", stats.completed_orders);
    println!("pending_orders: {}", stats.pending_orders);
    println!("total_revenue: ₺{}", stats.total_revenue.round_dp(2));

    Ok(())
}
