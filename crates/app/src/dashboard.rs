//! Dashboard summary

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::{
    client::{ApiClient, ApiError},
    envelope::{Record, unwrap_envelope},
};

const SUMMARY_PATH: &str = "api/dashboard/ozet";

/// Headline figures. Missing or malformed fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub completed_orders: u64,
    pub pending_orders: u64,
    pub total_revenue: Decimal,
}

impl DashboardStats {
    fn from_record(record: &Record<'_>) -> Self {
        Self {
            total_orders: record.u64(&["totalOrders", "orderCount"]).unwrap_or_default(),
            completed_orders: record
                .u64(&["completedOrders", "completedCount"])
                .unwrap_or_default(),
            pending_orders: record
                .u64(&["pendingOrders", "pendingCount"])
                .unwrap_or_default(),
            total_revenue: record
                .decimal(&["totalRevenue", "revenue", "totalIncome"])
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpDashboardService {
    client: ApiClient,
}

impl HttpDashboardService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DashboardService for HttpDashboardService {
    async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let body = self.client.get(SUMMARY_PATH).await?;

        Ok(Record::new(unwrap_envelope(&body))
            .map(|record| DashboardStats::from_record(&record))
            .unwrap_or_default())
    }
}

#[automock]
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Retrieves the headline figures.
    async fn stats(&self) -> Result<DashboardStats, ApiError>;
}
