//! Orders service.

use async_trait::async_trait;
use baglan::{
    draft::PlateLookup,
    order::{NewOrderRequest, OrderUpdate},
};
use jiff::tz::TimeZone;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    client::{ApiClient, ApiError},
    envelope::{Record, created_order_id, records, unwrap_envelope},
    orders::models::{CreatedOrder, OrderSummary, plate_lookup},
};

const ORDERS_PATH: &str = "api/siparis";

#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    client: ApiClient,
    time_zone: TimeZone,
}

impl HttpOrdersService {
    /// Orders service reading listed dates in `time_zone`.
    #[must_use]
    pub fn new(client: ApiClient, time_zone: TimeZone) -> Self {
        Self { client, time_zone }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    #[instrument(skip_all, fields(plate = %request.plate_number))]
    async fn create_order(&self, request: &NewOrderRequest) -> Result<CreatedOrder, ApiError> {
        let body = self.client.post(ORDERS_PATH, request).await?;
        let id = created_order_id(&body);

        info!(id = id.as_deref().unwrap_or("none"), "order created");

        Ok(CreatedOrder { id })
    }

    async fn list_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
        let body = self.client.get(ORDERS_PATH).await?;

        Ok(records(&body)
            .iter()
            .filter_map(|record| OrderSummary::from_record(record, &self.time_zone))
            .collect())
    }

    async fn search_plate(&self, plate: &str) -> Result<Option<PlateLookup>, ApiError> {
        let plate = plate.trim();

        if plate.is_empty() {
            return Ok(None);
        }

        let path = format!("{ORDERS_PATH}/ara/{}", encode_segment(plate));

        let body = match self.client.get(&path).await {
            Ok(body) => body,
            Err(ApiError::Rejected { status: 404, .. }) => return Ok(None),
            Err(error) => return Err(error),
        };

        let payload = unwrap_envelope(&body);
        let record = match payload {
            serde_json::Value::Array(items) => items.first().and_then(Record::new),
            other => Record::new(other),
        };

        Ok(record.as_ref().and_then(plate_lookup))
    }

    #[instrument(skip_all, fields(order_id = %update.order_id, status_id = update.status_id))]
    async fn update_order(&self, update: &OrderUpdate) -> Result<(), ApiError> {
        self.client
            .put(&format!("{ORDERS_PATH}/guncelle"), update)
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{ORDERS_PATH}/{}", encode_segment(id)))
            .await?;

        Ok(())
    }
}

/// Percent-encode a path segment. Plates contain spaces.
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Submits a new order. Called once per submission.
    async fn create_order(&self, request: &NewOrderRequest) -> Result<CreatedOrder, ApiError>;

    /// Retrieves every order.
    async fn list_orders(&self) -> Result<Vec<OrderSummary>, ApiError>;

    /// Looks up what the backend knows about a plate.
    async fn search_plate(&self, plate: &str) -> Result<Option<PlateLookup>, ApiError>;

    /// Changes an order's status and assigned staff.
    async fn update_order(&self, update: &OrderUpdate) -> Result<(), ApiError>;

    /// Deletes an order.
    async fn delete_order(&self, id: &str) -> Result<(), ApiError>;
}
