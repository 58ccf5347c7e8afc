//! Ledger service.

use async_trait::async_trait;
use jiff::tz::TimeZone;
use mockall::automock;
use tracing::instrument;

use crate::{
    client::{ApiClient, ApiError},
    envelope::records,
    expenses::models::{NewTransaction, Transaction, sort_newest_first},
    orders::encode_segment,
};

const LEDGER_PATH: &str = "api/ek-muhasebe";

#[derive(Debug, Clone)]
pub struct HttpExpensesService {
    client: ApiClient,
    time_zone: TimeZone,
}

impl HttpExpensesService {
    #[must_use]
    pub fn new(client: ApiClient, time_zone: TimeZone) -> Self {
        Self { client, time_zone }
    }
}

#[async_trait]
impl ExpensesService for HttpExpensesService {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let body = self.client.get(LEDGER_PATH).await?;

        let mut transactions: Vec<_> = records(&body)
            .iter()
            .filter_map(|record| Transaction::from_record(record, &self.time_zone))
            .collect();

        sort_newest_first(&mut transactions);

        Ok(transactions)
    }

    #[instrument(skip_all, fields(kind = transaction.kind))]
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<(), ApiError> {
        self.client.post(LEDGER_PATH, transaction).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_transaction(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{LEDGER_PATH}/{}", encode_segment(id)))
            .await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ExpensesService: Send + Sync {
    /// Retrieves ledger entries, newest first.
    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError>;

    /// Records an entry.
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<(), ApiError>;

    /// Deletes an entry.
    async fn delete_transaction(&self, id: &str) -> Result<(), ApiError>;
}
