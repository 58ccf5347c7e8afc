//! Personnel service.

use async_trait::async_trait;
use mockall::automock;
use tracing::instrument;

use crate::{
    client::{ApiClient, ApiError},
    envelope::records,
    personnel::models::{NewPersonnel, Personnel, PersonnelUpdate},
};

const PERSONNEL_PATH: &str = "api/personel";

#[derive(Debug, Clone)]
pub struct HttpPersonnelService {
    client: ApiClient,
}

impl HttpPersonnelService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PersonnelService for HttpPersonnelService {
    async fn list_personnel(&self) -> Result<Vec<Personnel>, ApiError> {
        let body = self.client.get(PERSONNEL_PATH).await?;

        Ok(records(&body)
            .iter()
            .filter_map(Personnel::from_record)
            .collect())
    }

    #[instrument(skip_all)]
    async fn create_personnel(&self, personnel: &NewPersonnel) -> Result<(), ApiError> {
        self.client.post(PERSONNEL_PATH, personnel).await?;

        Ok(())
    }

    #[instrument(skip_all, fields(id = update.id))]
    async fn update_personnel(&self, update: &PersonnelUpdate) -> Result<(), ApiError> {
        self.client.put(PERSONNEL_PATH, update).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_personnel(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("{PERSONNEL_PATH}/{id}")).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait PersonnelService: Send + Sync {
    /// Retrieves all staff.
    async fn list_personnel(&self) -> Result<Vec<Personnel>, ApiError>;

    /// Hires a staff member.
    async fn create_personnel(&self, personnel: &NewPersonnel) -> Result<(), ApiError>;

    /// Replaces a staff member's details.
    async fn update_personnel(&self, update: &PersonnelUpdate) -> Result<(), ApiError>;

    /// Removes a staff member.
    async fn delete_personnel(&self, id: u64) -> Result<(), ApiError>;
}
