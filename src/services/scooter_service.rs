use serde::Deserialize;

use crate::{
    db::dao::{PaginatedResponse, ScooterDao},
    db::entities::scooter::{self, ScooterStatus},
    error::AppError,
};

fn default_status() -> ScooterStatus {
    ScooterStatus::IsAtStation
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScooterDraft {
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub current_location: String,
    #[serde(default = "default_status")]
    pub current_status: ScooterStatus,
}

#[derive(Clone)]
pub struct ScooterService {
    scooter_dao: ScooterDao,
}

impl ScooterService {
    pub fn new(scooter_dao: ScooterDao) -> Self {
        Self { scooter_dao }
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<scooter::Model>, AppError> {
        Ok(self.scooter_dao.list(page, page_size).await?)
    }

    pub async fn create(&self, draft: ScooterDraft) -> Result<scooter::Model, AppError> {
        let location = draft.current_location.trim();
        if location.is_empty() {
            return Err(AppError::bad_request("Current location is required"));
        }
        Ok(self
            .scooter_dao
            .create_scooter(
                draft.reference_number,
                draft.model,
                location,
                draft.current_status,
            )
            .await?)
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.scooter_dao
            .count_all()
            .await
            .map_err(|err| AppError::internal(format!("Failed to count scooters: {}", err.detail())))
    }

    pub async fn find_at_offset(&self, offset: u64) -> Result<Option<scooter::Model>, AppError> {
        self.scooter_dao.find_at_offset(offset).await.map_err(|err| {
            AppError::internal(format!("Failed to fetch random scooter: {}", err.detail()))
        })
    }
}
