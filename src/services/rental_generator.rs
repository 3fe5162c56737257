use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use crate::{
    db::entities::rental_history,
    error::AppError,
    resources::{MutationGateway, RentalDraft, RentalHistoryResource},
    services::scooter_service::ScooterService,
};

pub const RENTAL_LOCATIONS: [&str; 10] = [
    "Montpellier Centre",
    "Place de la Comédie",
    "Université de Montpellier",
    "Gare Saint-Roch",
    "Antigone",
    "Port Marianne",
    "Beaux-Arts",
    "Hôtel de Ville",
    "Château d'Eau",
    "Plan Cabanes",
];

const WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;
const MAX_DURATION_MS: i64 = 4 * 60 * 60 * 1000;

/// A plausible ride on `scooter_id` that started within the week before `now`.
pub fn random_draft<G: Rng>(
    rng: &mut G,
    scooter_id: Uuid,
    now: DateTimeWithTimeZone,
) -> RentalDraft {
    let start_time = now - Duration::milliseconds(rng.gen_range(0..WINDOW_MS));
    let end_time = start_time + Duration::milliseconds(rng.gen_range(0..=MAX_DURATION_MS));

    let start = rng.gen_range(0..RENTAL_LOCATIONS.len());
    let mut end = rng.gen_range(0..RENTAL_LOCATIONS.len() - 1);
    if end >= start {
        end += 1;
    }

    let distance: f64 = rng.gen_range(0.5..=15.0);

    RentalDraft {
        scooter_id: Some(scooter_id),
        start_time,
        end_time,
        start_location: RENTAL_LOCATIONS[start].to_string(),
        end_location: RENTAL_LOCATIONS[end].to_string(),
        distance_travelled: (distance * 100.0).round() / 100.0,
    }
}

pub struct RentalGenerator<'a> {
    scooters: ScooterService,
    gateway: &'a MutationGateway<RentalHistoryResource>,
}

impl<'a> RentalGenerator<'a> {
    pub fn new(
        scooters: ScooterService,
        gateway: &'a MutationGateway<RentalHistoryResource>,
    ) -> Self {
        Self { scooters, gateway }
    }

    /// Records a random rental for `owner` on a random scooter of the fleet.
    pub async fn generate(&self, owner: Uuid) -> Result<rental_history::Model, AppError> {
        if owner.is_nil() {
            return Err(AppError::bad_request("User ID is required"));
        }

        let fleet = self.scooters.count().await?;
        if fleet == 0 {
            return Err(AppError::not_found("No scooters found in the database"));
        }

        let offset = rand::thread_rng().gen_range(0..fleet);
        let scooter = self
            .scooters
            .find_at_offset(offset)
            .await?
            .ok_or_else(|| AppError::internal("Failed to select random scooter"))?;

        let now = Utc::now().fixed_offset();
        let draft = random_draft(&mut rand::thread_rng(), scooter.id, now);
        tracing::debug!(
            %owner,
            scooter_id = %scooter.id,
            start_location = %draft.start_location,
            end_location = %draft.end_location,
            "generating rental"
        );
        Ok(self.gateway.create(owner, draft).await?)
    }
}
