use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "scooter")]
pub struct Model {
    #[sea_orm(unique)]
    pub reference_number: Option<String>,
    pub model: Option<String>,
    pub current_location: String,
    pub current_status: String,
    #[sea_orm(has_many)]
    pub rentals: HasMany<super::rental_history::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScooterStatus {
    IsAtStation,
    IsUnderWayToStation,
    IsStoredInDepot,
    IsUnderMaintenance,
    IsUnderRecovery,
    IsMissplaced,
    IsLost,
}

impl ScooterStatus {
    pub const ALL: [ScooterStatus; 7] = [
        ScooterStatus::IsAtStation,
        ScooterStatus::IsUnderWayToStation,
        ScooterStatus::IsStoredInDepot,
        ScooterStatus::IsUnderMaintenance,
        ScooterStatus::IsUnderRecovery,
        ScooterStatus::IsMissplaced,
        ScooterStatus::IsLost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScooterStatus::IsAtStation => "IS_AT_STATION",
            ScooterStatus::IsUnderWayToStation => "IS_UNDER_WAY_TO_STATION",
            ScooterStatus::IsStoredInDepot => "IS_STORED_IN_DEPOT",
            ScooterStatus::IsUnderMaintenance => "IS_UNDER_MAINTENANCE",
            ScooterStatus::IsUnderRecovery => "IS_UNDER_RECOVERY",
            ScooterStatus::IsMissplaced => "IS_MISSPLACED",
            ScooterStatus::IsLost => "IS_LOST",
        }
    }
}

impl TryFrom<&str> for ScooterStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or(())
    }
}
