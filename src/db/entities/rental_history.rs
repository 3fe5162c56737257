use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(owner = "user_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "rental_history")]
pub struct Model {
    #[sea_orm(indexed)]
    pub user_id: Option<Uuid>,
    pub scooter_id: Option<Uuid>,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    pub start_location: String,
    pub end_location: String,
    pub distance_travelled: f64,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::profile::Entity>,
    #[sea_orm(belongs_to, from = "scooter_id", to = "id", on_delete = "SetNull")]
    pub scooter: HasOne<super::scooter::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
