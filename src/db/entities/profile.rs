use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// Application-side user record. One per authenticated identity, keyed by
/// `auth_user_id`; its `id` is the owner of rentals and partner stations.
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(unique)]
    pub auth_user_id: Uuid,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[sea_orm(default_value = false)]
    pub is_partner: bool,
    #[sea_orm(belongs_to, from = "auth_user_id", to = "id", on_delete = "Cascade")]
    pub auth_user: HasOne<super::auth_user::Entity>,
    #[sea_orm(has_many)]
    pub rentals: HasMany<super::rental_history::Entity>,
    #[sea_orm(has_many)]
    pub partner_stations: HasMany<super::partner_station::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
