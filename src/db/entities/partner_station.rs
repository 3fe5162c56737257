use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(owner = "user_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "partner_station")]
pub struct Model {
    #[sea_orm(indexed)]
    pub user_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub max_slots: i32,
    pub filled_slots: i32,
    #[sea_orm(default_value = true)]
    pub is_open: bool,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::profile::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
