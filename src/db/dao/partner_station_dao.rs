use sea_orm::DatabaseConnection;

use super::{DaoBase, OwnedDao};
use crate::db::entities::{partner_station, prelude::PartnerStation};

#[derive(Clone)]
pub struct PartnerStationDao {
    db: DatabaseConnection,
}

impl DaoBase for PartnerStationDao {
    type Entity = PartnerStation;
    type Model = partner_station::Model;
    type ActiveModel = partner_station::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl OwnedDao for PartnerStationDao {}
