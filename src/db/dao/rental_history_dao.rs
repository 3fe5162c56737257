use sea_orm::DatabaseConnection;

use super::{DaoBase, OwnedDao};
use crate::db::entities::{prelude::RentalHistory, rental_history};

#[derive(Clone)]
pub struct RentalHistoryDao {
    db: DatabaseConnection,
}

impl DaoBase for RentalHistoryDao {
    type Entity = RentalHistory;
    type Model = rental_history::Model;
    type ActiveModel = rental_history::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl OwnedDao for RentalHistoryDao {}
