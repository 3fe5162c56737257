use sea_orm::DatabaseConnection;

use super::{
    AuthUserDao, DaoBase, PartnerStationDao, ProfileDao, RefreshTokenDao, RentalHistoryDao,
    ScooterDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn auth_user(&self) -> AuthUserDao {
        DaoBase::new(&self.db)
    }

    pub fn refresh_token(&self) -> RefreshTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn profile(&self) -> ProfileDao {
        DaoBase::new(&self.db)
    }

    pub fn scooter(&self) -> ScooterDao {
        DaoBase::new(&self.db)
    }

    pub fn rental_history(&self) -> RentalHistoryDao {
        DaoBase::new(&self.db)
    }

    pub fn partner_station(&self) -> PartnerStationDao {
        DaoBase::new(&self.db)
    }
}
