use sea_orm::{QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Car, Driver, ResultEngine, Route, Vehicle, cars, drivers, routes, vehicles};

use super::{Engine, with_tx};

impl Engine {
    pub async fn routes(&self) -> ResultEngine<Vec<Route>> {
        Ok(routes::Entity::find()
            .order_by_asc(routes::Column::Code)
            .all(&self.database)
            .await?)
    }

    pub async fn cars(&self) -> ResultEngine<Vec<Car>> {
        Ok(cars::Entity::find()
            .order_by_asc(cars::Column::Code)
            .all(&self.database)
            .await?)
    }

    /// Return the chauffeur roster, by name.
    pub async fn drivers(&self) -> ResultEngine<Vec<Driver>> {
        let models = drivers::Entity::find()
            .order_by_asc(drivers::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Driver::try_from).collect()
    }

    /// Return a driver snapshot from DB.
    pub async fn driver(&self, driver_id: Uuid) -> ResultEngine<Driver> {
        with_tx!(self, |db_tx| self.require_driver(&db_tx, driver_id).await)
    }

    pub async fn vehicles(&self) -> ResultEngine<Vec<Vehicle>> {
        let models = vehicles::Entity::find()
            .order_by_asc(vehicles::Column::Plate)
            .all(&self.database)
            .await?;
        models.into_iter().map(Vehicle::try_from).collect()
    }
}
