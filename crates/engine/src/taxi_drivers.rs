//! Owner-operated taxi drivers.
//!
//! This roster is independent from the chauffeur [`Driver`](crate::Driver)
//! roster: taxi drivers keep a share of the post-fee revenue instead of a
//! commission on bookings.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, Rate};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxiDriver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub car_plate: String,
    /// Share of the post-fee revenue kept by the driver.
    pub driver_share: Rate,
    pub be_wallet_baseline: Money,
    pub sm_wallet_baseline: Money,
    pub active: bool,
}

impl TaxiDriver {
    pub fn new(name: &str, car_plate: &str, driver_share: Rate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: String::new(),
            car_plate: car_plate.to_string(),
            driver_share,
            be_wallet_baseline: Money::ZERO,
            sm_wallet_baseline: Money::ZERO,
            active: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "taxi_drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub car_plate: String,
    pub driver_share: f64,
    pub be_wallet_baseline: i64,
    pub sm_wallet_baseline: i64,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::taxi_reports::Entity")]
    Reports,
}

impl Related<crate::taxi_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TaxiDriver> for ActiveModel {
    fn from(value: &TaxiDriver) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            car_plate: ActiveValue::Set(value.car_plate.clone()),
            driver_share: ActiveValue::Set(value.driver_share.percent()),
            be_wallet_baseline: ActiveValue::Set(value.be_wallet_baseline.minor()),
            sm_wallet_baseline: ActiveValue::Set(value.sm_wallet_baseline.minor()),
            active: ActiveValue::Set(value.active),
        }
    }
}

impl TryFrom<Model> for TaxiDriver {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let driver_share = Rate::from_percent(model.driver_share).map_err(|err| {
            EngineError::InvalidRate(format!("taxi driver {} share: {err}", model.id))
        })?;
        Ok(Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            car_plate: model.car_plate,
            driver_share,
            be_wallet_baseline: Money::new(model.be_wallet_baseline),
            sm_wallet_baseline: Money::new(model.sm_wallet_baseline),
            active: model.active,
        })
    }
}
