//! Company vehicles.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InService,
    Repairing,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InService => "in_service",
            Self::Repairing => "repairing",
        }
    }
}

impl TryFrom<&str> for VehicleStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "available" => Ok(Self::Available),
            "in_service" => Ok(Self::InService),
            "repairing" => Ok(Self::Repairing),
            other => Err(EngineError::InvalidState(format!(
                "invalid vehicle status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub seats: i32,
    pub status: VehicleStatus,
    pub driver_id: Option<Uuid>,
}

impl Vehicle {
    pub fn new(plate: &str, brand: &str, model: &str, seats: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate: plate.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            seats,
            status: VehicleStatus::Available,
            driver_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub seats: i32,
    pub status: String,
    pub driver_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vehicle> for ActiveModel {
    fn from(value: &Vehicle) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            plate: ActiveValue::Set(value.plate.clone()),
            brand: ActiveValue::Set(value.brand.clone()),
            model: ActiveValue::Set(value.model.clone()),
            seats: ActiveValue::Set(value.seats),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            driver_id: ActiveValue::Set(value.driver_id),
        }
    }
}

impl TryFrom<Model> for Vehicle {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            plate: model.plate,
            brand: model.brand,
            model: model.model,
            seats: model.seats,
            status: VehicleStatus::try_from(model.status.as_str())?,
            driver_id: model.driver_id,
        })
    }
}
