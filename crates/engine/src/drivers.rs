//! Chauffeur drivers, paid by commission on the bookings they drive.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, Rate};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Share of a booking price paid to the driver. `None` means the engine
    /// default applies.
    pub commission: Option<Rate>,
    /// Fixed monthly amount, on top of commissions.
    pub base_salary: Money,
    pub active: bool,
}

impl Driver {
    pub fn new(name: &str, commission: Option<Rate>, base_salary: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: String::new(),
            email: None,
            commission,
            base_salary,
            active: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub commission_percent: Option<f64>,
    pub base_salary: i64,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Driver> for ActiveModel {
    fn from(value: &Driver) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            email: ActiveValue::Set(value.email.clone()),
            commission_percent: ActiveValue::Set(value.commission.map(Rate::percent)),
            base_salary: ActiveValue::Set(value.base_salary.minor()),
            active: ActiveValue::Set(value.active),
        }
    }
}

impl TryFrom<Model> for Driver {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let commission = model
            .commission_percent
            .map(Rate::from_percent)
            .transpose()
            .map_err(|err| {
                EngineError::InvalidRate(format!("driver {} commission: {err}", model.id))
            })?;
        let base_salary = Money::new(model.base_salary)
            .ensure_non_negative(&format!("driver {} base_salary", model.id))?;
        Ok(Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            email: model.email,
            commission,
            base_salary,
            active: model.active,
        })
    }
}
