//! Driver assignments.
//!
//! An assignment links one booking (at most one assignment per booking) to a
//! driver and a vehicle, and freezes the pay split computed when the driver
//! was chosen:
//!
//! - `driver_pay = round_half_up(total_price * commission)`
//! - `company_profit = total_price - driver_pay`
//!
//! so `driver_pay + company_profit == total_price` always holds exactly.
//!
//! Status moves `unassigned -> assigned -> completed`. Removing the driver
//! brings the assignment back to `unassigned` with a zero pay. `paid` is
//! orthogonal to the status and never flips back to `false`.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Driver, EngineError, Money, Rate, ResultEngine};

/// Commission used when a driver has no commission of their own.
pub const DEFAULT_COMMISSION_BP: u32 = 7_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Unassigned,
    Assigned,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
        }
    }

    /// Status after (re-)resolving the driver of an assignment.
    ///
    /// A completed trip stays completed when its driver is changed.
    pub fn resolve(current: Option<Self>, has_driver: bool) -> Self {
        match (current, has_driver) {
            (_, false) => Self::Unassigned,
            (Some(Self::Completed), true) => Self::Completed,
            (_, true) => Self::Assigned,
        }
    }

    /// Status after marking the trip as driven.
    pub fn complete(self) -> ResultEngine<Self> {
        match self {
            Self::Unassigned => Err(EngineError::InvalidState(
                "cannot complete an unassigned trip".to_string(),
            )),
            Self::Assigned | Self::Completed => Ok(Self::Completed),
        }
    }
}

impl TryFrom<&str> for AssignmentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unassigned" => Ok(Self::Unassigned),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidState(format!(
                "invalid assignment status: {other}"
            ))),
        }
    }
}

/// How a booking price is split between driver and company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaySplit {
    pub driver_pay: Money,
    pub company_profit: Money,
}

impl PaySplit {
    /// Splits `total_price` given the commission of the assigned driver.
    ///
    /// `None` means nobody drives the trip: the whole price is company
    /// profit.
    pub fn compute(total_price: Money, commission: Option<Rate>) -> ResultEngine<Self> {
        total_price.ensure_non_negative("total_price")?;
        let driver_pay = commission.map_or(Money::ZERO, |rate| rate.apply(total_price));
        Ok(Self {
            driver_pay,
            company_profit: total_price - driver_pay,
        })
    }
}

/// Commission applied to `driver`, falling back to `default` when the driver
/// is unknown or has no commission set.
pub fn commission_for(driver: Option<&Driver>, default: Rate) -> Rate {
    driver.and_then(|d| d.commission).unwrap_or(default)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub driver_pay: Money,
    pub company_profit: Money,
    pub status: AssignmentStatus,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "driver_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub booking_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub driver_pay: i64,
    pub company_profit: i64,
    pub status: String,
    pub paid: bool,
    pub paid_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::bookings::Entity",
        from = "Column::BookingId",
        to = "crate::bookings::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Booking,
}

impl Related<crate::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Assignment> for ActiveModel {
    fn from(value: &Assignment) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            booking_id: ActiveValue::Set(value.booking_id),
            driver_id: ActiveValue::Set(value.driver_id),
            vehicle_id: ActiveValue::Set(value.vehicle_id),
            driver_pay: ActiveValue::Set(value.driver_pay.minor()),
            company_profit: ActiveValue::Set(value.company_profit.minor()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            paid: ActiveValue::Set(value.paid),
            paid_at: ActiveValue::Set(value.paid_at),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Assignment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            booking_id: model.booking_id,
            driver_id: model.driver_id,
            vehicle_id: model.vehicle_id,
            driver_pay: Money::new(model.driver_pay).ensure_non_negative("driver_pay")?,
            company_profit: Money::new(model.company_profit).ensure_non_negative("company_profit")?,
            status: AssignmentStatus::try_from(model.status.as_str())?,
            paid: model.paid,
            paid_at: model.paid_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
