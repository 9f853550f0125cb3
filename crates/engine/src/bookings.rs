//! The module contains the `Booking` struct and its storage entity.
//!
//! Bookings are created and edited by staff outside the engine. The engine
//! reads them for placement and settlement, and only ever writes the
//! denormalized `driver_id`/`vehicle_id` pair.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money};

/// A customer trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub route_code: String,
    pub car_type_code: String,
    pub pickup: String,
    pub dropoff: String,
    /// Trip start, a calendar date.
    pub date: NaiveDate,
    /// Inclusive end of the trip, if it spans several days.
    pub return_date: Option<NaiveDate>,
    pub time: Option<String>,
    pub return_time: Option<String>,
    pub round_trip: bool,
    pub adults: i32,
    pub children: i32,
    pub total_price: Money,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub note: Option<String>,
}

impl Booking {
    pub fn new(
        customer_name: &str,
        route_code: &str,
        car_type_code: &str,
        date: NaiveDate,
        total_price: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_name: customer_name.to_string(),
            customer_phone: String::new(),
            customer_email: None,
            route_code: route_code.to_string(),
            car_type_code: car_type_code.to_string(),
            pickup: String::new(),
            dropoff: String::new(),
            date,
            return_date: None,
            time: None,
            return_time: None,
            round_trip: false,
            adults: 1,
            children: 0,
            total_price,
            driver_id: None,
            vehicle_id: None,
            note: None,
        }
    }

    /// Last calendar day occupied by the trip.
    pub fn end_date(&self) -> NaiveDate {
        self.return_date.unwrap_or(self.date)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub route_code: String,
    pub car_type_code: String,
    pub pickup: String,
    pub dropoff: String,
    pub date: Date,
    pub return_date: Option<Date>,
    pub time: Option<String>,
    pub return_time: Option<String>,
    pub round_trip: bool,
    pub adults: i32,
    pub children: i32,
    pub total_price: i64,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "crate::assignments::Entity")]
    Assignment,
}

impl Related<crate::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Booking> for ActiveModel {
    fn from(value: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            customer_name: ActiveValue::Set(value.customer_name.clone()),
            customer_phone: ActiveValue::Set(value.customer_phone.clone()),
            customer_email: ActiveValue::Set(value.customer_email.clone()),
            route_code: ActiveValue::Set(value.route_code.clone()),
            car_type_code: ActiveValue::Set(value.car_type_code.clone()),
            pickup: ActiveValue::Set(value.pickup.clone()),
            dropoff: ActiveValue::Set(value.dropoff.clone()),
            date: ActiveValue::Set(value.date),
            return_date: ActiveValue::Set(value.return_date),
            time: ActiveValue::Set(value.time.clone()),
            return_time: ActiveValue::Set(value.return_time.clone()),
            round_trip: ActiveValue::Set(value.round_trip),
            adults: ActiveValue::Set(value.adults),
            children: ActiveValue::Set(value.children),
            total_price: ActiveValue::Set(value.total_price.minor()),
            driver_id: ActiveValue::Set(value.driver_id),
            vehicle_id: ActiveValue::Set(value.vehicle_id),
            note: ActiveValue::Set(value.note.clone()),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Money::new(model.total_price)
            .ensure_non_negative(&format!("booking {} total_price", model.id))?;
        Ok(Self {
            id: model.id,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            customer_email: model.customer_email,
            route_code: model.route_code,
            car_type_code: model.car_type_code,
            pickup: model.pickup,
            dropoff: model.dropoff,
            date: model.date,
            return_date: model.return_date,
            time: model.time,
            return_time: model.return_time,
            round_trip: model.round_trip,
            adults: model.adults,
            children: model.children,
            total_price: Money::new(model.total_price),
            driver_id: model.driver_id,
            vehicle_id: model.vehicle_id,
            note: model.note,
        })
    }
}
