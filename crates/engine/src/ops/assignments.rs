use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::{
    Assignment, AssignmentNotification, AssignmentStatus, Booking, Driver, EngineError, PaySplit,
    ResultEngine, Roster, Vehicle,
    assignments::{self, commission_for},
    bookings, cars, drivers, notify, routes, vehicles,
};

use super::{Engine, with_tx};

/// Status written on conflict: a completed trip keeps its status when a
/// driver is (re-)assigned.
const KEEP_COMPLETED: &str = r#"CASE WHEN "driver_assignments"."status" = 'completed' THEN 'completed' ELSE 'assigned' END"#;

impl Engine {
    /// Assigns (or unassigns, with `driver_id = None`) the driver and vehicle
    /// of a booking and freezes the resulting pay split.
    ///
    /// The assignment row is upserted on `booking_id`, so re-resolving a
    /// booking never creates a second row. The booking's denormalized
    /// driver/vehicle columns are updated in the same transaction.
    ///
    /// When a driver is set, a notification is dispatched after commit. Its
    /// outcome never affects the result.
    pub async fn resolve_assignment(
        &self,
        booking_id: Uuid,
        driver_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
    ) -> ResultEngine<Assignment> {
        let (assignment, notification) = with_tx!(self, |db_tx| {
            let booking = self.require_booking(&db_tx, booking_id).await?;

            let driver = match driver_id {
                Some(id) => {
                    let driver = drivers::Entity::find_by_id(id)
                        .one(&db_tx)
                        .await?
                        .map(Driver::try_from)
                        .transpose()?;
                    if driver.is_none() {
                        tracing::warn!(
                            %booking_id,
                            driver_id = %id,
                            "driver not found, applying the default commission"
                        );
                    }
                    driver
                }
                None => None,
            };

            let commission =
                driver_id.map(|_| commission_for(driver.as_ref(), self.default_commission));
            let split = PaySplit::compute(booking.total_price, commission)?;

            self.upsert_assignment(&db_tx, booking_id, driver_id, vehicle_id, split)
                .await?;

            bookings::Entity::update_many()
                .col_expr(bookings::Column::DriverId, Expr::value(driver_id))
                .col_expr(bookings::Column::VehicleId, Expr::value(vehicle_id))
                .filter(bookings::Column::Id.eq(booking_id))
                .exec(&db_tx)
                .await?;

            let assignment = assignments::Entity::find()
                .filter(assignments::Column::BookingId.eq(booking_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("assignment not exists".to_string()))?;
            let assignment = Assignment::try_from(assignment)?;

            let notification = match &driver {
                Some(driver) => Some(
                    self.assignment_notification(&db_tx, &booking, &assignment, driver)
                        .await?,
                ),
                None => None,
            };

            Ok::<_, EngineError>((assignment, notification))
        })?;

        tracing::info!(
            %booking_id,
            driver_id = ?assignment.driver_id,
            status = assignment.status.as_str(),
            driver_pay = %assignment.driver_pay,
            "assignment resolved"
        );

        if let Some(payload) = notification {
            notify::dispatch(self.notifier.clone(), payload, self.notify_timeout);
        }

        Ok(assignment)
    }

    /// Marks the trip of an assignment as driven.
    ///
    /// Completing an already completed assignment is a no-op.
    pub async fn complete_assignment(&self, assignment_id: Uuid) -> ResultEngine<Assignment> {
        with_tx!(self, |db_tx| {
            let model = assignments::Entity::find_by_id(assignment_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("assignment not exists".to_string()))?;
            let mut assignment = Assignment::try_from(model)?;

            let status = assignment.status.complete()?;
            if status != assignment.status {
                let now = Utc::now();
                let active = assignments::ActiveModel {
                    id: ActiveValue::Set(assignment_id),
                    status: ActiveValue::Set(status.as_str().to_string()),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                };
                active.update(&db_tx).await?;
                assignment.status = status;
                assignment.updated_at = now;
            }
            Ok(assignment)
        })
    }

    /// Return the assignment of a booking, if any.
    pub async fn assignment_for_booking(&self, booking_id: Uuid) -> ResultEngine<Option<Assignment>> {
        with_tx!(self, |db_tx| {
            self.require_booking(&db_tx, booking_id).await?;
            let assignment = assignments::Entity::find()
                .filter(assignments::Column::BookingId.eq(booking_id))
                .one(&db_tx)
                .await?
                .map(Assignment::try_from)
                .transpose()?;
            Ok(assignment)
        })
    }

    pub(super) async fn require_booking(
        &self,
        db: &DatabaseTransaction,
        booking_id: Uuid,
    ) -> ResultEngine<Booking> {
        let model = bookings::Entity::find_by_id(booking_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("booking not exists".to_string()))?;
        Booking::try_from(model)
    }

    async fn upsert_assignment(
        &self,
        db: &DatabaseTransaction,
        booking_id: Uuid,
        driver_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        split: PaySplit,
    ) -> ResultEngine<()> {
        let now = Utc::now();
        let status = AssignmentStatus::resolve(None, driver_id.is_some());
        let row = Assignment {
            id: Uuid::new_v4(),
            booking_id,
            driver_id,
            vehicle_id,
            driver_pay: split.driver_pay,
            company_profit: split.company_profit,
            status,
            paid: false,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut on_conflict = OnConflict::column(assignments::Column::BookingId);
        on_conflict.update_columns([
            assignments::Column::DriverId,
            assignments::Column::VehicleId,
            assignments::Column::DriverPay,
            assignments::Column::CompanyProfit,
            assignments::Column::UpdatedAt,
        ]);
        if driver_id.is_some() {
            on_conflict.value(assignments::Column::Status, Expr::cust(KEEP_COMPLETED));
        } else {
            on_conflict.update_column(assignments::Column::Status);
        }

        let model: assignments::ActiveModel = (&row).into();
        assignments::Entity::insert(model)
            .on_conflict(on_conflict)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    async fn assignment_notification(
        &self,
        db: &DatabaseTransaction,
        booking: &Booking,
        assignment: &Assignment,
        driver: &Driver,
    ) -> ResultEngine<AssignmentNotification> {
        let routes = Roster::keyed(
            routes::Entity::find_by_id(booking.route_code.clone())
                .one(db)
                .await?,
            |route| route.code.clone(),
        );
        let cars = Roster::keyed(
            cars::Entity::find_by_id(booking.car_type_code.clone())
                .one(db)
                .await?,
            |car| car.code.clone(),
        );
        let vehicle = match assignment.vehicle_id {
            Some(id) => vehicles::Entity::find_by_id(id)
                .one(db)
                .await?
                .map(Vehicle::try_from)
                .transpose()?,
            None => None,
        };
        let vehicles = Roster::keyed(vehicle, |vehicle| vehicle.id);

        Ok(AssignmentNotification::build(
            booking, assignment, driver, &routes, &cars, &vehicles,
        ))
    }
}
