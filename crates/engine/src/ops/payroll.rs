use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::{Expr, Query},
};
use uuid::Uuid;

use crate::{
    Assignment, Booking, DateRange, Driver, EngineError, PayrollReport, ResultEngine, assignments,
    bookings, drivers, payroll,
};

use super::{Engine, with_tx};

impl Engine {
    /// Payroll of one driver over the booking dates in `range`.
    pub async fn driver_payroll(&self, driver_id: Uuid, range: DateRange) -> ResultEngine<PayrollReport> {
        with_tx!(self, |db_tx| {
            let driver = self.require_driver(&db_tx, driver_id).await?;

            let rows = assignments::Entity::find()
                .filter(assignments::Column::DriverId.eq(driver_id))
                .find_also_related(bookings::Entity)
                .filter(bookings::Column::Date.between(range.from, range.to))
                .order_by_asc(bookings::Column::Date)
                .all(&db_tx)
                .await?;

            let mut pairs = Vec::with_capacity(rows.len());
            for (assignment, booking) in rows {
                let Some(booking) = booking else { continue };
                pairs.push((Assignment::try_from(assignment)?, Booking::try_from(booking)?));
            }

            Ok(payroll::build(
                &driver,
                pairs.iter().map(|(assignment, booking)| (assignment, booking)),
                range,
                self.default_commission,
            ))
        })
    }

    /// Approves the payment of one assignment.
    ///
    /// Returns 1 when the assignment was unpaid, 0 when it was already paid.
    pub async fn approve_one(&self, assignment_id: Uuid) -> ResultEngine<u64> {
        let approved = with_tx!(self, |db_tx| {
            let exists = assignments::Entity::find_by_id(assignment_id)
                .one(&db_tx)
                .await?
                .is_some();
            if !exists {
                return Err(EngineError::KeyNotFound("assignment not exists".to_string()));
            }

            let res = mark_paid()
                .filter(assignments::Column::Id.eq(assignment_id))
                .exec(&db_tx)
                .await?;
            Ok::<_, EngineError>(res.rows_affected)
        })?;

        tracing::info!(%assignment_id, approved, "payroll approval");
        Ok(approved)
    }

    /// Approves every unpaid assignment of a driver whose booking date falls
    /// inside `range`.
    pub async fn approve_range(&self, driver_id: Uuid, range: DateRange) -> ResultEngine<u64> {
        let approved = with_tx!(self, |db_tx| {
            self.require_driver(&db_tx, driver_id).await?;

            let in_range = Query::select()
                .column(bookings::Column::Id)
                .from(bookings::Entity)
                .and_where(bookings::Column::Date.between(range.from, range.to))
                .to_owned();

            let res = mark_paid()
                .filter(assignments::Column::DriverId.eq(driver_id))
                .filter(assignments::Column::BookingId.in_subquery(in_range))
                .exec(&db_tx)
                .await?;
            Ok::<_, EngineError>(res.rows_affected)
        })?;

        tracing::info!(
            %driver_id,
            from = %range.from,
            to = %range.to,
            approved,
            "payroll approval"
        );
        Ok(approved)
    }

    /// Approves **every** unpaid assignment of a driver, whatever its date.
    pub async fn approve_all(&self, driver_id: Uuid) -> ResultEngine<u64> {
        let approved = with_tx!(self, |db_tx| {
            self.require_driver(&db_tx, driver_id).await?;

            let res = mark_paid()
                .filter(assignments::Column::DriverId.eq(driver_id))
                .exec(&db_tx)
                .await?;
            Ok::<_, EngineError>(res.rows_affected)
        })?;

        tracing::info!(%driver_id, approved, "payroll approval of all unpaid trips");
        Ok(approved)
    }

    pub(super) async fn require_driver(
        &self,
        db: &DatabaseTransaction,
        driver_id: Uuid,
    ) -> ResultEngine<Driver> {
        let model = drivers::Entity::find_by_id(driver_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("driver not exists".to_string()))?;
        Driver::try_from(model)
    }
}

/// `UPDATE driver_assignments SET paid = true, paid_at = now WHERE paid = false`.
///
/// The `paid = false` guard keeps the first `paid_at` on repeated approvals.
fn mark_paid() -> sea_orm::UpdateMany<assignments::Entity> {
    let now = Utc::now();
    assignments::Entity::update_many()
        .col_expr(assignments::Column::Paid, Expr::value(true))
        .col_expr(assignments::Column::PaidAt, Expr::value(Some(now)))
        .col_expr(assignments::Column::UpdatedAt, Expr::value(now))
        .filter(assignments::Column::Paid.eq(false))
}
