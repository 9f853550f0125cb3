use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};

use crate::{Booking, CalendarMonth, DateRange, ResultEngine, bookings, calendar};

use super::Engine;

impl Engine {
    /// Bookings placed into the day cells of `window`.
    ///
    /// A booking shows up when any of its days falls inside the window.
    /// Stored bookings that cannot be placed (negative price, return date
    /// before the trip date) are skipped and logged.
    pub async fn calendar(&self, window: DateRange) -> ResultEngine<CalendarMonth> {
        let models = bookings::Entity::find()
            .filter(bookings::Column::Date.lte(window.to))
            .filter(
                Condition::any()
                    .add(bookings::Column::Date.gte(window.from))
                    .add(bookings::Column::ReturnDate.gte(window.from)),
            )
            .order_by_asc(bookings::Column::Date)
            .order_by_asc(bookings::Column::Time)
            .all(&self.database)
            .await?;

        let mut placeable = Vec::with_capacity(models.len());
        for model in models {
            let id = model.id;
            match Booking::try_from(model) {
                Ok(booking) if booking.end_date() >= booking.date => placeable.push(booking),
                Ok(booking) => tracing::warn!(
                    booking_id = %id,
                    date = %booking.date,
                    return_date = %booking.end_date(),
                    "skipping booking returning before it starts"
                ),
                Err(err) => tracing::warn!(booking_id = %id, "skipping booking: {err}"),
            }
        }

        calendar::place(&placeable, window)
    }
}
