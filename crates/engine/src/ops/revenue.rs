use sea_orm::{QueryFilter, prelude::*};

use crate::{
    DateRange, Money, ResultEngine, RevenueReport, assignments, bookings,
    reconciliation::{self, AssignmentPayout, BookingRevenue},
};

use super::Engine;

impl Engine {
    /// Daily revenue, driver pay and company profit over the booking dates
    /// in `range`.
    ///
    /// Revenue comes from the bookings, pay and profit from the assignments;
    /// both are fetched concurrently and merged by date.
    pub async fn revenue_report(&self, range: DateRange) -> ResultEngine<RevenueReport> {
        let revenue = bookings::Entity::find()
            .filter(bookings::Column::Date.between(range.from, range.to))
            .all(&self.database);
        let payouts = assignments::Entity::find()
            .find_also_related(bookings::Entity)
            .filter(bookings::Column::Date.between(range.from, range.to))
            .all(&self.database);

        let (revenue, payouts) = tokio::try_join!(revenue, payouts)?;

        let revenue = revenue
            .into_iter()
            .map(|booking| {
                Ok(BookingRevenue {
                    date: booking.date,
                    total_price: Money::new(booking.total_price).ensure_non_negative("total_price")?,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        let payouts = payouts
            .into_iter()
            .filter_map(|(assignment, booking)| booking.map(|booking| (assignment, booking)))
            .map(|(assignment, booking)| {
                Ok(AssignmentPayout {
                    booking_date: booking.date,
                    driver_pay: Money::new(assignment.driver_pay).ensure_non_negative("driver_pay")?,
                    company_profit: Money::new(assignment.company_profit)
                        .ensure_non_negative("company_profit")?,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(reconciliation::reconcile(range, revenue, payouts))
    }
}
