//! Driver payroll aggregation.
//!
//! Trips are matched by the **booking** date, never by the assignment
//! creation time. The stored per-assignment `driver_pay` is the source of
//! truth for what a driver earned; the [`PayrollAudit`] block recomputes the
//! same period from the driver's *current* commission and base salary and
//! reports the difference, which is expected when the commission changed
//! inside the period.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Assignment, AssignmentStatus, Booking, DateRange, Driver, Money, Rate, assignments::commission_for,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTrip {
    pub assignment_id: Uuid,
    pub booking_id: Uuid,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub customer_name: String,
    pub route_code: String,
    pub total_price: Money,
    pub driver_pay: Money,
    pub company_profit: Money,
    pub status: AssignmentStatus,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PayrollTrip {
    fn new(assignment: &Assignment, booking: &Booking) -> Self {
        Self {
            assignment_id: assignment.id,
            booking_id: booking.id,
            date: booking.date,
            time: booking.time.clone(),
            customer_name: booking.customer_name.clone(),
            route_code: booking.route_code.clone(),
            total_price: booking.total_price,
            driver_pay: assignment.driver_pay,
            company_profit: assignment.company_profit,
            status: assignment.status,
            paid: assignment.paid,
            paid_at: assignment.paid_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollDay {
    pub date: NaiveDate,
    pub revenue: Money,
    pub driver_pay: Money,
    pub trips: Vec<PayrollTrip>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollMonth {
    /// `YYYY-MM`.
    pub month: String,
    pub revenue: Money,
    pub driver_pay: Money,
    pub total_trips: usize,
    /// Days with at least one trip.
    pub total_days: usize,
}

/// Figures recomputed from the driver's current commission and base salary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayrollAudit {
    pub commission: Rate,
    /// Base salary counted once per calendar month touched by the range.
    pub base_salary_total: Money,
    pub commission_pay: Money,
    /// `base_salary_total + commission_pay`.
    pub driver_pay: Money,
    /// `revenue - commission_pay`.
    pub profit: Money,
    /// `commission_pay - stored driver pay`; non-zero when the commission
    /// changed after some trips were assigned.
    pub commission_drift: Money,
}

impl PayrollAudit {
    pub fn drifted(&self) -> bool {
        !self.commission_drift.is_zero()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub revenue: Money,
    /// Sum of the stored per-assignment pay.
    pub driver_pay: Money,
    /// Sum of the stored per-assignment company profit.
    pub company_profit: Money,
    pub paid_pay: Money,
    pub unpaid_pay: Money,
    pub total_trips: usize,
    pub total_days: usize,
    pub audit: PayrollAudit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayrollReport {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub range: DateRange,
    pub trips: Vec<PayrollTrip>,
    pub days: Vec<PayrollDay>,
    pub months: Vec<PayrollMonth>,
    pub summary: PayrollSummary,
}

/// Builds the payroll of `driver` over `range`.
///
/// `rows` may contain trips outside the range; they are ignored.
pub fn build<'a, I>(driver: &Driver, rows: I, range: DateRange, default_commission: Rate) -> PayrollReport
where
    I: IntoIterator<Item = (&'a Assignment, &'a Booking)>,
{
    let mut trips: Vec<PayrollTrip> = rows
        .into_iter()
        .filter(|(_, booking)| range.contains(booking.date))
        .map(|(assignment, booking)| PayrollTrip::new(assignment, booking))
        .collect();
    trips.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.booking_id.cmp(&b.booking_id))
    });

    let mut by_day: BTreeMap<NaiveDate, PayrollDay> = BTreeMap::new();
    for trip in &trips {
        let day = by_day.entry(trip.date).or_insert_with(|| PayrollDay {
            date: trip.date,
            revenue: Money::ZERO,
            driver_pay: Money::ZERO,
            trips: Vec::new(),
        });
        day.revenue += trip.total_price;
        day.driver_pay += trip.driver_pay;
        day.trips.push(trip.clone());
    }
    let days: Vec<PayrollDay> = by_day.into_values().collect();

    let mut by_month: BTreeMap<(i32, u32), PayrollMonth> = BTreeMap::new();
    for day in &days {
        let key = (day.date.year(), day.date.month());
        let month = by_month.entry(key).or_insert_with(|| PayrollMonth {
            month: format!("{:04}-{:02}", key.0, key.1),
            revenue: Money::ZERO,
            driver_pay: Money::ZERO,
            total_trips: 0,
            total_days: 0,
        });
        month.revenue += day.revenue;
        month.driver_pay += day.driver_pay;
        month.total_trips += day.trips.len();
        month.total_days += 1;
    }
    let months: Vec<PayrollMonth> = by_month.into_values().collect();

    let revenue: Money = trips.iter().map(|t| t.total_price).sum();
    let driver_pay: Money = trips.iter().map(|t| t.driver_pay).sum();
    let paid_pay: Money = trips.iter().filter(|t| t.paid).map(|t| t.driver_pay).sum();

    let commission = commission_for(Some(driver), default_commission);
    let commission_pay = commission.apply(revenue);
    let base_salary_total = Money::new(
        driver
            .base_salary
            .minor()
            .saturating_mul(i64::from(range.months_spanned())),
    );

    let summary = PayrollSummary {
        revenue,
        driver_pay,
        company_profit: trips.iter().map(|t| t.company_profit).sum(),
        paid_pay,
        unpaid_pay: driver_pay - paid_pay,
        total_trips: trips.len(),
        total_days: days.len(),
        audit: PayrollAudit {
            commission,
            base_salary_total,
            commission_pay,
            driver_pay: base_salary_total.saturating_add(commission_pay),
            profit: revenue - commission_pay,
            commission_drift: commission_pay - driver_pay,
        },
    };

    PayrollReport {
        driver_id: driver.id,
        driver_name: driver.name.clone(),
        range,
        trips,
        days,
        months,
        summary,
    }
}
