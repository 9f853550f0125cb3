//! Daily revenue reconciliation.
//!
//! Booking revenue and assignment payouts are fetched independently and
//! merged on the booking date. A day known to only one side still shows up,
//! with zeros for the other side.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DateRange, Money};

/// Revenue side: one booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookingRevenue {
    pub date: NaiveDate,
    pub total_price: Money,
}

/// Payout side: one assignment, dated by its booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignmentPayout {
    pub booking_date: NaiveDate,
    pub driver_pay: Money,
    pub company_profit: Money,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueTotals {
    pub revenue: Money,
    pub driver: Money,
    pub profit: Money,
}

impl RevenueTotals {
    fn add(&mut self, other: &RevenueTotals) {
        self.revenue += other.revenue;
        self.driver += other.driver;
        self.profit += other.profit;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueDay {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: RevenueTotals,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub range: DateRange,
    pub days: Vec<RevenueDay>,
    pub totals: RevenueTotals,
}

/// Merges both streams into one date-ascending report over `range`.
///
/// Rows dated outside the range are ignored.
pub fn reconcile<B, P>(range: DateRange, bookings: B, payouts: P) -> RevenueReport
where
    B: IntoIterator<Item = BookingRevenue>,
    P: IntoIterator<Item = AssignmentPayout>,
{
    let mut by_day: BTreeMap<NaiveDate, RevenueTotals> = BTreeMap::new();

    for booking in bookings.into_iter().filter(|b| range.contains(b.date)) {
        by_day.entry(booking.date).or_default().revenue += booking.total_price;
    }
    for payout in payouts.into_iter().filter(|p| range.contains(p.booking_date)) {
        let day = by_day.entry(payout.booking_date).or_default();
        day.driver += payout.driver_pay;
        day.profit += payout.company_profit;
    }

    let mut totals = RevenueTotals::default();
    let days = by_day
        .into_iter()
        .map(|(date, day)| {
            totals.add(&day);
            RevenueDay { date, totals: day }
        })
        .collect();

    RevenueReport {
        range,
        days,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn june() -> DateRange {
        DateRange::new(day("2024-06-01"), day("2024-06-30")).unwrap()
    }

    #[test]
    fn empty_range_gives_empty_report() {
        let report = reconcile(june(), Vec::new(), Vec::new());
        assert!(report.days.is_empty());
        assert_eq!(report.totals, RevenueTotals::default());
    }

    #[test]
    fn booking_without_assignment_has_zero_payout() {
        let report = reconcile(
            june(),
            vec![BookingRevenue {
                date: day("2024-06-05"),
                total_price: Money::new(900_000),
            }],
            Vec::new(),
        );
        assert_eq!(report.days.len(), 1);
        assert_eq!(report.days[0].totals.revenue, Money::new(900_000));
        assert_eq!(report.days[0].totals.driver, Money::ZERO);
        assert_eq!(report.days[0].totals.profit, Money::ZERO);
    }

    #[test]
    fn merges_both_sides_by_date() {
        let bookings = vec![
            BookingRevenue {
                date: day("2024-06-10"),
                total_price: Money::new(2_000_000),
            },
            BookingRevenue {
                date: day("2024-06-10"),
                total_price: Money::new(1_000_000),
            },
            BookingRevenue {
                date: day("2024-06-02"),
                total_price: Money::new(500_000),
            },
        ];
        let payouts = vec![
            AssignmentPayout {
                booking_date: day("2024-06-10"),
                driver_pay: Money::new(1_400_000),
                company_profit: Money::new(600_000),
            },
            // Payout whose booking is not in the revenue fetch.
            AssignmentPayout {
                booking_date: day("2024-06-20"),
                driver_pay: Money::new(300_000),
                company_profit: Money::new(200_000),
            },
        ];
        let report = reconcile(june(), bookings, payouts);

        let dates: Vec<_> = report.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![day("2024-06-02"), day("2024-06-10"), day("2024-06-20")]);
        assert_eq!(report.days[1].totals.revenue, Money::new(3_000_000));
        assert_eq!(report.days[1].totals.driver, Money::new(1_400_000));
        assert_eq!(report.days[2].totals.revenue, Money::ZERO);
        assert_eq!(report.days[2].totals.profit, Money::new(200_000));

        assert_eq!(report.totals.revenue, Money::new(3_500_000));
        assert_eq!(report.totals.driver, Money::new(1_700_000));
        assert_eq!(report.totals.profit, Money::new(800_000));
    }

    #[test]
    fn rows_outside_range_are_dropped() {
        let report = reconcile(
            june(),
            vec![BookingRevenue {
                date: day("2024-07-01"),
                total_price: Money::new(100),
            }],
            vec![AssignmentPayout {
                booking_date: day("2024-05-31"),
                driver_pay: Money::new(70),
                company_profit: Money::new(30),
            }],
        );
        assert!(report.days.is_empty());
    }
}
