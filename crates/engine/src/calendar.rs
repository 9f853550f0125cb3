//! Calendar placement of bookings.
//!
//! A booking occupies every calendar day from its `date` to its `return_date`
//! (inclusive). Placement works on [`NaiveDate`] only: a booking stored as
//! `2024-06-10` is always shown on June 10th, whatever the local timezone.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Booking, EngineError, ResultEngine};

/// One day cell occupied by a booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// The day is the trip start.
    pub is_start: bool,
    /// The day is the trip end (always `true` for single-day trips).
    pub is_end: bool,
    /// The trip spans more than one day.
    pub multi: bool,
}

/// Inclusive date window, e.g. the month shown by a calendar grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `to < from`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> ResultEngine<Self> {
        if to < from {
            return Err(EngineError::InvalidRange(format!(
                "range end {to} precedes start {from}"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of days in the range, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Number of distinct calendar months touched by the range.
    pub fn months_spanned(&self) -> u32 {
        use chrono::Datelike;

        let start = self.from.year() * 12 + self.from.month0() as i32;
        let end = self.to.year() * 12 + self.to.month0() as i32;
        (end - start + 1) as u32
    }
}

/// Expands a trip date range into the ordered list of days it occupies.
///
/// Without a return date the trip occupies `date` only, which is both the
/// start and the end. A `return_date` before `date` is rejected.
pub fn expand(date: NaiveDate, return_date: Option<NaiveDate>) -> ResultEngine<Vec<CalendarDay>> {
    let trip = trip_range(date, return_date)?;
    Ok(tagged_days(trip, trip.from, trip.to).collect())
}

fn trip_range(date: NaiveDate, return_date: Option<NaiveDate>) -> ResultEngine<DateRange> {
    let end = return_date.unwrap_or(date);
    DateRange::new(date, end).map_err(|_| {
        EngineError::InvalidRange(format!("return date {end} precedes trip date {date}"))
    })
}

/// Days of `trip` between `from` and `to`, tagged against the trip's own ends.
fn tagged_days(
    trip: DateRange,
    from: NaiveDate,
    to: NaiveDate,
) -> impl Iterator<Item = CalendarDay> {
    let multi = trip.len_days() > 1;
    from.iter_days()
        .take_while(move |day| *day <= to)
        .map(move |day| CalendarDay {
            date: day,
            is_start: day == trip.from,
            is_end: day == trip.to,
            multi,
        })
}

/// A booking placed into a single day cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub booking_id: Uuid,
    pub customer_name: String,
    pub route_code: String,
    pub time: Option<String>,
    pub driver_id: Option<Uuid>,
    #[serde(flatten)]
    pub day: CalendarDay,
}

/// Day cells of a calendar window, keyed by date.
pub type CalendarMonth = BTreeMap<NaiveDate, Vec<CalendarEntry>>;

/// Places each booking into every day of `window` it occupies.
///
/// Days without bookings are absent from the map. Within a day, entries keep
/// the order of `bookings`.
pub fn place<'a, I>(bookings: I, window: DateRange) -> ResultEngine<CalendarMonth>
where
    I: IntoIterator<Item = &'a Booking>,
{
    let mut cells = CalendarMonth::new();
    for booking in bookings {
        let trip = trip_range(booking.date, booking.return_date)?;
        let from = trip.from.max(window.from);
        let to = trip.to.min(window.to);
        for day in tagged_days(trip, from, to) {
            cells.entry(day.date).or_default().push(CalendarEntry {
                booking_id: booking.id,
                customer_name: booking.customer_name.clone(),
                route_code: booking.route_code.clone(),
                time: booking.time.clone(),
                driver_id: booking.driver_id,
                day,
            });
        }
    }
    Ok(cells)
}
