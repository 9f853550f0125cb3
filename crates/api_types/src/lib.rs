use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive calendar-date window, used as a query string (`?from=..&to=..`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

pub mod assignment {
    use super::*;

    /// Request body for `POST /bookings/{id}/assignment`.
    ///
    /// A missing `driver_id` unassigns the booking.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AssignmentResolve {
        pub driver_id: Option<Uuid>,
        pub vehicle_id: Option<Uuid>,
    }
}

pub mod payroll {
    use super::*;

    /// Request body for `POST /drivers/{id}/approve`.
    ///
    /// Only trips whose booking date falls inside the window are approved.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ApproveRange {
        pub from: NaiveDate,
        pub to: NaiveDate,
    }

    /// Response body of every approval endpoint.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Approved {
        /// Number of assignments newly marked as paid.
        pub approved: u64,
    }
}

pub mod taxi {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxiSettlementsQuery {
        pub from: NaiveDate,
        pub to: NaiveDate,
        pub taxi_driver_id: Option<Uuid>,
    }

    /// Request body for `POST /taxi/reports`. Amounts are in minor units
    /// and default to 0; the driver and the date are required.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxiReportNew {
        pub taxi_driver_id: Uuid,
        pub report_date: NaiveDate,
        #[serde(default)]
        pub be_revenue: i64,
        #[serde(default)]
        pub sm_revenue: i64,
        #[serde(default)]
        pub cash_revenue: i64,
        /// Wallet balances may be negative.
        #[serde(default)]
        pub be_wallet_start: i64,
        #[serde(default)]
        pub be_wallet_end: i64,
        #[serde(default)]
        pub sm_wallet_start: i64,
        #[serde(default)]
        pub sm_wallet_end: i64,
        #[serde(default)]
        pub fuel_cost: i64,
        #[serde(default)]
        pub other_cost: i64,
        #[serde(default)]
        pub note: Option<String>,
    }
}
