//! Settlement engine for a ground-transportation business.
//!
//! The crate turns booking, assignment and taxi report records into calendar
//! placement, driver pay, payroll, revenue reconciliation and taxi
//! settlements. Every computation lives in a pure module ([`calendar`],
//! [`payroll`], [`reconciliation`], [`taxi`], [`PaySplit`]); the [`Engine`]
//! fetches snapshots from the store, runs them, and performs the few writes
//! the settlement needs.

pub use assignments::{Assignment, AssignmentStatus, PaySplit};
pub use bookings::Booking;
pub use calendar::{CalendarDay, CalendarEntry, CalendarMonth, DateRange};
pub use cars::Car;
pub use drivers::Driver;
pub use error::EngineError;
pub use lookup::{Lookup, Roster};
pub use money::{Money, Rate};
pub use notify::{AssignmentNotification, NoopSink, NotificationSink, NotifyError, WebhookSink};
pub use ops::{Engine, EngineBuilder};
pub use payroll::PayrollReport;
pub use reconciliation::RevenueReport;
pub use routes::Route;
pub use session::Session;
pub use taxi::{TaxiSettlement, TaxiSettlementReport};
pub use taxi_drivers::TaxiDriver;
pub use taxi_reports::{TaxiDailyReport, TaxiReportInput};
pub use vehicles::{Vehicle, VehicleStatus};

pub mod assignments;
pub mod bookings;
pub mod calendar;
pub mod cars;
pub mod drivers;
mod error;
pub mod lookup;
mod money;
pub mod notify;
mod ops;
pub mod payroll;
pub mod reconciliation;
pub mod routes;
mod session;
pub mod taxi;
pub mod taxi_drivers;
pub mod taxi_reports;
pub mod vehicles;

type ResultEngine<T> = Result<T, EngineError>;
