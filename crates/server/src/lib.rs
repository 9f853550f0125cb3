use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod assignments;
mod lookups;
mod reports;
mod server;
mod taxi;

pub mod types {
    pub mod assignment {
        pub use api_types::assignment::AssignmentResolve;
        pub use engine::{Assignment, AssignmentStatus};
    }

    pub mod payroll {
        pub use api_types::payroll::{ApproveRange, Approved};
        pub use engine::PayrollReport;
    }

    pub mod reports {
        pub use api_types::DateWindow;
        pub use engine::{CalendarMonth, RevenueReport};
    }

    pub mod taxi {
        pub use api_types::taxi::{TaxiReportNew, TaxiSettlementsQuery};
        pub use engine::{TaxiDailyReport, TaxiSettlementReport};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidRate(_)
        | EngineError::InvalidRange(_)
        | EngineError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
