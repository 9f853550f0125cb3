//! Who is calling the engine.
//!
//! The session is passed explicitly to the operations that depend on the
//! caller's identity (taxi report submission and listing).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Session {
    /// Office staff: may act on every driver.
    Staff,
    /// A taxi driver: may only see and submit their own reports.
    TaxiDriver { taxi_driver_id: Uuid },
}

impl Session {
    /// Fails unless the session may submit a report for `taxi_driver_id`.
    pub fn ensure_can_report_for(&self, taxi_driver_id: Uuid) -> ResultEngine<()> {
        match self {
            Self::Staff => Ok(()),
            Self::TaxiDriver { taxi_driver_id: own } if *own == taxi_driver_id => Ok(()),
            Self::TaxiDriver { .. } => Err(EngineError::Forbidden(
                "taxi drivers can only report for themselves".to_string(),
            )),
        }
    }

    /// Resolves the taxi driver filter for a listing.
    ///
    /// Staff get what they asked for. A taxi driver is always restricted to
    /// their own reports, and asking for someone else's is forbidden.
    pub fn scope_taxi_driver(&self, requested: Option<Uuid>) -> ResultEngine<Option<Uuid>> {
        match (self, requested) {
            (Self::Staff, requested) => Ok(requested),
            (Self::TaxiDriver { taxi_driver_id }, None) => Ok(Some(*taxi_driver_id)),
            (Self::TaxiDriver { taxi_driver_id }, Some(id)) if id == *taxi_driver_id => Ok(Some(id)),
            (Self::TaxiDriver { .. }, Some(_)) => Err(EngineError::Forbidden(
                "taxi drivers can only list their own reports".to_string(),
            )),
        }
    }
}
