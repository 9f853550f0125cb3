//! Driver assignment and payroll approval endpoints.

use api_types::{
    assignment::AssignmentResolve,
    payroll::{ApproveRange, Approved},
};
use axum::{
    Json,
    extract::{Path, State},
};
use engine::{Assignment, DateRange};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn resolve(
    State(state): State<ServerState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<AssignmentResolve>,
) -> Result<Json<Assignment>, ServerError> {
    let assignment = state
        .engine
        .resolve_assignment(booking_id, payload.driver_id, payload.vehicle_id)
        .await?;
    Ok(Json(assignment))
}

pub async fn complete(
    State(state): State<ServerState>,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<Assignment>, ServerError> {
    Ok(Json(state.engine.complete_assignment(assignment_id).await?))
}

pub async fn approve_one(
    State(state): State<ServerState>,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<Approved>, ServerError> {
    let approved = state.engine.approve_one(assignment_id).await?;
    Ok(Json(Approved { approved }))
}

pub async fn approve_range(
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
    Json(payload): Json<ApproveRange>,
) -> Result<Json<Approved>, ServerError> {
    let range = DateRange::new(payload.from, payload.to)?;
    let approved = state.engine.approve_range(driver_id, range).await?;
    Ok(Json(Approved { approved }))
}

/// Approves every unpaid trip of the driver, regardless of date.
pub async fn approve_all(
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<Approved>, ServerError> {
    let approved = state.engine.approve_all(driver_id).await?;
    Ok(Json(Approved { approved }))
}
