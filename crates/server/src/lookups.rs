//! Read-only roster endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use engine::{Car, Driver, Route, Vehicle};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn routes(State(state): State<ServerState>) -> Result<Json<Vec<Route>>, ServerError> {
    Ok(Json(state.engine.routes().await?))
}

pub async fn cars(State(state): State<ServerState>) -> Result<Json<Vec<Car>>, ServerError> {
    Ok(Json(state.engine.cars().await?))
}

pub async fn drivers(State(state): State<ServerState>) -> Result<Json<Vec<Driver>>, ServerError> {
    Ok(Json(state.engine.drivers().await?))
}

pub async fn driver(
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<Driver>, ServerError> {
    Ok(Json(state.engine.driver(driver_id).await?))
}

pub async fn vehicles(State(state): State<ServerState>) -> Result<Json<Vec<Vehicle>>, ServerError> {
    Ok(Json(state.engine.vehicles().await?))
}
