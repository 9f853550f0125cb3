//! Calendar, payroll and revenue reports.

use api_types::DateWindow;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::{CalendarMonth, DateRange, PayrollReport, RevenueReport};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn date_range(window: DateWindow) -> Result<DateRange, ServerError> {
    Ok(DateRange::new(window.from, window.to)?)
}

pub async fn calendar(
    State(state): State<ServerState>,
    Query(window): Query<DateWindow>,
) -> Result<Json<CalendarMonth>, ServerError> {
    let cells = state.engine.calendar(date_range(window)?).await?;
    Ok(Json(cells))
}

pub async fn payroll(
    State(state): State<ServerState>,
    Path(driver_id): Path<Uuid>,
    Query(window): Query<DateWindow>,
) -> Result<Json<PayrollReport>, ServerError> {
    let report = state
        .engine
        .driver_payroll(driver_id, date_range(window)?)
        .await?;
    Ok(Json(report))
}

pub async fn revenue(
    State(state): State<ServerState>,
    Query(window): Query<DateWindow>,
) -> Result<Json<RevenueReport>, ServerError> {
    let report = state.engine.revenue_report(date_range(window)?).await?;
    Ok(Json(report))
}
