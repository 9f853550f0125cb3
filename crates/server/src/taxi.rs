//! Taxi driver reports and settlements.

use api_types::taxi::{TaxiReportNew, TaxiSettlementsQuery};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{
    DateRange, Money, Session, TaxiDailyReport, TaxiDriver, TaxiReportInput, TaxiSettlementReport,
};

use crate::{ServerError, server::ServerState};

pub async fn drivers(State(state): State<ServerState>) -> Result<Json<Vec<TaxiDriver>>, ServerError> {
    Ok(Json(state.engine.taxi_drivers().await?))
}

pub async fn report_new(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<TaxiReportNew>,
) -> Result<(StatusCode, Json<TaxiDailyReport>), ServerError> {
    let input = TaxiReportInput {
        taxi_driver_id: payload.taxi_driver_id,
        report_date: payload.report_date,
        be_revenue: Money::new(payload.be_revenue),
        sm_revenue: Money::new(payload.sm_revenue),
        cash_revenue: Money::new(payload.cash_revenue),
        be_wallet_start: Money::new(payload.be_wallet_start),
        be_wallet_end: Money::new(payload.be_wallet_end),
        sm_wallet_start: Money::new(payload.sm_wallet_start),
        sm_wallet_end: Money::new(payload.sm_wallet_end),
        fuel_cost: Money::new(payload.fuel_cost),
        other_cost: Money::new(payload.other_cost),
        note: payload
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty()),
    };

    let report = state.engine.submit_taxi_report(&session, input).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn settlements(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<TaxiSettlementsQuery>,
) -> Result<Json<TaxiSettlementReport>, ServerError> {
    let range = DateRange::new(query.from, query.to)?;
    let report = state
        .engine
        .taxi_settlements(&session, range, query.taxi_driver_id)
        .await?;
    Ok(Json(report))
}
