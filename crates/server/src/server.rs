use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use uuid::Uuid;

use std::sync::Arc;

use crate::{assignments, lookups, reports, taxi};
use engine::{Engine, Session};

static TAXI_DRIVER_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-taxi-driver-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the taxi driver acting on the request.
///
/// Requests from a taxi driver carry their id in "x-taxi-driver-id"; staff
/// requests carry no such header.
#[derive(Debug)]
struct TaxiDriverHeader(Uuid);

impl Header for TaxiDriverHeader {
    fn name() -> &'static axum::http::HeaderName {
        &TAXI_DRIVER_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(value) = Uuid::parse_str(value.trim()) else {
            return Err(AxumError::invalid());
        };

        Ok(TaxiDriverHeader(value))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        let as_string = self.0.to_string();
        match axum::http::HeaderValue::from_str(&as_string) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-taxi-driver-id header"),
        }
    }
}

/// Derives the [`Session`] of the request and stores it in the extensions.
async fn session(
    taxi_driver: Option<TypedHeader<TaxiDriverHeader>>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match taxi_driver {
        Some(TypedHeader(TaxiDriverHeader(taxi_driver_id))) => {
            Session::TaxiDriver { taxi_driver_id }
        }
        None => Session::Staff,
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/routes", get(lookups::routes))
        .route("/cars", get(lookups::cars))
        .route("/drivers", get(lookups::drivers))
        .route("/drivers/{id}", get(lookups::driver))
        .route("/vehicles", get(lookups::vehicles))
        .route("/calendar", get(reports::calendar))
        .route("/revenue", get(reports::revenue))
        .route("/drivers/{id}/payroll", get(reports::payroll))
        .route("/drivers/{id}/approve", post(assignments::approve_range))
        .route("/drivers/{id}/approve-all", post(assignments::approve_all))
        .route("/bookings/{id}/assignment", post(assignments::resolve))
        .route("/assignments/{id}/complete", post(assignments::complete))
        .route("/assignments/{id}/approve", post(assignments::approve_one))
        .route("/taxi/drivers", get(taxi::drivers))
        .route("/taxi/reports", post(taxi::report_new))
        .route("/taxi/settlements", get(taxi::settlements))
        .route_layer(middleware::from_fn(session))
        .with_state(state)
}

/// The full HTTP application over `engine`.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run(engine: Engine, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
