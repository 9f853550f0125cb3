use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use uuid::Uuid;

use engine::{
    Booking, Driver, Engine, Money, Rate, TaxiDriver, bookings, drivers, taxi_drivers, taxi_reports,
};
use migration::MigratorTrait;

async fn app_with_db() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (server::app(engine), db)
}

async fn seed_driver(db: &DatabaseConnection) -> Driver {
    let driver = Driver::new("Minh", None, Money::ZERO);
    drivers::ActiveModel::from(&driver).insert(db).await.unwrap();
    driver
}

async fn seed_booking(db: &DatabaseConnection, date: &str, total_price: i64) -> Booking {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let booking = Booking::new("Alice", "HN-HL", "SUV7", date, Money::new(total_price));
    bookings::ActiveModel::from(&booking).insert(db).await.unwrap();
    booking
}

async fn seed_taxi_driver(db: &DatabaseConnection, name: &str) -> TaxiDriver {
    let driver = TaxiDriver::new(name, "30F-555.55", Rate::from_percent(60.0).unwrap());
    taxi_drivers::ActiveModel::from(&driver)
        .insert(db)
        .await
        .unwrap();
    driver
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn unknown_driver_is_404_with_error_body() {
    let (app, _db) = app_with_db().await;

    let (status, body) = send(&app, get(&format!("/drivers/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("driver not exists"));
}

#[tokio::test]
async fn inverted_range_is_422_and_missing_range_is_400() {
    let (app, _db) = app_with_db().await;

    let (status, body) = send(&app, get("/calendar?from=2024-06-30&to=2024-06-01")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, get("/calendar")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assign_then_approve() {
    let (app, db) = app_with_db().await;
    let driver = seed_driver(&db).await;
    let booking = seed_booking(&db, "2024-06-10", 2_000_000).await;

    let (status, assignment) = send(
        &app,
        post_json(
            &format!("/bookings/{}/assignment", booking.id),
            json!({ "driver_id": driver.id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assignment["status"], "assigned");
    assert_eq!(assignment["driver_pay"], 1_400_000);
    assert_eq!(assignment["company_profit"], 600_000);

    let approve = || {
        post_json(
            &format!("/drivers/{}/approve", driver.id),
            json!({ "from": "2024-06-01", "to": "2024-06-30" }),
        )
    };
    let (status, body) = send(&app, approve()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "approved": 1 }));
    let (_, body) = send(&app, approve()).await;
    assert_eq!(body, json!({ "approved": 0 }));

    let (status, payroll) = send(
        &app,
        get(&format!(
            "/drivers/{}/payroll?from=2024-06-01&to=2024-06-30",
            driver.id
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payroll["summary"]["paid_pay"], 1_400_000);
    assert_eq!(payroll["months"][0]["month"], "2024-06");

    let (status, revenue) = send(&app, get("/revenue?from=2024-06-01&to=2024-06-30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        revenue["days"][0],
        json!({ "date": "2024-06-10", "revenue": 2_000_000, "driver": 1_400_000, "profit": 600_000 })
    );
}

#[tokio::test]
async fn completing_an_unassigned_trip_is_422() {
    let (app, db) = app_with_db().await;
    let booking = seed_booking(&db, "2024-06-10", 1_000_000).await;

    let (_, assignment) = send(
        &app,
        post_json(&format!("/bookings/{}/assignment", booking.id), json!({})),
    )
    .await;
    assert_eq!(assignment["status"], "unassigned");

    let id = assignment["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        post_json(&format!("/assignments/{id}/complete"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn taxi_header_scopes_the_session() {
    let (app, db) = app_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung").await;
    let tuan = seed_taxi_driver(&db, "Tuan").await;
    let report = json!({
        "taxi_driver_id": tuan.id,
        "report_date": "2024-06-10",
        "be_revenue": 1_000_000,
        "sm_revenue": 500_000,
        "cash_revenue": 700_000,
        "fuel_cost": 100_000,
    });

    let mut as_hung = post_json("/taxi/reports", report.clone());
    as_hung
        .headers_mut()
        .insert("x-taxi-driver-id", hung.id.to_string().parse().unwrap());
    let (status, _) = send(&app, as_hung).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(&app, post_json("/taxi/reports", report)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["taxi_driver_id"], json!(tuan.id));

    let (status, settlements) =
        send(&app, get("/taxi/settlements?from=2024-06-01&to=2024-06-30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settlements["totals"]["reports"], 1);
    assert_eq!(settlements["settlements"][0]["driver_salary"], 816_000);
    assert_eq!(settlements["settlements"][0]["owner_profit"], 444_000);

    let mut bad_header = get("/taxi/settlements?from=2024-06-01&to=2024-06-30");
    bad_header
        .headers_mut()
        .insert("x-taxi-driver-id", "not-a-uuid".parse().unwrap());
    let (status, _) = send(&app, bad_header).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn taxi_report_without_driver_or_date_is_rejected() {
    let (app, db) = app_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung").await;

    for body in [
        json!({ "taxi_driver_id": hung.id, "be_revenue": 1_000 }),
        json!({ "report_date": "2024-06-10", "be_revenue": 1_000 }),
    ] {
        let (status, _) = send(&app, post_json("/taxi/reports", body)).await;
        assert!(status.is_client_error(), "unexpected status {status}");
    }
    assert_eq!(taxi_reports::Entity::find().count(&db).await.unwrap(), 0);

    let (status, created) = send(
        &app,
        post_json(
            "/taxi/reports",
            json!({ "taxi_driver_id": hung.id, "report_date": "2024-06-10" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["report_date"], "2024-06-10");
    assert_eq!(created["be_revenue"], 0);
}
