use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

use engine::{
    DateRange, Engine, EngineError, Money, Rate, Session, TaxiDailyReport, TaxiDriver,
    TaxiReportInput,
    taxi::SettlementDirection, taxi_drivers, taxi_reports,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn seed_taxi_driver(db: &DatabaseConnection, name: &str, share: f64) -> TaxiDriver {
    let driver = TaxiDriver::new(name, "30F-555.55", Rate::from_percent(share).unwrap());
    taxi_drivers::ActiveModel::from(&driver)
        .insert(db)
        .await
        .unwrap();
    driver
}

fn reference_day(taxi_driver_id: Uuid, date: &str) -> TaxiReportInput {
    TaxiReportInput {
        taxi_driver_id,
        report_date: day(date),
        be_revenue: Money::new(1_000_000),
        sm_revenue: Money::new(500_000),
        cash_revenue: Money::new(700_000),
        fuel_cost: Money::new(100_000),
        ..Default::default()
    }
}

#[tokio::test]
async fn driver_reports_for_self_only() {
    let (engine, db) = engine_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung", 60.0).await;
    let tuan = seed_taxi_driver(&db, "Tuan", 60.0).await;
    let session = Session::TaxiDriver {
        taxi_driver_id: hung.id,
    };

    let report = engine
        .submit_taxi_report(&session, reference_day(hung.id, "2024-06-10"))
        .await
        .unwrap();
    assert_eq!(report.input.taxi_driver_id, hung.id);

    let err = engine
        .submit_taxi_report(&session, reference_day(tuan.id, "2024-06-10"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .submit_taxi_report(&Session::Staff, reference_day(tuan.id, "2024-06-10"))
        .await
        .unwrap();
    assert_eq!(taxi_reports::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn invalid_reports_are_rejected() {
    let (engine, db) = engine_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung", 60.0).await;

    let mut negative = reference_day(hung.id, "2024-06-10");
    negative.fuel_cost = Money::new(-1);
    let err = engine
        .submit_taxi_report(&Session::Staff, negative)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .submit_taxi_report(&Session::Staff, reference_day(Uuid::new_v4(), "2024-06-10"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert_eq!(taxi_reports::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_day_is_accepted() {
    let (engine, db) = engine_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung", 60.0).await;

    for _ in 0..2 {
        engine
            .submit_taxi_report(&Session::Staff, reference_day(hung.id, "2024-06-10"))
            .await
            .unwrap();
    }
    assert_eq!(taxi_reports::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn settlements_follow_the_session_scope() {
    let (engine, db) = engine_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung", 60.0).await;
    let tuan = seed_taxi_driver(&db, "Tuan", 50.0).await;
    for date in ["2024-06-10", "2024-06-11"] {
        engine
            .submit_taxi_report(&Session::Staff, reference_day(hung.id, date))
            .await
            .unwrap();
    }
    engine
        .submit_taxi_report(&Session::Staff, reference_day(tuan.id, "2024-06-10"))
        .await
        .unwrap();
    engine
        .submit_taxi_report(&Session::Staff, reference_day(hung.id, "2024-07-01"))
        .await
        .unwrap();

    let june = DateRange::new(day("2024-06-01"), day("2024-06-30")).unwrap();

    let all = engine
        .taxi_settlements(&Session::Staff, june, None)
        .await
        .unwrap();
    assert_eq!(all.totals.reports, 3);

    let session = Session::TaxiDriver {
        taxi_driver_id: hung.id,
    };
    let own = engine.taxi_settlements(&session, june, None).await.unwrap();
    assert_eq!(own.totals.reports, 2);
    assert!(own.settlements.iter().all(|s| s.taxi_driver_id == hung.id));

    let first = &own.settlements[0];
    assert_eq!(first.report_date, day("2024-06-10"));
    assert_eq!(first.figures.sm_fee, Money::new(140_000));
    assert_eq!(first.figures.revenue_after_fee, Money::new(1_360_000));
    assert_eq!(first.figures.driver_salary, Money::new(816_000));
    assert_eq!(first.figures.driver_take, Money::new(116_000));
    assert_eq!(first.figures.owner_profit, Money::new(444_000));
    assert_eq!(first.direction, SettlementDirection::CompanyOwesDriver);
    assert_eq!(own.totals.figures.driver_salary, Money::new(1_632_000));
    assert_eq!(own.totals.figures.owner_profit, Money::new(888_000));

    let err = engine
        .taxi_settlements(&session, june, Some(tuan.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let tuan_only = engine
        .taxi_settlements(&Session::Staff, june, Some(tuan.id))
        .await
        .unwrap();
    assert_eq!(tuan_only.totals.reports, 1);
    // 1_360_000 * 50% = 680_000, 20_000 short of the cash kept.
    assert_eq!(
        tuan_only.settlements[0].figures.driver_payback,
        Money::new(20_000)
    );
}

#[tokio::test]
async fn amounts_above_the_bound_are_rejected() {
    let (engine, db) = engine_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung", 60.0).await;

    let mut huge = reference_day(hung.id, "2024-06-10");
    huge.be_revenue = Money::new(i64::MAX);
    huge.sm_revenue = Money::new(10);
    let err = engine
        .submit_taxi_report(&Session::Staff, huge)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let mut wallet = reference_day(hung.id, "2024-06-10");
    wallet.sm_wallet_end = Money::new(i64::MIN);
    let err = engine
        .submit_taxi_report(&Session::Staff, wallet)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(taxi_reports::Entity::find().count(&db).await.unwrap(), 0);

    let mut at_bound = reference_day(hung.id, "2024-06-10");
    at_bound.be_revenue = Money::MAX;
    at_bound.sm_revenue = Money::MAX;
    at_bound.cash_revenue = Money::MAX;
    engine
        .submit_taxi_report(&Session::Staff, at_bound)
        .await
        .unwrap();

    let june = DateRange::new(day("2024-06-01"), day("2024-06-30")).unwrap();
    let report = engine
        .taxi_settlements(&Session::Staff, june, None)
        .await
        .unwrap();
    assert_eq!(report.totals.reports, 1);
    assert_eq!(
        report.totals.figures.sm_fee,
        Money::new(2_800_000_000_000)
    );
}

#[tokio::test]
async fn oversized_stored_report_does_not_break_the_listing() {
    let (engine, db) = engine_with_db().await;
    let hung = seed_taxi_driver(&db, "Hung", 60.0).await;
    engine
        .submit_taxi_report(&Session::Staff, reference_day(hung.id, "2024-06-10"))
        .await
        .unwrap();

    let mut stored = reference_day(hung.id, "2024-06-11");
    stored.be_revenue = Money::new(i64::MAX);
    stored.sm_revenue = Money::new(10);
    let stored = TaxiDailyReport::new(stored, Utc::now());
    taxi_reports::ActiveModel::from(&stored)
        .insert(&db)
        .await
        .unwrap();

    let june = DateRange::new(day("2024-06-01"), day("2024-06-30")).unwrap();
    let report = engine
        .taxi_settlements(&Session::Staff, june, None)
        .await
        .unwrap();
    assert_eq!(report.totals.reports, 1);
    assert_eq!(report.settlements[0].report_date, day("2024-06-10"));
}
