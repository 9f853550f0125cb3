use std::{sync::Arc, time::Duration};

use engine::{NoopSink, NotificationSink, Rate, WebhookSink};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fleetbook={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;

    let notify_timeout = Duration::from_millis(settings.notifications.timeout_ms);
    let notifier: Arc<dyn NotificationSink> = match &settings.notifications.webhook_url {
        Some(url) => {
            tracing::info!("Sending assignment notifications to {url}");
            let client = reqwest::Client::builder().timeout(notify_timeout).build()?;
            Arc::new(WebhookSink::new(client, url.clone()))
        }
        None => {
            tracing::info!("No webhook configured, assignment notifications are disabled");
            Arc::new(NoopSink)
        }
    };

    let engine = engine::Engine::builder()
        .database(db)
        .notifier(notifier)
        .notify_timeout(notify_timeout)
        .default_commission(Rate::from_percent(
            settings.settlement.default_commission_percent,
        )?)
        .build()
        .await?;

    let listener = tokio::net::TcpListener::bind(settings.bind_addr()).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
