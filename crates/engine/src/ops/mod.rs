use std::{fmt, sync::Arc, time::Duration};

use sea_orm::DatabaseConnection;

use crate::{
    NoopSink, NotificationSink, Rate, ResultEngine, assignments::DEFAULT_COMMISSION_BP,
};

mod assignments;
mod calendar;
mod lookups;
mod payroll;
mod revenue;
mod taxi;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Engine {
    database: DatabaseConnection,
    notifier: Arc<dyn NotificationSink>,
    notify_timeout: Duration,
    default_commission: Rate,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .field("notify_timeout", &self.notify_timeout)
            .field("default_commission", &self.default_commission)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Commission applied to drivers without one of their own.
    pub fn default_commission(&self) -> Rate {
        self.default_commission
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    notifier: Arc<dyn NotificationSink>,
    notify_timeout: Duration,
    default_commission: Option<Rate>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            notifier: Arc::new(NoopSink),
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            default_commission: None,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Where assignment notifications go. Defaults to [`NoopSink`].
    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> EngineBuilder {
        self.notifier = notifier;
        self
    }

    pub fn notify_timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.notify_timeout = timeout;
        self
    }

    /// Commission for drivers without their own. Defaults to 70%.
    pub fn default_commission(mut self, rate: Rate) -> EngineBuilder {
        self.default_commission = Some(rate);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let default_commission = match self.default_commission {
            Some(rate) => rate,
            None => Rate::from_basis_points(DEFAULT_COMMISSION_BP)?,
        };
        Ok(Engine {
            database: self.database,
            notifier: self.notifier,
            notify_timeout: self.notify_timeout,
            default_commission,
        })
    }
}
