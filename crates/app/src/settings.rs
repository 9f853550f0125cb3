//! Settings of the fleetbook binary.
//!
//! Values come from an optional TOML file (`settings.toml` unless `--config`
//! points elsewhere), overridden by `FLEETBOOK__<SECTION>__<KEY>` environment
//! variables, e.g. `FLEETBOOK__SERVER__PORT=8080`.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "fleetbook", version, about)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: 3000,
        }
    }
}

/// `database = "memory"` or `database = { sqlite = "./fleetbook.db" }`.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("./fleetbook.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Notifications {
    /// Webhook receiving assignment notifications. None disables them.
    pub webhook_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settlement {
    pub default_commission_percent: f64,
}

impl Default for Settlement {
    fn default() -> Self {
        Self {
            default_commission_percent: 70.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
    pub notifications: Notifications,
    pub settlement: Settlement,
}

impl Settings {
    /// Reads the command line, the settings file and the environment.
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(path).required(false))
                .add_source(
                    Environment::with_prefix("FLEETBOOK")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        let bind = self.server.bind.as_deref().unwrap_or("127.0.0.1");
        format!("{}:{}", bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.bind_addr(), "127.0.0.1:3000");
        assert_eq!(settings.database, Database::Sqlite("./fleetbook.db".to_string()));
        assert!(settings.notifications.webhook_url.is_none());
        assert_eq!(settings.settlement.default_commission_percent, 70.0);
    }

    #[test]
    fn sections_override_defaults() {
        let settings = parse(
            r#"
            database = "memory"

            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080

            [notifications]
            webhook_url = "https://hooks.example.com/assignments"
            timeout_ms = 1500

            [settlement]
            default_commission_percent = 65.5
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.database, Database::Memory);
        assert_eq!(
            settings.notifications.webhook_url.as_deref(),
            Some("https://hooks.example.com/assignments")
        );
        assert_eq!(settings.notifications.timeout_ms, 1500);
        assert_eq!(settings.settlement.default_commission_percent, 65.5);
    }

    #[test]
    fn sqlite_path_is_read() {
        let settings = parse(r#"database = { sqlite = "/var/lib/fleetbook.db" }"#);
        assert_eq!(
            settings.database,
            Database::Sqlite("/var/lib/fleetbook.db".to_string())
        );
    }
}
