use anyhow::Result;
use chrono_tz::Tz;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address as a string in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// IANA zone used for recurrence rules that do not name their own.
    pub timezone: String,
}

impl ScheduleConfig {
    /// ## Summary
    /// Parses the configured default time zone.
    ///
    /// ## Errors
    /// Returns `CoreError::Configuration` if the name is not a known IANA zone.
    pub fn timezone(&self) -> CoreResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|_err| {
            CoreError::Configuration(format!("unknown time zone {:?}", self.timezone))
        })
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from an optional `config.toml` and environment variables.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::from_sources(
            config::File::with_name("config.toml").required(false),
            environment(),
        )
    }

    /// Builds settings from defaults, then `file`, then `env`; later sources win.
    fn from_sources<F>(file: F, env: config::Environment) -> Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
    {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("logging.level", "debug")?
            .set_default("schedule.timezone", "UTC")?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

fn environment() -> config::Environment {
    config::Environment::default()
        .convert_case(config::Case::Snake)
        .separator("_")
        .ignore_empty(true)
        .try_parsing(true)
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails,
/// or if the configured default time zone is unknown.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    settings.schedule.timezone()?;
    tracing::debug!(timezone = %settings.schedule.timezone, "Default schedule time zone resolved");

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_joins_host_and_port() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8698,
        };
        assert_eq!(server.bind_addr(), "127.0.0.1:8698");
    }

    #[test_log::test]
    fn schedule_timezone_parses_iana_name() {
        let schedule = ScheduleConfig {
            timezone: "Africa/Cairo".to_string(),
        };
        assert_eq!(schedule.timezone().ok(), Some(chrono_tz::Africa::Cairo));
    }

    #[test_log::test]
    fn schedule_timezone_rejects_unknown_name() {
        let schedule = ScheduleConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
        };
        let err = schedule.timezone().unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn environment_overrides_config_file() {
        let file = config::File::from_str(
            "[server]\nport = 7000\n[schedule]\ntimezone = \"Asia/Tokyo\"\n",
            config::FileFormat::Toml,
        );
        let env = environment().source(Some(
            [("SERVER_PORT".to_string(), "9100".to_string())]
                .into_iter()
                .collect(),
        ));

        let settings = Settings::from_sources(file, env).unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.schedule.timezone().ok(), Some(chrono_tz::Asia::Tokyo));
    }

    #[test]
    fn settings_deserialize_from_builder() {
        let settings = Config::builder()
            .set_override("server.host", "localhost")
            .unwrap()
            .set_override("server.port", 9000)
            .unwrap()
            .set_override("logging.level", "info")
            .unwrap()
            .set_override("schedule.timezone", "Europe/Berlin")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<Settings>()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(
            settings.schedule.timezone().ok(),
            Some(chrono_tz::Europe::Berlin)
        );
    }
}
