use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser};
use url::Url;

pub const DEFAULT_DATABASE_PORT: u16 = 5432;

#[derive(Debug, Clone, Args)]
pub struct ServiceSettings {
    /// Name used to namespace error codes in responses
    #[clap(long, env = "CONFIG_SERVICE_NAME", default_value = "authorization-service")]
    pub service_name: String,
    #[clap(long, env = "CONFIG_LOGGING_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone, Args)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    #[clap(long, env = "CONFIG_DB_DSN")]
    pub database_url: String,
    #[clap(long, env = "CONFIG_DB_POOL_SIZE", default_value = "10")]
    pub pool_size: u32,
}

#[derive(Debug)]
#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("invalid database url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("database url has no host")]
    MissingHost,
}

impl DatabaseSettings {
    /// Host and port the database is expected to listen on.
    pub fn endpoint(&self) -> Result<(String, u16), ConfigError> {
        let url = Url::parse(&self.database_url)?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHost)?;
        let port = url.port().unwrap_or(DEFAULT_DATABASE_PORT);
        Ok((host.to_string(), port))
    }
}

/// Settings of the `kagid` daemon, read once at start-up.
#[derive(Debug, Clone, Parser)]
#[clap(
    name = "kagid",
    version = env!("CARGO_PKG_VERSION"),
    about = "Authorization decision service"
)]
pub struct Settings {
    #[clap(flatten)]
    pub service: ServiceSettings,
    #[clap(flatten)]
    pub database: DatabaseSettings,
    #[clap(long, env = "CONFIG_LISTEN_ADDRESS", default_value = "0.0.0.0:8001")]
    pub listen_address: SocketAddr,
    /// Seconds to wait for dependent services during start-up checks
    #[clap(long, env = "CONFIG_CONNECT_TIMEOUT", default_value = "10")]
    pub connect_timeout: u64,
}

impl Settings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(url: &str) -> DatabaseSettings {
        DatabaseSettings {
            database_url: url.to_string(),
            pool_size: 1,
        }
    }

    #[test]
    fn endpoint_defaults_port() {
        let (host, port) = database("postgres://user:pw@db.internal/kagi").endpoint().unwrap();
        assert_eq!(host, "db.internal");
        assert_eq!(port, DEFAULT_DATABASE_PORT);
    }

    #[test]
    fn endpoint_keeps_explicit_port() {
        let (_, port) = database("postgres://localhost:6543/kagi").endpoint().unwrap();
        assert_eq!(port, 6543);
    }

    #[test]
    fn endpoint_rejects_garbage() {
        assert!(database("not a url").endpoint().is_err());
    }

    #[test]
    fn settings_from_arguments() {
        let settings = Settings::try_parse_from(vec![
            "kagid",
            "--service-name",
            "authz",
            "--log-level",
            "debug",
            "--database-url",
            "postgres://localhost/kagi",
            "--pool-size",
            "4",
            "--listen-address",
            "127.0.0.1:9000",
            "--connect-timeout",
            "3",
        ])
        .unwrap();

        assert_eq!(settings.service.service_name, "authz");
        assert_eq!(settings.service.log_level, tracing::Level::DEBUG);
        assert_eq!(settings.database.pool_size, 4);
        assert_eq!(settings.listen_address.port(), 9000);
        assert_eq!(settings.connect_timeout(), Duration::from_secs(3));
    }
}
