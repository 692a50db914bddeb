use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// `APP_ENV=production` switches logging to JSON.
    pub is_production: bool,
    /// Outbound fetch timeout. `None` leaves the HTTP client's default in place.
    pub fetch_timeout: Option<Duration>,
    /// Reject targets that resolve to loopback, private or link-local addresses.
    pub block_private_networks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            is_production: false,
            fetch_timeout: None,
            block_private_networks: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` passes the
    /// process environment; tests pass a fixed table.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let server_port = match lookup("SERVER_PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                expected: "a port number",
                value: v,
            })?,
            None => defaults.server_port,
        };

        let fetch_timeout = match lookup("FETCH_TIMEOUT_SECS") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "FETCH_TIMEOUT_SECS",
                        expected: "a positive number of seconds",
                        value: v,
                    })
                }
            },
            None => None,
        };

        let block_private_networks = match lookup("BLOCK_PRIVATE_NETWORKS") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                name: "BLOCK_PRIVATE_NETWORKS",
                expected: "true or false",
                value: v,
            })?,
            None => defaults.block_private_networks,
        };

        Ok(Config {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            is_production: lookup("APP_ENV").as_deref() == Some("production"),
            fetch_timeout,
            block_private_networks,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
