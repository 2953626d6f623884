//! Service configuration loaded from the environment.
//!
//! A `.env` file in the working directory is honored through `dotenvy`.

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_DATABASE: &str = "FastAPIApp";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// MongoDB connection string; the in-memory store is used when unset.
    pub mongo_uri: Option<String>,
    pub database_name: String,
    pub server_host: String,
    pub server_port: u16,
    pub static_dir: PathBuf,
    /// Create the secondary indexes used by the filter endpoints at startup.
    pub ensure_indexes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongo_uri: None,
            database_name: DEFAULT_DATABASE.to_string(),
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            ensure_indexes: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        Ok(Config {
            mongo_uri: get("MONGO_URI"),
            database_name: get("MONGO_DATABASE").unwrap_or(defaults.database_name),
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: match get("SERVER_PORT") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue { name: "SERVER_PORT", value })?,
                None => defaults.server_port,
            },
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            ensure_indexes: match get("ENSURE_INDEXES") {
                Some(value) => parse_flag(&value)
                    .ok_or(ConfigError::InvalidValue { name: "ENSURE_INDEXES", value })?,
                None => defaults.ensure_indexes,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
