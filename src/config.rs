use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, Level, Subscriber};

use crate::error::Error;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind: String,
    pub mongo_uri: String,
    pub database: String,
    pub seed: bool,
    pub log_level: Level,
}

impl Config {
    /// Reads the `ADBOARD_*` environment, falling back to local defaults.
    pub fn load() -> Result<Config, Error> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::load`], but defaults and rejected values are reported to
    /// `subscriber`. The configured log level is unknown until loading is done,
    /// so this runs before the global subscriber can be installed.
    pub fn load_reporting_to<S>(subscriber: S) -> Result<Config, Error>
    where
        S: Subscriber + Send + Sync + 'static,
    {
        reporting_to(subscriber, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            bind: try_load(&lookup, "ADBOARD_BIND", "127.0.0.1:8080")?,
            mongo_uri: try_load(&lookup, "ADBOARD_MONGO_URI", "mongodb://localhost:27017")?,
            database: try_load(&lookup, "ADBOARD_DATABASE", "adboard")?,
            seed: try_load(&lookup, "ADBOARD_SEED", "false")?,
            log_level: try_load(&lookup, "ADBOARD_LOG_LEVEL", "info")?,
        })
    }
}

fn reporting_to<S, F>(subscriber: S, lookup: F) -> Result<Config, Error>
where
    S: Subscriber + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    tracing::subscriber::with_default(subscriber, || Config::from_lookup(lookup))
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });

    let parsed = value.parse::<T>();
    parsed.map_err(|err| {
        tracing::warn!("invalid {} value: {}", key, err);
        Error::InvalidConfiguration { key, value }
    })
}
