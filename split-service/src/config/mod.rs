use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreKind,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Required when `store` is `Mongo`.
    pub uri: Option<Secret<String>>,
    pub database: String,
    pub collection: String,
}

/// Which backend holds split records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" => Ok(StoreKind::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "SPLIT_STORE must be 'mongo' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

impl SplitConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Builds the service settings from `lookup`, which maps a variable name
    /// to its value. Settings with a default are never mandatory.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";

        let store: StoreKind = get_env(&lookup, "SPLIT_STORE", Some("mongo"))?.parse()?;
        if store == StoreKind::Memory && is_prod {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SPLIT_STORE=memory is not allowed in production"
            )));
        }

        let uri = match store {
            StoreKind::Mongo => Some(Secret::new(get_env(&lookup, "MONGO_URI", None)?)),
            StoreKind::Memory => lookup("MONGO_URI").map(Secret::new),
        };

        Ok(SplitConfig {
            common,
            mongodb: MongoConfig {
                uri,
                database: get_env(&lookup, "MONGO_DATABASE", Some("bill_splitter"))?,
                collection: get_env(&lookup, "MONGO_COLLECTION", Some("splits"))?,
            },
            store,
        })
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match (lookup(key), default) {
        (Some(val), _) => Ok(val),
        (None, Some(def)) => Ok(def.to_string()),
        (None, None) => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}
