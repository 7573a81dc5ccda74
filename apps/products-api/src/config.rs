//! Configuration for Products API

use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Collection holding product documents
pub const PRODUCTS_COLLECTION: &str = "PRODUCTS_COLLECTION";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub products_collection: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let app = app_info!();
        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app.name);
        }
        let server = ServerConfig::from_env()?;
        let products_collection = env_or_default(
            PRODUCTS_COLLECTION,
            domain_products::mongodb::DEFAULT_COLLECTION,
        );

        Ok(Self {
            app,
            mongodb,
            server,
            environment,
            products_collection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("catalog")),
                ("PORT", Some("3003")),
                ("PRODUCTS_COLLECTION", Some("products_v2")),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "products_api");
                assert_eq!(config.mongodb.database(), "catalog");
                assert_eq!(config.server.port, 3003);
                assert_eq!(config.products_collection, "products_v2");
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_collection_defaults_to_products() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("catalog")),
                ("MONGODB_APP_NAME", None),
                ("PRODUCTS_COLLECTION", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.products_collection, "products");
                assert_eq!(config.mongodb.app_name.as_deref(), Some("products_api"));
            },
        );
    }

    #[test]
    fn test_missing_mongodb_url_fails() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL"], || {
            assert!(Config::from_env().is_err());
        });
    }
}
