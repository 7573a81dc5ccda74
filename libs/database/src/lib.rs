//! Database connectors and startup utilities
//!
//! # Features
//!
//! - `mongodb` - MongoDB connector, health checks and [`mongodb::MongoConfig`]
//! - `config` - `core_config::FromEnv` support for the backend configs
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{connect_from_config_with_retry, MongoConfig};
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
