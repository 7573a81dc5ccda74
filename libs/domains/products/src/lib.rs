//! Products Domain
//!
//! CRUD over a MongoDB-backed product collection.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐
//! │    Handlers    │  ← HTTP endpoints
//! └───────┬────────┘
//!         │
//! ┌───────▼────────┐
//! │ ValidationGate │  ← Body schema check on create/update
//! └───────┬────────┘
//!         │
//! ┌───────▼────────┐
//! │   Repository   │  ← Paging, NotFound translation
//! └───────┬────────┘
//!         │
//! ┌───────▼────────┐
//! │  ProductStore  │  ← Storage trait + MongoDB implementation
//! └────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductStore, ProductRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("mydb");
//!
//! let repository = ProductRepository::new(MongoProductStore::new(&db));
//! let router = handlers::router(repository);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod pagination;
pub mod repository;
pub mod schema;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{Product, ProductCreateRequest, ProductUpdateRequest};
pub use self::mongodb::MongoProductStore;
pub use pagination::{PaginatedResult, PaginationQuery, SortDirection, SortField};
pub use repository::{ProductQuery, ProductRepository, ProductStore};
pub use schema::{product_gate, product_schema};
