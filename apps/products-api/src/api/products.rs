//! Products API routes

use axum::Router;
use domain_products::{MongoProductStore, ProductRepository, handlers};

use crate::state::AppState;

fn store(state: &AppState) -> MongoProductStore {
    MongoProductStore::with_collection(&state.db, &state.config.products_collection)
}

/// Create products router
pub fn router(state: &AppState) -> Router {
    handlers::router(ProductRepository::new(store(state)))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    store(state).init_indexes().await?;
    Ok(())
}
