use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductCreateRequest, ProductUpdateRequest};
use crate::pagination::{PaginatedResult, PaginationQuery, SortField};

/// A single find call: filter, ordering and window
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub filter: Document,
    pub sort: Document,
    pub limit: i64,
    pub skip: u64,
}

/// Storage backend for products.
///
/// Single-document lookups yield `None` when nothing matches, including ids
/// the backend cannot parse.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, input: ProductCreateRequest) -> ProductResult<Product>;

    async fn find(&self, query: ProductQuery) -> ProductResult<Vec<Product>>;

    async fn count_documents(&self, filter: Document) -> ProductResult<u64>;

    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// Apply `patch` and return the document as it is after the update
    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: ProductUpdateRequest,
    ) -> ProductResult<Option<Product>>;

    /// Remove the document and return it as it was before deletion
    async fn find_by_id_and_delete(&self, id: &str) -> ProductResult<Option<Product>>;
}

/// Data-access facade over a [`ProductStore`].
///
/// Turns missing documents into [`ProductError::NotFound`] and builds the
/// paged listing out of a find and a count.
pub struct ProductRepository<S> {
    store: S,
}

impl<S: ProductStore> ProductRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[instrument(skip(self, payload), fields(product_name = %payload.name))]
    pub async fn create_product(&self, payload: ProductCreateRequest) -> ProductResult<Product> {
        let product = self.store.create(payload).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, query), fields(page = query.page, limit = query.limit))]
    pub async fn get_all_product(&self, query: &PaginationQuery) -> ProductResult<PaginatedResult> {
        if query.page == 0 {
            return Err(ProductError::Validation("page must be at least 1".to_string()));
        }
        let limit = i64::try_from(query.limit)
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| ProductError::Validation(format!("invalid page size {}", query.limit)))?;

        let filter = doc! {};
        let find = ProductQuery {
            filter: filter.clone(),
            sort: sort_document(&query.sort),
            limit,
            skip: query.skip(),
        };

        let (data, total_item) =
            tokio::try_join!(self.store.find(find), self.store.count_documents(filter))?;

        Ok(PaginatedResult::new(data, total_item, query))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> ProductResult<Product> {
        let found = self.store.find_by_id(id).await?;
        require_found(id, found)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_by_id(&self, id: &str, patch: ProductUpdateRequest) -> ProductResult<Product> {
        let updated = self.store.find_by_id_and_update(id, patch).await?;
        let product = require_found(id, updated)?;
        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: &str) -> ProductResult<Product> {
        let deleted = self.store.find_by_id_and_delete(id).await?;
        let product = require_found(id, deleted)?;
        tracing::info!(product_id = %product.id, "Product deleted");
        Ok(product)
    }
}

fn require_found(id: &str, found: Option<Product>) -> ProductResult<Product> {
    found.ok_or_else(|| ProductError::NotFound(id.to_string()))
}

/// `{ field: 1 | -1, ... }` in the order given
pub fn sort_document(sort: &[SortField]) -> Document {
    let mut document = Document::new();
    for field in sort {
        document.insert(field.field.as_str(), field.direction.as_order());
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortDirection;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;

    const PRODUCT_ID: &str = "65f1c0ffee0000000000beef";
    const MISSING_ID: &str = "65f1c0ffee0000000000dead";

    fn product(id: &str, name: &str, price: f64) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
            category: "home".to_string(),
            stock: 10,
            created_at: at,
            updated_at: at,
        }
    }

    fn create_request() -> ProductCreateRequest {
        ProductCreateRequest {
            name: "Desk lamp".to_string(),
            price: 24.9,
            category: "home".to_string(),
            stock: 12,
        }
    }

    #[tokio::test]
    async fn test_create_product_passes_payload_through() {
        let mut store = MockProductStore::new();
        store
            .expect_create()
            .with(eq(create_request()))
            .times(1)
            .returning(|input| Ok(product(PRODUCT_ID, &input.name, input.price)));

        let repository = ProductRepository::new(store);
        let created = repository.create_product(create_request()).await.unwrap();

        assert_eq!(created.id, PRODUCT_ID);
        assert_eq!(created.name, "Desk lamp");
    }

    #[tokio::test]
    async fn test_get_all_product_queries_first_page() {
        let mut store = MockProductStore::new();
        store
            .expect_find()
            .withf(|query| {
                query.filter == doc! {}
                    && query.sort == doc! { "price": 1 }
                    && query.limit == 2
                    && query.skip == 0
            })
            .times(1)
            .returning(|_| {
                Ok(vec![
                    product(PRODUCT_ID, "Pencil", 1.5),
                    product(MISSING_ID, "Notebook", 4.0),
                ])
            });
        store
            .expect_count_documents()
            .with(eq(doc! {}))
            .times(1)
            .returning(|_| Ok(2));

        let repository = ProductRepository::new(store);
        let query = PaginationQuery::new(1, 2).sort_by("price", SortDirection::Asc);
        let result = repository.get_all_product(&query).await.unwrap();

        assert_eq!(result.data.len(), 2);
        assert_eq!(result.total_item, 2);
        assert_eq!(result.total_page, 1);
        assert_eq!(result.current_page, 1);
        assert_eq!(result.limit, 2);
        assert_eq!(result.skip, 0);
    }

    #[tokio::test]
    async fn test_get_all_product_later_page_and_descending_sort() {
        let mut store = MockProductStore::new();
        store
            .expect_find()
            .withf(|query| {
                query.sort == doc! { "created_at": -1, "name": 1 }
                    && query.limit == 5
                    && query.skip == 10
            })
            .times(1)
            .returning(|_| Ok(vec![product(PRODUCT_ID, "Pencil", 1.5)]));
        store
            .expect_count_documents()
            .times(1)
            .returning(|_| Ok(11));

        let repository = ProductRepository::new(store);
        let query = PaginationQuery::new(3, 5)
            .sort_by("created_at", SortDirection::Desc)
            .sort_by("name", SortDirection::Asc);
        let result = repository.get_all_product(&query).await.unwrap();

        assert_eq!(result.total_page, 3);
        assert_eq!(result.skip, 10);
        assert_eq!(result.data.len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_product_rejects_zero_limit_without_storage_calls() {
        let store = MockProductStore::new();
        let repository = ProductRepository::new(store);

        let result = repository.get_all_product(&PaginationQuery::new(1, 0)).await;
        assert!(matches!(result, Err(ProductError::Validation(_))));

        let result = repository.get_all_product(&PaginationQuery::new(0, 10)).await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_all_product_propagates_count_failure() {
        let mut store = MockProductStore::new();
        store.expect_find().returning(|_| Ok(Vec::new()));
        store
            .expect_count_documents()
            .returning(|_| Err(ProductError::Database("connection reset".into())));

        let repository = ProductRepository::new(store);
        let result = repository.get_all_product(&PaginationQuery::new(1, 10)).await;
        assert!(matches!(result, Err(ProductError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let mut store = MockProductStore::new();
        store
            .expect_find_by_id()
            .withf(|id| id == PRODUCT_ID)
            .times(1)
            .returning(|id| Ok(Some(product(id, "Pencil", 1.5))));

        let repository = ProductRepository::new(store);
        let found = repository.get_by_id(PRODUCT_ID).await.unwrap();
        assert_eq!(found.id, PRODUCT_ID);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found_every_time() {
        let mut store = MockProductStore::new();
        store
            .expect_find_by_id()
            .times(3)
            .returning(|_| Ok(None));

        let repository = ProductRepository::new(store);
        for _ in 0..3 {
            match repository.get_by_id(MISSING_ID).await {
                Err(ProductError::NotFound(id)) => assert_eq!(id, MISSING_ID),
                other => panic!("expected NotFound, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_update_by_id_returns_new_document() {
        let mut store = MockProductStore::new();
        store
            .expect_find_by_id_and_update()
            .withf(|id, patch| id == PRODUCT_ID && patch.price == Some(3.0) && patch.name.is_none())
            .times(1)
            .returning(|id, patch| Ok(Some(product(id, "Pencil", patch.price.unwrap_or_default()))));

        let repository = ProductRepository::new(store);
        let patch = ProductUpdateRequest {
            price: Some(3.0),
            ..Default::default()
        };
        let updated = repository.update_by_id(PRODUCT_ID, patch).await.unwrap();
        assert_eq!(updated.price, 3.0);
    }

    #[tokio::test]
    async fn test_update_by_id_missing_is_not_found() {
        let mut store = MockProductStore::new();
        store
            .expect_find_by_id_and_update()
            .times(1)
            .returning(|_, _| Ok(None));

        let repository = ProductRepository::new(store);
        let result = repository
            .update_by_id(MISSING_ID, ProductUpdateRequest::default())
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_id_returns_deleted_document() {
        let mut store = MockProductStore::new();
        store
            .expect_find_by_id_and_delete()
            .withf(|id| id == PRODUCT_ID)
            .times(1)
            .returning(|id| Ok(Some(product(id, "Pencil", 1.5))));

        let repository = ProductRepository::new(store);
        let deleted = repository.delete_by_id(PRODUCT_ID).await.unwrap();
        assert_eq!(deleted.name, "Pencil");
    }

    #[tokio::test]
    async fn test_delete_by_id_missing_is_not_found() {
        let mut store = MockProductStore::new();
        store
            .expect_find_by_id_and_delete()
            .times(1)
            .returning(|_| Ok(None));

        let repository = ProductRepository::new(store);
        let result = repository.delete_by_id(MISSING_ID).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[test]
    fn test_sort_document_keeps_order() {
        let sort = [
            SortField::new("stock", SortDirection::Desc),
            SortField::new("price", SortDirection::Asc),
        ];
        let document = sort_document(&sort);
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["stock", "price"]);
        assert_eq!(document, doc! { "stock": -1, "price": 1 });
    }
}
