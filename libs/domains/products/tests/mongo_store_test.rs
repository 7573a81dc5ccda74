//! MongoDB-backed store tests.
//!
//! Require a running server (`MONGODB_URL`, default `mongodb://localhost:27017`):
//!
//! ```sh
//! cargo test -p domain_products --test mongo_store_test -- --ignored
//! ```

use ::mongodb::{Client, Database, bson::oid::ObjectId};
use domain_products::*;

async fn test_database() -> Database {
    let url = std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let client = Client::with_uri_str(&url).await.unwrap();
    client.database(&format!("products_test_{}", ObjectId::new().to_hex()))
}

fn lamp() -> ProductCreateRequest {
    ProductCreateRequest {
        name: "Desk lamp".into(),
        price: 24.9,
        category: "home".into(),
        stock: 12,
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_crud_against_mongodb() {
    let db = test_database().await;
    let store = MongoProductStore::new(&db);
    store.init_indexes().await.unwrap();
    let repository = ProductRepository::new(store);

    let created = repository.create_product(lamp()).await.unwrap();
    assert_eq!(created.id.len(), 24);

    let found = repository.get_by_id(&created.id).await.unwrap();
    assert_eq!(found.name, "Desk lamp");

    let patch = ProductUpdateRequest {
        stock: Some(3),
        ..Default::default()
    };
    let updated = repository.update_by_id(&created.id, patch).await.unwrap();
    assert_eq!(updated.stock, 3);
    assert_eq!(updated.name, "Desk lamp");
    assert!(updated.updated_at >= created.updated_at);

    let deleted = repository.delete_by_id(&created.id).await.unwrap();
    assert_eq!(deleted.stock, 3);

    assert!(matches!(
        repository.get_by_id(&created.id).await,
        Err(ProductError::NotFound(_))
    ));

    db.drop().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_listing_against_mongodb() {
    let db = test_database().await;
    let repository = ProductRepository::new(MongoProductStore::new(&db));

    for (name, price) in [("Notebook", 4.0), ("Pencil", 1.5), ("Stapler", 9.0)] {
        repository
            .create_product(ProductCreateRequest {
                name: name.into(),
                price,
                ..lamp()
            })
            .await
            .unwrap();
    }

    let query = PaginationQuery::new(1, 2).sort_by("price", SortDirection::Desc);
    let page = repository.get_all_product(&query).await.unwrap();

    assert_eq!(page.total_item, 3);
    assert_eq!(page.total_page, 2);
    let names: Vec<&str> = page.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Stapler", "Notebook"]);

    db.drop().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_malformed_id_is_not_found() {
    let db = test_database().await;
    let repository = ProductRepository::new(MongoProductStore::new(&db));

    assert!(matches!(
        repository.get_by_id("not-an-object-id").await,
        Err(ProductError::NotFound(_))
    ));
    assert!(matches!(
        repository.delete_by_id("not-an-object-id").await,
        Err(ProductError::NotFound(_))
    ));
}
