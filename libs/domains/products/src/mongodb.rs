//! MongoDB implementation of ProductStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{Product, ProductCreateRequest, ProductUpdateRequest};
use crate::repository::{ProductQuery, ProductStore};

pub const DEFAULT_COLLECTION: &str = "products";

/// Stored shape of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    price: f64,
    category: String,
    stock: i64,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl ProductDocument {
    fn new(input: ProductCreateRequest, now: bson::DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            name: input.name,
            price: input.price,
            category: input.category,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        }
    }

    fn into_product(self) -> Product {
        Product {
            id: self.id.to_hex(),
            name: self.name,
            price: self.price,
            category: self.category,
            stock: self.stock,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        }
    }
}

fn to_utc(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

/// `None` for anything that is not a 24-char hex ObjectId
fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// `$set` of the provided fields plus a fresh `updated_at`
fn update_document(patch: &ProductUpdateRequest, now: bson::DateTime) -> Document {
    let mut set = doc! { "updated_at": now };

    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(price) = patch.price {
        set.insert("price", price);
    }
    if let Some(category) = &patch.category {
        set.insert("category", category.as_str());
    }
    if let Some(stock) = patch.stock {
        set.insert("stock", stock);
    }

    doc! { "$set": set }
}

/// MongoDB implementation of the ProductStore
#[derive(Clone)]
pub struct MongoProductStore {
    collection: Collection<ProductDocument>,
}

impl MongoProductStore {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }

    /// Indexes backing the sortable fields
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = [
            ("price", "idx_price"),
            ("category", "idx_category"),
            ("name", "idx_name"),
        ]
        .into_iter()
        .map(|(field, name)| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        })
        .chain(std::iter::once(
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ))
        .collect::<Vec<_>>();

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = self.collection.name(), "Product indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: ProductCreateRequest) -> ProductResult<Product> {
        let document = ProductDocument::new(input, bson::DateTime::now());
        self.collection.insert_one(&document).await?;
        Ok(document.into_product())
    }

    #[instrument(skip(self))]
    async fn find(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .sort(query.sort)
            .limit(query.limit)
            .skip(query.skip)
            .build();

        let cursor = self
            .collection
            .find(query.filter)
            .with_options(options)
            .await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(ProductDocument::into_product).collect())
    }

    #[instrument(skip(self))]
    async fn count_documents(&self, filter: Document) -> ProductResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(ProductDocument::into_product))
    }

    #[instrument(skip(self, patch))]
    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: ProductUpdateRequest,
    ) -> ProductResult<Option<Product>> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let update = update_document(&patch, bson::DateTime::now());

        let document = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(ProductDocument::into_product))
    }

    #[instrument(skip(self))]
    async fn find_by_id_and_delete(&self, id: &str) -> ProductResult<Option<Product>> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let document = self
            .collection
            .find_one_and_delete(doc! { "_id": oid })
            .await?;
        Ok(document.map(ProductDocument::into_product))
    }
}
