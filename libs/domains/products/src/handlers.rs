//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    handler::Handler,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, ValidatedQuery,
    errors::responses::{
        BadRequestQueryResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    validation::validate_body,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Product, ProductCreateRequest, ProductUpdateRequest};
use crate::pagination::{ListProductsQuery, PaginatedResult, PaginationQuery, SortDirection};
use crate::repository::{ProductRepository, ProductStore};
use crate::schema::product_gate;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product,
            ProductCreateRequest,
            ProductUpdateRequest,
            PaginatedResult,
            SortDirection
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Product routes. Create and update bodies pass the product
/// [`ValidationGate`](axum_helpers::ValidationGate) before the handler runs.
pub fn router<S: ProductStore + 'static>(repository: ProductRepository<S>) -> Router {
    let shared_repository = Arc::new(repository);
    let gate = middleware::from_fn_with_state(product_gate(), validate_body);

    Router::new()
        .route(
            "/",
            get(list_products::<S>).post(create_product::<S>.layer(gate.clone())),
        )
        .route(
            "/{id}",
            get(get_product::<S>)
                .put(update_product::<S>.layer(gate))
                .delete(delete_product::<S>),
        )
        .with_state(shared_repository)
}

/// List products one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "One page of products", body = PaginatedResult),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<S: ProductStore>(
    State(repository): State<Arc<ProductRepository<S>>>,
    ValidatedQuery(params): ValidatedQuery<ListProductsQuery>,
) -> Result<Json<PaginatedResult>, AppError> {
    let query = PaginationQuery::try_from(params)?;
    let page = repository.get_all_product(&query).await?;
    Ok(Json(page))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductCreateRequest,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<S: ProductStore>(
    State(repository): State<Arc<ProductRepository<S>>>,
    payload: Result<Json<ProductCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let product = repository.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<S: ProductStore>(
    State(repository): State<Arc<ProductRepository<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = repository.get_by_id(&id).await?;
    Ok(Json(product))
}

/// Replace a product's fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ProductCreateRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<S: ProductStore>(
    State(repository): State<Arc<ProductRepository<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductUpdateRequest>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(patch) = payload?;
    let product = repository.update_by_id(&id, patch).await?;
    Ok(Json(product))
}

/// Delete a product, returning it as it was
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<S: ProductStore>(
    State(repository): State<Arc<ProductRepository<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = repository.delete_by_id(&id).await?;
    Ok(Json(product))
}
