// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        access::{self, Capability},
        auth::CurrentProfile,
    },
    models::catalog::{Category, Product},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "Informe o nome do produto"))]
    #[schema(example = "Água Mineral 20L Indaiá")]
    pub name: String,

    #[schema(example = "Água 20L")]
    pub category: String,

    pub price_cost: Decimal,
    pub price_sell: Decimal,
    pub stock_quantity: i32,
    pub stock_min: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockEntryPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser positiva"))]
    pub quantity: i32,

    #[schema(example = "Compra do fornecedor")]
    pub reason: String,
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catálogo",
    responses((status = 200, description = "Produtos ativos", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Json<Vec<Product>>, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    Ok(Json(app_state.catalog_service.list_products().await?))
}

// GET /api/categories
pub async fn list_categories(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Json<Vec<Category>>, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    Ok(Json(app_state.catalog_service.list_categories().await?))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catálogo",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .catalog_service
        .create_product(
            &payload.name,
            &payload.category,
            payload.price_cost,
            payload.price_sell,
            payload.stock_quantity,
            payload.stock_min,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/products/{id}
pub async fn update_product(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .catalog_service
        .update_product(
            id,
            &payload.name,
            &payload.category,
            payload.price_cost,
            payload.price_sell,
            payload.stock_quantity,
            payload.stock_min,
        )
        .await?;

    Ok(Json(product))
}

// POST /api/products/{id}/stock -- entrada manual de estoque.
pub async fn add_stock(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
    Json(payload): Json<StockEntryPayload>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .catalog_service
        .add_stock(id, payload.quantity, &payload.reason)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/products/{id} -- 409 com as opções se houver vínculos.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Catálogo",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 409, description = "Produto com vendas vinculadas; arquivar ou excluir em cascata")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    app_state.catalog_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/products/{id}/archive
pub async fn archive_product(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    app_state.catalog_service.archive_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/products/{id}/cascade
pub async fn cascade_delete_product(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    app_state.catalog_service.cascade_delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
