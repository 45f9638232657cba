// src/handlers/customers.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
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
    models::customer::Customer,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[validate(length(min = 1, message = "Informe o nome do cliente"))]
    #[schema(example = "João da Padaria")]
    pub name: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub notes: String,

    // Editável direto: o admin pode corrigir a contagem na mão.
    #[serde(default)]
    pub loyalty_count: i32,
}

// GET /api/customers
pub async fn list_customers(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Json<Vec<Customer>>, AppError> {
    access::require(&profile, Capability::ManageCustomers)?;
    Ok(Json(app_state.customer_service.list().await?))
}

// POST /api/customers
pub async fn create_customer(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    access::require(&profile, Capability::ManageCustomers)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .customer_service
        .create(
            &payload.name,
            &payload.address,
            &payload.phone,
            &payload.notes,
            payload.loyalty_count,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
pub async fn update_customer(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerPayload>,
) -> Result<Json<Customer>, AppError> {
    access::require(&profile, Capability::ManageCustomers)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .customer_service
        .update(
            id,
            &payload.name,
            &payload.address,
            &payload.phone,
            &payload.notes,
            payload.loyalty_count,
        )
        .await?;

    Ok(Json(customer))
}

// DELETE /api/customers/{id} -- 409 com as opções se houver pedidos.
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente excluído"),
        (status = 409, description = "Cliente com pedidos; arquivar ou excluir em cascata")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCustomers)?;
    app_state.customer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/customers/{id}/archive
pub async fn archive_customer(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCustomers)?;
    app_state.customer_service.archive(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/customers/{id}/cascade
pub async fn cascade_delete_customer(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCustomers)?;
    app_state.customer_service.cascade_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/customers/{id}/redeem -- resgate do brinde de fidelidade.
#[utoipa::path(
    post,
    path = "/api/customers/{id}/redeem",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Brinde resgatado; 10 pontos debitados"),
        (status = 400, description = "Menos de 10 pontos acumulados")
    ),
    security(("api_jwt" = []))
)]
pub async fn redeem_reward(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageCustomers)?;
    app_state.customer_service.redeem_reward(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
