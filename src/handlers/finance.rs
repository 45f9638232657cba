// src/handlers/finance.rs

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
    models::finance::{Transaction, TransactionType, tag_description},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub amount: Decimal,

    #[validate(length(min = 1, message = "Informe a descrição"))]
    #[schema(example = "Compra de botijões")]
    pub description: String,

    // Despesa vinculada a uma categoria ganha o prefixo `[Nome]` na
    // descrição -- é assim que o relatório por categoria encontra as
    // despesas, inclusive as lançadas à mão antes deste sistema.
    #[schema(example = "Gás")]
    pub category: Option<String>,
}

// GET /api/finance/transactions
pub async fn list_transactions(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Json<Vec<Transaction>>, AppError> {
    access::require(&profile, Capability::ManageFinance)?;
    let transactions = app_state.finance_repo.list_all(&app_state.db_pool).await?;
    Ok(Json(transactions))
}

// POST /api/finance/transactions
#[utoipa::path(
    post,
    path = "/api/finance/transactions",
    tag = "Financeiro",
    request_body = TransactionPayload,
    responses(
        (status = 201, description = "Lançamento registrado", body = Transaction),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    access::require(&profile, Capability::ManageFinance)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let description = if payload.transaction_type == TransactionType::Expense {
        tag_description(payload.category.as_deref(), &payload.description)
    } else {
        payload.description.clone()
    };

    let transaction = app_state
        .finance_repo
        .insert(&app_state.db_pool, payload.transaction_type, payload.amount, &description)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// DELETE /api/finance/transactions/{id}
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::ManageFinance)?;
    app_state.finance_repo.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
