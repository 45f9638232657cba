// src/handlers/orders.rs

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
    models::order::{CartLine, DeliveryStatus, Order, OrderView, PaymentStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    // NULL = consumidor final, sem cadastro.
    pub customer_id: Option<i64>,

    #[schema(example = "Pix")]
    #[serde(default = "default_payment_method")]
    pub payment_method: String,

    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,

    // Valida cada linha também: quantidade zerada ou preço negativo é
    // erro de campo (400), não estouro de constraint no banco.
    #[validate(length(min = 1, message = "O carrinho não pode estar vazio"), nested)]
    pub items: Vec<CartLine>,
}

fn default_payment_method() -> String {
    "Pix".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentStatusPayload {
    pub status: PaymentStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeliveryStatusPayload {
    pub status: DeliveryStatus,
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Pedidos",
    responses((status = 200, description = "Pedidos com itens e cliente", body = Vec<OrderView>)),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Json<Vec<OrderView>>, AppError> {
    access::require(&profile, Capability::ViewOrders)?;
    Ok(Json(app_state.order_service.list_orders().await?))
}

// POST /api/orders -- protocolo completo de criação da venda.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Pedidos",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado; se pago, estoque/fidelidade/receita já aplicados", body = Order),
        (status = 400, description = "Carrinho vazio ou dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    access::require(&profile, Capability::PlaceOrders)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .order_service
        .create_order(
            payload.customer_id,
            &payload.payment_method,
            payload.payment_status,
            payload.delivery_status,
            &payload.items,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

// PATCH /api/orders/{id}/payment
// Entregador não passa daqui: alterar pagamento é capacidade de admin.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/payment",
    tag = "Pedidos",
    params(("id" = i64, Path, description = "ID do pedido")),
    request_body = PaymentStatusPayload,
    responses(
        (status = 204, description = "Status gravado; ida a Pago aplica os efeitos da venda uma única vez"),
        (status = 403, description = "Papel sem permissão para alterar pagamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_payment_status(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentStatusPayload>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::UpdatePaymentStatus)?;
    app_state
        .order_service
        .set_payment_status(id, payload.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/orders/{id}/delivery
pub async fn set_delivery_status(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
    Json(payload): Json<DeliveryStatusPayload>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::UpdateDeliveryStatus)?;
    app_state
        .order_service
        .set_delivery_status(id, payload.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/orders/{id}
// Os efeitos de venda já aplicados ficam; a UI avisa antes.
pub async fn delete_order(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    access::require(&profile, Capability::PlaceOrders)?;
    app_state.order_service.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn payload(items: Vec<CartLine>) -> CreateOrderPayload {
        CreateOrderPayload {
            customer_id: None,
            payment_method: "Pix".into(),
            payment_status: PaymentStatus::Pendente,
            delivery_status: DeliveryStatus::EmPreparo,
            items,
        }
    }

    #[test]
    fn carrinho_vazio_reprova_na_validacao() {
        assert!(payload(vec![]).validate().is_err());
    }

    #[test]
    fn quantidade_zerada_reprova_na_validacao() {
        let p = payload(vec![CartLine { product_id: 1, quantity: 0, price: dec!(10) }]);
        assert!(p.validate().is_err());
    }

    #[test]
    fn preco_negativo_reprova_na_validacao() {
        let p = payload(vec![CartLine { product_id: 1, quantity: 1, price: dec!(-1) }]);
        assert!(p.validate().is_err());
    }

    #[test]
    fn carrinho_valido_passa_na_validacao() {
        let p = payload(vec![CartLine { product_id: 1, quantity: 2, price: dec!(12.50) }]);
        assert!(p.validate().is_ok());
    }
}
