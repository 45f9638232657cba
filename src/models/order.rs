// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    #[sqlx(rename = "Pendente")]
    #[serde(rename = "Pendente")]
    Pendente,
    #[sqlx(rename = "Pago")]
    #[serde(rename = "Pago")]
    Pago,
}

// A ordem aqui sugere a sequência normal (preparo -> rua -> entregue),
// mas qualquer transição é aceita; o fluxo não é travado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "delivery_status")]
pub enum DeliveryStatus {
    #[sqlx(rename = "Em preparo")]
    #[serde(rename = "Em preparo")]
    EmPreparo,
    #[sqlx(rename = "Saiu para entrega")]
    #[serde(rename = "Saiu para entrega")]
    SaiuParaEntrega,
    #[sqlx(rename = "Entregue")]
    #[serde(rename = "Entregue")]
    Entregue,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    // NULL = consumidor final, sem cadastro.
    pub customer_id: Option<i64>,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    // Snapshot do preço na hora da venda.
    pub price_at_time: Decimal,
}

// Item com o nome do produto resolvido na leitura.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_time: Decimal,
    pub product_name: String,
}

/// Pedido completo para listagem: dados do cliente resolvidos mesmo que o
/// cadastro esteja arquivado (histórico continua legível).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    pub customer_phone: Option<String>,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

/// Linha do carrinho na criação do pedido. `price` é o preço unitário
/// cobrado (a tela permite ajustar o preço por venda).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: i64,

    #[validate(range(min = 1, message = "A quantidade deve ser positiva"))]
    pub quantity: i32,

    #[validate(custom(function = preco_nao_negativo))]
    pub price: Decimal,
}

fn preco_nao_negativo(price: &Decimal) -> Result<(), validator::ValidationError> {
    if price.is_sign_negative() {
        let mut err = validator::ValidationError::new("preco_negativo");
        err.message = Some("O preço não pode ser negativo".into());
        return Err(err);
    }
    Ok(())
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Soma dos itens do carrinho; é isso que vira o `total_amount` do pedido.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_soma_preco_vezes_quantidade() {
        let lines = vec![
            CartLine { product_id: 1, quantity: 2, price: dec!(12.50) },
            CartLine { product_id: 2, quantity: 1, price: dec!(110.00) },
            CartLine { product_id: 3, quantity: 3, price: dec!(0.99) },
        ];
        assert_eq!(cart_total(&lines), dec!(137.97));
    }

    #[test]
    fn carrinho_vazio_soma_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }
}
