// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    // Texto livre, mas a UI restringe aos nomes de Category.
    pub category: String,
    pub price_cost: Decimal,
    pub price_sell: Decimal,
    pub stock_quantity: i32,
    pub stock_min: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub emoji: String,
}

impl Category {
    /// Conjunto padrão usado como fallback quando a tabela está vazia.
    pub fn defaults() -> Vec<Category> {
        vec![
            Category { id: 1, name: "Gás".into(), emoji: "📦".into() },
            Category { id: 2, name: "Água 20L".into(), emoji: "💧".into() },
            Category { id: 3, name: "Água de coco".into(), emoji: "🥥".into() },
            Category { id: 4, name: "Refrigerante".into(), emoji: "🥤".into() },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
}

// Movimentação com os dados do produto resolvidos, para o relatório.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementView {
    pub id: i64,
    pub product_id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub product_category: String,
}
