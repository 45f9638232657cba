// src/models/report.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    catalog::{Product, StockMovementView},
    finance::Transaction,
    order::OrderView,
};

/// Recorte temporal dos relatórios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

/// Fatia do gráfico de barras. Mantém os rótulos "Entradas"/"Saídas" que o
/// front já renderiza.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartBucket {
    pub name: String,
    #[serde(rename = "Entradas")]
    pub entradas: Decimal,
    #[serde(rename = "Saídas")]
    pub saidas: Decimal,
}

impl ChartBucket {
    pub fn zeroed(name: String) -> Self {
        Self {
            name,
            entradas: Decimal::ZERO,
            saidas: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceReport {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub profit_total: Decimal,
    pub buckets: Vec<ChartBucket>,
    // Inclui as transações sintéticas (id negativo) no modo por categoria.
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub daily_total: Decimal,
    pub monthly_total: Decimal,
    pub monthly_expenses: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardSummary,
    pub low_stock: Vec<Product>,
    pub recent_orders: Vec<OrderView>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub total_in: i64,
    pub total_out: i64,
    pub buckets: Vec<ChartBucket>,
    pub movements: Vec<StockMovementView>,
}
