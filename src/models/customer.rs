// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub notes: String,
    // Incrementado por compra qualificada, editável pelo admin,
    // debitado em 10 no resgate do brinde.
    pub loyalty_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
