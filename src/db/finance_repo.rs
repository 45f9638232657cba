// src/db/finance_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::finance::{Transaction, TransactionType},
};

#[derive(Clone)]
pub struct FinanceRepository;

const TRANSACTION_COLUMNS: &str = "id, type, amount, description, created_at";

impl FinanceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        transaction_type: TransactionType,
        amount: Decimal,
        description: &str,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (type, amount, description)
            VALUES ($1, $2, $3)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(transaction_type)
        .bind(amount)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(transaction)
    }

    pub async fn list_in_range<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE created_at >= $1 AND created_at < $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;
        Ok(transactions)
    }

    /// Tabela inteira, para os totais do dashboard (a base é pequena).
    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY created_at DESC"
        ))
        .fetch_all(executor)
        .await?;
        Ok(transactions)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Lançamento"));
        }
        Ok(())
    }
}
