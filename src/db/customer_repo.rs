// src/db/customer_repo.rs

use sqlx::{Executor, Postgres};

use crate::{common::error::AppError, models::customer::Customer};

#[derive(Clone)]
pub struct CustomerRepository;

const CUSTOMER_COLUMNS: &str =
    "id, name, address, phone, notes, loyalty_count, is_active, created_at";

impl CustomerRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_active<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE is_active = TRUE ORDER BY name"
        ))
        .fetch_all(executor)
        .await?;
        Ok(customers)
    }

    pub async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        address: &str,
        phone: &str,
        notes: &str,
        loyalty_count: i32,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, address, phone, notes, loyalty_count)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(notes)
        .bind(loyalty_count)
        .fetch_one(executor)
        .await?;
        Ok(customer)
    }

    /// Edição completa do cadastro; `loyalty_count` entra aqui porque o
    /// admin pode corrigir os pontos manualmente.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        name: &str,
        address: &str,
        phone: &str,
        notes: &str,
        loyalty_count: i32,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET name = $2, address = $3, phone = $4, notes = $5, loyalty_count = $6
            WHERE id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(notes)
        .bind(loyalty_count)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Cliente"),
            other => other.into(),
        })?;
        Ok(customer)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "cliente"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cliente"));
        }
        Ok(())
    }

    pub async fn archive<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE customers SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cliente"));
        }
        Ok(())
    }

    /// Acréscimo de pontos calculado sobre o valor ATUAL no banco, não sobre
    /// o que o cliente da API leu antes. Evita sobrescrever um incremento
    /// concorrente com estado velho.
    pub async fn increment_loyalty<'e, E>(
        &self,
        executor: E,
        id: i64,
        delta: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE customers SET loyalty_count = loyalty_count + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Pontos atuais com lock de linha, para o resgate validar o saldo
    /// dentro da própria transação.
    pub async fn loyalty_for_update<'e, E>(&self, executor: E, id: i64) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_as::<_, (i32,)>(
            "SELECT loyalty_count FROM customers WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Cliente"))?;
        Ok(count.0)
    }
}
