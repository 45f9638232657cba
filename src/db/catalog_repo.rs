// src/db/catalog_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::catalog::{Category, MovementType, Product, StockMovementView},
};

#[derive(Clone)]
pub struct CatalogRepository;

const PRODUCT_COLUMNS: &str =
    "id, name, category, price_cost, price_sell, stock_quantity, stock_min, is_active, created_at";

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    /// Listagem padrão: só produtos ativos (arquivados ficam de fora).
    pub async fn list_active_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = TRUE ORDER BY name"
        ))
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn find_product<'e, E>(&self, executor: E, id: i64) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        name: &str,
        category: &str,
        price_cost: Decimal,
        price_sell: Decimal,
        stock_quantity: i32,
        stock_min: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, category, price_cost, price_sell, stock_quantity, stock_min)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(category)
        .bind(price_cost)
        .bind(price_sell)
        .bind(stock_quantity)
        .bind(stock_min)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: i64,
        name: &str,
        category: &str,
        price_cost: Decimal,
        price_sell: Decimal,
        stock_quantity: i32,
        stock_min: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, category = $3, price_cost = $4, price_sell = $5,
                stock_quantity = $6, stock_min = $7
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(price_cost)
        .bind(price_sell)
        .bind(stock_quantity)
        .bind(stock_min)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Produto"),
            other => other.into(),
        })?;
        Ok(product)
    }

    /// Exclusão direta. Violação de FK vira `DeleteConflict` para o fluxo
    /// de arquivar-ou-cascata decidir o destino.
    pub async fn delete_product<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| AppError::from_delete(e, "produto"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Produto"));
        }
        Ok(())
    }

    pub async fn archive_product<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE products SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Produto"));
        }
        Ok(())
    }

    /// Aplica um delta no estoque direto no banco. Sem clamp em zero:
    /// estoque negativo é comportamento aceito do negócio.
    pub async fn adjust_stock<'e, E>(&self, executor: E, id: i64, delta: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET stock_quantity = stock_quantity + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Produto genérico de "Água 20L" usado na baixa de estoque do brinde.
    pub async fn find_reward_water_product<'e, E>(
        &self,
        executor: E,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE category = 'Água 20L' OR name ILIKE '%água 20l%'
            ORDER BY id
            LIMIT 1
            "#
        ))
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn low_stock_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE is_active = TRUE AND stock_quantity <= stock_min
            ORDER BY stock_quantity
            "#
        ))
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    // =========================================================================
    //  MOVIMENTAÇÕES DE ESTOQUE (append-only)
    // =========================================================================

    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        product_id: i64,
        movement_type: MovementType,
        quantity: i32,
        reason: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO stock_movements (product_id, type, quantity, reason) VALUES ($1, $2, $3, $4)",
        )
        .bind(product_id)
        .bind(movement_type)
        .bind(quantity)
        .bind(reason)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Movimentações do período com o produto resolvido, mais recentes primeiro.
    pub async fn movements_in_range<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockMovementView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movements = sqlx::query_as::<_, StockMovementView>(
            r#"
            SELECT m.id, m.product_id, m.type, m.quantity, m.reason, m.created_at,
                   p.name AS product_name, p.category AS product_category
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            WHERE m.created_at >= $1 AND m.created_at < $2
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;
        Ok(movements)
    }

    pub async fn delete_movements_by_product<'e, E>(
        &self,
        executor: E,
        product_id: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM stock_movements WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, emoji FROM categories ORDER BY name")
                .fetch_all(executor)
                .await?;
        Ok(categories)
    }
}
