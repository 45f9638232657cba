// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, OrderRepository},
    models::catalog::{Category, MovementType, Product},
};

#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    catalog_repo: CatalogRepository,
    order_repo: OrderRepository,
}

impl CatalogService {
    pub fn new(pool: PgPool, catalog_repo: CatalogRepository, order_repo: OrderRepository) -> Self {
        Self {
            pool,
            catalog_repo,
            order_repo,
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.list_active_products(&self.pool).await
    }

    /// Categorias cadastradas, com fallback para o conjunto padrão quando a
    /// tabela está vazia.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = self.catalog_repo.list_categories(&self.pool).await?;
        if categories.is_empty() {
            return Ok(Category::defaults());
        }
        Ok(categories)
    }

    pub async fn create_product(
        &self,
        name: &str,
        category: &str,
        price_cost: Decimal,
        price_sell: Decimal,
        stock_quantity: i32,
        stock_min: i32,
    ) -> Result<Product, AppError> {
        self.catalog_repo
            .create_product(&self.pool, name, category, price_cost, price_sell, stock_quantity, stock_min)
            .await
    }

    pub async fn update_product(
        &self,
        id: i64,
        name: &str,
        category: &str,
        price_cost: Decimal,
        price_sell: Decimal,
        stock_quantity: i32,
        stock_min: i32,
    ) -> Result<Product, AppError> {
        self.catalog_repo
            .update_product(&self.pool, id, name, category, price_cost, price_sell, stock_quantity, stock_min)
            .await
    }

    /// Entrada manual de estoque: soma a quantidade e registra a
    /// movimentação de entrada com o motivo informado.
    pub async fn add_stock(&self, id: i64, quantity: i32, reason: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.catalog_repo
            .find_product(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;
        self.catalog_repo.adjust_stock(&mut *tx, id, quantity).await?;
        self.catalog_repo
            .record_movement(&mut *tx, id, MovementType::In, quantity, reason)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Mesmo fluxo de conflito dos clientes: exclusão direta, e a violação
    /// de FK abre a escolha entre arquivar e cascata.
    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        self.catalog_repo.delete_product(&self.pool, id).await
    }

    pub async fn archive_product(&self, id: i64) -> Result<(), AppError> {
        self.catalog_repo.archive_product(&self.pool, id).await
    }

    /// Cascata do produto: itens de pedido que o referenciam, depois as
    /// movimentações de estoque, depois o produto.
    pub async fn cascade_delete_product(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.order_repo.delete_items_by_product(&mut *tx, id).await?;
        self.catalog_repo.delete_movements_by_product(&mut *tx, id).await?;
        self.catalog_repo.delete_product(&mut *tx, id).await?;
        tx.commit().await?;
        tracing::warn!(product_id = id, "Produto excluído em cascata com o histórico de vendas");
        Ok(())
    }
}
