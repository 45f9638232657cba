// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, Postgres};

use crate::{
    common::error::AppError,
    models::order::{DeliveryStatus, Order, OrderItem, OrderItemView, OrderView, PaymentStatus},
};

#[derive(Clone)]
pub struct OrderRepository;

const ORDER_COLUMNS: &str =
    "id, customer_id, total_amount, payment_method, payment_status, delivery_status, created_at";

// Linha intermediária da listagem: pedido + cliente resolvido via LEFT JOIN.
// O JOIN ignora `is_active` de propósito: pedido de cliente arquivado
// continua mostrando o nome.
#[derive(Debug, FromRow)]
struct OrderHeaderRow {
    id: i64,
    customer_id: Option<i64>,
    customer_name: Option<String>,
    customer_address: Option<String>,
    customer_phone: Option<String>,
    total_amount: Decimal,
    payment_method: String,
    payment_status: PaymentStatus,
    delivery_status: DeliveryStatus,
    created_at: DateTime<Utc>,
}

/// Item de pedido com categoria e custo do produto, para os relatórios.
#[derive(Debug, Clone, FromRow)]
pub struct ItemWithProduct {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_time: Decimal,
    pub product_category: String,
    pub product_cost: Decimal,
}

const HEADER_QUERY: &str = r#"
    SELECT o.id, o.customer_id, c.name AS customer_name, c.address AS customer_address,
           c.phone AS customer_phone, o.total_amount, o.payment_method,
           o.payment_status, o.delivery_status, o.created_at
    FROM orders o
    LEFT JOIN customers c ON c.id = o.customer_id
"#;

impl OrderRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        customer_id: Option<i64>,
        total_amount: Decimal,
        payment_method: &str,
        payment_status: PaymentStatus,
        delivery_status: DeliveryStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (customer_id, total_amount, payment_method, payment_status, delivery_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(total_amount)
        .bind(payment_method)
        .bind(payment_status)
        .bind(delivery_status)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        order_id: i64,
        product_id: i64,
        quantity: i32,
        price_at_time: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price_at_time) VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price_at_time)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Busca com lock de linha: a transição de pagamento precisa ler o
    /// status anterior sem corrida com outra transição.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn items_of<'e, E>(&self, executor: E, order_id: i64) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price_at_time FROM order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Listagem completa, mais recentes primeiro, com itens e cliente.
    pub async fn list_with_details<'e, E>(
        &self,
        executor: E,
        limit: Option<i64>,
    ) -> Result<Vec<OrderView>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Copy,
    {
        let query = match limit {
            Some(_) => format!("{HEADER_QUERY} ORDER BY o.created_at DESC LIMIT $1"),
            None => format!("{HEADER_QUERY} ORDER BY o.created_at DESC"),
        };
        let mut q = sqlx::query_as::<_, OrderHeaderRow>(&query);
        if let Some(limit) = limit {
            q = q.bind(limit);
        }
        let headers = q.fetch_all(executor).await?;

        let ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
        let items = sqlx::query_as::<_, OrderItemView>(
            r#"
            SELECT i.id, i.order_id, i.product_id, i.quantity, i.price_at_time,
                   COALESCE(p.name, 'Produto Desconhecido') AS product_name
            FROM order_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.order_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(executor)
        .await?;

        let mut views: Vec<OrderView> = headers
            .into_iter()
            .map(|h| OrderView {
                id: h.id,
                customer_id: h.customer_id,
                customer_name: h.customer_name,
                customer_address: h.customer_address,
                customer_phone: h.customer_phone,
                total_amount: h.total_amount,
                payment_method: h.payment_method,
                payment_status: h.payment_status,
                delivery_status: h.delivery_status,
                created_at: h.created_at,
                items: Vec::new(),
            })
            .collect();
        for item in items {
            if let Some(view) = views.iter_mut().find(|v| v.id == item.order_id) {
                view.items.push(item);
            }
        }
        Ok(views)
    }

    pub async fn orders_in_range<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE created_at >= $1 AND created_at < $2"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;
        Ok(orders)
    }

    pub async fn paid_orders_in_range<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE payment_status = 'Pago' AND created_at >= $1 AND created_at < $2
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;
        Ok(orders)
    }

    pub async fn items_of_orders<'e, E>(
        &self,
        executor: E,
        order_ids: &[i64],
    ) -> Result<Vec<ItemWithProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, ItemWithProduct>(
            r#"
            SELECT i.order_id, i.product_id, i.quantity, i.price_at_time,
                   p.category AS product_category, p.price_cost AS product_cost
            FROM order_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.order_id = ANY($1)
            "#,
        )
        .bind(order_ids)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn update_payment_status<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: PaymentStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE orders SET payment_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn update_delivery_status<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: DeliveryStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE orders SET delivery_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Pedido"));
        }
        Ok(())
    }

    pub async fn delete_items_by_order<'e, E>(&self, executor: E, order_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_order<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Pedido"));
        }
        Ok(())
    }

    // --- Cascata do cliente: itens dos pedidos, pedidos, nessa ordem ---

    pub async fn delete_items_by_customer<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "DELETE FROM order_items WHERE order_id IN (SELECT id FROM orders WHERE customer_id = $1)",
        )
        .bind(customer_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn delete_orders_by_customer<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM orders WHERE customer_id = $1")
            .bind(customer_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_items_by_product<'e, E>(
        &self,
        executor: E,
        product_id: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM order_items WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
