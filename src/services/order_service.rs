// src/services/order_service.rs
//
// Fluxo de pedido: criação, transição de pagamento e exclusão. Cada fluxo
// roda dentro de uma transação do sqlx -- os passos são os mesmos do
// protocolo original (pedido -> itens -> baixa de estoque -> fidelidade ->
// lançamento financeiro), só que sem estado parcial em caso de falha.

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CustomerRepository, FinanceRepository, OrderRepository},
    models::{
        catalog::MovementType,
        finance::TransactionType,
        order::{CartLine, DeliveryStatus, Order, PaymentStatus, cart_total},
    },
    services::loyalty,
};

#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
    order_repo: OrderRepository,
    catalog_repo: CatalogRepository,
    customer_repo: CustomerRepository,
    finance_repo: FinanceRepository,
}

impl OrderService {
    pub fn new(
        pool: PgPool,
        order_repo: OrderRepository,
        catalog_repo: CatalogRepository,
        customer_repo: CustomerRepository,
        finance_repo: FinanceRepository,
    ) -> Self {
        Self {
            pool,
            order_repo,
            catalog_repo,
            customer_repo,
            finance_repo,
        }
    }

    /// Protocolo de criação:
    /// 1. pedido com o total calculado dos itens;
    /// 2. um item por linha do carrinho, com snapshot do preço;
    /// 3. se já nasce pago: baixa de estoque + movimentação "Venda" por item
    ///    e contagem dos garrafões qualificados;
    /// 4. se pago e com cliente: soma dos pontos sobre o valor ATUAL no banco;
    /// 5. se pago: lançamento de receita "Venda Pedido #id".
    pub async fn create_order(
        &self,
        customer_id: Option<i64>,
        payment_method: &str,
        payment_status: PaymentStatus,
        delivery_status: DeliveryStatus,
        lines: &[CartLine],
    ) -> Result<Order, AppError> {
        let total = cart_total(lines);
        let paid = payment_status == PaymentStatus::Pago;

        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .insert_order(
                &mut *tx,
                customer_id,
                total,
                payment_method,
                payment_status,
                delivery_status,
            )
            .await?;

        let mut qualifying_units: i32 = 0;
        for line in lines {
            self.order_repo
                .insert_item(&mut *tx, order.id, line.product_id, line.quantity, line.price)
                .await?;

            if paid {
                let product = self
                    .catalog_repo
                    .find_product(&mut *tx, line.product_id)
                    .await?
                    .ok_or(AppError::NotFound("Produto"))?;

                self.catalog_repo
                    .adjust_stock(&mut *tx, line.product_id, -line.quantity)
                    .await?;
                self.catalog_repo
                    .record_movement(&mut *tx, line.product_id, MovementType::Out, line.quantity, "Venda")
                    .await?;

                if loyalty::is_qualifying_water(&product.name, &product.category) {
                    qualifying_units += line.quantity;
                }
            }
        }

        if paid {
            if let Some(customer_id) = customer_id {
                self.customer_repo
                    .increment_loyalty(&mut *tx, customer_id, qualifying_units)
                    .await?;
            }
            self.finance_repo
                .insert(
                    &mut *tx,
                    TransactionType::Income,
                    total,
                    &format!("Venda Pedido #{}", order.id),
                )
                .await?;
        }

        tx.commit().await?;
        tracing::info!(order_id = order.id, %total, "Pedido criado");
        Ok(order)
    }

    /// Transição de status de pagamento. Marcar como "Pago" replica os
    /// efeitos tardios da venda (baixa de estoque, fidelidade, receita),
    /// mas só se o status anterior não era "Pago" -- senão contaria dobrado.
    /// Voltar para "Pendente" só grava o status; nada é desfeito.
    pub async fn set_payment_status(&self, id: i64, status: PaymentStatus) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        if status == PaymentStatus::Pago && order.payment_status != PaymentStatus::Pago {
            self.apply_payment_effects(&mut tx, &order).await?;
        }

        self.order_repo.update_payment_status(&mut *tx, id, status).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn apply_payment_effects(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order: &Order,
    ) -> Result<(), AppError> {
        let items = self.order_repo.items_of(&mut **tx, order.id).await?;

        let mut qualifying_units: i32 = 0;
        for item in &items {
            let product = self.catalog_repo.find_product(&mut **tx, item.product_id).await?;
            if let Some(product) = product {
                if loyalty::is_qualifying_water(&product.name, &product.category) {
                    qualifying_units += item.quantity;
                }
                self.catalog_repo
                    .adjust_stock(&mut **tx, item.product_id, -item.quantity)
                    .await?;
                self.catalog_repo
                    .record_movement(
                        &mut **tx,
                        item.product_id,
                        MovementType::Out,
                        item.quantity,
                        "Venda (Confirmada)",
                    )
                    .await?;
            }
        }

        if let Some(customer_id) = order.customer_id {
            self.customer_repo
                .increment_loyalty(&mut **tx, customer_id, qualifying_units)
                .await?;
        }

        self.finance_repo
            .insert(
                &mut **tx,
                TransactionType::Income,
                order.total_amount,
                &format!("Pagamento Pedido #{}", order.id),
            )
            .await?;
        Ok(())
    }

    pub async fn set_delivery_status(&self, id: i64, status: DeliveryStatus) -> Result<(), AppError> {
        self.order_repo.update_delivery_status(&self.pool, id, status).await
    }

    /// Exclui itens e pedido. Efeitos já aplicados (estoque, pontos,
    /// receita) NÃO são revertidos; a UI avisa antes de confirmar.
    pub async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.order_repo.delete_items_by_order(&mut *tx, id).await?;
        self.order_repo.delete_order(&mut *tx, id).await?;
        tx.commit().await?;
        tracing::info!(order_id = id, "Pedido excluído (efeitos de venda mantidos)");
        Ok(())
    }

    pub async fn list_orders(&self) -> Result<Vec<crate::models::order::OrderView>, AppError> {
        self.order_repo.list_with_details(&self.pool, None).await
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::common::testdb;

    fn service(pool: PgPool) -> OrderService {
        OrderService::new(
            pool,
            OrderRepository::new(),
            CatalogRepository::new(),
            CustomerRepository::new(),
            FinanceRepository::new(),
        )
    }

    #[tokio::test]
    async fn pedido_pago_baixa_estoque_pontua_e_lanca_receita() {
        let (_pg, pool) = testdb::pool().await;
        let catalog = CatalogRepository::new();
        let customers = CustomerRepository::new();
        let finance = FinanceRepository::new();

        let water = catalog
            .create_product(&pool, "Água Mineral 20L Indaiá", "Água 20L", dec!(8), dec!(15), 10, 2)
            .await
            .unwrap();
        let customer = customers
            .create(&pool, "Dona Marta", "", "", "", 3)
            .await
            .unwrap();

        // Outro caixa pontua o mesmo cliente antes desta venda fechar. Como
        // o acréscimo é por delta no banco, os 4 pontos não podem se perder.
        customers.increment_loyalty(&pool, customer.id, 4).await.unwrap();

        let order = service(pool.clone())
            .create_order(
                Some(customer.id),
                "Pix",
                PaymentStatus::Pago,
                DeliveryStatus::EmPreparo,
                &[CartLine { product_id: water.id, quantity: 2, price: dec!(15) }],
            )
            .await
            .unwrap();

        assert_eq!(order.total_amount, dec!(30));

        let product = catalog.find_product(&pool, water.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 8);

        let updated = customers.find(&pool, customer.id).await.unwrap().unwrap();
        assert_eq!(updated.loyalty_count, 3 + 4 + 2);

        let transactions = finance.list_all(&pool).await.unwrap();
        assert!(transactions.iter().any(|t| {
            t.transaction_type == TransactionType::Income
                && t.amount == dec!(30)
                && t.description == format!("Venda Pedido #{}", order.id)
        }));
    }

    #[tokio::test]
    async fn transicao_para_pago_aplica_os_efeitos_uma_unica_vez() {
        let (_pg, pool) = testdb::pool().await;
        let catalog = CatalogRepository::new();
        let customers = CustomerRepository::new();
        let finance = FinanceRepository::new();

        let water = catalog
            .create_product(&pool, "Água 20 Litros Gamboa", "Água 20L", dec!(7), dec!(14), 10, 2)
            .await
            .unwrap();
        let customer = customers.create(&pool, "Seu Jorge", "", "", "", 0).await.unwrap();

        let svc = service(pool.clone());
        let order = svc
            .create_order(
                Some(customer.id),
                "Dinheiro",
                PaymentStatus::Pendente,
                DeliveryStatus::EmPreparo,
                &[CartLine { product_id: water.id, quantity: 1, price: dec!(14) }],
            )
            .await
            .unwrap();

        // Pendente não mexe em nada.
        let product = catalog.find_product(&pool, water.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 10);
        let c = customers.find(&pool, customer.id).await.unwrap().unwrap();
        assert_eq!(c.loyalty_count, 0);

        svc.set_payment_status(order.id, PaymentStatus::Pago).await.unwrap();
        // Pago de novo: os efeitos não podem contar dobrado.
        svc.set_payment_status(order.id, PaymentStatus::Pago).await.unwrap();

        let product = catalog.find_product(&pool, water.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 9);
        let c = customers.find(&pool, customer.id).await.unwrap().unwrap();
        assert_eq!(c.loyalty_count, 1);

        let payments: Vec<_> = finance
            .list_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.description == format!("Pagamento Pedido #{}", order.id))
            .collect();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, dec!(14));
    }
}
