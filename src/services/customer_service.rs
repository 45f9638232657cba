// src/services/customer_service.rs
//
// Cadastro de clientes, resgate de fidelidade e o fluxo de exclusão com
// conflito: tenta excluir direto; se o banco acusar vínculo (FK), o chamador
// recebe as duas opções -- arquivar (reversível, preserva histórico) ou
// excluir em cascata (irreversível).

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CustomerRepository, FinanceRepository, OrderRepository},
    models::{catalog::MovementType, customer::Customer, finance::TransactionType},
};

/// Pontos debitados por resgate de brinde.
const REDEEM_COST: i32 = 10;

#[derive(Clone)]
pub struct CustomerService {
    pool: PgPool,
    customer_repo: CustomerRepository,
    order_repo: OrderRepository,
    catalog_repo: CatalogRepository,
    finance_repo: FinanceRepository,
}

impl CustomerService {
    pub fn new(
        pool: PgPool,
        customer_repo: CustomerRepository,
        order_repo: OrderRepository,
        catalog_repo: CatalogRepository,
        finance_repo: FinanceRepository,
    ) -> Self {
        Self {
            pool,
            customer_repo,
            order_repo,
            catalog_repo,
            finance_repo,
        }
    }

    pub async fn list(&self) -> Result<Vec<Customer>, AppError> {
        self.customer_repo.list_active(&self.pool).await
    }

    pub async fn create(
        &self,
        name: &str,
        address: &str,
        phone: &str,
        notes: &str,
        loyalty_count: i32,
    ) -> Result<Customer, AppError> {
        self.customer_repo
            .create(&self.pool, name, address, phone, notes, loyalty_count)
            .await
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        address: &str,
        phone: &str,
        notes: &str,
        loyalty_count: i32,
    ) -> Result<Customer, AppError> {
        self.customer_repo
            .update(&self.pool, id, name, address, phone, notes, loyalty_count)
            .await
    }

    /// Exclusão direta. Se houver pedidos vinculados, devolve
    /// `DeleteConflict` e a decisão volta para o usuário.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.customer_repo.delete(&self.pool, id).await
    }

    /// Arquiva: some das listagens padrão, mas o histórico continua
    /// resolvendo o nome do cliente.
    pub async fn archive(&self, id: i64) -> Result<(), AppError> {
        self.customer_repo.archive(&self.pool, id).await
    }

    /// Cascata: itens dos pedidos do cliente, os pedidos e por fim o
    /// cadastro, numa transação só. Depois disso o histórico se foi.
    pub async fn cascade_delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.order_repo.delete_items_by_customer(&mut *tx, id).await?;
        self.order_repo.delete_orders_by_customer(&mut *tx, id).await?;
        self.customer_repo.delete(&mut *tx, id).await?;
        tx.commit().await?;
        tracing::warn!(customer_id = id, "Cliente excluído em cascata com todo o histórico");
        Ok(())
    }

    /// Resgate do brinde: exige 10 pontos no valor ATUAL do banco (não no
    /// que a tela leu). Debita 10, registra receita de R$ 0 e dá baixa em um
    /// garrafão genérico de 20L, se existir algum cadastrado.
    pub async fn redeem_reward(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.customer_repo.loyalty_for_update(&mut *tx, id).await?;
        if current < REDEEM_COST {
            return Err(AppError::InsufficientLoyalty { current });
        }

        let customer = self
            .customer_repo
            .find(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        self.customer_repo
            .increment_loyalty(&mut *tx, id, -REDEEM_COST)
            .await?;

        self.finance_repo
            .insert(
                &mut *tx,
                TransactionType::Income,
                rust_decimal::Decimal::ZERO,
                &format!("Brinde Fidelidade - {}", customer.name),
            )
            .await?;

        if let Some(water) = self.catalog_repo.find_reward_water_product(&mut *tx).await? {
            self.catalog_repo.adjust_stock(&mut *tx, water.id, -1).await?;
            self.catalog_repo
                .record_movement(
                    &mut *tx,
                    water.id,
                    MovementType::Out,
                    1,
                    &format!("Brinde (Fidelidade: {})", customer.name),
                )
                .await?;
        }

        tx.commit().await?;
        tracing::info!(customer_id = id, "Brinde de fidelidade resgatado");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::common::testdb;
    use crate::models::order::{DeliveryStatus, PaymentStatus};

    fn service(pool: PgPool) -> CustomerService {
        CustomerService::new(
            pool,
            CustomerRepository::new(),
            OrderRepository::new(),
            CatalogRepository::new(),
            FinanceRepository::new(),
        )
    }

    #[tokio::test]
    async fn resgate_com_dez_pontos_zera_e_da_baixa_no_garrafao() {
        let (_pg, pool) = testdb::pool().await;
        let catalog = CatalogRepository::new();
        let customers = CustomerRepository::new();
        let finance = FinanceRepository::new();

        let water = catalog
            .create_product(&pool, "Garrafão Retornável", "Água 20L", dec!(8), dec!(15), 5, 2)
            .await
            .unwrap();
        let customer = customers.create(&pool, "Dona Marta", "", "", "", 10).await.unwrap();

        service(pool.clone()).redeem_reward(customer.id).await.unwrap();

        let updated = customers.find(&pool, customer.id).await.unwrap().unwrap();
        assert_eq!(updated.loyalty_count, 0);

        let product = catalog.find_product(&pool, water.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 4);

        let transactions = finance.list_all(&pool).await.unwrap();
        assert!(transactions.iter().any(|t| {
            t.transaction_type == TransactionType::Income
                && t.amount == rust_decimal::Decimal::ZERO
                && t.description == "Brinde Fidelidade - Dona Marta"
        }));
    }

    #[tokio::test]
    async fn resgate_com_nove_pontos_e_recusado_sem_efeitos() {
        let (_pg, pool) = testdb::pool().await;
        let catalog = CatalogRepository::new();
        let customers = CustomerRepository::new();
        let finance = FinanceRepository::new();

        let water = catalog
            .create_product(&pool, "Garrafão Retornável", "Água 20L", dec!(8), dec!(15), 5, 2)
            .await
            .unwrap();
        let customer = customers.create(&pool, "Seu Jorge", "", "", "", 9).await.unwrap();

        let err = service(pool.clone()).redeem_reward(customer.id).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientLoyalty { current: 9 }));

        // Nada pode ter sido gravado.
        let updated = customers.find(&pool, customer.id).await.unwrap().unwrap();
        assert_eq!(updated.loyalty_count, 9);
        let product = catalog.find_product(&pool, water.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 5);
        assert!(finance.list_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cliente_com_pedidos_nao_exclui_direto_mas_arquiva() {
        let (_pg, pool) = testdb::pool().await;
        let catalog = CatalogRepository::new();
        let customers = CustomerRepository::new();
        let orders = OrderRepository::new();

        let gas = catalog
            .create_product(&pool, "Botijão P13", "Gás", dec!(90), dec!(110), 10, 2)
            .await
            .unwrap();
        let customer = customers.create(&pool, "Padaria do João", "", "", "", 0).await.unwrap();
        let order = orders
            .insert_order(
                &pool,
                Some(customer.id),
                dec!(110),
                "Pix",
                PaymentStatus::Pendente,
                DeliveryStatus::EmPreparo,
            )
            .await
            .unwrap();
        orders.insert_item(&pool, order.id, gas.id, 1, dec!(110)).await.unwrap();

        let svc = service(pool.clone());
        let err = svc.delete(customer.id).await.unwrap_err();
        assert!(matches!(err, AppError::DeleteConflict { entity: "cliente" }));

        svc.archive(customer.id).await.unwrap();
        let archived = customers.find(&pool, customer.id).await.unwrap().unwrap();
        assert!(!archived.is_active);
        assert!(customers.list_active(&pool).await.unwrap().is_empty());

        // O histórico continua resolvendo o nome do cliente arquivado.
        let views = orders.list_with_details(&pool, None).await.unwrap();
        assert_eq!(views[0].customer_name.as_deref(), Some("Padaria do João"));
    }

    #[tokio::test]
    async fn cascata_remove_pedidos_itens_e_cadastro() {
        let (_pg, pool) = testdb::pool().await;
        let catalog = CatalogRepository::new();
        let customers = CustomerRepository::new();
        let orders = OrderRepository::new();

        let gas = catalog
            .create_product(&pool, "Botijão P13", "Gás", dec!(90), dec!(110), 10, 2)
            .await
            .unwrap();
        let customer = customers.create(&pool, "Padaria do João", "", "", "", 0).await.unwrap();
        let order = orders
            .insert_order(
                &pool,
                Some(customer.id),
                dec!(110),
                "Pix",
                PaymentStatus::Pendente,
                DeliveryStatus::EmPreparo,
            )
            .await
            .unwrap();
        orders.insert_item(&pool, order.id, gas.id, 1, dec!(110)).await.unwrap();

        service(pool.clone()).cascade_delete(customer.id).await.unwrap();

        assert!(customers.find(&pool, customer.id).await.unwrap().is_none());
        assert!(orders.list_with_details(&pool, None).await.unwrap().is_empty());
        assert!(orders.items_of(&pool, order.id).await.unwrap().is_empty());
    }
}
