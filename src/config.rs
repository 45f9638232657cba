// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogRepository, CustomerRepository, FinanceRepository, OrderRepository,
        ProfileRepository,
    },
    services::{
        AuthService, CatalogService, CustomerService, OrderService, ReportService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub customer_service: CustomerService,
    pub order_service: OrderService,
    pub report_service: ReportService,
    pub finance_repo: FinanceRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // Sem banco ou sem segredo não há aplicação.
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("Conexão com o banco de dados estabelecida");

        // Monta o grafo de dependências: repositórios sem estado, serviços
        // com o pool (cada um abre as próprias transações).
        let profile_repo = ProfileRepository::new();
        let catalog_repo = CatalogRepository::new();
        let customer_repo = CustomerRepository::new();
        let order_repo = OrderRepository::new();
        let finance_repo = FinanceRepository::new();

        let auth_service = AuthService::new(profile_repo, jwt_secret, db_pool.clone());
        let catalog_service =
            CatalogService::new(db_pool.clone(), catalog_repo.clone(), order_repo.clone());
        let customer_service = CustomerService::new(
            db_pool.clone(),
            customer_repo.clone(),
            order_repo.clone(),
            catalog_repo.clone(),
            finance_repo.clone(),
        );
        let order_service = OrderService::new(
            db_pool.clone(),
            order_repo.clone(),
            catalog_repo.clone(),
            customer_repo,
            finance_repo.clone(),
        );
        let report_service = ReportService::new(
            db_pool.clone(),
            order_repo,
            finance_repo.clone(),
            catalog_repo,
        );

        Ok(Self {
            db_pool,
            auth_service,
            catalog_service,
            customer_service,
            order_service,
            report_service,
            finance_repo,
        })
    }
}
