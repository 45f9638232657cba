// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("Migrações do banco de dados executadas");

    // Rotas públicas de autenticação.
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    let catalog_routes = Router::new()
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/products/{id}/stock", post(handlers::products::add_stock))
        .route(
            "/products/{id}/archive",
            patch(handlers::products::archive_product),
        )
        .route(
            "/products/{id}/cascade",
            delete(handlers::products::cascade_delete_product),
        )
        .route("/categories", get(handlers::products::list_categories));

    let customer_routes = Router::new()
        .route(
            "/",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/{id}",
            put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/{id}/archive",
            patch(handlers::customers::archive_customer),
        )
        .route(
            "/{id}/cascade",
            delete(handlers::customers::cascade_delete_customer),
        )
        .route("/{id}/redeem", post(handlers::customers::redeem_reward));

    let order_routes = Router::new()
        .route(
            "/",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/{id}", delete(handlers::orders::delete_order))
        .route(
            "/{id}/payment",
            patch(handlers::orders::set_payment_status),
        )
        .route(
            "/{id}/delivery",
            patch(handlers::orders::set_delivery_status),
        );

    let finance_routes = Router::new()
        .route(
            "/transactions",
            get(handlers::finance::list_transactions)
                .post(handlers::finance::create_transaction),
        )
        .route(
            "/transactions/{id}",
            delete(handlers::finance::delete_transaction),
        );

    let report_routes = Router::new()
        .route("/finance", get(handlers::reports::finance_report))
        .route("/dashboard", get(handlers::reports::dashboard))
        .route("/stock", get(handlers::reports::stock_report));

    let team_routes = Router::new()
        .route("/", get(handlers::team::list_team))
        .route("/{id}/role", patch(handlers::team::update_role));

    // Tudo que não é auth exige sessão válida; a checagem de papel fica em
    // cada handler.
    let protected = Router::new()
        .merge(catalog_routes)
        .nest("/customers", customer_routes)
        .nest("/orders", order_routes)
        .nest("/finance", finance_routes)
        .nest("/reports", report_routes)
        .nest("/team", team_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
