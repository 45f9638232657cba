// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Catálogo ---
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::delete_product,

        // --- Clientes ---
        handlers::customers::delete_customer,
        handlers::customers::redeem_reward,

        // --- Pedidos ---
        handlers::orders::list_orders,
        handlers::orders::create_order,
        handlers::orders::set_payment_status,

        // --- Financeiro ---
        handlers::finance::create_transaction,

        // --- Relatórios ---
        handlers::reports::finance_report,
        handlers::reports::dashboard,

        // --- Equipe ---
        handlers::team::update_role,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Profile,
            models::auth::AuthResponse,
            handlers::auth::RegisterPayload,
            handlers::auth::LoginPayload,

            // --- Catálogo ---
            models::catalog::Product,
            models::catalog::Category,
            models::catalog::MovementType,
            models::catalog::StockMovementView,
            handlers::products::ProductPayload,
            handlers::products::StockEntryPayload,

            // --- Clientes ---
            models::customer::Customer,
            handlers::customers::CustomerPayload,

            // --- Pedidos ---
            models::order::PaymentStatus,
            models::order::DeliveryStatus,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderItemView,
            models::order::OrderView,
            models::order::CartLine,
            handlers::orders::CreateOrderPayload,
            handlers::orders::PaymentStatusPayload,
            handlers::orders::DeliveryStatusPayload,

            // --- Financeiro ---
            models::finance::TransactionType,
            models::finance::Transaction,
            handlers::finance::TransactionPayload,

            // --- Relatórios ---
            models::report::Period,
            models::report::ChartBucket,
            models::report::FinanceReport,
            models::report::DashboardSummary,
            models::report::DashboardData,
            models::report::StockReport,

            // --- Equipe ---
            handlers::team::UpdateRolePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Catálogo", description = "Produtos, Categorias e Estoque"),
        (name = "Clientes", description = "Cadastro e Fidelidade"),
        (name = "Pedidos", description = "Vendas e Entregas"),
        (name = "Financeiro", description = "Lançamentos de Caixa"),
        (name = "Relatórios", description = "Dashboard e Relatórios Gerenciais"),
        (name = "Equipe", description = "Perfis e Papéis de Acesso")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
