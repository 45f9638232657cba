// src/handlers/reports.rs

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        access::{self, Capability},
        auth::CurrentProfile,
    },
    models::report::{DashboardData, FinanceReport, Period, StockReport},
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub period: Period,

    /// Data de referência (o período que a contém é o intervalo do relatório).
    pub date: NaiveDate,

    /// Nome da categoria, ou ausente/"all" para a visão geral.
    pub category: Option<String>,

    /// Só para o relatório de estoque: restringe a um produto.
    pub product_id: Option<i64>,
}

impl ReportQuery {
    // "all" vem da UI com o mesmo significado de "sem filtro".
    fn category_filter(&self) -> Option<&str> {
        match self.category.as_deref() {
            None | Some("all") | Some("") => None,
            Some(cat) => Some(cat),
        }
    }
}

// GET /api/reports/finance
#[utoipa::path(
    get,
    path = "/api/reports/finance",
    tag = "Relatórios",
    params(ReportQuery),
    responses((status = 200, description = "Totais, buckets do gráfico e transações do período", body = FinanceReport)),
    security(("api_jwt" = []))
)]
pub async fn finance_report(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Query(query): Query<ReportQuery>,
) -> Result<Json<FinanceReport>, AppError> {
    access::require(&profile, Capability::ManageFinance)?;
    let report = app_state
        .report_service
        .finance_report(query.period, query.date, query.category_filter())
        .await?;
    Ok(Json(report))
}

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Relatórios",
    responses((status = 200, description = "Números da tela inicial", body = DashboardData)),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Json<DashboardData>, AppError> {
    access::require(&profile, Capability::ViewDashboard)?;
    Ok(Json(app_state.report_service.dashboard().await?))
}

// GET /api/reports/stock
pub async fn stock_report(
    State(app_state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    Query(query): Query<ReportQuery>,
) -> Result<Json<StockReport>, AppError> {
    access::require(&profile, Capability::ManageCatalog)?;
    let report = app_state
        .report_service
        .stock_report(
            query.period,
            query.date,
            query.category_filter(),
            query.product_id,
        )
        .await?;
    Ok(Json(report))
}
