// src/services/report_service.rs
//
// Agregação dos relatórios: resolve o período, pré-popula os buckets do
// gráfico (bucket vazio renderiza zero, não some), acumula transações e
// calcula lucro estimado. As funções de cálculo são puras; o acesso ao banco
// fica nos métodos async.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, FinanceRepository, OrderRepository},
    models::{
        finance::{Transaction, TransactionType},
        order::{Order, PaymentStatus},
        report::{ChartBucket, DashboardData, DashboardSummary, FinanceReport, Period, StockReport},
    },
};

/// Intervalo meio-aberto [início, fim) do período que contém a data de
/// referência. Semana começa na segunda-feira.
pub fn period_bounds(period: Period, reference: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start, end) = match period {
        Period::Daily => (reference, reference + Duration::days(1)),
        Period::Weekly => {
            let monday =
                reference - Duration::days(reference.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(7))
        }
        Period::Monthly => {
            let first = reference.with_day(1).expect("dia 1 sempre existe");
            let next = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            }
            .expect("primeiro dia do mês seguinte sempre existe");
            (first, next)
        }
    };
    (
        start.and_hms_opt(0, 0, 0).expect("meia-noite válida").and_utc(),
        end.and_hms_opt(0, 0, 0).expect("meia-noite válida").and_utc(),
    )
}

/// Buckets zerados, em ordem cronológica. Diário: horas 08:00..20:00;
/// semanal/mensal: um bucket por dia do intervalo, rotulado "dd/MM".
pub fn init_buckets(period: Period, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<ChartBucket> {
    match period {
        Period::Daily => (8..=20)
            .map(|hour| ChartBucket::zeroed(format!("{:02}:00", hour)))
            .collect(),
        Period::Weekly | Period::Monthly => {
            let mut buckets = Vec::new();
            let mut current = start.date_naive();
            let last = end.date_naive();
            while current < last {
                buckets.push(ChartBucket::zeroed(current.format("%d/%m").to_string()));
                current += Duration::days(1);
            }
            buckets
        }
    }
}

fn bucket_label(period: Period, at: DateTime<Utc>) -> String {
    match period {
        Period::Daily => format!("{:02}:00", at.hour()),
        Period::Weekly | Period::Monthly => at.format("%d/%m").to_string(),
    }
}

/// Soma no bucket correspondente ao timestamp. Timestamp fora da tabela
/// (madrugada, por exemplo) é descartado em silêncio, não é erro.
pub fn accrue(
    buckets: &mut [ChartBucket],
    period: Period,
    at: DateTime<Utc>,
    transaction_type: TransactionType,
    amount: Decimal,
) {
    let label = bucket_label(period, at);
    if let Some(bucket) = buckets.iter_mut().find(|b| b.name == label) {
        match transaction_type {
            TransactionType::Income => bucket.entradas += amount,
            TransactionType::Expense => bucket.saidas += amount,
        }
    }
}

/// Transação sintética de receita por categoria: id negativo do pedido,
/// nunca persistida, existe só para exibição no relatório.
pub fn synthetic_income(order: &Order, category: &str, revenue: Decimal) -> Transaction {
    Transaction {
        id: -order.id,
        transaction_type: TransactionType::Income,
        amount: revenue,
        description: format!("Receita {} (Pedido #{})", category, order.id),
        created_at: order.created_at,
    }
}

#[derive(Clone)]
pub struct ReportService {
    pool: PgPool,
    order_repo: OrderRepository,
    finance_repo: FinanceRepository,
    catalog_repo: CatalogRepository,
}

impl ReportService {
    pub fn new(
        pool: PgPool,
        order_repo: OrderRepository,
        finance_repo: FinanceRepository,
        catalog_repo: CatalogRepository,
    ) -> Self {
        Self {
            pool,
            order_repo,
            finance_repo,
            catalog_repo,
        }
    }

    /// Relatório financeiro do período. `category = None` é a visão geral;
    /// com categoria, receita e lucro vêm só dos itens daquela categoria e
    /// as despesas são as marcadas com a tag `[Categoria]` na descrição.
    pub async fn finance_report(
        &self,
        period: Period,
        reference: NaiveDate,
        category: Option<&str>,
    ) -> Result<FinanceReport, AppError> {
        let (start, end) = period_bounds(period, reference);
        let mut buckets = init_buckets(period, start, end);

        let orders = self.order_repo.orders_in_range(&self.pool, start, end).await?;
        let transactions = self.finance_repo.list_in_range(&self.pool, start, end).await?;

        let mut income_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;
        let mut profit_total = Decimal::ZERO;
        let mut final_transactions: Vec<Transaction> = Vec::new();

        match category {
            None => {
                for t in &transactions {
                    match t.transaction_type {
                        TransactionType::Income => income_total += t.amount,
                        TransactionType::Expense => expense_total += t.amount,
                    }
                    accrue(&mut buckets, period, t.created_at, t.transaction_type, t.amount);
                }
                final_transactions = transactions;

                // Lucro: pedidos pagos do período, preço de venda no momento
                // menos o custo atual do produto. Custo ausente conta 0
                // (o item inteiro vira lucro) -- simplificação assumida.
                let paid_ids: Vec<i64> = orders
                    .iter()
                    .filter(|o| o.payment_status == PaymentStatus::Pago)
                    .map(|o| o.id)
                    .collect();
                if !paid_ids.is_empty() {
                    let items = self.order_repo.items_of_orders(&self.pool, &paid_ids).await?;
                    for item in &items {
                        profit_total += (item.price_at_time - item.product_cost)
                            * Decimal::from(item.quantity);
                    }
                }
            }
            Some(category) => {
                let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
                if !order_ids.is_empty() {
                    let items = self.order_repo.items_of_orders(&self.pool, &order_ids).await?;

                    // receita da categoria por pedido pago
                    let mut order_income: HashMap<i64, Decimal> = HashMap::new();
                    for item in items.iter().filter(|i| i.product_category == category) {
                        let order = orders.iter().find(|o| o.id == item.order_id);
                        if let Some(order) = order {
                            if order.payment_status == PaymentStatus::Pago {
                                let quantity = Decimal::from(item.quantity);
                                let revenue = item.price_at_time * quantity;
                                let cost = item.product_cost * quantity;

                                income_total += revenue;
                                profit_total += revenue - cost;
                                *order_income.entry(item.order_id).or_default() += revenue;
                            }
                        }
                    }

                    for (order_id, revenue) in order_income {
                        if let Some(order) = orders.iter().find(|o| o.id == order_id) {
                            let synthetic = synthetic_income(order, category, revenue);
                            accrue(&mut buckets, period, synthetic.created_at, TransactionType::Income, revenue);
                            final_transactions.push(synthetic);
                        }
                    }
                }

                for t in &transactions {
                    if t.transaction_type == TransactionType::Expense && t.has_category_tag(category) {
                        expense_total += t.amount;
                        accrue(&mut buckets, period, t.created_at, TransactionType::Expense, t.amount);
                        final_transactions.push(t.clone());
                    }
                }

                final_transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }

        Ok(FinanceReport {
            income_total,
            expense_total,
            profit_total,
            buckets,
            transactions: final_transactions,
        })
    }

    /// Números da tela inicial: vendas de hoje, entradas e saídas do mês,
    /// lucro estimado do mês, estoque baixo e últimos pedidos.
    pub async fn dashboard(&self) -> Result<DashboardData, AppError> {
        let today = Utc::now().date_naive();
        let (day_start, day_end) = period_bounds(Period::Daily, today);
        let (month_start, month_end) = period_bounds(Period::Monthly, today);

        let transactions = self.finance_repo.list_all(&self.pool).await?;

        let mut daily_total = Decimal::ZERO;
        let mut monthly_total = Decimal::ZERO;
        let mut monthly_expenses = Decimal::ZERO;
        for t in &transactions {
            let in_month = t.created_at >= month_start && t.created_at < month_end;
            match t.transaction_type {
                TransactionType::Income => {
                    if in_month {
                        monthly_total += t.amount;
                    }
                    if t.created_at >= day_start && t.created_at < day_end {
                        daily_total += t.amount;
                    }
                }
                TransactionType::Expense => {
                    if in_month {
                        monthly_expenses += t.amount;
                    }
                }
            }
        }

        let paid_orders = self
            .order_repo
            .paid_orders_in_range(&self.pool, month_start, month_end)
            .await?;
        let mut profit = Decimal::ZERO;
        if !paid_orders.is_empty() {
            let ids: Vec<i64> = paid_orders.iter().map(|o| o.id).collect();
            let items = self.order_repo.items_of_orders(&self.pool, &ids).await?;
            for item in &items {
                profit += (item.price_at_time - item.product_cost) * Decimal::from(item.quantity);
            }
        }

        let low_stock = self.catalog_repo.low_stock_products(&self.pool).await?;
        let recent_orders = self.order_repo.list_with_details(&self.pool, Some(5)).await?;

        Ok(DashboardData {
            stats: DashboardSummary {
                daily_total,
                monthly_total,
                monthly_expenses,
                profit,
            },
            low_stock,
            recent_orders,
        })
    }

    /// Relatório de movimentações de estoque, com os mesmos buckets do
    /// financeiro; entradas e saídas somam quantidades, não valores.
    pub async fn stock_report(
        &self,
        period: Period,
        reference: NaiveDate,
        category: Option<&str>,
        product_id: Option<i64>,
    ) -> Result<StockReport, AppError> {
        let (start, end) = period_bounds(period, reference);
        let mut buckets = init_buckets(period, start, end);

        let movements = self
            .catalog_repo
            .movements_in_range(&self.pool, start, end)
            .await?;
        let movements: Vec<_> = movements
            .into_iter()
            .filter(|m| category.map_or(true, |c| m.product_category == c))
            .filter(|m| product_id.map_or(true, |id| m.product_id == id))
            .collect();

        let mut total_in: i64 = 0;
        let mut total_out: i64 = 0;
        for m in &movements {
            let kind = match m.movement_type {
                crate::models::catalog::MovementType::In => {
                    total_in += i64::from(m.quantity);
                    TransactionType::Income
                }
                crate::models::catalog::MovementType::Out => {
                    total_out += i64::from(m.quantity);
                    TransactionType::Expense
                }
            };
            accrue(&mut buckets, period, m.created_at, kind, Decimal::from(m.quantity));
        }

        Ok(StockReport {
            total_in,
            total_out,
            buckets,
            movements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dia_tem_treze_buckets_de_hora_zerados() {
        let (start, end) = period_bounds(Period::Daily, date(2024, 7, 15));
        let buckets = init_buckets(Period::Daily, start, end);
        assert_eq!(buckets.len(), 13);
        assert_eq!(buckets.first().unwrap().name, "08:00");
        assert_eq!(buckets.last().unwrap().name, "20:00");
        for b in &buckets {
            assert_eq!(b.entradas, Decimal::ZERO);
            assert_eq!(b.saidas, Decimal::ZERO);
        }
    }

    #[test]
    fn semana_comeca_na_segunda_e_tem_sete_dias() {
        // 2024-07-18 é quinta; a semana vai de 15/07 (segunda) a 22/07 exclusivo.
        let (start, end) = period_bounds(Period::Weekly, date(2024, 7, 18));
        assert_eq!(start.date_naive(), date(2024, 7, 15));
        assert_eq!(end.date_naive(), date(2024, 7, 22));
        let buckets = init_buckets(Period::Weekly, start, end);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].name, "15/07");
        assert_eq!(buckets[6].name, "21/07");
    }

    #[test]
    fn mes_cobre_o_calendario_inteiro() {
        let (start, end) = period_bounds(Period::Monthly, date(2024, 2, 10));
        assert_eq!(start.date_naive(), date(2024, 2, 1));
        assert_eq!(end.date_naive(), date(2024, 3, 1));
        // 2024 é bissexto
        assert_eq!(init_buckets(Period::Monthly, start, end).len(), 29);
    }

    #[test]
    fn virada_de_ano_no_periodo_mensal() {
        let (start, end) = period_bounds(Period::Monthly, date(2024, 12, 25));
        assert_eq!(start.date_naive(), date(2024, 12, 1));
        assert_eq!(end.date_naive(), date(2025, 1, 1));
    }

    #[test]
    fn acumula_no_bucket_da_hora() {
        let (start, end) = period_bounds(Period::Daily, date(2024, 7, 15));
        let mut buckets = init_buckets(Period::Daily, start, end);
        let at = Utc.with_ymd_and_hms(2024, 7, 15, 9, 30, 0).unwrap();
        accrue(&mut buckets, Period::Daily, at, TransactionType::Income, dec!(50));
        accrue(&mut buckets, Period::Daily, at, TransactionType::Expense, dec!(20));
        let bucket = buckets.iter().find(|b| b.name == "09:00").unwrap();
        assert_eq!(bucket.entradas, dec!(50));
        assert_eq!(bucket.saidas, dec!(20));
    }

    #[test]
    fn timestamp_fora_da_tabela_e_descartado() {
        let (start, end) = period_bounds(Period::Daily, date(2024, 7, 15));
        let mut buckets = init_buckets(Period::Daily, start, end);
        // 03:00 não existe na grade 08..20
        let at = Utc.with_ymd_and_hms(2024, 7, 15, 3, 0, 0).unwrap();
        accrue(&mut buckets, Period::Daily, at, TransactionType::Income, dec!(99));
        assert!(buckets.iter().all(|b| b.entradas == Decimal::ZERO));
    }

    #[test]
    fn transacao_sintetica_tem_id_negativo_do_pedido() {
        let order = Order {
            id: 42,
            customer_id: None,
            total_amount: dec!(100),
            payment_method: "Pix".into(),
            payment_status: PaymentStatus::Pago,
            delivery_status: crate::models::order::DeliveryStatus::Entregue,
            created_at: Utc.with_ymd_and_hms(2024, 7, 15, 10, 0, 0).unwrap(),
        };
        let t = synthetic_income(&order, "Gás", dec!(80));
        assert_eq!(t.id, -42);
        assert_eq!(t.amount, dec!(80));
        assert_eq!(t.description, "Receita Gás (Pedido #42)");
        assert_eq!(t.transaction_type, TransactionType::Income);
    }
}
