//! # Report Commands
//!
//! Dashboard overview, product sales and finances. All three read a
//! snapshot of the store and never write.

use chrono::Utc;
use clap::Subcommand;

use super::AppContext;
use crate::error::ApiError;
use grocer_core::report::{self, FinanceReport, Overview, ProductSales};
use grocer_core::{FinancePeriod, ReportPeriod};

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Totals, low stock and the latest sales
    Overview,
    /// Units sold per product
    Products {
        /// daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        period: ReportPeriod,
    },
    /// Revenue grouped by day, month or year
    Finances {
        /// weekly, monthly or yearly
        #[arg(long, default_value = "weekly")]
        period: FinancePeriod,
    },
}

pub async fn run(ctx: &AppContext, command: ReportCommand) -> Result<String, ApiError> {
    let state = ctx.store.snapshot().await;

    match command {
        ReportCommand::Overview => {
            let overview = report::overview(&state, ctx.config.low_stock_threshold);
            ctx.output(&overview, |o| overview_text(ctx, o))
        }
        ReportCommand::Products { period } => {
            let rows = report::product_sales(&state, period, Utc::now());
            ctx.output(&rows, |rows| product_sales_text(period, rows))
        }
        ReportCommand::Finances { period } => {
            let finances = report::finances(&state, period, Utc::now());
            ctx.output(&finances, |r| finances_text(ctx, r))
        }
    }
}

fn overview_text(ctx: &AppContext, overview: &Overview) -> String {
    let mut lines = vec![
        format!("Products:      {}", overview.total_products),
        format!("Sales:         {}", overview.total_sales),
        format!("Revenue:       {}", ctx.money(overview.total_revenue)),
        format!(
            "Low stock:     {} (below {})",
            overview.low_stock_count, ctx.config.low_stock_threshold
        ),
    ];

    if !overview.recent_sales.is_empty() {
        lines.push(String::new());
        lines.push("Recent sales:".to_string());
        for sale in &overview.recent_sales {
            lines.push(format!(
                "  {}  {:>10}  {}",
                sale.date.format("%Y-%m-%d %H:%M"),
                ctx.money(sale.total),
                sale.payment_method
            ));
        }
    }

    lines.join("\n")
}

fn product_sales_text(period: ReportPeriod, rows: &[ProductSales]) -> String {
    if rows.is_empty() {
        return format!("No {} sales", period);
    }

    let mut lines = vec![format!("{:<30}  {:>8}", "PRODUCT", "SOLD")];
    lines.extend(
        rows.iter()
            .map(|r| format!("{:<30}  {:>8}", r.name, r.quantity)),
    );
    lines.join("\n")
}

fn finances_text(ctx: &AppContext, report: &FinanceReport) -> String {
    let mut lines: Vec<String> = report
        .buckets
        .iter()
        .map(|b| format!("{:<12}  {:>12}", b.label, ctx.money(b.total)))
        .collect();

    lines.push(format!(
        "{:<12}  {:>12}",
        "Total",
        ctx.money(report.total_revenue)
    ));
    lines.push(format!(
        "{:<12}  {:>12}",
        "Average",
        ctx.money(report.average_revenue)
    ));
    lines.join("\n")
}
