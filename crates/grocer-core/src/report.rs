//! # Reports
//!
//! Read-side aggregations over the catalog and the sale history.
//!
//! ## Report Catalogue
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  overview()          totals, low-stock count, last five sales          │
//! │  sales_history()     every sale with readable line labels              │
//! │  product_sales()     units sold per product name in a period           │
//! │  finances()          revenue per day / month / year bucket             │
//! │                                                                         │
//! │  Inputs:  &StoreState, now: DateTime<Utc>                              │
//! │  Output:  plain data; formatting is the caller's job                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Calendar comparisons are done in UTC. Grouped results keep the order in
//! which each key was first met while walking the sale history.

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::state::StoreState;
use crate::types::{PaymentMethod, Sale};
use crate::UNKNOWN_PRODUCT_LABEL;

/// How many sales the overview lists.
pub const RECENT_SALES_LIMIT: usize = 5;

// =============================================================================
// Overview
// =============================================================================

/// Dashboard headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_products: usize,
    pub total_sales: usize,
    #[ts(type = "number")]
    pub total_revenue: Money,
    pub low_stock_count: usize,
    /// Newest first.
    pub recent_sales: Vec<Sale>,
}

/// Builds the dashboard overview. A product is low on stock when its stock
/// is strictly below `low_stock_threshold`.
pub fn overview(state: &StoreState, low_stock_threshold: i64) -> Overview {
    Overview {
        total_products: state.products.len(),
        total_sales: state.sales.len(),
        total_revenue: state.sales.iter().map(|s| s.total).sum(),
        low_stock_count: state.low_stock_count(low_stock_threshold),
        recent_sales: state
            .sales
            .iter()
            .rev()
            .take(RECENT_SALES_LIMIT)
            .cloned()
            .collect(),
    }
}

// =============================================================================
// Sales History
// =============================================================================

/// One row of the sales history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    /// `"<name> x <qty>"` per line, or the unknown-product label.
    pub lines: Vec<String>,
    pub total_quantity: i64,
    #[ts(type = "number")]
    pub total: Money,
    pub payment_method: PaymentMethod,
}

/// Sales in commit order, optionally filtered.
///
/// A non-empty `search` keeps sales with at least one line whose product
/// still exists and whose name contains the term (case-insensitive).
pub fn sales_history(state: &StoreState, search: &str) -> Vec<SaleSummary> {
    let needle = search.trim().to_lowercase();

    state
        .sales
        .iter()
        .filter(|sale| {
            needle.is_empty()
                || sale.items.iter().any(|item| {
                    state
                        .product(&item.product_id)
                        .is_some_and(|p| p.name.to_lowercase().contains(&needle))
                })
        })
        .map(|sale| SaleSummary {
            id: sale.id.clone(),
            date: sale.date,
            lines: sale
                .items
                .iter()
                .map(|item| match state.product(&item.product_id) {
                    Some(product) => format!("{} x {}", product.name, item.quantity),
                    None => UNKNOWN_PRODUCT_LABEL.to_string(),
                })
                .collect(),
            total_quantity: sale.total_quantity(),
            total: sale.total,
            payment_method: sale.payment_method,
        })
        .collect()
}

// =============================================================================
// Product Sales Report
// =============================================================================

/// Window for the product sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Same calendar day as now.
    #[default]
    Daily,
    /// The last seven days.
    Weekly,
    /// Same calendar month and year as now.
    Monthly,
}

impl ReportPeriod {
    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            ReportPeriod::Daily => date.date_naive() == now.date_naive(),
            ReportPeriod::Weekly => date >= now - Duration::days(7),
            ReportPeriod::Monthly => date.year() == now.year() && date.month() == now.month(),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::Daily => write!(f, "daily"),
            ReportPeriod::Weekly => write!(f, "weekly"),
            ReportPeriod::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(ReportPeriod::Daily),
            "weekly" | "week" => Ok(ReportPeriod::Weekly),
            "monthly" | "month" => Ok(ReportPeriod::Monthly),
            other => Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: format!("'{}' is not one of daily, weekly, monthly", other),
            }),
        }
    }
}

/// Units sold for one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
}

/// Sums quantities per product name over sales inside `period`.
///
/// Lines whose product no longer exists are skipped. Products sharing a
/// name share a row.
pub fn product_sales(
    state: &StoreState,
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> Vec<ProductSales> {
    let mut rows: Vec<ProductSales> = Vec::new();

    for sale in state.sales.iter().filter(|s| period.contains(s.date, now)) {
        for item in &sale.items {
            let Some(product) = state.product(&item.product_id) else {
                continue;
            };
            match rows.iter_mut().find(|r| r.name == product.name) {
                Some(row) => row.quantity += item.quantity,
                None => rows.push(ProductSales {
                    name: product.name.clone(),
                    quantity: item.quantity,
                }),
            }
        }
    }

    rows
}

// =============================================================================
// Finance Report
// =============================================================================

/// Window and bucket size for the finance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum FinancePeriod {
    /// Last 7 days, one bucket per day.
    #[default]
    Weekly,
    /// Last month, one bucket per calendar month.
    Monthly,
    /// Last year, one bucket per year.
    Yearly,
}

impl FinancePeriod {
    /// Earliest sale date included for a report generated at `now`.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let months_back = match self {
            FinancePeriod::Weekly => return now - Duration::days(7),
            FinancePeriod::Monthly => 1,
            FinancePeriod::Yearly => 12,
        };
        now.checked_sub_months(Months::new(months_back))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Bucket label for a sale date: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    pub fn bucket(&self, date: DateTime<Utc>) -> String {
        match self {
            FinancePeriod::Weekly => date.format("%Y-%m-%d").to_string(),
            FinancePeriod::Monthly => date.format("%Y-%m").to_string(),
            FinancePeriod::Yearly => date.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for FinancePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinancePeriod::Weekly => write!(f, "weekly"),
            FinancePeriod::Monthly => write!(f, "monthly"),
            FinancePeriod::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for FinancePeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(FinancePeriod::Weekly),
            "monthly" | "month" => Ok(FinancePeriod::Monthly),
            "yearly" | "year" => Ok(FinancePeriod::Yearly),
            other => Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: format!("'{}' is not one of weekly, monthly, yearly", other),
            }),
        }
    }
}

/// Revenue for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct RevenueBucket {
    pub label: String,
    #[ts(type = "number")]
    pub total: Money,
}

/// Revenue report for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinanceReport {
    pub period: FinancePeriod,
    pub buckets: Vec<RevenueBucket>,
    #[ts(type = "number")]
    pub total_revenue: Money,
    /// Total divided by the number of buckets; zero with no buckets.
    #[ts(type = "number")]
    pub average_revenue: Money,
}

/// Groups revenue of sales dated on or after the period start.
pub fn finances(state: &StoreState, period: FinancePeriod, now: DateTime<Utc>) -> FinanceReport {
    let start = period.start(now);
    let mut buckets: Vec<RevenueBucket> = Vec::new();

    for sale in state.sales.iter().filter(|s| s.date >= start) {
        let label = period.bucket(sale.date);
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.total += sale.total,
            None => buckets.push(RevenueBucket {
                label,
                total: sale.total,
            }),
        }
    }

    let total_revenue: Money = buckets.iter().map(|b| b.total).sum();

    FinanceReport {
        period,
        average_revenue: total_revenue.average_over(buckets.len()),
        total_revenue,
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, SaleLineItem};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn product(id: &str, name: &str, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::from_cents(100),
            stock,
            barcode: String::new(),
        }
    }

    fn sale(id: &str, date: DateTime<Utc>, items: Vec<(&str, i64)>, total_cents: i64) -> Sale {
        Sale {
            id: id.to_string(),
            date,
            items: items
                .into_iter()
                .map(|(p, q)| SaleLineItem::new(p, q))
                .collect(),
            total: Money::from_cents(total_cents),
            payment_method: PaymentMethod::Cash,
        }
    }

    fn fixture() -> StoreState {
        StoreState {
            products: vec![
                product("p1", "Milk", 12),
                product("p2", "Bread", 3),
                product("p3", "Eggs", 9),
            ],
            sales: vec![
                sale("s1", at(2024, 4, 20, 9), vec![("p1", 1)], 250),
                sale("s2", at(2024, 5, 27, 9), vec![("p2", 2), ("gone", 1)], 400),
                sale("s3", at(2024, 5, 31, 8), vec![("p1", 3)], 750),
                sale("s4", at(2024, 5, 31, 12), vec![("p3", 1), ("p1", 1)], 500),
            ],
            ..StoreState::default()
        }
    }

    fn now() -> DateTime<Utc> {
        at(2024, 5, 31, 18)
    }

    #[test]
    fn test_overview() {
        let state = fixture();
        let stats = overview(&state, 10);

        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_sales, 4);
        assert_eq!(stats.total_revenue.cents(), 1900);
        assert_eq!(stats.low_stock_count, 2);

        let ids: Vec<_> = stats.recent_sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s4", "s3", "s2", "s1"]);
    }

    #[test]
    fn test_overview_limits_recent_sales() {
        let mut state = fixture();
        for i in 0..6 {
            state.sales.push(sale(&format!("x{i}"), now(), vec![("p1", 1)], 100));
        }

        let stats = overview(&state, 10);
        assert_eq!(stats.recent_sales.len(), RECENT_SALES_LIMIT);
        assert_eq!(stats.recent_sales[0].id, "x5");
    }

    #[test]
    fn test_sales_history_labels_unknown_products() {
        let state = fixture();
        let rows = sales_history(&state, "");

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].lines, vec!["Bread x 2", "Unknown Product"]);
        assert_eq!(rows[1].total_quantity, 3);
    }

    #[test]
    fn test_sales_history_search() {
        let state = fixture();

        let ids: Vec<_> = sales_history(&state, "MILK")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["s1", "s3", "s4"]);

        // Deleted products never match.
        assert!(sales_history(&state, "gone").is_empty());
    }

    #[test]
    fn test_product_sales_daily() {
        let state = fixture();
        let rows = product_sales(&state, ReportPeriod::Daily, now());

        assert_eq!(
            rows,
            vec![
                ProductSales {
                    name: "Milk".to_string(),
                    quantity: 4
                },
                ProductSales {
                    name: "Eggs".to_string(),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn test_product_sales_weekly_and_monthly() {
        let state = fixture();

        let weekly = product_sales(&state, ReportPeriod::Weekly, now());
        assert_eq!(weekly[0].name, "Bread");
        assert_eq!(weekly.len(), 3);

        let monthly = product_sales(&state, ReportPeriod::Monthly, now());
        let milk = monthly.iter().find(|r| r.name == "Milk").unwrap();
        assert_eq!(milk.quantity, 4);

        let april = product_sales(&state, ReportPeriod::Monthly, at(2024, 4, 30, 0));
        assert_eq!(april, vec![ProductSales { name: "Milk".to_string(), quantity: 1 }]);
    }

    #[test]
    fn test_finances_weekly() {
        let state = fixture();
        let report = finances(&state, FinancePeriod::Weekly, now());

        let labels: Vec<_> = report.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-05-27", "2024-05-31"]);
        assert_eq!(report.buckets[1].total.cents(), 1250);
        assert_eq!(report.total_revenue.cents(), 1650);
        assert_eq!(report.average_revenue.cents(), 825);
    }

    #[test]
    fn test_finances_monthly_and_yearly() {
        let state = fixture();

        let monthly = finances(&state, FinancePeriod::Monthly, now());
        assert_eq!(monthly.buckets.len(), 1);
        assert_eq!(monthly.buckets[0].label, "2024-05");

        let yearly = finances(&state, FinancePeriod::Yearly, now());
        assert_eq!(yearly.buckets.len(), 1);
        assert_eq!(yearly.buckets[0].label, "2024");
        assert_eq!(yearly.total_revenue.cents(), 1900);
    }

    #[test]
    fn test_finances_empty() {
        let report = finances(&StoreState::default(), FinancePeriod::Yearly, now());
        assert!(report.buckets.is_empty());
        assert_eq!(report.average_revenue, Money::zero());
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("Weekly".parse::<ReportPeriod>().unwrap(), ReportPeriod::Weekly);
        assert_eq!("year".parse::<FinancePeriod>().unwrap(), FinancePeriod::Yearly);
        assert!("hourly".parse::<FinancePeriod>().is_err());
    }
}
