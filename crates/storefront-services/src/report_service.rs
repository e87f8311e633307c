//! # Report Service
//!
//! The reporting aggregator: earnings and best-seller statistics derived
//! from completed orders, over a day, a month, or all time (top-N).
//!
//! ## Caching
//! Daily and monthly reports are cached keyed by their exact parameters
//! with a fixed 10-minute TTL; `top_selling` is NOT cached (reference
//! behavior). A cache hit returns the previously computed report verbatim
//! without touching the order history, and writes never invalidate
//! entries - an order completing inside the TTL window shows up only after
//! expiry.
//!
//! ## Aggregation
//! Earnings are summed as `Decimal` in this service over fetched line rows
//! rather than in SQL, keeping the arithmetic exact. The best seller is the
//! product with the highest summed quantity; ties break toward the LOWEST
//! product id, a deterministic rule the tests pin down.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use storefront_core::error::ValidationError;
use storefront_core::validation::validate_month;
use storefront_core::{CoreResult, Report};
use storefront_db::{CompletedLine, Database};

use crate::report_cache::{ReportCache, ReportKey};

/// Fixed time-to-live for cached daily/monthly reports.
pub const REPORT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Earnings and best-seller reporting over completed orders.
#[derive(Clone)]
pub struct ReportService {
    db: Database,
    cache: Arc<ReportCache>,
}

impl ReportService {
    /// Creates the service with the standard 10-minute cache TTL.
    pub fn new(db: Database) -> Self {
        Self::with_cache_ttl(db, REPORT_CACHE_TTL)
    }

    /// Creates the service with a custom cache TTL (tests exercise expiry
    /// without waiting ten minutes).
    pub fn with_cache_ttl(db: Database, ttl: Duration) -> Self {
        ReportService {
            db,
            cache: Arc::new(ReportCache::new(ttl)),
        }
    }

    /// Daily earnings report for a UTC date.
    ///
    /// Sums `quantity × unit_price` over items of orders completed with an
    /// order date inside `[midnight, next midnight)` UTC, and finds the
    /// product with the highest summed quantity that day. A day with no
    /// completed orders yields the zero report (`"N/A"` product), not an
    /// error.
    pub async fn daily_earnings(&self, date: NaiveDate) -> CoreResult<Report> {
        let key = ReportKey::Daily(date);
        if let Some(report) = self.cache.get(&key).await {
            return Ok(report);
        }

        let start = date.and_time(NaiveTime::MIN).and_utc();
        let next_day = date.succ_opt().ok_or_else(|| ValidationError::OutOfRange {
            field: "date".to_string(),
            min: NaiveDate::MIN.to_string(),
            max: NaiveDate::MAX.pred_opt().unwrap_or(NaiveDate::MAX).to_string(),
        })?;
        let end = next_day.and_time(NaiveTime::MIN).and_utc();

        let lines = self.db.reports().completed_lines_between(start, end).await?;
        let report = aggregate_window(date, &lines);

        info!(%date, earnings = %report.total_earnings, "Computed daily earnings report");

        self.cache.insert(key, report.clone()).await;
        Ok(report)
    }

    /// Monthly earnings report for a month/year pair.
    ///
    /// Identical aggregation to [`Self::daily_earnings`], windowed over the
    /// calendar month; the report is dated the first of the month.
    pub async fn monthly_earnings(&self, month: u32, year: i32) -> CoreResult<Report> {
        validate_month(month)?;

        let key = ReportKey::Monthly { month, year };
        if let Some(report) = self.cache.get(&key).await {
            return Ok(report);
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "year".to_string(),
                min: NaiveDate::MIN.year().to_string(),
                max: NaiveDate::MAX.year().to_string(),
            }
        })?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "year".to_string(),
            min: NaiveDate::MIN.year().to_string(),
            max: NaiveDate::MAX.year().to_string(),
        })?;

        let start = first.and_time(NaiveTime::MIN).and_utc();
        let end = next_first.and_time(NaiveTime::MIN).and_utc();

        let lines = self.db.reports().completed_lines_between(start, end).await?;
        let report = aggregate_window(first, &lines);

        info!(month, year, earnings = %report.total_earnings, "Computed monthly earnings report");

        self.cache.insert(key, report.clone()).await;
        Ok(report)
    }

    /// Top `count` products by completed-order quantity across all time,
    /// each annotated with its own earnings contribution, descending by
    /// quantity (ties toward the lowest product id).
    ///
    /// Not cached: every call reads the order history.
    pub async fn top_selling(&self, count: usize) -> CoreResult<Vec<Report>> {
        let lines = self.db.reports().completed_lines().await?;
        let today = Utc::now().date_naive();

        // BTreeMap keeps product ids sorted, which pins the tiebreak.
        let mut per_product: BTreeMap<&str, (&str, i64, Decimal)> = BTreeMap::new();
        for line in &lines {
            let entry = per_product
                .entry(line.product_id.as_str())
                .or_insert((line.product_name.as_str(), 0, Decimal::ZERO));
            entry.1 += line.quantity;
            entry.2 += Decimal::from(line.quantity) * line.unit_price;
        }

        let mut ranked: Vec<(&str, i64, Decimal)> = per_product.into_values().collect();
        // Stable sort on a list already ordered by product id: equal
        // quantities keep the lowest id first.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(count);

        debug!(products = ranked.len(), "Computed top-selling report");

        Ok(ranked
            .into_iter()
            .map(|(name, quantity, earnings)| Report {
                report_date: today,
                total_earnings: earnings,
                most_selling_product_name: name.to_string(),
                most_selling_product_quantity: quantity,
            })
            .collect())
    }
}

/// Folds a window of completed lines into a report.
///
/// Ties on the best-seller break toward the lowest product id: the map
/// iterates ids in ascending order and only a strictly greater quantity
/// replaces the current best.
fn aggregate_window(report_date: NaiveDate, lines: &[CompletedLine]) -> Report {
    if lines.is_empty() {
        return Report::empty(report_date);
    }

    let mut total = Decimal::ZERO;
    let mut per_product: BTreeMap<&str, (&str, i64)> = BTreeMap::new();
    for line in lines {
        total += Decimal::from(line.quantity) * line.unit_price;
        let entry = per_product
            .entry(line.product_id.as_str())
            .or_insert((line.product_name.as_str(), 0));
        entry.1 += line.quantity;
    }

    let mut best_name = "";
    let mut best_quantity = 0;
    for (name, quantity) in per_product.into_values() {
        if quantity > best_quantity {
            best_name = name;
            best_quantity = quantity;
        }
    }

    Report {
        report_date,
        total_earnings: total,
        most_selling_product_name: best_name.to_string(),
        most_selling_product_quantity: best_quantity,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        line, place_order_with_status, seed_attributes, seed_product, seed_user, test_db,
    };
    use storefront_core::{CoreError, OrderStatus};

    #[tokio::test]
    async fn test_empty_day_yields_zero_report_not_error() {
        let db = test_db().await;
        let service = ReportService::new(db);

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let report = service.daily_earnings(date).await.unwrap();

        assert_eq!(report.report_date, date);
        assert_eq!(report.total_earnings, Decimal::ZERO);
        assert_eq!(report.most_selling_product_name, "N/A");
        assert_eq!(report.most_selling_product_quantity, 0);
    }

    #[tokio::test]
    async fn test_daily_aggregation_counts_completed_only() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let user = seed_user(&db, "daily@example.com").await;
        let tent = seed_product(&db, &attrs, "Tent", "300.00", 50).await;
        let lamp = seed_product(&db, &attrs, "Lamp", "45.00", 50).await;
        let service = ReportService::new(db.clone());

        // 2 × 300.00 completed, 5 × 45.00 completed, 9 × 45.00 pending
        place_order_with_status(
            &db,
            &user.id,
            &[line(&tent.id, 2, "300.00")],
            OrderStatus::Completed,
        )
        .await;
        place_order_with_status(
            &db,
            &user.id,
            &[line(&lamp.id, 5, "45.00")],
            OrderStatus::Completed,
        )
        .await;
        place_order_with_status(
            &db,
            &user.id,
            &[line(&lamp.id, 9, "45.00")],
            OrderStatus::Pending,
        )
        .await;

        let today = Utc::now().date_naive();
        let report = service.daily_earnings(today).await.unwrap();

        // 600.00 + 225.00
        assert_eq!(report.total_earnings, Decimal::new(82500, 2));
        assert_eq!(report.most_selling_product_name, "Lamp");
        assert_eq!(report.most_selling_product_quantity, 5);
    }

    #[tokio::test]
    async fn test_best_seller_tie_breaks_to_lowest_product_id() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let user = seed_user(&db, "tie@example.com").await;
        let a = seed_product(&db, &attrs, "Alpha", "10.00", 50).await;
        let b = seed_product(&db, &attrs, "Beta", "10.00", 50).await;
        let service = ReportService::new(db.clone());

        // Same quantity for both products.
        place_order_with_status(
            &db,
            &user.id,
            &[line(&a.id, 6, "10.00"), line(&b.id, 6, "10.00")],
            OrderStatus::Completed,
        )
        .await;

        let expected = if a.id < b.id { &a.name } else { &b.name };

        let today = Utc::now().date_naive();
        let report = service.daily_earnings(today).await.unwrap();
        assert_eq!(&report.most_selling_product_name, expected);
        assert_eq!(report.most_selling_product_quantity, 6);
    }

    #[tokio::test]
    async fn test_daily_cache_serves_stale_report_within_ttl() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let user = seed_user(&db, "stale@example.com").await;
        let product = seed_product(&db, &attrs, "Chair", "60.00", 50).await;
        let service = ReportService::new(db.clone());

        place_order_with_status(
            &db,
            &user.id,
            &[line(&product.id, 1, "60.00")],
            OrderStatus::Completed,
        )
        .await;

        let today = Utc::now().date_naive();
        let first = service.daily_earnings(today).await.unwrap();

        // A new completed order lands inside the TTL window...
        place_order_with_status(
            &db,
            &user.id,
            &[line(&product.id, 4, "60.00")],
            OrderStatus::Completed,
        )
        .await;

        // ...and the second call returns the first report verbatim.
        let second = service.daily_earnings(today).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(second.total_earnings, Decimal::new(6000, 2));
    }

    #[tokio::test]
    async fn test_daily_cache_expiry_observes_new_orders() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let user = seed_user(&db, "expiry@example.com").await;
        let product = seed_product(&db, &attrs, "Desk", "150.00", 50).await;
        let service = ReportService::with_cache_ttl(db.clone(), Duration::from_millis(20));

        let today = Utc::now().date_naive();
        let first = service.daily_earnings(today).await.unwrap();
        assert_eq!(first.total_earnings, Decimal::ZERO);

        place_order_with_status(
            &db,
            &user.id,
            &[line(&product.id, 1, "150.00")],
            OrderStatus::Completed,
        )
        .await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        let second = service.daily_earnings(today).await.unwrap();
        assert_eq!(second.total_earnings, Decimal::new(15000, 2));
    }

    #[tokio::test]
    async fn test_monthly_aggregation_and_validation() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let user = seed_user(&db, "month@example.com").await;
        let product = seed_product(&db, &attrs, "Shelf", "75.00", 50).await;
        let service = ReportService::new(db.clone());

        place_order_with_status(
            &db,
            &user.id,
            &[line(&product.id, 2, "75.00")],
            OrderStatus::Completed,
        )
        .await;

        let now = Utc::now();
        let report = service
            .monthly_earnings(now.month(), now.year())
            .await
            .unwrap();
        assert_eq!(report.total_earnings, Decimal::new(15000, 2));
        assert_eq!(report.most_selling_product_name, "Shelf");

        // A different month is empty.
        let other_month = if now.month() == 1 { 2 } else { 1 };
        let empty = service
            .monthly_earnings(other_month, 1999)
            .await
            .unwrap();
        assert_eq!(empty.total_earnings, Decimal::ZERO);
        assert_eq!(empty.most_selling_product_name, "N/A");

        // Month bounds are validated.
        let err = service.monthly_earnings(0, 2024).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        let err = service.monthly_earnings(13, 2024).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_top_selling_ranks_and_annotates_earnings() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let user = seed_user(&db, "top@example.com").await;
        let high = seed_product(&db, &attrs, "High", "10.00", 99).await;
        let mid = seed_product(&db, &attrs, "Mid", "20.00", 99).await;
        let low = seed_product(&db, &attrs, "Low", "30.00", 99).await;
        let service = ReportService::new(db.clone());

        place_order_with_status(
            &db,
            &user.id,
            &[
                line(&high.id, 9, "10.00"),
                line(&mid.id, 5, "20.00"),
                line(&low.id, 2, "30.00"),
            ],
            OrderStatus::Completed,
        )
        .await;

        let top = service.top_selling(2).await.unwrap();
        assert_eq!(top.len(), 2);

        assert_eq!(top[0].most_selling_product_name, "High");
        assert_eq!(top[0].most_selling_product_quantity, 9);
        assert_eq!(top[0].total_earnings, Decimal::new(9000, 2));

        assert_eq!(top[1].most_selling_product_name, "Mid");
        assert_eq!(top[1].most_selling_product_quantity, 5);
        assert_eq!(top[1].total_earnings, Decimal::new(10000, 2));
    }

    #[tokio::test]
    async fn test_top_selling_is_not_cached() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let user = seed_user(&db, "nocache@example.com").await;
        let product = seed_product(&db, &attrs, "Rug", "55.00", 99).await;
        let service = ReportService::new(db.clone());

        assert!(service.top_selling(5).await.unwrap().is_empty());

        // A completed order is visible immediately - no TTL in the way.
        place_order_with_status(
            &db,
            &user.id,
            &[line(&product.id, 3, "55.00")],
            OrderStatus::Completed,
        )
        .await;

        let top = service.top_selling(5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].most_selling_product_quantity, 3);
    }
}
