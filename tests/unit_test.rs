mod helpers;

use chrono::{Datelike, NaiveDate};
use gold_tracker::api::{ErrorResponse, StatisticsData};
use gold_tracker::database::DatabaseError;
use gold_tracker::error::{AppError, RepositoryError};
use gold_tracker::models::*;
use gold_tracker::services::price_provider_service::{aggregate_by, compute_statistics};
use gold_tracker::services::price_tracker_service::*;
use helpers::*;

fn record(id: i64, date: NaiveDate, carat_22: f64, carat_24: f64) -> GoldPrice {
    let stamp = date.and_hms_opt(0, 0, 0).expect("valid time");
    GoldPrice {
        id,
        date,
        gold_ounce: carat_24 * 31.1035,
        carat_24_1gram: carat_24,
        carat_22_1gram: carat_22,
        carat_22_8grams: carat_22 * 8.0,
        carat_21_1gram: 0.0,
        created_at: stamp,
        updated_at: stamp,
    }
}

// ============================================================================
// Change classification
// ============================================================================

#[test]
fn test_percentage_change() {
    assert_close(percentage_change(100.0, 106.0), 6.0);
    assert_close(percentage_change(200.0, 150.0), -25.0);
    // Zero base never divides
    assert_eq!(percentage_change(0.0, 150.0), 0.0);
}

#[test]
fn test_round2_folds_negative_zero() {
    assert_eq!(round2(3.14159), 3.14);
    assert_eq!(round2(-6.006), -6.01);

    let folded = round2(-0.001);
    assert_eq!(folded, 0.0);
    assert!(folded.is_sign_positive());
}

#[test]
fn test_classify_change_thresholds_are_inclusive() {
    assert_eq!(classify_change(-5.0), (AlertDirection::Decrease, true));
    assert_eq!(classify_change(-4.99), (AlertDirection::Decrease, false));
    assert_eq!(classify_change(10.0), (AlertDirection::Increase, true));
    assert_eq!(classify_change(9.99), (AlertDirection::Increase, false));
    assert_eq!(classify_change(-12.5), (AlertDirection::Decrease, true));
}

#[test]
fn test_classify_zero_change_is_non_critical_decrease() {
    assert_eq!(classify_change(0.0), (AlertDirection::Decrease, false));
}

#[test]
fn test_build_tracking_fields() {
    let base = record(1, date(2024, 12, 24), 100.0, 110.0);
    let current = record(2, date(2024, 12, 31), 94.0, 120.0);

    let tracking = build_tracking(PeriodType::Week, Carat::K22, &base, &current);
    assert_eq!(tracking.base_price, 100.0);
    assert_eq!(tracking.current_price, 94.0);
    assert_close(tracking.price_change, -6.0);
    assert_eq!(tracking.percentage_change, -6.0);
    assert_eq!(tracking.alert_type, AlertDirection::Decrease);
    assert!(tracking.is_critical);
    assert_eq!(tracking.days_tracked, 7);

    // Same records, 24 carat column
    let tracking = build_tracking(PeriodType::Week, Carat::K24, &base, &current);
    assert_eq!(tracking.base_price, 110.0);
    assert_eq!(tracking.current_price, 120.0);
    assert_eq!(tracking.percentage_change, 9.09);
    assert_eq!(tracking.alert_type, AlertDirection::Increase);
    assert!(!tracking.is_critical);
}

#[test]
fn test_criticality_uses_unrounded_change() {
    let base = record(1, date(2024, 12, 24), 10000.0, 10000.0);

    // -4.996% reports as -5.00 but stays below the threshold
    let near_drop = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 31), 9500.4, 10000.0));
    assert_eq!(near_drop.percentage_change, -5.0);
    assert_eq!(near_drop.alert_type, AlertDirection::Decrease);
    assert!(!near_drop.is_critical);
    assert_eq!(tracking_alert(&near_drop).severity, Severity::Info);
    assert_eq!(tracking_alert(&near_drop).message, "Weekly change: -5.00%");

    // +9.996% reports as +10.00 but stays below the threshold
    let near_spike = build_tracking(PeriodType::Month, Carat::K22, &base, &record(2, date(2024, 12, 31), 10999.6, 10000.0));
    assert_eq!(near_spike.percentage_change, 10.0);
    assert_eq!(near_spike.alert_type, AlertDirection::Increase);
    assert!(!near_spike.is_critical);

    // A tiny rise rounds to zero but keeps its direction
    let tiny = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 31), 10000.1, 10000.0));
    assert_eq!(tiny.percentage_change, 0.0);
    assert_eq!(tiny.alert_type, AlertDirection::Increase);

    // Exact boundaries are still critical
    let exact_drop = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 31), 9500.0, 10000.0));
    assert!(exact_drop.is_critical);
    let exact_spike = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 31), 11000.0, 10000.0));
    assert!(exact_spike.is_critical);
}

#[test]
fn test_tracking_alert_messages() {
    let base = record(1, date(2024, 12, 1), 100.0, 100.0);

    let drop = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 8), 94.0, 100.0));
    let alert = tracking_alert(&drop);
    assert_eq!(alert.severity, Severity::Critical);
    assert_eq!(
        alert.message,
        "⚠️ CRITICAL ALERT: 22 Carat gold price decreased by 6.00% in the past week!"
    );

    let spike = build_tracking(PeriodType::Month, Carat::K24, &base, &record(2, date(2024, 12, 31), 100.0, 112.0));
    let alert = tracking_alert(&spike);
    assert_eq!(alert.severity, Severity::Critical);
    assert_eq!(
        alert.message,
        "🚀 CRITICAL ALERT: 24 Carat gold price increased by 12.00% in the past month!"
    );

    let mild = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 8), 106.0, 100.0));
    let alert = tracking_alert(&mild);
    assert_eq!(alert.severity, Severity::Info);
    assert_eq!(alert.message, "Weekly change: +6.00%");

    let dip = build_tracking(PeriodType::Month, Carat::K22, &base, &record(2, date(2024, 12, 31), 98.0, 100.0));
    assert_eq!(tracking_alert(&dip).message, "Monthly change: -2.00%");
}

#[test]
fn test_carat_tracking_flags_critical() {
    let base = record(1, date(2024, 12, 1), 100.0, 100.0);
    let weekly = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 8), 103.0, 100.0));
    let monthly = build_tracking(PeriodType::Month, Carat::K22, &base, &record(2, date(2024, 12, 31), 94.0, 100.0));

    let summary = carat_tracking(Carat::K22, Some(weekly), Some(monthly));
    assert_eq!(summary.alerts.len(), 2);
    assert!(summary.has_critical_alerts);

    let empty = carat_tracking(Carat::K22, None, None);
    assert!(empty.alerts.is_empty());
    assert!(!empty.has_critical_alerts);
}

// ============================================================================
// Aggregation and statistics
// ============================================================================

#[test]
fn test_aggregate_by_month_counts_and_averages() {
    let records = vec![
        record(1, date(2024, 1, 5), 100.0, 110.0),
        record(2, date(2024, 1, 20), 200.0, 220.0),
        record(3, date(2024, 2, 1), 300.0, 330.0),
        record(4, date(2023, 12, 31), 50.0, 55.0),
    ];

    let groups = aggregate_by(&records, |d| format!("{}-{:02}", d.year(), d.month()));
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["2023-12", "2024-01", "2024-02"]);

    let total: usize = groups.iter().map(|g| g.values.data_points).sum();
    assert_eq!(total, records.len());

    let january = &groups[1].values;
    assert_eq!(january.data_points, 2);
    assert_close(january.avg_carat_22_1gram, 150.0);
    assert_close(january.avg_carat_24_1gram, 165.0);
    assert_close(january.avg_carat_22_8grams, 1200.0);
    assert_eq!(january.min_price, 100.0);
    assert_eq!(january.max_price, 200.0);
}

#[test]
fn test_aggregate_by_year() {
    let records = vec![
        record(1, date(2023, 6, 1), 100.0, 110.0),
        record(2, date(2024, 6, 1), 200.0, 220.0),
        record(3, date(2024, 7, 1), 400.0, 440.0),
    ];

    let groups = aggregate_by(&records, |d| d.year().to_string());
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].key, "2024");
    assert_close(groups[1].values.avg_carat_22_1gram, 300.0);

    assert!(aggregate_by(&[], |d| d.year().to_string()).is_empty());
}

#[test]
fn test_compute_statistics() {
    let prices = vec![
        record(1, date(2024, 12, 1), 100.0, 110.0),
        record(2, date(2024, 12, 10), 80.0, 90.0),
        record(3, date(2024, 12, 20), 120.0, 130.0),
    ];

    let stats = compute_statistics(Period::Month, &prices).expect("statistics");
    assert_eq!(stats.count, 3);
    assert_eq!(stats.start_price, 100.0);
    assert_eq!(stats.current_price, 120.0);
    assert_eq!(stats.min_price, 80.0);
    assert_eq!(stats.max_price, 120.0);
    assert_close(stats.avg_price, 100.0);
    assert_eq!(stats.start_date, date(2024, 12, 1));
    assert_eq!(stats.end_date, date(2024, 12, 20));
    assert_close(stats.price_change, 20.0);
    assert_close(stats.price_change_percentage, 20.0);
}

#[test]
fn test_compute_statistics_edge_cases() {
    assert!(compute_statistics(Period::All, &[]).is_none());

    let single = compute_statistics(Period::Year, &[record(1, date(2024, 5, 1), 150.0, 160.0)])
        .expect("statistics");
    assert_eq!(single.count, 1);
    assert_eq!(single.price_change, 0.0);
    assert_eq!(single.price_change_percentage, 0.0);

    // Zero start price leaves the percentage at zero
    let from_zero = compute_statistics(
        Period::All,
        &[
            record(1, date(2024, 5, 1), 0.0, 0.0),
            record(2, date(2024, 5, 2), 50.0, 60.0),
        ],
    )
    .expect("statistics");
    assert_eq!(from_zero.price_change, 50.0);
    assert_eq!(from_zero.price_change_percentage, 0.0);
}

// ============================================================================
// Period tokens
// ============================================================================

#[test]
fn test_period_tokens() {
    for period in Period::ALL {
        assert_eq!(Period::parse(period.as_str()), Ok(period));
    }

    let err = Period::parse("week").unwrap_err();
    for token in ["month", "3months", "6months", "year", "all"] {
        assert!(err.contains(token), "{} missing from {}", token, err);
    }

    assert_eq!(Period::parse_lenient("fortnight"), Period::Month);
    assert_eq!(Period::All.start_date(today()), None);
}

// ============================================================================
// Wire shapes
// ============================================================================

#[test]
fn test_empty_statistics_serialize_as_empty_object() {
    let empty = StatisticsData::from(None);
    assert!(empty.is_empty());
    assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");

    let stats = compute_statistics(Period::Month, &[record(1, date(2024, 12, 1), 100.0, 110.0)]);
    let json = serde_json::to_value(StatisticsData::from(stats)).unwrap();
    assert_eq!(json["period"], "month");
    assert_eq!(json["count"], 1);
}

#[test]
fn test_tracking_report_repeats_22_carat_at_root() {
    let base = record(1, date(2024, 12, 1), 100.0, 100.0);
    let weekly = build_tracking(PeriodType::Week, Carat::K22, &base, &record(2, date(2024, 12, 8), 94.0, 100.0));
    let report = TrackingReport {
        carat_22: carat_tracking(Carat::K22, Some(weekly), None),
        carat_24: carat_tracking(Carat::K24, None, None),
    };

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["weekly_tracking"], json["carat_22"]["weekly_tracking"]);
    assert_eq!(json["alerts"], json["carat_22"]["alerts"]);
    assert_eq!(json["has_critical_alerts"], true);
    assert!(json["monthly_tracking"].is_null());
    assert_eq!(json["carat_24"]["has_critical_alerts"], false);
    assert_eq!(json["weekly_tracking"]["carat"], "22");
    assert_eq!(json["weekly_tracking"]["alert_type"], "decrease");
    assert_eq!(json["weekly_tracking"]["period_type"], "week");
}

#[test]
fn test_error_response_codes() {
    let not_found = ErrorResponse::from(&AppError::NotFound("No price data available".into()));
    assert_eq!(not_found.code, 404);
    assert_eq!(not_found.status, "error");
    assert_eq!(not_found.detail, "No price data available");

    let invalid = ErrorResponse::from(&AppError::Validation("bad period".into()));
    assert_eq!(invalid.code, 400);

    // Internal details are not exposed
    let internal = ErrorResponse::from(&AppError::Sqlx(sqlx::Error::RowNotFound));
    assert_eq!(internal.code, 500);
    assert_eq!(internal.detail, "Internal server error");
}

#[test]
fn test_error_conversions() {
    let missing = AppError::from(RepositoryError::from(sqlx::Error::RowNotFound));
    assert!(missing.is_not_found());

    let duplicate = AppError::from(RepositoryError::Duplicate("gold_prices.date".into()));
    assert_eq!(duplicate.status_code(), 400);

    let config = AppError::Config("LOG_LEVEL must be one of trace, debug, info, warn, error".into());
    assert_eq!(config.status_code(), 500);
    assert!(config.to_string().starts_with("Configuration error: "));

    let timeout = AppError::from(DatabaseError::from(sqlx::Error::PoolTimedOut));
    assert!(timeout.is_connection_error());
    assert_eq!(timeout.status_code(), 503);
}
