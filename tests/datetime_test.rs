use chrono::NaiveDate;
use pantry::utils::datetime::*;
use pantry::utils::quantity::{format_amount, format_quantity};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_parse_and_format_ymd() {
    let date = parse_date("2025-01-15").unwrap();
    assert_eq!(date, day(2025, 1, 15));
    assert_eq!(format_ymd(date), "2025-01-15");
    assert!(parse_date("15/01/2025").is_err());
}

#[test]
fn test_format_date_with_offset() {
    assert_eq!(format_date_with_offset(day(2024, 2, 28), 1), "2024-02-29");
    assert_eq!(format_date_with_offset(day(2025, 1, 1), -1), "2024-12-31");
}

#[test]
fn test_days_until() {
    let today = day(2025, 3, 10);
    assert_eq!(days_until(day(2025, 3, 13), today), 3);
    assert_eq!(days_until(day(2025, 3, 8), today), -2);
}

#[test]
fn test_expiry_classification() {
    let today = day(2025, 3, 10);
    assert_eq!(ExpiryStatus::classify(day(2025, 3, 9), today, 3), ExpiryStatus::Expired);
    assert_eq!(ExpiryStatus::classify(today, today, 3), ExpiryStatus::ExpiresToday);
    assert_eq!(ExpiryStatus::classify(day(2025, 3, 13), today, 3), ExpiryStatus::ExpiringSoon(3));
    assert_eq!(ExpiryStatus::classify(day(2025, 3, 14), today, 3), ExpiryStatus::Fresh);
    assert!(!ExpiryStatus::Fresh.needs_attention());
    assert!(ExpiryStatus::ExpiringSoon(1).needs_attention());
}

#[test]
fn test_unparseable_date_counts_as_expired() {
    assert_eq!(ExpiryStatus::classify_str("soon", day(2025, 3, 10), 3), ExpiryStatus::Expired);
}

#[test]
fn test_format_expiry() {
    let today = day(2025, 3, 10);
    assert_eq!(format_expiry("2025-03-09", today), "expired yesterday");
    assert_eq!(format_expiry("2025-03-10", today), "expires today");
    assert_eq!(format_expiry("2025-03-11", today), "expires tomorrow");
    assert_eq!(format_expiry("2025-03-15", today), "expires in 5 days");
    assert_eq!(format_expiry("2025-03-05", today), "expired 5 days ago");
    assert_eq!(format_expiry("2025-06-01", today), "Jun 01");
    assert_eq!(format_expiry("2026-06-01", today), "Jun 01, 2026");
    assert_eq!(format_expiry("not a date", today), "not a date");
}

#[test]
fn test_format_quantity() {
    assert_eq!(format_quantity(2.0, "pcs"), "2 pcs");
    assert_eq!(format_quantity(0.5, "kg"), "0.5 kg");
    assert_eq!(format_quantity(0.25, " l "), "0.25 l");
    assert_eq!(format_quantity(3.0, ""), "3");
    assert_eq!(format_amount(1.333333), "1.33");
    assert_eq!(format_amount(1.10), "1.1");
}
