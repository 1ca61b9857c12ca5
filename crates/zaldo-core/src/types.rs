use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (Colombian pesos in practice). Wraps Decimal to prevent
/// accidental f64 usage.
pub type Money = Decimal;

/// Whole-number percentages (5 = 5%). Divide by 100 before multiplying.
pub type Percent = Decimal;

/// Hundred, for percent conversions.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Convert a whole-number percent into a fraction of one.
pub fn percent_of(amount: Money, percent: Percent) -> Money {
    amount * percent / HUNDRED
}

/// Parse a timestamp as emitted by the hosted database or typed into a form.
///
/// Accepts `YYYY-MM-DD` (read as midnight), RFC 3339 timestamps
/// (`2025-01-15T10:30:00Z`, `2025-01-15T10:30:00-05:00`) and
/// `YYYY-MM-DD HH:MM:SS[.fff]`. Offsets are dropped: the wall-clock time in
/// the zone the value was written in is kept.
pub fn parse_ledger_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    None
}

/// Calendar date of a ledger timestamp.
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    parse_ledger_timestamp(raw).map(|t| t.date())
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_ledger_date("2025-03-07"),
            NaiveDate::from_ymd_opt(2025, 3, 7)
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_local_date() {
        assert_eq!(
            parse_ledger_date("2025-03-07T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2025, 3, 7)
        );
    }

    #[test]
    fn test_parse_database_timestamp() {
        assert_eq!(
            parse_ledger_date("2025-03-07 14:02:11.123"),
            NaiveDate::from_ymd_opt(2025, 3, 7)
        );
    }

    #[test]
    fn test_timestamp_keeps_time_of_day() {
        let morning = parse_ledger_timestamp("2025-03-01T08:00:00Z").unwrap();
        let noon = parse_ledger_timestamp("2025-03-01 12:00:00").unwrap();
        let midnight = parse_ledger_timestamp("2025-03-01").unwrap();
        assert!(midnight < morning);
        assert!(morning < noon);
        assert_eq!(noon.date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_ledger_date(""), None);
        assert_eq!(parse_ledger_date("07/03/2025"), None);
        assert_eq!(parse_ledger_date("2025-02-30"), None);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(100_000), dec!(40)), dec!(40_000));
        assert_eq!(percent_of(dec!(0), dec!(40)), dec!(0));
    }
}
