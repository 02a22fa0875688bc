//! Raw series loading and parsing.
//!
//! This module is responsible for turning a price feed (JSON or CSV) into a
//! clean, chronologically ordered list of `PricePoint`s that is safe to expand.
//!
//! Design goals:
//! - **Strict parsing**: a malformed date or price aborts the whole series
//! - **Explicit ordering**: newest-first feeds are reversed only when the order is
//!   requested or can be inferred unambiguously
//! - **Separation of concerns**: no derived fields or fitting logic here

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::domain::{DuplicatePolicy, InputOrder, PricePoint, RawPoint};
use crate::error::{AppError, PipelineError};

/// Load raw records from a `.json` (array of objects) or `.csv` (header row) file.
pub fn load_raw_points(path: &Path) -> Result<Vec<RawPoint>, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input '{}': {e}", path.display())))?;

    let raw = match ext.as_str() {
        "json" => serde_json::from_reader::<_, Vec<RawPoint>>(file).map_err(|e| {
            AppError::new(2, format!("Invalid JSON input '{}': {e}", path.display()))
        })?,
        "csv" => read_csv(file).map_err(|e| {
            AppError::new(2, format!("Invalid CSV input '{}': {e}", path.display()))
        })?,
        other => {
            return Err(AppError::new(
                2,
                format!("Unsupported input extension '{other}'. Expected .json or .csv."),
            ));
        }
    };

    debug!(path = %path.display(), records = raw.len(), "loaded raw series");
    Ok(raw)
}

fn read_csv(file: File) -> Result<Vec<RawPoint>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    reader.deserialize().collect()
}

/// Parse raw records into oldest-first `PricePoint`s.
///
/// Record numbers in errors are 1-based positions in the *input* order.
pub fn parse_series(
    raw: &[RawPoint],
    order: InputOrder,
    duplicates: DuplicatePolicy,
) -> Result<Vec<PricePoint>, PipelineError> {
    if raw.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    let mut parsed = raw
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            parse_record(r)
                .map(|p| (idx + 1, p))
                .map_err(|e| PipelineError::parse(idx + 1, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let reverse = resolve_order(&parsed, order)?;
    if reverse {
        parsed.reverse();
    }
    debug!(?order, reversed = reverse, records = parsed.len(), "resolved input ordering");

    ensure_chronological(&parsed)?;

    let before = parsed.len();
    let points = apply_duplicate_policy(parsed, duplicates)?;
    if points.len() < before {
        warn!(
            dropped = before - points.len(),
            policy = ?duplicates,
            "dropped records sharing a calendar day"
        );
    }

    Ok(points)
}

fn parse_record(raw: &RawPoint) -> Result<PricePoint, String> {
    Ok(PricePoint {
        date: parse_date(&raw.date)?,
        price: parse_price(&raw.price)?,
        local_high: raw.local_high.unwrap_or(false),
    })
}

/// Returns `true` when the parsed records must be reversed to become oldest-first.
fn resolve_order(parsed: &[(usize, PricePoint)], order: InputOrder) -> Result<bool, PipelineError> {
    match order {
        InputOrder::NewestFirst => Ok(true),
        InputOrder::OldestFirst => Ok(false),
        InputOrder::Auto => {
            let (Some((_, first)), Some((_, last))) = (parsed.first(), parsed.last()) else {
                return Ok(false);
            };
            if parsed.len() == 1 || first.date < last.date {
                Ok(false)
            } else if first.date > last.date {
                Ok(true)
            } else {
                Err(PipelineError::Ordering(format!(
                    "first and last records share the date {}; pass an explicit order",
                    first.date
                )))
            }
        }
    }
}

fn ensure_chronological(parsed: &[(usize, PricePoint)]) -> Result<(), PipelineError> {
    for pair in parsed.windows(2) {
        let (_, prev) = &pair[0];
        let (record, next) = &pair[1];
        if next.date < prev.date {
            return Err(PipelineError::Ordering(format!(
                "record {record} ({}) breaks chronological order after {}",
                next.date, prev.date
            )));
        }
    }
    Ok(())
}

fn apply_duplicate_policy(
    parsed: Vec<(usize, PricePoint)>,
    policy: DuplicatePolicy,
) -> Result<Vec<PricePoint>, PipelineError> {
    let mut out: Vec<PricePoint> = Vec::with_capacity(parsed.len());
    for (record, point) in parsed {
        match out.last_mut() {
            Some(last) if last.date == point.date => match policy {
                DuplicatePolicy::Reject => {
                    return Err(PipelineError::parse(
                        record,
                        format!("duplicate calendar date {}", point.date),
                    ));
                }
                DuplicatePolicy::KeepFirst => {}
                DuplicatePolicy::KeepLast => *last = point,
            },
            _ => out.push(point),
        }
    }
    Ok(out)
}

/// Parse a price, stripping `,` grouping separators.
pub fn parse_price(s: &str) -> Result<f64, String> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err("Missing price value.".to_string());
    }
    let v = cleaned
        .parse::<f64>()
        .map_err(|_| format!("Invalid price '{s}'."))?;
    if !v.is_finite() {
        return Err(format!("Non-finite price '{s}'."));
    }
    Ok(v)
}

/// Parse a calendar date.
///
/// ISO dates (`YYYY-MM-DD`) are preferred, but exported price histories commonly use
/// `Jan 02, 2021` or day-first layouts, and some feeds ship full timestamps.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 6] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%b %d, %Y",
        "%B %d, %Y",
    ];
    let s = s.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY, DD-MM-YYYY, Mon DD, YYYY, RFC 3339."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn price_strips_grouping_separators() {
        assert_eq!(parse_price("12,345.67").unwrap(), 12345.67);
        assert_eq!(parse_price(" 3 ").unwrap(), 3.0);
        assert!(parse_price("").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("NaN").is_err());
    }

    #[test]
    fn date_accepts_common_layouts() {
        assert_eq!(parse_date("2021-01-02").unwrap(), ymd(2021, 1, 2));
        assert_eq!(parse_date("Jan 02, 2021").unwrap(), ymd(2021, 1, 2));
        assert_eq!(parse_date("02/01/2021").unwrap(), ymd(2021, 1, 2));
        assert_eq!(parse_date("2021-01-02T23:00:00Z").unwrap(), ymd(2021, 1, 2));
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn newest_first_input_is_reversed() {
        let raw = vec![
            RawPoint::new("2021-01-03", "3"),
            RawPoint::new("2021-01-02", "2"),
            RawPoint::new("2021-01-01", "1"),
        ];
        let points = parse_series(&raw, InputOrder::Auto, DuplicatePolicy::Reject).unwrap();
        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
        assert_eq!(points[0].date, ymd(2021, 1, 1));
    }

    #[test]
    fn explicit_order_mismatch_fails_loudly() {
        let raw = vec![
            RawPoint::new("2021-01-03", "3"),
            RawPoint::new("2021-01-01", "1"),
        ];
        let err = parse_series(&raw, InputOrder::OldestFirst, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, PipelineError::Ordering(_)));
    }

    #[test]
    fn non_monotonic_dates_are_rejected() {
        let raw = vec![
            RawPoint::new("2021-01-01", "1"),
            RawPoint::new("2021-01-05", "2"),
            RawPoint::new("2021-01-03", "3"),
            RawPoint::new("2021-01-07", "4"),
        ];
        let err = parse_series(&raw, InputOrder::Auto, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, PipelineError::Ordering(_)));
    }

    #[test]
    fn equal_endpoints_cannot_be_inferred() {
        let raw = vec![
            RawPoint::new("2021-01-01", "1"),
            RawPoint::new("2021-01-01", "2"),
        ];
        let err = parse_series(&raw, InputOrder::Auto, DuplicatePolicy::KeepLast).unwrap_err();
        assert!(matches!(err, PipelineError::Ordering(_)));
    }

    #[test]
    fn duplicate_policies() {
        let raw = vec![
            RawPoint::new("2021-01-01", "1"),
            RawPoint::new("2021-01-02", "2"),
            RawPoint::new("2021-01-02", "5"),
            RawPoint::new("2021-01-03", "3"),
        ];

        let err = parse_series(&raw, InputOrder::OldestFirst, DuplicatePolicy::Reject).unwrap_err();
        assert_eq!(err, PipelineError::parse(3, "duplicate calendar date 2021-01-02"));

        let first =
            parse_series(&raw, InputOrder::OldestFirst, DuplicatePolicy::KeepFirst).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[1].price, 2.0);

        let last = parse_series(&raw, InputOrder::OldestFirst, DuplicatePolicy::KeepLast).unwrap();
        assert_eq!(last.len(), 3);
        assert_eq!(last[1].price, 5.0);
    }

    #[test]
    fn bad_record_reports_its_position() {
        let raw = vec![
            RawPoint::new("2021-01-01", "1"),
            RawPoint::new("2021-01-02", "two"),
        ];
        let err = parse_series(&raw, InputOrder::Auto, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, PipelineError::Parse { record: 2, .. }));
    }

    #[test]
    fn empty_series_is_refused() {
        let err = parse_series(&[], InputOrder::Auto, DuplicatePolicy::Reject).unwrap_err();
        assert_eq!(err, PipelineError::EmptySeries);
    }

    #[test]
    fn local_high_defaults_false() {
        let raw = vec![
            RawPoint::new("2021-01-01", "1").with_local_high(true),
            RawPoint::new("2021-01-02", "2"),
        ];
        let points = parse_series(&raw, InputOrder::Auto, DuplicatePolicy::Reject).unwrap();
        assert!(points[0].local_high);
        assert!(!points[1].local_high);
    }

    #[test]
    fn csv_accepts_quoted_and_bare_prices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(
            &path,
            "date,price,local_high\n\
             2021-01-01,\"1,234.5\",true\n\
             2021-01-02,99.25,\n\
             2021-01-03,3,false\n",
        )
        .unwrap();

        let raw = load_raw_points(&path).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].price, "1,234.5");
        assert_eq!(parse_price(&raw[0].price).unwrap(), 1234.5);
        assert_eq!(parse_price(&raw[1].price).unwrap(), 99.25);
        assert_eq!(parse_price(&raw[2].price).unwrap(), 3.0);
        assert_eq!(raw[0].local_high, Some(true));
        assert_eq!(raw[1].local_high, None);
        assert_eq!(raw[2].local_high, Some(false));
    }

    #[test]
    fn csv_accepts_camel_case_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.CSV");
        fs::write(&path, "date,price,localHigh\n2021-01-01,10,true\n2021-01-02,11,\n").unwrap();

        let raw = load_raw_points(&path).unwrap();
        assert_eq!(raw[0].local_high, Some(true));
        assert_eq!(raw[1].local_high, None);
    }

    #[test]
    fn json_accepts_numbers_text_and_missing_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(
            &path,
            r#"[
                {"date": "2021-01-02", "price": "12,345.67", "localHigh": true},
                {"date": "2021-01-01", "price": 1234.5}
            ]"#,
        )
        .unwrap();

        let raw = load_raw_points(&path).unwrap();
        assert_eq!(raw[0].local_high, Some(true));
        assert_eq!(raw[1].local_high, None);
        assert_eq!(parse_price(&raw[1].price).unwrap(), 1234.5);

        let points = parse_series(&raw, InputOrder::Auto, DuplicatePolicy::Reject).unwrap();
        assert_eq!(points[0].date, ymd(2021, 1, 1));
        assert_eq!(points[1].price, 12345.67);
        assert!(points[1].local_high);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.txt");
        fs::write(&path, "date,price\n2021-01-01,1\n").unwrap();

        let err = load_raw_points(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Unsupported input extension 'txt'"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(&path, r#"[{"date": "2021-01-01"}]"#).unwrap();

        let err = load_raw_points(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
