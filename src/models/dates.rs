//! Lenient parsing for the free-text date fields carried by records.

use chrono::{DateTime, NaiveDate};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parse a record date. Returns `None` for blank or unrecognised input.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(parse_date("2025-03-07"), Some(expected));
        assert_eq!(parse_date("2025/3/7"), Some(expected));
        assert_eq!(parse_date("2025.03.07"), Some(expected));
        assert_eq!(parse_date(" 2025-03-07T10:00:00+08:00 "), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("下周三"), None);
        assert_eq!(parse_date("2025-13-01"), None);
    }
}
