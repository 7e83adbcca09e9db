use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

use crate::domain::FieldType;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-().]+$").expect("phone pattern"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+[^\s]*$").expect("url pattern")
});

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Message for a value that fails its field type's own format, if it does.
pub(super) fn type_error(kind: FieldType, value: &Value) -> Option<&'static str> {
    let valid = match kind {
        FieldType::Email => text(value).is_some_and(is_email),
        FieldType::Phone => text(value).is_some_and(is_phone),
        FieldType::Url => text(value).is_some_and(is_url),
        FieldType::Number => parse_number(value).is_some(),
        FieldType::Date => text(value).is_some_and(is_date),
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Select
        | FieldType::Radio
        | FieldType::Checkbox
        | FieldType::File => true,
    };
    if valid {
        return None;
    }
    Some(match kind {
        FieldType::Email => "Please enter a valid email address",
        FieldType::Phone => "Please enter a valid phone number",
        FieldType::Url => "Please enter a valid URL",
        FieldType::Number => "Please enter a valid number",
        _ => "Please enter a valid date",
    })
}

fn text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim)
}

pub fn is_email(raw: &str) -> bool {
    EMAIL.is_match(raw)
}

pub fn is_phone(raw: &str) -> bool {
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    PHONE.is_match(raw) && PHONE_DIGITS.contains(&digits)
}

pub fn is_url(raw: &str) -> bool {
    URL.is_match(raw)
}

pub fn is_date(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(raw).is_ok()
        || DATE_TIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(raw, format).is_ok())
}

/// Numeric reading of a submitted value: JSON numbers as-is, strings parsed.
/// Only finite numbers count; `inf`, `infinity` and `NaN` spellings do not.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last+tag@sub.example.org"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.com"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_phone("+1 (555) 123-4567"));
        assert!(is_phone("0612345678"));
        assert!(!is_phone("12345"));
        assert!(!is_phone("call me"));
        assert!(!is_phone("+1234567890123456789"));
    }

    #[test]
    fn url_shapes() {
        assert!(is_url("https://example.com/path?q=1"));
        assert!(is_url("ftp://files.example.com"));
        assert!(!is_url("example.com"));
        assert!(!is_url("http://"));
    }

    #[test]
    fn date_shapes() {
        assert!(is_date("2024-02-29"));
        assert!(is_date("2024-01-05T10:30"));
        assert!(is_date("2024-01-05T10:30:00Z"));
        assert!(!is_date("2023-02-29"));
        assert!(!is_date("yesterday"));
    }

    #[test]
    fn numbers_from_strings_and_json() {
        assert_eq!(parse_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(parse_number(&json!(1.5)), Some(1.5));
        assert_eq!(parse_number(&json!("1e3")), Some(1000.0));
        assert_eq!(parse_number(&json!("NaN")), None);
        for spelling in ["inf", "+inf", "-infinity", "Infinity", "1e999"] {
            assert_eq!(parse_number(&json!(spelling)), None, "{spelling}");
        }
        assert_eq!(parse_number(&json!("abc")), None);
        assert_eq!(parse_number(&json!(true)), None);
    }

    #[test]
    fn free_text_types_have_no_intrinsic_format() {
        assert_eq!(type_error(FieldType::Text, &json!("anything")), None);
        assert_eq!(
            type_error(FieldType::Email, &json!("nope")),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            type_error(FieldType::Date, &json!(12)),
            Some("Please enter a valid date")
        );
    }
}
