use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CompassError, Result};

/// Glyph used by filers in place of a minus sign.
pub const NEGATIVE_MARK: char = '△';

static FOOTNOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[※＊*][0-9]*").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Converts a localized amount such as `"※1 △10,897,603"` into a signed integer.
///
/// Thousands separators and footnote markers are removed first, then the
/// first run of ASCII digits is taken. A leading `△` (or ASCII `-`) makes
/// the value negative. Text without any digits yields
/// [`CompassError::Parse`], which callers treat as "not an amount row".
pub fn parse_amount(text: &str) -> Result<i64> {
    let without_separators: String = text.chars().filter(|c| *c != ',' && *c != '，').collect();
    let cleaned = FOOTNOTE_RE.replace_all(&without_separators, "");
    let cleaned = cleaned.trim();

    let digits = DIGITS_RE
        .find(cleaned)
        .ok_or_else(|| CompassError::Parse(text.to_string()))?;

    let negative = cleaned.starts_with(NEGATIVE_MARK) || cleaned.starts_with('-');
    let signed = if negative {
        format!("-{}", digits.as_str())
    } else {
        digits.as_str().to_string()
    };

    signed
        .parse::<i64>()
        .map_err(|_| CompassError::Parse(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_amount() {
        assert_eq!(parse_amount("10,897,603").unwrap(), 10897603);
        assert_eq!(parse_amount("  42 ").unwrap(), 42);
    }

    #[test]
    fn test_footnote_markers() {
        assert_eq!(parse_amount("※1 10,897,603").unwrap(), 10897603);
        assert_eq!(parse_amount("※1,※2 10,897,603").unwrap(), 10897603);
        assert_eq!(parse_amount("*3 500").unwrap(), 500);
    }

    #[test]
    fn test_triangle_is_negative() {
        assert_eq!(parse_amount("△1,234").unwrap(), -1234);
        assert_eq!(parse_amount("※2 △1,234").unwrap(), -1234);
    }

    #[test]
    fn test_ascii_minus_is_negative() {
        assert_eq!(parse_amount("-77").unwrap(), -77);
        assert_eq!(parse_amount("※1 -1,500").unwrap(), -1500);
    }

    #[test]
    fn test_non_numeric_is_error() {
        assert!(matches!(parse_amount(""), Err(CompassError::Parse(_))));
        assert!(matches!(parse_amount("流動資産合計"), Err(CompassError::Parse(_))));
        assert!(parse_amount("※").is_err());
        assert!(parse_amount("－").is_err());
    }

    #[test]
    fn test_first_digit_run_wins() {
        assert_eq!(parse_amount("1,000 (2)").unwrap(), 1000);
    }

    #[test]
    fn test_overflow_is_error() {
        assert!(parse_amount("99999999999999999999999").is_err());
    }
}
