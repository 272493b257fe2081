//! Formatting and generation of RUT strings
//!
//! `format_rut` is purely positional: the last character is taken as the
//! check digit and everything before it as the body, with no validation.
//! Use [`validate_rut`] when the input needs to be checked.

use crate::checksum::{check_digit_from_digits, compute_check_digit};
use crate::types::{Rut, RutFormat};
use rand::Rng;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Body length of generated RUTs
pub const RUT_BODY_LENGTH: usize = 8;
/// How many RUTs a listing produces when no size is given
pub const DEFAULT_LIST_SIZE: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RutError {
    #[error("RUT must be a string, found {found}")]
    NotAString { found: &'static str },
    #[error("Invalid digit '{character}' at position {position}")]
    InvalidDigit { character: char, position: usize },
    #[error("RUT has no body digits")]
    Empty,
    #[error("Check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: char, found: char },
}

/// Render a raw RUT (body followed by check digit) with the given separators.
///
/// The body separator goes before every third character counted from the
/// right of the body, never in front of the first one.
pub fn format_rut(rut: &str, format: &RutFormat) -> String {
    let chars: Vec<char> = rut.chars().collect();
    let (check_digit, body) = match chars.split_last() {
        Some((check_digit, body)) => (Some(*check_digit), body),
        None => (None, &chars[..]),
    };

    let mut output = String::with_capacity(
        rut.len()
            + format.check_digit_separator.len()
            + format.body_separator.len() * (body.len() / 3),
    );
    for (i, c) in body.iter().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            output.push_str(&format.body_separator);
        }
        output.push(*c);
    }
    output.push_str(&format.check_digit_separator);
    if let Some(c) = check_digit {
        output.push(c);
    }

    debug!(%rut, %output, "formatted rut");
    output
}

/// Format a dynamically typed value, failing unless it holds a string
pub fn format_rut_value(rut: &Value, format: &RutFormat) -> Result<String, RutError> {
    match rut {
        Value::String(raw) => Ok(format_rut(raw, format)),
        other => Err(RutError::NotAString {
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Generate a random valid RUT with a body of `body_length` digits.
///
/// The first body digit is always non-zero. A length of zero still yields
/// a single-digit body.
pub fn random_rut_with<R: Rng + ?Sized>(
    rng: &mut R,
    format: &RutFormat,
    body_length: usize,
) -> String {
    let mut digits: Vec<u8> = (0..body_length.max(1))
        .map(|_| rng.gen_range(0..=9))
        .collect();
    digits[0] = rng.gen_range(1..=9);

    let check_digit = check_digit_from_digits(&digits);
    let mut raw: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    raw.push(check_digit);

    debug!(%raw, "generated rut");
    format_rut(&raw, format)
}

/// Generate one random 8-digit RUT
pub fn random_rut(format: &RutFormat) -> String {
    random_rut_with(&mut rand::thread_rng(), format, RUT_BODY_LENGTH)
}

/// Generate `count` random 8-digit RUTs
pub fn random_ruts(count: usize, format: &RutFormat) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| random_rut_with(&mut rng, format, RUT_BODY_LENGTH))
        .collect()
}

/// Keep only digits and the letter K, upper-casing `k`
pub fn clean_rut(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '0'..='9' | 'K' => Some(c),
            'k' => Some('K'),
            _ => None,
        })
        .collect()
}

/// Remove the separators of `format` from a formatted RUT.
///
/// The check digit separator is only stripped right before the last
/// character, so a body separator that overlaps it cannot eat into it.
pub fn strip_separators(formatted: &str, format: &RutFormat) -> String {
    let mut chars = formatted.chars();
    let Some(check_digit) = chars.next_back() else {
        return String::new();
    };
    let rest = chars.as_str();
    let body = rest
        .strip_suffix(format.check_digit_separator.as_str())
        .unwrap_or(rest);

    let mut raw = if format.body_separator.is_empty() {
        body.to_string()
    } else {
        body.replace(format.body_separator.as_str(), "")
    };
    raw.push(check_digit);
    raw
}

/// Clean `input` and check that its last character is the body's check digit
pub fn validate_rut(input: &str) -> Result<Rut, RutError> {
    let mut cleaned = clean_rut(input);
    let found = cleaned.pop().ok_or(RutError::Empty)?;
    if cleaned.is_empty() {
        return Err(RutError::Empty);
    }

    let expected = compute_check_digit(&cleaned)?;
    if expected != found {
        return Err(RutError::CheckDigitMismatch { expected, found });
    }

    Ok(Rut {
        body: cleaned,
        check_digit: found,
    })
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_rut(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    #[test]
    fn test_format_default() {
        assert_eq!(format_rut("123456785", &RutFormat::default()), "12345678-5");
    }

    #[test]
    fn test_format_dotted() {
        assert_eq!(format_rut("123456785", &RutFormat::dotted()), "12.345.678-5");
        assert_eq!(format_rut("12345678K", &RutFormat::dotted()), "12.345.678-K");
        assert_eq!(format_rut("1234567", &RutFormat::dotted()), "123.456-7");
        assert_eq!(format_rut("1000", &RutFormat::dotted()), "100-0");
    }

    #[test]
    fn test_format_is_positional_only() {
        // No validation of content
        assert_eq!(format_rut("ab.cdX", &RutFormat::new(" ", "/")), "ab .cd/X");
        assert_eq!(format_rut("5", &RutFormat::default()), "-5");
        assert_eq!(format_rut("", &RutFormat::default()), "-");
    }

    #[test]
    fn test_format_multibyte_separators() {
        let format = RutFormat::new("·", " – ");
        assert_eq!(format_rut("123456785", &format), "12·345·678 – 5");
    }

    #[test]
    fn test_format_value_requires_string() {
        let format = RutFormat::default();
        assert_eq!(
            format_rut_value(&json!("123456785"), &format),
            Ok("12345678-5".to_string())
        );
        assert_eq!(
            format_rut_value(&json!(12345678), &format),
            Err(RutError::NotAString { found: "number" })
        );
        assert!(format_rut_value(&Value::Null, &format).is_err());
    }

    #[test]
    fn test_random_rut_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let format = RutFormat::dotted();
        for _ in 0..1000 {
            let formatted = random_rut_with(&mut rng, &format, RUT_BODY_LENGTH);
            let rut = validate_rut(&formatted).unwrap();
            assert_eq!(rut.body.len(), RUT_BODY_LENGTH);
            assert!(!rut.body.starts_with('0'));
            assert_eq!(rut.format(&format), formatted);
        }
    }

    #[test]
    fn test_random_rut_body_length() {
        let mut rng = StdRng::seed_from_u64(42);
        let short = random_rut_with(&mut rng, &RutFormat::new("", ""), 3);
        assert_eq!(short.len(), 4);
        let empty = random_rut_with(&mut rng, &RutFormat::new("", ""), 0);
        assert_eq!(empty.len(), 2);
        assert!(validate_rut(&empty).is_ok());
    }

    #[test]
    fn test_random_ruts_count() {
        let ruts = random_ruts(DEFAULT_LIST_SIZE, &RutFormat::default());
        assert_eq!(ruts.len(), DEFAULT_LIST_SIZE);
        assert!(ruts.iter().all(|r| r.len() == 10));
    }

    #[test]
    fn test_clean_rut() {
        assert_eq!(clean_rut(" 12.345.678-k "), "12345678K");
        assert_eq!(clean_rut("x"), "");
    }

    #[test]
    fn test_strip_then_reformat() {
        let format = RutFormat::dotted();
        let formatted = "12.345.678-5";
        let raw = strip_separators(formatted, &format);
        assert_eq!(raw, "123456785");
        assert_eq!(format_rut(&raw, &format), formatted);
    }

    #[test]
    fn test_strip_overlapping_separators() {
        let format = RutFormat::new(".", ".-");
        let formatted = format_rut("123456785", &format);
        assert_eq!(formatted, "12.345.678.-5");
        let raw = strip_separators(&formatted, &format);
        assert_eq!(raw, "123456785");
        assert_eq!(format_rut(&raw, &format), formatted);

        let format = RutFormat::new("--", "-");
        let formatted = format_rut("12345678K", &format);
        assert_eq!(strip_separators(&formatted, &format), "12345678K");
        assert_eq!(strip_separators("", &format), "");
    }

    #[test]
    fn test_validate_rut() {
        let rut: Rut = "12.345.678-5".parse().unwrap();
        assert_eq!(rut.body, "12345678");
        assert_eq!(rut.check_digit, '5');

        assert_eq!(
            validate_rut("12345678-4"),
            Err(RutError::CheckDigitMismatch {
                expected: '5',
                found: '4'
            })
        );
        assert_eq!(validate_rut("-"), Err(RutError::Empty));
        assert_eq!(validate_rut("5"), Err(RutError::Empty));
        assert_eq!(
            validate_rut("1K345678-5"),
            Err(RutError::InvalidDigit {
                character: 'K',
                position: 1
            })
        );
        assert!(validate_rut("10.000.013-k").is_ok());
    }
}
