//! Core types for RUT formatting

use crate::rut::{RutError, validate_rut};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Separator inserted between groups of three body digits by default (none)
pub const DEFAULT_BODY_SEPARATOR: &str = "";
/// Separator between the body and the check digit by default
pub const DEFAULT_CHECK_DIGIT_SEPARATOR: &str = "-";

/// Presentation options for a RUT.
///
/// Deserialization is permissive: a missing field, or a field holding
/// anything other than a string, falls back to that field's default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RutFormat {
    /// Inserted before every third body digit counted from the right
    #[serde(deserialize_with = "lenient_body_separator")]
    pub body_separator: String,
    /// Inserted between the body and the check digit
    #[serde(deserialize_with = "lenient_check_digit_separator")]
    pub check_digit_separator: String,
}

impl Default for RutFormat {
    fn default() -> Self {
        Self {
            body_separator: DEFAULT_BODY_SEPARATOR.to_string(),
            check_digit_separator: DEFAULT_CHECK_DIGIT_SEPARATOR.to_string(),
        }
    }
}

impl RutFormat {
    pub fn new(
        body_separator: impl Into<String>,
        check_digit_separator: impl Into<String>,
    ) -> Self {
        Self {
            body_separator: body_separator.into(),
            check_digit_separator: check_digit_separator.into(),
        }
    }

    /// The usual printed form, e.g. `12.345.678-5`
    pub fn dotted() -> Self {
        Self::new(".", "-")
    }

    /// Build a format from optional overrides, keeping defaults for the rest
    pub fn with_overrides(
        &self,
        body_separator: Option<&str>,
        check_digit_separator: Option<&str>,
    ) -> Self {
        Self {
            body_separator: body_separator
                .map(str::to_string)
                .unwrap_or_else(|| self.body_separator.clone()),
            check_digit_separator: check_digit_separator
                .map(str::to_string)
                .unwrap_or_else(|| self.check_digit_separator.clone()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseField {
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_string<'de, D>(deserializer: D, field: &str) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match LooseField::deserialize(deserializer)? {
        LooseField::Text(value) => Ok(Some(value)),
        LooseField::Other(_) => {
            tracing::warn!(field, "non-string format option, using default");
            Ok(None)
        }
    }
}

fn lenient_body_separator<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer, "body_separator")?
        .unwrap_or_else(|| DEFAULT_BODY_SEPARATOR.to_string()))
}

fn lenient_check_digit_separator<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer, "check_digit_separator")?
        .unwrap_or_else(|| DEFAULT_CHECK_DIGIT_SEPARATOR.to_string()))
}

/// A validated RUT: digit body plus its matching check digit.
///
/// Serializes as the raw string (`123456785`) and deserializes through
/// [`validate_rut`](crate::rut::validate_rut), so any common format is
/// accepted but a wrong check digit is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rut {
    pub body: String,
    pub check_digit: char,
}

impl Rut {
    /// Body and check digit with no separators, e.g. `123456785`
    pub fn raw(&self) -> String {
        let mut raw = String::with_capacity(self.body.len() + 1);
        raw.push_str(&self.body);
        raw.push(self.check_digit);
        raw
    }

    pub fn format(&self, format: &RutFormat) -> String {
        crate::rut::format_rut(&self.raw(), format)
    }
}

impl TryFrom<String> for Rut {
    type Error = RutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_rut(&value)
    }
}

impl From<Rut> for String {
    fn from(rut: Rut) -> Self {
        rut.raw()
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(&RutFormat::default()))
    }
}
