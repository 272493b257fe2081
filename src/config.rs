//! TOML configuration for the rutgen binary
//!
//! ```toml
//! list_size = 10
//!
//! [format]
//! body_separator = "."
//! check_digit_separator = "-"
//! ```

use crate::rut::DEFAULT_LIST_SIZE;
use crate::types::RutFormat;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RutgenConfig {
    pub format: RutFormat,
    pub list_size: usize,
}

impl Default for RutgenConfig {
    fn default() -> Self {
        Self {
            format: RutFormat::default(),
            list_size: DEFAULT_LIST_SIZE,
        }
    }
}

impl RutgenConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config() {
        assert_eq!(RutgenConfig::from_toml("").unwrap(), RutgenConfig::default());
    }

    #[test]
    fn test_format_table() {
        let config = RutgenConfig::from_toml(
            r#"
list_size = 3

[format]
body_separator = "."
"#,
        )
        .unwrap();
        assert_eq!(config.list_size, 3);
        assert_eq!(config.format, RutFormat::dotted());
    }

    #[test]
    fn test_wrong_typed_separators_use_defaults() {
        let config = RutgenConfig::from_toml(
            r#"
[format]
body_separator = 1
check_digit_separator = ["x"]
"#,
        )
        .unwrap();
        assert_eq!(config.format, RutFormat::default());
    }

    #[test]
    fn test_bad_list_size_is_error() {
        assert!(matches!(
            RutgenConfig::from_toml("list_size = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[format]\ncheck_digit_separator = \" \"").unwrap();
        let config = RutgenConfig::load(file.path()).unwrap();
        assert_eq!(config.format, RutFormat::new("", " "));

        assert!(matches!(
            RutgenConfig::load(Path::new("/nonexistent/rutgen.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
