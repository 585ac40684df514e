/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_MATCH_CLASS: &str = "FILTER-inject";

/// Settings for one injector.
///
/// ```toml
/// match_class = "FILTER-inject"
/// kind = "talks"
/// pandoc = "/usr/local/bin/pandoc"
/// reader_extensions = "+smart"
/// extra_args = ["--wrap=none"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InjectConfig {
    /// Class token that marks a Div or Span for injection.
    pub match_class: String,
    /// Label for log messages.
    pub kind: Option<String>,
    /// Executable used by the pandoc-backed converter.
    pub pandoc: String,
    /// Appended to the declared format when converting rendered text.
    pub reader_extensions: String,
    pub extra_args: Vec<String>,
}

impl Default for InjectConfig {
    fn default() -> Self {
        InjectConfig {
            match_class: DEFAULT_MATCH_CLASS.to_string(),
            kind: None,
            pandoc: "pandoc".to_string(),
            reader_extensions: "+smart".to_string(),
            extra_args: vec![],
        }
    }
}

impl InjectConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn kind_label(&self) -> &str {
        self.kind.as_deref().unwrap_or("inject")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = InjectConfig::from_toml_str("").unwrap();
        assert_eq!(config, InjectConfig::default());
        assert_eq!(config.match_class, "FILTER-inject");
        assert_eq!(config.reader_extensions, "+smart");
    }

    #[test]
    fn test_partial_config() {
        let config = InjectConfig::from_toml_str(
            r#"
kind = "talks"
extra_args = ["--wrap=none"]
"#,
        )
        .unwrap();
        assert_eq!(config.kind.as_deref(), Some("talks"));
        assert_eq!(config.extra_args, vec!["--wrap=none".to_string()]);
        assert_eq!(config.pandoc, "pandoc");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = InjectConfig::from_toml_str("match = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "match_class = \"FILTER-talks\"").unwrap();

        let config = InjectConfig::load(file.path()).unwrap();
        assert_eq!(config.match_class, "FILTER-talks");
    }

    #[test]
    fn test_load_missing_file() {
        let err = InjectConfig::load("/nonexistent/inject.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
