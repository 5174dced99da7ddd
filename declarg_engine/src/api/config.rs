use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constant::MEMORY_SOURCE;
use crate::parser::ParsedResult;

/// Failure to load a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The file could not be read.
    #[error("Could not read config '{path}': {source}")]
    Io {
        /// The file attempted.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid JSON.
    #[error("Invalid JSON in config '{path}': {source}")]
    Json {
        /// The file (or source name) attempted.
        path: String,
        /// The underlying failure.
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is valid, but not an object.
    #[error("Config '{0}' must be a JSON object.")]
    NotAnObject(String),
}

/// Values loaded from an external JSON object, keyed by parameter name.
///
/// Keys may be any option alias (including the long name with `_` for `-`) or a positional name.
/// A key naming a sub-command, whose value is an object, configures that sub-command.
/// `null` values, and the `"sub_cmd"` key, are ignored.
///
/// Config values override defaults, and are overridden by explicit tokens.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{Config, OptionSpec, Registry};
///
/// let mut registry = Registry::new();
/// registry
///     .declare_option(OptionSpec::int().long("max-count").default(1))
///     .unwrap();
///
/// let config = Config::from_json_str("settings.json", r#"{"max_count": 5}"#).unwrap();
/// let result = registry.parse_tokens_with_config(&[], &config).unwrap();
/// assert_eq!(result.get_int("max-count"), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    source: String,
    entries: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    /// Load from JSON text; `source` names the origin in error messages.
    pub fn from_json_str(source: impl Into<String>, text: &str) -> Result<Self, ConfigLoadError> {
        let source = source.into();
        let json = serde_json::from_str(text).map_err(|error| ConfigLoadError::Json {
            path: source.clone(),
            source: error,
        })?;
        Self::from_value(source, json)
    }

    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: error,
        })?;
        Self::from_json_str(path.display().to_string(), &text)
    }

    /// Load from an already decoded JSON value.
    pub fn from_value(
        source: impl Into<String>,
        json: serde_json::Value,
    ) -> Result<Self, ConfigLoadError> {
        let source = source.into();

        match json {
            serde_json::Value::Object(entries) => Ok(Self { source, entries }),
            _ => Err(ConfigLoadError::NotAnObject(source)),
        }
    }

    /// Capture a previous result, so that it may be replayed as a config.
    pub fn from_result(result: &ParsedResult) -> Result<Self, ConfigLoadError> {
        let json = serde_json::to_value(result).map_err(|error| ConfigLoadError::Json {
            path: MEMORY_SOURCE.to_string(),
            source: error,
        })?;
        Self::from_value(MEMORY_SOURCE, json)
    }

    /// Where the config was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.entries.iter()
    }

    /// The config for sub-command `name`, if present as a nested object.
    pub(crate) fn nested(&self, name: &str) -> Option<Config> {
        match self.entries.get(name) {
            Some(serde_json::Value::Object(entries)) => Some(Config {
                source: self.source.clone(),
                entries: entries.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn from_json_str() {
        let config = Config::from_json_str("a.json", r#"{"num": 1, "resize": {"width": 2}}"#).unwrap();
        assert_eq!(config.source(), "a.json");
        assert_eq!(config.entries().count(), 2);
        assert_eq!(
            config.nested("resize"),
            Some(Config::from_value("a.json", json!({"width": 2})).unwrap())
        );
        assert_eq!(config.nested("num"), None);
        assert_eq!(config.nested("missing"), None);
    }

    #[test]
    fn from_json_str_invalid() {
        assert_matches!(
            Config::from_json_str("a.json", "{num: 1"),
            Err(ConfigLoadError::Json { path, .. }) if path == "a.json"
        );
        assert_matches!(
            Config::from_json_str("a.json", "[1, 2]"),
            Err(ConfigLoadError::NotAnObject(path)) if path == "a.json"
        );
    }

    #[test]
    fn from_path() {
        // Setup
        let path = std::env::temp_dir().join(format!("declarg-config-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"verbose": true}}"#).unwrap();

        // Execute
        let config = Config::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();

        // Verify
        assert_eq!(config.source(), path.display().to_string());
        assert_eq!(
            config.entries().collect::<Vec<_>>(),
            vec![(&"verbose".to_string(), &json!(true))]
        );
    }

    #[test]
    fn from_path_missing() {
        assert_matches!(
            Config::from_path("/definitely/not/here.json"),
            Err(ConfigLoadError::Io { .. })
        );
    }
}
