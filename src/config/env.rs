use crate::value::{Path, Value};

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Configuration from environment variables.
///
/// `PREFIX<sep>DATABASE<sep>HOST=db` becomes the entry `database.host = "db"`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    /// Creates an environment source. An empty separator falls back to `__`.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let mut separator = separator.into();
        if separator.is_empty() {
            separator = "__".to_string();
        }
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    fn entries_from<I>(&self, vars: I) -> Vec<ConfigEntry>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut entries = Vec::new();

        for (key, value) in vars {
            if let Some(path_str) = key.strip_prefix(&prefix_with_sep) {
                if path_str.is_empty() {
                    continue;
                }

                let path = Path::from_segments(
                    path_str
                        .split(self.separator.as_str())
                        .map(|s| s.to_lowercase()),
                );

                entries.push(ConfigEntry::at_path(path, coerce_value(&value)));
            }
        }

        entries
    }
}

impl ConfigSource for EnvSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let entries = self.entries_from(std::env::vars());
        tracing::debug!(prefix = %self.prefix, count = entries.len(), "collected environment overrides");
        Ok(entries)
    }
}

fn coerce_value(s: &str) -> Value {
    // Try boolean first (case-insensitive)
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    // Try integer (only if it looks like an integer: optional minus, then digits)
    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Int(i);
        }
    }

    // Try float (if contains decimal point)
    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float64(f);
        }
    }

    Value::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
