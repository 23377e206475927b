use std::path::Path;

use crate::value::{AnyMap, Value};

use super::env::EnvSource;
use super::file::{DirSource, FileSource};
use super::resolve::resolve_references;
use super::source::{merge_at_path, ConfigEntry, ConfigSource};
use super::{ConfigError, ConfigStore};

/// Environment variable read by [`Config::with_run_mode_dir`] when the caller
/// has no variable of its own.
pub const RUN_MODE_VAR: &str = "DYNSTORE_RUNMODE";

/// Run mode used when the variable is unset or blank.
pub const DEFAULT_RUN_MODE: &str = "dev";

/// The run mode (`dev`, `test`, `prod`, ...) named by the environment
/// variable `var`, or [`DEFAULT_RUN_MODE`].
pub fn run_mode(var: &str) -> String {
    run_mode_or_default(std::env::var(var).ok())
}

fn run_mode_or_default(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_RUN_MODE.to_string())
}

/// Builder for loading configuration from files, directories and the
/// environment into a [`ConfigStore`].
///
/// Sources are merged in registration order, with later sources overriding
/// earlier ones. Nested mappings are merged recursively; other values
/// (including sequences) are replaced entirely.
///
/// ## Variable References
///
/// String values can reference other config values using `${path.to.field}` syntax:
///
/// ```toml
/// [server]
/// host = "localhost"
/// port = 8080
/// url = "http://${server.host}:${server.port}/api"
/// ```
///
/// Use `$$` to escape a literal `$` (e.g., `$${VAR}` becomes `${VAR}`).
///
/// ## Example
///
/// ```no_run
/// use dynstore::Config;
///
/// let store = Config::builder()
///     .with_file("config/default.toml", true)
///     .with_run_mode_dir("config", dynstore::config::RUN_MODE_VAR)
///     .with_env("MYAPP", "__")
///     .build()?;
///
/// let port = store.get("server.port").as_int();
/// # Ok::<(), dynstore::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    defaults: AnyMap,
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Values every other source is layered over.
    pub fn with_defaults(mut self, defaults: AnyMap) -> Self {
        self.defaults = defaults;
        self
    }

    /// Adds a TOML, JSON or YAML file to be loaded; the format follows the extension.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds every `.toml`, `.json` and `.yml` file in a directory, each mounted under
    /// its file stem (`dir/database.toml` becomes the `database` section).
    pub fn with_dir(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(DirSource::new(path, required))
    }

    /// Adds the directory of the current run mode, `base/<mode>`, where the
    /// mode comes from the environment variable `var` (see [`run_mode`]).
    ///
    /// The directory is mounted like [`with_dir`](Self::with_dir); a missing
    /// directory contributes nothing.
    pub fn with_run_mode_dir(self, base: impl AsRef<Path>, var: &str) -> Self {
        let mode = run_mode(var);
        let dir = base.as_ref().join(&mode);
        tracing::debug!(mode = %mode, dir = %dir.display(), "selected run mode config directory");
        self.with_dir(dir, false)
    }

    /// Loads configuration from environment variables with the given prefix.
    ///
    /// Environment variables are mapped to config paths by:
    /// 1. Removing the prefix and separator
    /// 2. Splitting remaining segments on the separator
    /// 3. Converting path segments to lowercase
    ///
    /// Values are coerced from strings to the most specific type:
    /// integer, float, boolean, or string (fallback).
    ///
    /// With `MYAPP__DATABASE__PORT=5432`, `store.get("database.port")` is the
    /// integer `5432`.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Adds a custom source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Loads and merges every source, then resolves `${...}` references.
    pub fn build(self) -> Result<ConfigStore, ConfigError> {
        let mut merged = Value::AnyMap(self.defaults);

        for source in &self.sources {
            let entries = source.entries()?;
            tracing::debug!(source = ?source, entries = entries.len(), "loaded config source");
            for ConfigEntry { path, value } in entries {
                merged = merge_at_path(merged, &path, value);
            }
        }

        // Resolve ${...} references after all sources are merged
        resolve_references(&mut merged)?;

        Ok(ConfigStore::from_value(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    #[derive(Debug)]
    struct Fixed(Vec<ConfigEntry>);

    impl ConfigSource for Fixed {
        fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_later_files_override_earlier() {
        let mut base = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(base, "[server]\nhost = \"localhost\"\nport = 80").unwrap();
        let mut local = Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(local, r#"{{"server": {{"port": 8080}}}}"#).unwrap();

        let store = Config::builder()
            .with_file(base.path(), true)
            .with_file(local.path(), true)
            .with_file("/nonexistent/optional.toml", false)
            .build()
            .unwrap();

        assert_eq!(store.get("server.host").as_string(), "localhost");
        assert_eq!(store.get("server.port").as_int(), 8080);
    }

    #[test]
    fn test_defaults_are_overridden() {
        let mut defaults = AnyMap::new();
        defaults.insert("level".into(), Value::from("info"));
        defaults.insert("workers".into(), Value::from(4));

        let store = Config::builder()
            .with_defaults(defaults)
            .with_source(Fixed(vec![ConfigEntry::at_path(
                crate::value::Path::parse("level"),
                Value::from("debug"),
            )]))
            .build()
            .unwrap();

        assert_eq!(store.get("level").as_string(), "debug");
        assert_eq!(store.get("workers").as_int(), 4);
    }

    #[test]
    fn test_dir_sections_and_references() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("server.toml"),
            "host = \"example.com\"\nport = 443\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("client.toml"),
            "endpoint = \"https://${server.host}:${server.port}\"\n",
        )
        .unwrap();

        let store = Config::builder().with_dir(dir.path(), true).build().unwrap();
        assert_eq!(
            store.get("client.endpoint").as_string(),
            "https://example.com:443"
        );
    }

    #[test]
    fn test_run_mode_falls_back_to_dev() {
        assert_eq!(run_mode_or_default(None), "dev");
        assert_eq!(run_mode_or_default(Some("  ".into())), "dev");
        assert_eq!(run_mode_or_default(Some("prod".into())), "prod");
        assert_eq!(run_mode("DYNSTORE_TEST_RUNMODE_NEVER_SET"), "dev");
    }

    #[test]
    fn test_run_mode_dir_follows_environment() {
        let base = TempDir::new().unwrap();
        for mode in ["dev", "prod"] {
            let dir = base.path().join(mode);
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join("app.yml"), format!("main:\n  run_mode: {mode}\n")).unwrap();
        }

        std::env::set_var("DYNSTORE_TEST_RUNMODE_PROD", "prod");
        let store = Config::builder()
            .with_run_mode_dir(base.path(), "DYNSTORE_TEST_RUNMODE_PROD")
            .build()
            .unwrap();
        assert_eq!(store.get("app.main.run_mode").as_string(), "prod");

        let store = Config::builder()
            .with_run_mode_dir(base.path(), "DYNSTORE_TEST_RUNMODE_UNSET")
            .build()
            .unwrap();
        assert_eq!(store.get("app.main.run_mode").as_string(), "dev");

        let store = Config::builder()
            .with_run_mode_dir(base.path().join("missing"), "DYNSTORE_TEST_RUNMODE_UNSET")
            .build()
            .unwrap();
        assert!(!store.get("app").is_present());
    }

    #[test]
    fn test_required_file_missing_fails() {
        let result = Config::builder()
            .with_file("/nonexistent/required.toml", true)
            .build();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
