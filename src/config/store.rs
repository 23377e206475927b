use serde::de::DeserializeOwned;

use crate::value::{self, AnyMap, Path, StoreError, TypedValue, Value};

use super::source::merge_at_path;
use super::ConfigError;

/// Loaded configuration, addressable by dotted path.
///
/// A store is built once (usually by [`Config::build`](super::Config::build))
/// and passed to whatever needs it. It does no locking of its own; share it
/// behind a lock when it has to be written concurrently, as
/// [`AppContext`](crate::AppContext) does.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    root: Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(AnyMap::new())
    }
}

impl ConfigStore {
    pub fn new(root: AnyMap) -> Self {
        Self {
            root: Value::AnyMap(root),
        }
    }

    /// Wraps an arbitrary value as the store root.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn get(&self, path: &str) -> TypedValue<'_> {
        value::get(&self.root, path)
    }

    pub fn get_path(&self, path: &Path) -> TypedValue<'_> {
        value::get_path(&self.root, path)
    }

    /// Writes `value` at `path`, creating structure as needed.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let root = std::mem::take(&mut self.root);
        self.root = value::set(root, path, value.into());
    }

    /// Writes `value` at `path`, rejecting out-of-range sequence indices.
    /// The store is left unchanged on error.
    pub fn try_set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let root = std::mem::take(&mut self.root);
        match value::try_set(root, path, value.into()) {
            Ok(root) => {
                self.root = root;
                Ok(())
            }
            Err(mut e) => {
                self.root = e.take_root();
                Err(e)
            }
        }
    }

    /// Merges `value` at `path`: mappings merge recursively, anything else
    /// replaces the existing value.
    pub fn merge(&mut self, path: &str, value: impl Into<Value>) {
        let root = std::mem::take(&mut self.root);
        self.root = merge_at_path(root, &Path::parse(path), value.into());
    }

    /// Deserializes the subtree at `path` into `T`. The empty path
    /// deserializes the whole store.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let json = serde_json::to_value(self.get(path).value())?;
        Ok(serde_json::from_value(json)?)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn store() -> ConfigStore {
        let table: toml::Table = toml::from_str(
            r#"
            [database]
            host = "localhost"
            port = 5432
            replicas = ["r1", "r2"]
            "#,
        )
        .unwrap();
        ConfigStore::from_value(Value::from(toml::Value::Table(table)))
    }

    #[test]
    fn test_get_and_set() {
        let mut store = store();
        assert_eq!(store.get("database.port").as_int(), 5432);

        store.set("database.port", 6432);
        store.set("cache.ttl", 30);
        assert_eq!(store.get("database.port").as_int(), 6432);
        assert_eq!(store.get("cache.ttl").as_int(), 30);
    }

    #[test]
    fn test_try_set_keeps_store_on_error() {
        let mut store = store();
        let before = store.clone();

        let err = store.try_set("database.replicas.7", "r8").unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 7, len: 2, .. }));
        assert_eq!(store, before);

        store.try_set("database.replicas.2", "r3").unwrap();
        assert_eq!(store.get("database.replicas.2").as_string(), "r3");
    }

    #[test]
    fn test_merge_section() {
        let mut store = store();
        let mut overlay = AnyMap::new();
        overlay.insert("port".into(), Value::from(7000));
        store.merge("database", overlay);

        assert_eq!(store.get("database.host").as_string(), "localhost");
        assert_eq!(store.get("database.port").as_int(), 7000);
    }

    #[test]
    fn test_extract_typed_section() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Database {
            host: String,
            port: u16,
            replicas: Vec<String>,
        }

        let db: Database = store().extract("database").unwrap();
        assert_eq!(
            db,
            Database {
                host: "localhost".into(),
                port: 5432,
                replicas: vec!["r1".into(), "r2".into()],
            }
        );
    }

    #[test]
    fn test_extract_reports_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Strict {
            port: String,
        }

        let result = store().extract::<Strict>("database");
        assert!(matches!(result, Err(ConfigError::DeserializeError(_))));
    }
}
