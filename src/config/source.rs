use crate::value::{get_path, set_path, widen, AnyMap, Path, Value};

use super::ConfigError;

/// A value to merge into the configuration at `path`.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub path: Path,
    pub value: Value,
}

impl ConfigEntry {
    pub fn root(map: AnyMap) -> Self {
        Self {
            path: Path::root(),
            value: Value::AnyMap(map),
        }
    }

    pub fn at_path(path: Path, value: Value) -> Self {
        Self { path, value }
    }
}

/// Something configuration can be loaded from.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// Merges `value` into `root` at `path` and returns the new root.
///
/// When both the existing value and `value` are mappings they are merged
/// recursively; otherwise `value` replaces what was there. Missing structure
/// along `path` is created.
pub fn merge_at_path(root: Value, path: &Path, value: Value) -> Value {
    let merged = match (into_mapping(get_path(&root, path).into_value()), into_mapping(value)) {
        (Ok(mut base), Ok(overlay)) => {
            deep_merge(&mut base, overlay);
            Value::AnyMap(base)
        }
        (_, Ok(overlay)) => Value::AnyMap(overlay),
        (_, Err(value)) => value,
    };

    set_path(root, path, merged)
}

fn deep_merge(base: &mut AnyMap, overlay: AnyMap) {
    for (key, value) in overlay {
        let existing = base.remove(&key).map(into_mapping);
        let merged = match (existing, into_mapping(value)) {
            (Some(Ok(mut base_map)), Ok(overlay_map)) => {
                deep_merge(&mut base_map, overlay_map);
                Value::AnyMap(base_map)
            }
            (_, Ok(overlay_map)) => Value::AnyMap(overlay_map),
            (_, Err(value)) => value,
        };
        base.insert(key, merged);
    }
}

/// Returns the dynamic form of a mapping, or the value unchanged otherwise.
fn into_mapping(value: Value) -> Result<AnyMap, Value> {
    match value {
        Value::AnyMap(map) => Ok(map),
        Value::StringMap(_) => match widen(value) {
            Value::AnyMap(map) => Ok(map),
            other => Err(other),
        },
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{get, StringMap};

    fn table(toml_str: &str) -> Value {
        Value::from(toml::Value::Table(toml::from_str(toml_str).unwrap()))
    }

    #[test]
    fn test_merge_at_root_is_deep() {
        let base = table(
            r#"
            [server]
            host = "localhost"
            port = 80
            "#,
        );
        let overlay = table(
            r#"
            [server]
            port = 8080
            "#,
        );
        let merged = merge_at_path(base, &Path::root(), overlay);
        assert_eq!(get(&merged, "server.host").as_string(), "localhost");
        assert_eq!(get(&merged, "server.port").as_int(), 8080);
    }

    #[test]
    fn test_merge_replaces_sequences() {
        let base = table(r#"tags = ["a", "b"]"#);
        let overlay = table(r#"tags = ["c"]"#);
        let merged = merge_at_path(base, &Path::root(), overlay);
        assert_eq!(get(&merged, "tags").as_string_seq(), vec!["c"]);
    }

    #[test]
    fn test_merge_at_nested_path_creates_structure() {
        let merged = merge_at_path(
            Value::AnyMap(AnyMap::new()),
            &Path::parse("database.pool"),
            Value::from(10),
        );
        assert_eq!(get(&merged, "database.pool").as_int(), 10);
    }

    #[test]
    fn test_merge_widens_narrow_base() {
        let mut narrow = StringMap::new();
        narrow.insert("host".into(), "db".into());
        let mut root = AnyMap::new();
        root.insert("database".into(), Value::from(narrow));

        let mut overlay = AnyMap::new();
        overlay.insert("port".into(), Value::from(5432));
        let merged = merge_at_path(
            Value::AnyMap(root),
            &Path::parse("database"),
            Value::AnyMap(overlay),
        );
        assert_eq!(get(&merged, "database.host").as_string(), "db");
        assert_eq!(get(&merged, "database.port").as_int(), 5432);
    }
}
