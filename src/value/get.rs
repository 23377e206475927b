use super::path::parse_index;
use super::{Path, TypedValue, Value};

/// Resolves a dotted path against `root`.
///
/// Mappings are descended by key, sequences by base-10 index. The first
/// segment that cannot be resolved ends the walk and the result is absent
/// (kind `Nil`). The empty path yields the root itself.
pub fn get<'a>(root: &'a Value, path: &str) -> TypedValue<'a> {
    get_path(root, &Path::parse(path))
}

/// Like [`get`], for an already-parsed [`Path`].
pub fn get_path<'a>(root: &'a Value, path: &Path) -> TypedValue<'a> {
    let mut current = root;
    let segments = path.segments();

    for (i, segment) in segments.iter().enumerate() {
        match step(current, segment) {
            Some(Step::Value(next)) => current = next,
            // Elements of typed containers are materialised, so the rest of
            // the walk continues over an owned copy.
            Some(Step::Owned(element)) => {
                let rest = Path::from_segments(segments[i + 1..].iter().cloned());
                let resolved = get_path(&element, &rest);
                return if resolved.is_present() {
                    TypedValue::new(resolved.into_value())
                } else {
                    TypedValue::absent()
                };
            }
            None => return TypedValue::absent(),
        }
    }

    TypedValue::borrowed(current)
}

enum Step<'a> {
    Value(&'a Value),
    Owned(Value),
}

fn step<'a>(container: &'a Value, segment: &str) -> Option<Step<'a>> {
    match container {
        Value::AnyMap(map) => map.get(segment).map(Step::Value),
        Value::StringMap(map) => map.get(segment).cloned().map(|s| Step::Owned(Value::String(s))),
        Value::AnySeq(items) => items.get(parse_index(segment)?).map(Step::Value),
        Value::StringSeq(items) => element(items, segment).cloned().map(|s| Step::Owned(Value::String(s))),
        Value::IntSeq(items) => element(items, segment).map(|&i| Step::Owned(Value::Int(i))),
        Value::ByteSeq(items) => element(items, segment).map(|&b| Step::Owned(Value::Byte(b))),
        Value::StringMapSeq(maps) => element(maps, segment).cloned().map(|m| Step::Owned(Value::StringMap(m))),
        Value::AnyMapSeq(maps) => element(maps, segment).cloned().map(|m| Step::Owned(Value::AnyMap(m))),
        _ => None,
    }
}

fn element<'a, T>(items: &'a [T], segment: &str) -> Option<&'a T> {
    items.get(parse_index(segment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{AnyMap, Kind, StringMap};

    fn nested() -> Value {
        let mut c = AnyMap::new();
        c.insert("c".into(), Value::from(5));
        let mut b = AnyMap::new();
        b.insert("b".into(), Value::from(c));
        let mut a = AnyMap::new();
        a.insert("a".into(), Value::from(b));
        Value::from(a)
    }

    #[test]
    fn test_get_nested_mapping() {
        let root = nested();
        let found = get(&root, "a.b.c");
        assert_eq!(found.kind(), Kind::Int);
        assert_eq!(found.as_int(), 5);
    }

    #[test]
    fn test_get_missing_key_is_nil() {
        let root = nested();
        let missing = get(&root, "a.b.x");
        assert_eq!(missing.kind(), Kind::NilKind);
        assert!(!missing.is_present());
        assert_eq!(missing.as_int(), 0);
    }

    #[test]
    fn test_get_empty_path_returns_root() {
        let root = nested();
        assert_eq!(get(&root, "").value(), &root);
    }

    #[test]
    fn test_get_stops_at_scalar() {
        let root = nested();
        assert!(!get(&root, "a.b.c.d").is_present());

        let mut map = AnyMap::new();
        map.insert("port".into(), Value::from(8080));
        let root = Value::from(map);
        let below = get(&root, "port.x");
        assert!(!below.is_present());
        assert_eq!(below.kind(), Kind::NilKind);
        assert_eq!(below.as_int(), 0);
    }

    #[test]
    fn test_get_sequence_index() {
        let mut map = AnyMap::new();
        map.insert(
            "list".into(),
            Value::AnySeq(vec![Value::from("zero"), Value::from(vec![10i64, 20])]),
        );
        let root = Value::from(map);

        assert_eq!(get(&root, "list.0").as_string(), "zero");
        assert_eq!(get(&root, "list.1.1").as_int(), 20);
        assert!(!get(&root, "list.2").is_present());
        assert!(!get(&root, "list.x").is_present());
        assert!(!get(&root, "list.-1").is_present());
        assert!(!get(&root, "list.1.9").is_present());
    }

    #[test]
    fn test_get_narrow_containers() {
        let mut narrow = StringMap::new();
        narrow.insert("port".into(), "8080".into());
        let mut map = AnyMap::new();
        map.insert("server".into(), Value::from(narrow.clone()));
        map.insert("hosts".into(), Value::from(vec!["a", "b"]));
        map.insert("pools".into(), Value::from(vec![narrow]));
        let root = Value::from(map);

        assert_eq!(get(&root, "server.port").as_int(), 8080);
        assert_eq!(get(&root, "hosts.1").as_string(), "b");
        assert_eq!(get(&root, "pools.0.port").as_string(), "8080");
        assert!(!get(&root, "server.port.x").is_present());
    }

    #[test]
    fn test_get_escaped_key() {
        let mut map = AnyMap::new();
        map.insert("example.com".into(), Value::from(true));
        let root = Value::from(map);

        assert!(get(&root, r"example\.com").as_bool());
        assert!(!get(&root, "example.com").is_present());
    }
}
