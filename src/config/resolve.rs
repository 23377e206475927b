//! `${path}` references between configuration values.
//!
//! A string can embed any scalar of the same tree, e.g.
//! `"http://${server.host}:${server.port}"`; paths use the store's syntax, so
//! `${hosts.0}` reads a sequence element. `$$` produces a literal `$`.
//!
//! References are expanded against the tree as loaded. A referenced string is
//! expanded first, so chains resolve in a single walk and escaped text is
//! never read a second time.

use super::ConfigError;
use crate::value::{get_path, Path, Value};

/// Expands every reference in `root`.
pub fn resolve_references(root: &mut Value) -> Result<(), ConfigError> {
    let source = root.clone();
    let expanded = expand_value(root, &source)?;
    if expanded > 0 {
        tracing::trace!(expanded, "expanded configuration references");
    }
    Ok(())
}

fn expand_value(value: &mut Value, source: &Value) -> Result<usize, ConfigError> {
    match value {
        Value::String(s) => expand_in_place(s, source),
        Value::StringSeq(items) => items
            .iter_mut()
            .try_fold(0, |n, s| expand_in_place(s, source).map(|k| n + k)),
        Value::StringMap(map) => map
            .values_mut()
            .try_fold(0, |n, s| expand_in_place(s, source).map(|k| n + k)),
        Value::StringMapSeq(maps) => maps
            .iter_mut()
            .flat_map(|map| map.values_mut())
            .try_fold(0, |n, s| expand_in_place(s, source).map(|k| n + k)),
        Value::AnySeq(items) => items
            .iter_mut()
            .try_fold(0, |n, v| expand_value(v, source).map(|k| n + k)),
        Value::AnyMapSeq(maps) => maps
            .iter_mut()
            .flat_map(|map| map.values_mut())
            .try_fold(0, |n, v| expand_value(v, source).map(|k| n + k)),
        Value::AnyMap(map) => map
            .values_mut()
            .try_fold(0, |n, v| expand_value(v, source).map(|k| n + k)),
        _ => Ok(0),
    }
}

fn expand_in_place(text: &mut String, source: &Value) -> Result<usize, ConfigError> {
    if !text.contains('$') {
        return Ok(0);
    }
    let mut expanding = Vec::new();
    let (expanded, count) = expand(text, source, &mut expanding)?;
    *text = expanded;
    Ok(count)
}

/// Expands `text`, returning the new text and the number of references
/// replaced. `expanding` holds the references currently being expanded.
fn expand(
    text: &str,
    source: &Value,
    expanding: &mut Vec<String>,
) -> Result<(String, usize), ConfigError> {
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut rest = text;

    while let Some(at) = rest.find('$') {
        out.push_str(&rest[..at]);
        let tail = &rest[at + 1..];

        if let Some(after) = tail.strip_prefix('$') {
            out.push('$');
            rest = after;
        } else if let Some(body) = tail.strip_prefix('{') {
            let end = body.find('}').ok_or(ConfigError::UnclosedReference)?;
            let reference = &body[..end];
            out.push_str(&referenced_text(reference, source, expanding)?);
            count += 1;
            rest = &body[end + 1..];
        } else {
            out.push('$');
            rest = tail;
        }
    }
    out.push_str(rest);

    Ok((out, count))
}

fn referenced_text(
    reference: &str,
    source: &Value,
    expanding: &mut Vec<String>,
) -> Result<String, ConfigError> {
    let path = Path::parse(reference);
    if path.is_root() || path.segments().iter().any(String::is_empty) {
        return Err(ConfigError::InvalidReferencePath(reference.to_string()));
    }
    if expanding.iter().any(|r| r == reference) {
        return Err(ConfigError::CircularReference);
    }

    let found = get_path(source, &path);
    if !found.is_present() {
        return Err(ConfigError::ReferenceNotFound(reference.to_string()));
    }

    match found.value() {
        Value::String(s) => {
            expanding.push(reference.to_string());
            let expanded = expand(s, source, expanding);
            expanding.pop();
            expanded.map(|(text, _)| text)
        }
        other => scalar_text(other)
            .ok_or_else(|| ConfigError::NonScalarReference(reference.to_string())),
    }
}

/// Scalars render as written; floats keep their fraction. A byte is the
/// character it encodes, as in a Byte to String conversion.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Int(i) | Value::Int64(i) => Some(i.to_string()),
        Value::Byte(b) => Some(char::from(*b).to_string()),
        Value::Rune(c) => Some(c.to_string()),
        Value::Float64(f) => Some(f.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{convert, get, AnyMap, Kind, StringMap};

    fn tree(source: &str) -> Value {
        Value::from(toml::Value::Table(toml::from_str(source).unwrap()))
    }

    fn resolved(source: &str) -> Value {
        let mut root = tree(source);
        resolve_references(&mut root).unwrap();
        root
    }

    #[test]
    fn test_reference_to_sibling_section() {
        let root = resolved(
            r#"
            [database]
            host = "db.local"
            port = 5432

            [service]
            dsn = "postgres://${database.host}:${database.port}/ledger"
            "#,
        );
        assert_eq!(
            get(&root, "service.dsn").as_string(),
            "postgres://db.local:5432/ledger"
        );
    }

    #[test]
    fn test_chain_resolves_in_one_walk() {
        let root = resolved(
            r#"
            root_dir = "/srv"
            data_dir = "${root_dir}/data"
            cache_dir = "${data_dir}/cache"
            "#,
        );
        assert_eq!(get(&root, "cache_dir").as_string(), "/srv/data/cache");
        assert_eq!(get(&root, "data_dir").as_string(), "/srv/data");
    }

    #[test]
    fn test_escape_survives_alongside_reference() {
        let root = resolved(
            r#"
            user = "svc"
            hint = "export HOME=$${HOME} for ${user}"
            "#,
        );
        assert_eq!(get(&root, "hint").as_string(), "export HOME=${HOME} for svc");
    }

    #[test]
    fn test_escape_inside_referenced_value() {
        let root = resolved(
            r#"
            price = "$$5"
            label = "costs ${price}"
            "#,
        );
        assert_eq!(get(&root, "label").as_string(), "costs $5");
        assert_eq!(get(&root, "price").as_string(), "$5");
    }

    #[test]
    fn test_lone_dollar_is_kept() {
        let root = resolved(r#"note = "pay $ now""#);
        assert_eq!(get(&root, "note").as_string(), "pay $ now");
    }

    #[test]
    fn test_scalars_render_as_written() {
        let root = resolved(
            r#"
            ratio = 0.75
            debug = true
            summary = "ratio=${ratio} debug=${debug}"
            "#,
        );
        assert_eq!(get(&root, "summary").as_string(), "ratio=0.75 debug=true");
    }

    #[test]
    fn test_sequence_elements_resolve_and_are_addressable() {
        let root = resolved(
            r#"
            mirrors = ["eu.example", "us.example"]
            primary = "${mirrors.0}"
            routes = ["${primary}/a", "${mirrors.1}/b"]
            "#,
        );
        assert_eq!(get(&root, "primary").as_string(), "eu.example");
        assert_eq!(
            get(&root, "routes").as_string_seq(),
            vec!["eu.example/a", "us.example/b"]
        );
    }

    #[test]
    fn test_references_inside_map_sequences() {
        let mut replica = StringMap::new();
        replica.insert("url".into(), "${base}/replica".into());
        let mut primary = AnyMap::new();
        primary.insert("url".into(), Value::from("${base}/primary"));
        primary.insert("grade".into(), Value::from("${grade}"));

        let mut root = AnyMap::new();
        root.insert("base".into(), Value::from("db.local"));
        root.insert("grade".into(), Value::Byte(b'A'));
        root.insert("replicas".into(), Value::StringMapSeq(vec![replica]));
        root.insert("primaries".into(), Value::AnyMapSeq(vec![primary]));
        let mut root = Value::from(root);

        resolve_references(&mut root).unwrap();
        assert_eq!(get(&root, "replicas.0.url").as_string(), "db.local/replica");
        assert_eq!(get(&root, "primaries.0.url").as_string(), "db.local/primary");
        assert_eq!(get(&root, "primaries.0.grade").as_string(), "A");
        assert_eq!(
            Some(get(&root, "primaries.0.grade").into_value()),
            convert(&Value::Byte(b'A'), Kind::String)
        );
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut root = tree(
            r#"
            left = "${right}"
            right = "x${left}"
            "#,
        );
        assert!(matches!(
            resolve_references(&mut root),
            Err(ConfigError::CircularReference)
        ));

        let mut root = tree(r#"me = "${me}""#);
        assert!(matches!(
            resolve_references(&mut root),
            Err(ConfigError::CircularReference)
        ));
    }

    #[test]
    fn test_bad_references() {
        let cases = [
            (r#"a = "${missing.key}""#, "not found"),
            ("[t]\nk = 1\n[u]\nv = \"${t}\"", "non-scalar"),
            (r#"a = "${x..y}""#, "invalid"),
            (r#"a = "${}""#, "invalid"),
            (r#"a = "${open""#, "unclosed"),
        ];
        for (source, expected) in cases {
            let mut root = tree(source);
            let err = resolve_references(&mut root).unwrap_err();
            let matched = match expected {
                "not found" => matches!(err, ConfigError::ReferenceNotFound(_)),
                "non-scalar" => matches!(err, ConfigError::NonScalarReference(_)),
                "invalid" => matches!(err, ConfigError::InvalidReferencePath(_)),
                _ => matches!(err, ConfigError::UnclosedReference),
            };
            assert!(matched, "{source}: unexpected {err:?}");
        }
    }
}
