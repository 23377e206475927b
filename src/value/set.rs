//! Writing values at a path.
//!
//! A write runs in two phases. The build phase walks the path from the root,
//! detaching each child from its container and recording one [`Hop`] per
//! segment; missing or non-container children are simply recorded as `Nil`.
//! The apply phase then folds the hops back together from the innermost one
//! outward, widening narrow containers when the value being stored does not
//! fit them and synthesising mappings where the path ran out of structure.

use super::get::get_path;
use super::path::parse_index;
use super::{widen, AnyMap, Path, StoreError, Value};

/// Stores `value` at `path` inside `root` and returns the new root.
///
/// Writing never fails. Missing structure is created as dynamic mappings, and
/// a narrow container that cannot hold the written value is widened. A
/// sequence index past the end appends to the sequence, whatever its value;
/// use [`try_set`] to reject such writes instead. The empty path replaces the
/// root with `value`.
///
/// Always use the returned root: it may be a different container than the one
/// passed in.
pub fn set(root: Value, path: &str, value: Value) -> Value {
    set_path(root, &Path::parse(path), value)
}

/// Like [`set`], for an already-parsed [`Path`].
pub fn set_path(root: Value, path: &Path, value: Value) -> Value {
    let chain = build(root, path);
    apply(&mut chain.into_iter(), value)
}

/// Like [`set`], but rejects writes addressing an existing sequence with a
/// non-numeric segment or an index greater than its length.
///
/// The check happens before anything is modified; on failure the untouched
/// root is available through [`StoreError::into_root`].
pub fn try_set(root: Value, path: &str, value: Value) -> Result<Value, StoreError> {
    try_set_path(root, &Path::parse(path), value)
}

/// Like [`try_set`], for an already-parsed [`Path`].
pub fn try_set_path(root: Value, path: &Path, value: Value) -> Result<Value, StoreError> {
    match check(&root, path) {
        Ok(()) => Ok(set_path(root, path, value)),
        Err(rejection) => Err(rejection.into_error(root)),
    }
}

/// A container on the write path and the key to descend next.
///
/// The child addressed by `key` has already been detached from `container`.
#[derive(Debug)]
struct Hop {
    container: Value,
    key: String,
}

fn build(root: Value, path: &Path) -> Vec<Hop> {
    let mut chain = Vec::with_capacity(path.len());
    let mut current = root;

    for segment in path.segments() {
        let (container, child) = detach(current, segment);
        chain.push(Hop {
            container,
            key: segment.clone(),
        });
        current = child;
    }

    chain
}

/// Splits the child addressed by `key` out of `container`.
///
/// Returns `Nil` as the child when the key is missing or `container` is not a
/// mapping or sequence.
fn detach(mut container: Value, key: &str) -> (Value, Value) {
    let child = match &mut container {
        Value::AnyMap(map) => map.remove(key),
        Value::StringMap(map) => map.remove(key).map(Value::String),
        Value::AnySeq(items) => index_in(items, key).map(|i| std::mem::take(&mut items[i])),
        Value::StringSeq(items) => {
            index_in(items, key).map(|i| Value::String(std::mem::take(&mut items[i])))
        }
        Value::IntSeq(items) => index_in(items, key).map(|i| Value::Int(items[i])),
        Value::ByteSeq(items) => index_in(items, key).map(|i| Value::Byte(items[i])),
        Value::StringMapSeq(maps) => {
            index_in(maps, key).map(|i| Value::StringMap(std::mem::take(&mut maps[i])))
        }
        Value::AnyMapSeq(maps) => {
            index_in(maps, key).map(|i| Value::AnyMap(std::mem::take(&mut maps[i])))
        }
        _ => None,
    };
    (container, child.unwrap_or_default())
}

fn index_in<T>(items: &[T], key: &str) -> Option<usize> {
    parse_index(key).filter(|&i| i < items.len())
}

/// Resolves the chain from the root outward. The innermost hop stores `value`
/// itself; every other hop stores what its successor resolved to.
fn apply(hops: &mut impl Iterator<Item = Hop>, value: Value) -> Value {
    match hops.next() {
        Some(hop) => {
            let stored = apply(hops, value);
            hop.store(stored)
        }
        None => value,
    }
}

impl Hop {
    fn store(self, value: Value) -> Value {
        let Hop { container, key } = self;

        match container {
            Value::AnyMap(mut map) => {
                map.insert(key, value);
                Value::AnyMap(map)
            }
            Value::AnySeq(mut items) => {
                put(&mut items, &key, value);
                Value::AnySeq(items)
            }
            Value::StringMap(mut map) => match value {
                Value::String(s) => {
                    map.insert(key, s);
                    Value::StringMap(map)
                }
                value => widen_and_store(Value::StringMap(map), key, value),
            },
            Value::StringSeq(mut items) => match value {
                Value::String(s) => {
                    put(&mut items, &key, s);
                    Value::StringSeq(items)
                }
                value => widen_and_store(Value::StringSeq(items), key, value),
            },
            Value::IntSeq(mut items) => match value {
                Value::Int(i) => {
                    put(&mut items, &key, i);
                    Value::IntSeq(items)
                }
                value => widen_and_store(Value::IntSeq(items), key, value),
            },
            Value::ByteSeq(mut items) => match value {
                Value::Byte(b) => {
                    put(&mut items, &key, b);
                    Value::ByteSeq(items)
                }
                value => widen_and_store(Value::ByteSeq(items), key, value),
            },
            Value::StringMapSeq(mut maps) => match value {
                Value::StringMap(m) => {
                    put(&mut maps, &key, m);
                    Value::StringMapSeq(maps)
                }
                value => widen_and_store(Value::StringMapSeq(maps), key, value),
            },
            Value::AnyMapSeq(mut maps) => match value {
                Value::AnyMap(m) => {
                    put(&mut maps, &key, m);
                    Value::AnyMapSeq(maps)
                }
                value => widen_and_store(Value::AnyMapSeq(maps), key, value),
            },
            other => {
                if !other.is_nil() {
                    tracing::trace!(kind = %other.kind(), key = key.as_str(), "replacing non-container with a mapping");
                }
                let mut map = AnyMap::new();
                map.insert(key, value);
                Value::AnyMap(map)
            }
        }
    }
}

fn widen_and_store(container: Value, key: String, value: Value) -> Value {
    tracing::trace!(
        from = %container.kind(),
        stored = %value.kind(),
        key = key.as_str(),
        "widening narrow container"
    );
    Hop {
        container: widen(container),
        key,
    }
    .store(value)
}

/// Overwrites an element in bounds; anything else appends.
fn put<T>(items: &mut Vec<T>, key: &str, item: T) {
    match parse_index(key) {
        Some(i) if i < items.len() => items[i] = item,
        _ => items.push(item),
    }
}

enum Rejection {
    OutOfRange { path: String, index: usize, len: usize },
    NotAnIndex { path: String, segment: String },
}

impl Rejection {
    fn into_error(self, root: Value) -> StoreError {
        let root = Box::new(root);
        match self {
            Rejection::OutOfRange { path, index, len } => StoreError::IndexOutOfRange {
                path,
                index,
                len,
                root,
            },
            Rejection::NotAnIndex { path, segment } => StoreError::InvalidIndex {
                path,
                segment,
                root,
            },
        }
    }
}

/// Verifies every existing sequence on the path is addressed by an index no
/// greater than its length. Only structure that already exists is checked.
fn check(root: &Value, path: &Path) -> Result<(), Rejection> {
    for (depth, segment) in path.segments().iter().enumerate() {
        let at = path.prefix(depth);
        let container = get_path(root, &at);
        let container = container.value();

        if container.kind().is_mapping() {
            continue;
        }
        let Some(len) = sequence_len(container) else {
            return Ok(());
        };

        match parse_index(segment) {
            Some(index) if index <= len => {}
            Some(index) => {
                return Err(Rejection::OutOfRange {
                    path: at.to_string(),
                    index,
                    len,
                })
            }
            None => {
                return Err(Rejection::NotAnIndex {
                    path: at.to_string(),
                    segment: segment.clone(),
                })
            }
        }
    }
    Ok(())
}

fn sequence_len(value: &Value) -> Option<usize> {
    match value {
        Value::AnySeq(items) => Some(items.len()),
        Value::StringSeq(items) => Some(items.len()),
        Value::IntSeq(items) => Some(items.len()),
        Value::ByteSeq(items) => Some(items.len()),
        Value::StringMapSeq(maps) => Some(maps.len()),
        Value::AnyMapSeq(maps) => Some(maps.len()),
        _ => None,
    }
}
