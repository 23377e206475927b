//! Declarative population of typed structs from a configuration section.
//!
//! A [`FieldTable`] lists, for each field, the key it is read from, the
//! [`Kind`] its value is converted to, and a setter that stores the converted
//! value. The table is walked once per load.

use crate::value::{get_path, Kind, Lookup, Path, Value};

/// One entry of a [`FieldTable`].
pub struct Field<T> {
    pub name: &'static str,
    pub kind: Kind,
    pub apply: fn(&mut T, Value),
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

#[derive(Debug)]
pub struct FieldTable<T: 'static> {
    fields: &'static [Field<T>],
}

impl<T: 'static> FieldTable<T> {
    pub const fn new(fields: &'static [Field<T>]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [Field<T>] {
        self.fields
    }

    /// Copies every field present in `section` into `target`.
    ///
    /// Fields absent from `section` keep their current value, as do fields
    /// whose stored value has no conversion to the field's kind. Returns the
    /// number of fields set.
    pub fn populate(&self, target: &mut T, section: &Value) -> usize {
        let mut applied = 0;

        for field in self.fields {
            let found = get_path(section, &Path::from_segments([field.name]));
            match found.lookup(field.kind) {
                Lookup::Found(value) => {
                    (field.apply)(target, value);
                    applied += 1;
                }
                Lookup::Unsupported(kind) => {
                    tracing::warn!(
                        field = field.name,
                        expected = %field.kind,
                        found = %kind,
                        "config field has no conversion to its declared kind, keeping default"
                    );
                }
                Lookup::NotFound => {}
            }
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{AnyMap, FromValue};

    #[derive(Debug, Default, PartialEq)]
    struct Limits {
        name: String,
        max: i64,
        strict: bool,
    }

    static LIMITS: FieldTable<Limits> = FieldTable::new(LIMIT_FIELDS);

    const LIMIT_FIELDS: &[Field<Limits>] = &[
        Field {
            name: "name",
            kind: Kind::String,
            apply: |t: &mut Limits, v: Value| t.name = String::from_value(v).unwrap_or_default(),
        },
        Field {
            name: "max",
            kind: Kind::Int,
            apply: |t: &mut Limits, v: Value| t.max = i64::from_value(v).unwrap_or_default(),
        },
        Field {
            name: "strict",
            kind: Kind::Bool,
            apply: |t: &mut Limits, v: Value| t.strict = bool::from_value(v).unwrap_or_default(),
        },
    ];

    #[test]
    fn test_populate_converts_and_counts() {
        let mut section = AnyMap::new();
        section.insert("name".into(), Value::from("api"));
        section.insert("max".into(), Value::from("250"));
        section.insert("strict".into(), Value::from("true"));

        let mut limits = Limits::default();
        let applied = LIMITS.populate(&mut limits, &Value::from(section));

        assert_eq!(applied, 3);
        assert_eq!(
            limits,
            Limits {
                name: "api".into(),
                max: 250,
                strict: true,
            }
        );
    }

    #[test]
    fn test_populate_keeps_defaults() {
        let mut section = AnyMap::new();
        section.insert("max".into(), Value::from(AnyMap::new()));

        let mut limits = Limits {
            name: "preset".into(),
            max: 10,
            strict: false,
        };
        let applied = LIMITS.populate(&mut limits, &Value::from(section));

        assert_eq!(applied, 0);
        assert_eq!(limits.name, "preset");
        assert_eq!(limits.max, 10);
    }

    #[test]
    fn test_populate_non_mapping_section() {
        let mut limits = Limits::default();
        assert_eq!(LIMITS.populate(&mut limits, &Value::Nil), 0);
    }
}
