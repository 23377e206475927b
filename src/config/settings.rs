//! Application-level settings read from a configuration section.

use crate::value::{FromValue, Kind, Value};

use super::fields::{Field, FieldTable};
use super::ConfigStore;

/// Settings that control how the application itself runs.
///
/// Populated from a configuration section (by default `app.main`) through
/// [`FIELDS`]; keys absent from the section keep the defaults below.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub app_name: String,
    pub app_version: String,
    /// `dev`, `test` or `prod`.
    pub run_mode: String,
    pub enable_http: bool,
    pub http_addr: String,
    pub enable_https: bool,
    pub https_addr: String,
    pub https_cert_file: String,
    pub https_key_file: String,
    pub recover_panic: bool,
    /// `debug` or `release`.
    pub log_pattern: String,
    /// 1: text, 2: json.
    pub log_store_format: i64,
    /// `local`, `syslog`, ...
    pub log_storage: String,
    pub project_name: String,
    pub init_db: bool,
    pub init_redis: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "app".to_string(),
            app_version: String::new(),
            run_mode: "dev".to_string(),
            enable_http: true,
            http_addr: ":8080".to_string(),
            enable_https: false,
            https_addr: ":10443".to_string(),
            https_cert_file: String::new(),
            https_key_file: String::new(),
            recover_panic: false,
            log_pattern: "debug".to_string(),
            log_store_format: 1,
            log_storage: "local".to_string(),
            project_name: String::new(),
            init_db: true,
            init_redis: true,
        }
    }
}

/// The section [`AppSettings::from_store`] reads when none is given.
pub const DEFAULT_SECTION: &str = "app.main";

impl AppSettings {
    /// Reads settings from `section` of `store`, starting from the defaults.
    pub fn from_store(store: &ConfigStore, section: &str) -> Self {
        let mut settings = Self::default();
        let found = store.get(section);
        let applied = FIELDS.populate(&mut settings, found.value());
        tracing::debug!(section, applied, "loaded application settings");
        settings
    }
}

fn string(v: Value) -> String {
    String::from_value(v).unwrap_or_default()
}

fn boolean(v: Value) -> bool {
    bool::from_value(v).unwrap_or_default()
}

/// Where each [`AppSettings`] field is read from.
pub static FIELDS: FieldTable<AppSettings> = FieldTable::new(SETTINGS_FIELDS);

const SETTINGS_FIELDS: &[Field<AppSettings>] = &[
    Field {
        name: "app_name",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.app_name = string(v),
    },
    Field {
        name: "app_version",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.app_version = string(v),
    },
    Field {
        name: "run_mode",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.run_mode = string(v),
    },
    Field {
        name: "enable_http",
        kind: Kind::Bool,
        apply: |s: &mut AppSettings, v: Value| s.enable_http = boolean(v),
    },
    Field {
        name: "http_addr",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.http_addr = string(v),
    },
    Field {
        name: "enable_https",
        kind: Kind::Bool,
        apply: |s: &mut AppSettings, v: Value| s.enable_https = boolean(v),
    },
    Field {
        name: "https_addr",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.https_addr = string(v),
    },
    Field {
        name: "https_cert_file",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.https_cert_file = string(v),
    },
    Field {
        name: "https_key_file",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.https_key_file = string(v),
    },
    Field {
        name: "recover_panic",
        kind: Kind::Bool,
        apply: |s: &mut AppSettings, v: Value| s.recover_panic = boolean(v),
    },
    Field {
        name: "log_pattern",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.log_pattern = string(v),
    },
    Field {
        name: "log_store_format",
        kind: Kind::Int64,
        apply: |s: &mut AppSettings, v: Value| s.log_store_format = i64::from_value(v).unwrap_or(1),
    },
    Field {
        name: "log_storage",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.log_storage = string(v),
    },
    Field {
        name: "project_name",
        kind: Kind::String,
        apply: |s: &mut AppSettings, v: Value| s.project_name = string(v),
    },
    Field {
        name: "init_db",
        kind: Kind::Bool,
        apply: |s: &mut AppSettings, v: Value| s.init_db = boolean(v),
    },
    Field {
        name: "init_redis",
        kind: Kind::Bool,
        apply: |s: &mut AppSettings, v: Value| s.init_redis = boolean(v),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_section_missing() {
        let settings = AppSettings::from_store(&ConfigStore::default(), DEFAULT_SECTION);
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_reads_section_with_coercion() {
        let mut store = ConfigStore::default();
        store.set("app.main.app_name", "billing");
        store.set("app.main.run_mode", "prod");
        store.set("app.main.enable_https", true);
        store.set("app.main.log_store_format", "2");
        store.set("app.main.http_addr", ":9000");
        store.set("app.main.init_redis", "yes");

        let settings = AppSettings::from_store(&store, DEFAULT_SECTION);
        assert_eq!(settings.app_name, "billing");
        assert_eq!(settings.run_mode, "prod");
        assert!(settings.enable_https);
        assert_eq!(settings.log_store_format, 2);
        assert_eq!(settings.http_addr, ":9000");
        // Only the exact literal "true" is true.
        assert!(!settings.init_redis);
        assert_eq!(settings.https_addr, ":10443");
    }

    #[test]
    fn test_every_field_has_a_unique_name() {
        let mut names: Vec<_> = FIELDS.fields().iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FIELDS.fields().len());
    }
}
