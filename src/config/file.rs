//! File-based configuration sources.

use std::path::{Path, PathBuf};

use crate::value::{AnyMap, Path as ValuePath, Value};

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// A configuration source that loads a single TOML, JSON or YAML file.
///
/// The format is chosen by extension. Files can be marked as required or
/// optional. Required files that don't exist cause an error; optional files
/// that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, the build will fail if the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for FileSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        match load_config_file(&self.path, self.required)? {
            Some(map) => Ok(vec![ConfigEntry::root(map)]),
            None => Ok(vec![]),
        }
    }
}

/// A configuration source that loads every config file in a directory.
///
/// Each `.toml`, `.json`, `.yml` or `.yaml` file is mounted under its file
/// stem, so `dir/database.toml` becomes the `database` section. Files are read
/// in name order; files with an unknown extension are ignored.
#[derive(Debug, Clone)]
pub struct DirSource {
    path: PathBuf,
    required: bool,
}

impl DirSource {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for DirSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let read_dir = match std::fs::read_dir(&self.path) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.required {
                    return Err(ConfigError::DirNotFound(self.path.clone()));
                }
                tracing::debug!(path = %self.path.display(), "optional config directory not found, skipping");
                return Ok(vec![]);
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| ConfigError::ReadError {
                path: self.path.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() && Format::of(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();

        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(map) = load_config_file(&path, true)? {
                entries.push(ConfigEntry::at_path(
                    ValuePath::from_segments([stem]),
                    Value::AnyMap(map),
                ));
            }
        }

        Ok(entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            "yml" | "yaml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Loads and parses a config file into a dynamic mapping.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
pub(crate) fn load_config_file(path: &Path, required: bool) -> Result<Option<AnyMap>, ConfigError> {
    let format = Format::of(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "optional config file not found, skipping");
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let value = match format {
        Format::Toml => {
            let table: toml::Table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Value::from(toml::Value::Table(table))
        }
        Format::Json => {
            let json: serde_json::Value =
                serde_json::from_str(&contents).map_err(|e| ConfigError::JsonParseError {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            Value::from(json)
        }
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&contents).map_err(|e| ConfigError::YamlParseError {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            Value::from(yaml)
        }
    };

    match value {
        Value::AnyMap(map) => Ok(Some(map)),
        _ => Err(ConfigError::NotATable(path.to_path_buf())),
    }
}
