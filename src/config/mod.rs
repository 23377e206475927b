//! Configuration loading and management.

mod builder;
mod env;
mod error;
mod fields;
mod file;
mod resolve;
mod settings;
mod source;
mod store;

pub use builder::{run_mode, Config, DEFAULT_RUN_MODE, RUN_MODE_VAR};
pub use env::EnvSource;
pub use error::ConfigError;
pub use fields::{Field, FieldTable};
pub use file::{DirSource, FileSource};
pub use settings::{AppSettings, DEFAULT_SECTION, FIELDS};
pub use source::{merge_at_path, ConfigEntry, ConfigSource};
pub use store::ConfigStore;
