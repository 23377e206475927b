pub mod config;
pub mod context;
mod error;
pub mod value;

pub use config::{AppSettings, Config, ConfigError, ConfigStore};
pub use context::AppContext;
pub use error::Error;
pub use value::{get, set, try_set, Kind, Path, TypedValue, Value};
