//! Application context for managing shared application state.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::config::{AppSettings, ConfigStore, DEFAULT_SECTION};
use crate::Error;

/// A configuration store shared between threads.
pub type SharedConfig = Arc<RwLock<ConfigStore>>;

/// Central application context holding configuration and derived settings.
///
/// Built once at startup and passed to whatever needs it, instead of a
/// process-wide configuration global. Writes to the store are serialized
/// through the context's lock.
///
/// ## Example
///
/// ```no_run
/// use dynstore::{AppContext, Config};
///
/// let ctx = AppContext::builder()
///     .with_config(
///         Config::builder()
///             .with_file("config.toml", true)
///             .build()?,
///     )
///     .build()?;
///
/// let port = ctx.read().get("server.port").as_int();
/// ctx.update(|store| store.set("server.port", port + 1));
/// println!("running {}", ctx.settings().app_name);
/// # Ok::<(), dynstore::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AppContext {
    config: SharedConfig,
    settings: Arc<AppSettings>,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder {
            config: None,
            settings_section: DEFAULT_SECTION.to_string(),
        }
    }

    /// Locks the store for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, ConfigStore> {
        self.config.read()
    }

    /// Runs `f` with exclusive access to the store.
    pub fn update<R>(&self, f: impl FnOnce(&mut ConfigStore) -> R) -> R {
        let mut store = self.config.write();
        f(&mut store)
    }

    /// A handle to the store that can be moved to other threads.
    pub fn shared(&self) -> SharedConfig {
        Arc::clone(&self.config)
    }

    /// Settings decoded when the context was built.
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    config: Option<ConfigStore>,
    settings_section: String,
}

impl AppContextBuilder {
    /// Attaches a configuration to the application context.
    ///
    /// The configuration should be the result of [`Config::build`](crate::Config::build).
    pub fn with_config(mut self, config: ConfigStore) -> Self {
        self.config = Some(config);
        self
    }

    /// Section [`AppSettings`] are read from. Defaults to `app.main`.
    pub fn with_settings_section(mut self, section: impl Into<String>) -> Self {
        self.settings_section = section.into();
        self
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no configuration was provided.
    pub fn build(self) -> Result<AppContext, Error> {
        let config = self.config.ok_or(Error::MissingConfig)?;
        let settings = AppSettings::from_store(&config, &self.settings_section);

        Ok(AppContext {
            config: Arc::new(RwLock::new(config)),
            settings: Arc::new(settings),
        })
    }
}
