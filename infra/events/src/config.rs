use crate::error::{EmitterError, EmitterErrorExt};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const DEFAULT_NAME: &str = "herald";
/// Matches the conventional leak threshold of event emitters.
const DEFAULT_MAX_LISTENERS: usize = 10;
const ENV_PREFIX: &str = "HERALD";

/// Tunables for an [`crate::EventEmitter`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Identifier attached to every log record of the emitter.
    pub name: String,
    /// Per-event listener count above which a leak warning is logged.
    /// `0` disables the check.
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { name: DEFAULT_NAME.to_owned(), max_listeners: DEFAULT_MAX_LISTENERS }
    }
}

impl EmitterConfig {
    /// Loads the configuration from an optional file, overlaid with environment variables.
    ///
    /// Environment variables use the `HERALD` prefix and `__` separators
    /// (e.g. `HERALD__MAX_LISTENERS=32`). Missing values fall back to
    /// [`EmitterConfig::default`].
    ///
    /// # Errors
    /// Returns [`EmitterError::Config`] if the given file is missing or malformed, or
    /// [`EmitterError::InvalidConfiguration`] if the resulting values fail validation.
    ///
    /// # Example
    /// ```rust
    /// use herald_events::EmitterConfig;
    ///
    /// let config = EmitterConfig::load(None::<&str>).unwrap();
    /// assert!(config.max_listeners > 0);
    /// ```
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self, EmitterError> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .convert_case(config::Case::Snake);
        Self::load_with(path.as_ref().map(AsRef::as_ref), environment)
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self, EmitterError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading emitter config from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(environment)
            .build()
            .context("Failed to build emitter config")?
            .try_deserialize::<Self>()
            .context("Failed to deserialize emitter config")?;

        config.validate().context("Validating emitter config")?;
        Ok(config)
    }

    /// Checks that the values are usable.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidConfiguration`] if `name` is blank.
    pub fn validate(&self) -> Result<(), EmitterError> {
        if self.name.trim().is_empty() {
            return Err(EmitterError::InvalidConfiguration {
                message: "Emitter name cannot be empty".into(),
                context: None,
            });
        }
        Ok(())
    }
}
