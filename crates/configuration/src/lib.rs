use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
#[cfg(feature = "clap")]
pub mod overrides;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
#[cfg(feature = "clap")]
pub use overrides::AnalyticsOverrides;
pub use settings::{AnalyticsSettings, LoggingSettings, OptimizerSettings};

/// Prefix of the environment variables that override file settings, e.g.
/// `TURINGQUANT__ANALYTICS__RISK_FREE_RATE=0.1`.
pub const ENV_PREFIX: &str = "TURINGQUANT";

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional: without it every setting takes its default value.
/// Environment variables are layered on top of the file.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(None)
}

/// Loads the configuration from an explicit file, which then must exist.
pub fn load_config_from(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    load_layered(file, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_layered<S>(file: S, environment: config::Environment) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
