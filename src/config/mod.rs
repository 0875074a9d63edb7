mod settings;

use std::path::Path;

use crate::config::settings::PartialSettings;
use config::{Config, Environment, File};

pub use config::ConfigError;
pub use settings::{LoggingSettings, PoolSettings, Settings};

/// Loads the configuration from `config/default` (any format the `config`
/// crate understands, optional) and `EMBEDQ__*` environment variables,
/// e.g. `EMBEDQ__POOL__WORKER_THREADS=8`. Missing values keep their defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as `load_config`, reading the file from `base` instead.
pub fn load_config_from(base: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::from(base.as_ref()).required(false))
        .add_source(
            Environment::with_prefix("EMBEDQ")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();
    let pool = partial.pool;
    let logging = partial.logging;

    Ok(Settings {
        pool: PoolSettings {
            worker_threads: pool
                .as_ref()
                .and_then(|p| p.worker_threads)
                .unwrap_or(default.pool.worker_threads),
            thread_name: pool
                .and_then(|p| p.thread_name)
                .unwrap_or(default.pool.thread_name),
        },
        logging: LoggingSettings {
            level: logging
                .and_then(|l| l.level)
                .unwrap_or(default.logging.level),
        },
    })
}
