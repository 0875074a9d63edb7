use serde::Deserialize;

/// Top-level configuration settings for an embedding application.
///
/// Includes settings for the worker execution pool and for logging.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub pool: PoolSettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the worker thread pool.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub worker_threads: usize,
    pub thread_name: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub pool: Option<PartialPoolSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialPoolSettings {
    pub worker_threads: Option<usize>,
    pub thread_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            thread_name: "embedq-worker".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Provides default values for `Settings`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            pool: PoolSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
