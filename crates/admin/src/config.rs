use serde::Deserialize;

use persistence::LatencyConfig;
use shared::pagination::{PageRequest, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub latency: LatencySettings,
    #[serde(default)]
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub fixtures: FixturesConfig,
}

/// Simulated gateway latency, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct LatencySettings {
    #[serde(default = "default_latency_enabled")]
    pub enabled: bool,

    #[serde(default = "default_list_ms")]
    pub list_ms: u64,

    #[serde(default = "default_get_ms")]
    pub get_ms: u64,

    #[serde(default = "default_create_ms")]
    pub create_ms: u64,

    #[serde(default = "default_update_ms")]
    pub update_ms: u64,

    #[serde(default = "default_delete_ms")]
    pub delete_ms: u64,

    #[serde(default)]
    pub jitter_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixturesConfig {
    /// RNG seed for generated student accounts.
    #[serde(default = "default_fixture_seed")]
    pub seed: u64,

    #[serde(default)]
    pub generated_students: u32,
}

fn default_latency_enabled() -> bool {
    true
}
fn default_list_ms() -> u64 {
    800
}
fn default_get_ms() -> u64 {
    500
}
fn default_create_ms() -> u64 {
    1000
}
fn default_update_ms() -> u64 {
    800
}
fn default_delete_ms() -> u64 {
    600
}
fn default_page_size() -> u32 {
    shared::pagination::DEFAULT_PAGE_SIZE
}
fn default_max_page_size() -> u32 {
    MAX_PAGE_SIZE
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_fixture_seed() -> u64 {
    360
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            enabled: default_latency_enabled(),
            list_ms: default_list_ms(),
            get_ms: default_get_ms(),
            create_ms: default_create_ms(),
            update_ms: default_update_ms(),
            delete_ms: default_delete_ms(),
            jitter_ms: 0,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            seed: default_fixture_seed(),
            generated_students: 0,
        }
    }
}

impl From<&LatencySettings> for LatencyConfig {
    fn from(settings: &LatencySettings) -> Self {
        LatencyConfig {
            enabled: settings.enabled,
            list_ms: settings.list_ms,
            get_ms: settings.get_ms,
            create_ms: settings.create_ms,
            update_ms: settings.update_ms,
            delete_ms: settings.delete_ms,
            jitter_ms: settings.jitter_ms,
        }
    }
}

impl PaginationConfig {
    /// First page at the configured default size.
    pub fn first_page(&self) -> PageRequest {
        PageRequest::first(self.default_page_size.min(self.max_page_size))
    }

    /// Clamps a requested page size to the configured maximum.
    pub fn clamp_page_size(&self, size: u32) -> u32 {
        size.clamp(1, self.max_page_size)
    }
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration (optional)
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with UNI360__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("UNI360").separator("__"))
            .build()?;

        Self::finish(config)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults and overrides only, so tests
    /// do not depend on the working directory.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [latency]
            enabled = false
            list_ms = 800
            get_ms = 500
            create_ms = 1000
            update_ms = 800
            delete_ms = 600
            jitter_ms = 0

            [pagination]
            default_page_size = 10
            max_page_size = 100

            [logging]
            level = "debug"
            format = "pretty"

            [fixtures]
            seed = 360
            generated_students = 0
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        Self::finish(builder.build()?)
    }

    fn finish(config: config::Config) -> Result<Self, config::ConfigError> {
        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let pagination = &self.pagination;

        if pagination.default_page_size == 0 || pagination.max_page_size == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Page sizes cannot be 0".to_string(),
            ));
        }

        if pagination.max_page_size > MAX_PAGE_SIZE {
            return Err(ConfigValidationError::InvalidValue(format!(
                "max_page_size cannot exceed {}",
                MAX_PAGE_SIZE
            )));
        }

        if pagination.default_page_size > pagination.max_page_size {
            return Err(ConfigValidationError::InvalidValue(
                "default_page_size cannot exceed max_page_size".to_string(),
            ));
        }

        Ok(())
    }

    pub fn latency_config(&self) -> LatencyConfig {
        LatencyConfig::from(&self.latency)
    }
}
