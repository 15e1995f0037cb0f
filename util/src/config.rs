//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub grading_timeout_seconds: u64,
    pub checkin_cooldown_seconds: i64,
    pub academy_utc_offset_minutes: i64,
    pub grade_on_submit: bool,
    pub sweep_interval_seconds: u64,
    pub sweep_older_than_minutes: i64,
    pub sweep_max_retries: i32,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. It panics
    /// if required variables are missing or improperly formatted.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "academy-api".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "sqlite::memory:".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .expect("PORT must be a number"),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            grading_timeout_seconds: env::var("GRADING_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("GRADING_TIMEOUT_SECONDS must be a number"),
            checkin_cooldown_seconds: env::var("CHECKIN_COOLDOWN_SECONDS")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .expect("CHECKIN_COOLDOWN_SECONDS must be a number"),
            academy_utc_offset_minutes: env::var("ACADEMY_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .expect("ACADEMY_UTC_OFFSET_MINUTES must be a number"),
            grade_on_submit: env::var("GRADE_ON_SUBMIT").unwrap_or_else(|_| "false".into())
                == "true",
            sweep_interval_seconds: env::var("SWEEP_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .expect("SWEEP_INTERVAL_SECONDS must be a number"),
            sweep_older_than_minutes: env::var("SWEEP_OLDER_THAN_MINUTES")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .expect("SWEEP_OLDER_THAN_MINUTES must be a number"),
            sweep_max_retries: env::var("SWEEP_MAX_RETRIES")
                .unwrap_or_else(|_| "3".into())
                .parse()
                .expect("SWEEP_MAX_RETRIES must be a number"),
        }
    }

    fn instance() -> &'static RwLock<AppConfig> {
        CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()))
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        Self::instance()
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        let mut guard = Self::instance()
            .write()
            .expect("Failed to acquire AppConfig write lock");
        *guard = AppConfig::from_env();
    }

    /// Applies an in-place mutation to the global configuration. Test-only override hook.
    pub fn override_with(f: impl FnOnce(&mut AppConfig)) {
        let mut guard = Self::instance()
            .write()
            .expect("Failed to acquire AppConfig write lock");
        f(&mut guard);
    }
}

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn gemini_api_key() -> String {
    AppConfig::global().gemini_api_key.clone()
}

pub fn grading_timeout_seconds() -> u64 {
    AppConfig::global().grading_timeout_seconds
}

pub fn checkin_cooldown_seconds() -> i64 {
    AppConfig::global().checkin_cooldown_seconds
}

/// Offset of the academy's local time from UTC, in minutes. Class start
/// times are interpreted in this timezone.
pub fn academy_utc_offset_minutes() -> i64 {
    AppConfig::global().academy_utc_offset_minutes
}

pub fn grade_on_submit() -> bool {
    AppConfig::global().grade_on_submit
}

pub fn sweep_interval_seconds() -> u64 {
    AppConfig::global().sweep_interval_seconds
}

pub fn sweep_older_than_minutes() -> i64 {
    AppConfig::global().sweep_older_than_minutes
}

pub fn sweep_max_retries() -> i32 {
    AppConfig::global().sweep_max_retries
}
