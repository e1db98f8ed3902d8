use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "HealthMate";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data directory: ~/HealthMate/, or ./HealthMate when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn database_path() -> PathBuf {
    app_data_dir().join("database").join("healthmate.db")
}

/// Stored prescription uploads, served under `/uploads/prescriptions`.
pub fn uploads_dir() -> PathBuf {
    app_data_dir().join("uploads").join("prescriptions")
}

/// Tracing filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "healthmate=debug,warn"
    } else {
        "healthmate=info,warn"
    }
}
