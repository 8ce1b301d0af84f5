use std::env;
use std::path::PathBuf;

/// Status code a draft lands on once it is handed to the verifiers
pub const VERIFICATION_QUEUE_CODE: i64 = 6;

/// Get the path to the ASB data directory (~/.asb)
pub fn asb_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".asb")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".asb")
    }
}

/// Get the path to the default SQLite database (~/.asb/asb.db)
pub fn database_file() -> PathBuf {
    asb_dir().join("asb.db")
}
