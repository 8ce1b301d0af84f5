// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across ASB

// Port Configuration
pub const ASB_API_PORT: &str = "ASB_API_PORT";
pub const PORT: &str = "PORT"; // Legacy
pub const ASB_API_HOST: &str = "ASB_API_HOST";

// CORS Configuration
pub const ASB_CORS_ORIGIN: &str = "ASB_CORS_ORIGIN";

// Draft Storage
pub const ASB_DATABASE_PATH: &str = "ASB_DATABASE_PATH";

// Backend Configuration
pub const ASB_BACKEND_URL: &str = "ASB_BACKEND_URL";
pub const ASB_BACKEND_TOKEN: &str = "ASB_BACKEND_TOKEN";
pub const ASB_HTTP_TIMEOUT_SECS: &str = "ASB_HTTP_TIMEOUT_SECS";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
