// ABOUTME: Default values for settings that are not set in the environment
// ABOUTME: Shared by the server, the CLI and their tests

pub const DEFAULT_API_PORT: u16 = 4010;
pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "info";
