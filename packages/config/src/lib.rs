// ABOUTME: Configuration names and defaults for the ASB workspace
// ABOUTME: Keeps every environment variable name in one place

pub mod constants;
pub mod defaults;

pub use constants::*;
pub use defaults::*;
