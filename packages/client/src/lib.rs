// ABOUTME: Client for the ASB backend REST API
// ABOUTME: Proposal fetching plus gate-checked verifier actions

pub mod client;
pub mod error;

pub use client::BackendClient;
pub use error::{ClientError, ClientResult};
