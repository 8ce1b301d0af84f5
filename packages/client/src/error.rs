// ABOUTME: Error types for the ASB backend client
// ABOUTME: Separates local gate refusals from network and backend failures

use thiserror::Error;

use asb_core::{GateAction, Role};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend rejected the credentials")]
    Unauthorized,

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The role gate is closed; nothing was sent to the backend
    #[error("{role} cannot {action} a proposal at status {status_code}")]
    GateClosed {
        action: GateAction,
        role: Role,
        status_code: i64,
    },

    #[error("Rejecting a proposal requires a reason")]
    MissingRejectReason,

    #[error("Proposal has no id")]
    MissingProposalId,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// True when the request never reached the backend because of a local check
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::GateClosed { .. }
                | ClientError::MissingRejectReason
                | ClientError::MissingProposalId
                | ClientError::Configuration(_)
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
