// ABOUTME: ASB proposal status engine
// ABOUTME: Status table, outcome classification, role gates and the draft wizard state machine

pub mod approval;
pub mod constants;
pub mod draft;
pub mod gate;
pub mod outcome;
pub mod proposal;
pub mod role;
pub mod status;
pub mod summary;
pub mod utils;

// Re-export main types
pub use approval::{Approvals, VerifierSlot};
pub use draft::{Draft, DraftError, WizardStep};
pub use gate::{available_actions, can_act, can_role_act, GateAction, UnknownActionError};
pub use outcome::{classify, classify_approvals, Outcome, UnknownOutcomeError};
pub use proposal::{Proposal, ProposalError, ProposalView};
pub use role::{Role, UnknownRoleError};
pub use status::{label_for, status_table, AsbStatus, StatusInfo, UnknownStatusError, UNKNOWN_LABEL};
pub use summary::{filter_by_outcome, OutcomeSummary};

// Re-export constants
pub use constants::{asb_dir, database_file, VERIFICATION_QUEUE_CODE};

// Re-export utilities
pub use utils::generate_draft_id;
