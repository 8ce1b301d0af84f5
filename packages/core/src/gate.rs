// ABOUTME: Role gates deciding which verifier actions are enabled at a status
// ABOUTME: Advisory only; the backend re-validates every transition it is asked to make

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::approval::Approvals;
use crate::role::Role;
use crate::status::AsbStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown action: {0}")]
pub struct UnknownActionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateAction {
    /// "Verifikasi Lantai": floor data check
    VerifyLantai,
    /// "Verifikasi BPNS": non-standard cost check
    VerifyBpns,
    /// "Verifikasi Rekening Belanja": spending account check
    VerifyRekening,
    /// "Setujui"
    Approve,
    /// "Tolak"
    Reject,
}

const AT_IN_VERIFICATION: &[i64] = &[AsbStatus::InVerification.code()];
const AT_VERIFY_STANDARD_COST: &[i64] = &[AsbStatus::VerifyStandardCost.code()];
const AT_VERIFY_NON_STANDARD_COST: &[i64] = &[AsbStatus::VerifyNonStandardCost.code()];
const AT_FINAL_DECISION: &[i64] = &[AsbStatus::Eligible.code(), AsbStatus::VerifyWorkCost.code()];

impl GateAction {
    pub const ALL: [GateAction; 5] = [
        GateAction::VerifyLantai,
        GateAction::VerifyBpns,
        GateAction::VerifyRekening,
        GateAction::Approve,
        GateAction::Reject,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            GateAction::VerifyLantai => "verify-lantai",
            GateAction::VerifyBpns => "verify-bpns",
            GateAction::VerifyRekening => "verify-rekening",
            GateAction::Approve => "approve",
            GateAction::Reject => "reject",
        }
    }

    /// Status codes at which this action's button is enabled
    pub const fn enabled_at(&self) -> &'static [i64] {
        match self {
            GateAction::VerifyLantai => AT_IN_VERIFICATION,
            GateAction::VerifyBpns => AT_VERIFY_STANDARD_COST,
            GateAction::VerifyRekening => AT_VERIFY_NON_STANDARD_COST,
            GateAction::Approve | GateAction::Reject => AT_FINAL_DECISION,
        }
    }

    /// Approve and reject lock once the acting verifier has signed off
    pub const fn is_final_decision(&self) -> bool {
        matches!(self, GateAction::Approve | GateAction::Reject)
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateAction {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        GateAction::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| UnknownActionError(s.to_string()))
    }
}

/// Whether `action` is enabled at `status_code`. Final decisions also
/// require that the acting role has not approved yet. Unknown codes are
/// never enabled.
pub fn can_act(status_code: i64, action: GateAction, approval_already_given: bool) -> bool {
    if !action.enabled_at().contains(&status_code) {
        return false;
    }

    !(action.is_final_decision() && approval_already_given)
}

/// Role-aware gate: only the three verifiers pass, and each is locked out of
/// the final decision by its own sign-off.
pub fn can_role_act(
    status_code: i64,
    role: Role,
    action: GateAction,
    approvals: &Approvals,
) -> bool {
    if !role.is_verifier() {
        return false;
    }

    can_act(status_code, action, approvals.given_by(role))
}

/// Every action `role` may take on a proposal in the given state
pub fn available_actions(status_code: i64, role: Role, approvals: &Approvals) -> Vec<GateAction> {
    GateAction::ALL
        .into_iter()
        .filter(|action| can_role_act(status_code, role, *action, approvals))
        .collect()
}
