// ABOUTME: User roles taking part in the ASB workflow
// ABOUTME: Closed set of roles with parsing from the backend's role strings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::approval::VerifierSlot;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRoleError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regional work unit submitting proposals
    Opd,
    Adpem,
    Bappeda,
    Bpkad,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Opd,
        Role::Adpem,
        Role::Bappeda,
        Role::Bpkad,
        Role::Superadmin,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Opd => "OPD",
            Role::Adpem => "ADPEM",
            Role::Bappeda => "BAPPEDA",
            Role::Bpkad => "BPKAD",
            Role::Superadmin => "SUPERADMIN",
        }
    }

    /// Approval slot owned by this role, if it is one of the three verifiers
    pub const fn verifier_slot(&self) -> Option<VerifierSlot> {
        match self {
            Role::Adpem => Some(VerifierSlot::Adpem),
            Role::Bappeda => Some(VerifierSlot::Bappeda),
            Role::Bpkad => Some(VerifierSlot::Bpkad),
            Role::Opd | Role::Superadmin => None,
        }
    }

    pub const fn is_verifier(&self) -> bool {
        self.verifier_slot().is_some()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Accepts the canonical names in any case, plus the backend's
    /// `verifikator-adpem` / `verifikator_adpem` and `super-admin` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let name = normalized
            .strip_prefix("verifikator-")
            .unwrap_or(&normalized);

        match name {
            "opd" => Ok(Role::Opd),
            "adpem" => Ok(Role::Adpem),
            "bappeda" => Ok(Role::Bappeda),
            "bpkad" => Ok(Role::Bpkad),
            "superadmin" | "super-admin" => Ok(Role::Superadmin),
            _ => Err(UnknownRoleError(s.to_string())),
        }
    }
}
