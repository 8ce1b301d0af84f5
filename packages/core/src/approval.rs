// ABOUTME: Verifier approval slots of a proposal
// ABOUTME: Three independent sign-offs (ADPEM, BAPPEDA, BPKAD) written only by the backend

use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerifierSlot {
    Adpem,
    Bappeda,
    Bpkad,
}

impl VerifierSlot {
    pub const ALL: [VerifierSlot; 3] = [
        VerifierSlot::Adpem,
        VerifierSlot::Bappeda,
        VerifierSlot::Bpkad,
    ];

    pub const fn role(&self) -> Role {
        match self {
            VerifierSlot::Adpem => Role::Adpem,
            VerifierSlot::Bappeda => Role::Bappeda,
            VerifierSlot::Bpkad => Role::Bpkad,
        }
    }

    /// Name of the backend record field holding this slot's approver id
    pub const fn field_name(&self) -> &'static str {
        match self {
            VerifierSlot::Adpem => "idVerifikatorAdpem",
            VerifierSlot::Bappeda => "idVerifikatorBappeda",
            VerifierSlot::Bpkad => "idVerifikatorBpkad",
        }
    }
}

/// Approver ids per slot; `None` means that verifier has not signed off yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approvals {
    pub adpem: Option<i64>,
    pub bappeda: Option<i64>,
    pub bpkad: Option<i64>,
}

impl Approvals {
    pub fn new(adpem: Option<i64>, bappeda: Option<i64>, bpkad: Option<i64>) -> Self {
        Self {
            adpem,
            bappeda,
            bpkad,
        }
    }

    pub fn get(&self, slot: VerifierSlot) -> Option<i64> {
        match slot {
            VerifierSlot::Adpem => self.adpem,
            VerifierSlot::Bappeda => self.bappeda,
            VerifierSlot::Bpkad => self.bpkad,
        }
    }

    /// Whether the given role has already signed off. Roles without a slot
    /// never have.
    pub fn given_by(&self, role: Role) -> bool {
        role.verifier_slot()
            .map(|slot| self.get(slot).is_some())
            .unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        VerifierSlot::ALL
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.count() == VerifierSlot::ALL.len()
    }

    /// Slots still waiting for a sign-off
    pub fn pending(&self) -> Vec<VerifierSlot> {
        VerifierSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }
}
