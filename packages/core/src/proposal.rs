// ABOUTME: Proposal record as returned by the ASB backend
// ABOUTME: Reads status and sign-offs and evaluates them into a view for one acting role

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::Error;

use crate::approval::{Approvals, VerifierSlot};
use crate::gate::{available_actions, GateAction};
use crate::outcome::{classify_approvals, Outcome};
use crate::role::Role;
use crate::status::{label_for, AsbStatus};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProposalError {
    #[error("Proposal record has neither idAsbStatus nor asbStatus.id")]
    MissingStatus,
    #[error("idAsbStatus ({flat}) disagrees with asbStatus.id ({nested})")]
    ConflictingStatus { flat: i64, nested: i64 },
}

/// Nested `asbStatus` object some backend endpoints return instead of the
/// flat `idAsbStatus` field
#[derive(Debug, Clone, Deserialize)]
struct StatusRef {
    id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposalRecord {
    id: Option<i64>,
    id_asb_status: Option<i64>,
    asb_status: Option<StatusRef>,
    nama_asb: Option<String>,
    id_opd: Option<i64>,
    id_verifikator_adpem: Option<i64>,
    id_verifikator_bappeda: Option<i64>,
    id_verifikator_bpkad: Option<i64>,
    reject_reason: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProposalRecord")]
pub struct Proposal {
    pub id: Option<i64>,
    #[serde(rename = "idAsbStatus")]
    pub status_code: i64,
    pub nama_asb: Option<String>,
    pub id_opd: Option<i64>,
    #[serde(rename = "idVerifikatorAdpem")]
    pub adpem_approved_by: Option<i64>,
    #[serde(rename = "idVerifikatorBappeda")]
    pub bappeda_approved_by: Option<i64>,
    #[serde(rename = "idVerifikatorBpkad")]
    pub bpkad_approved_by: Option<i64>,
    pub reject_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProposalRecord> for Proposal {
    type Error = ProposalError;

    fn try_from(record: ProposalRecord) -> Result<Self, Self::Error> {
        let status_code = match (record.id_asb_status, record.asb_status) {
            (Some(flat), Some(nested)) if flat != nested.id => {
                return Err(ProposalError::ConflictingStatus {
                    flat,
                    nested: nested.id,
                })
            }
            (Some(flat), _) => flat,
            (None, Some(nested)) => nested.id,
            (None, None) => return Err(ProposalError::MissingStatus),
        };

        Ok(Self {
            id: record.id,
            status_code,
            nama_asb: record.nama_asb,
            id_opd: record.id_opd,
            adpem_approved_by: record.id_verifikator_adpem,
            bappeda_approved_by: record.id_verifikator_bappeda,
            bpkad_approved_by: record.id_verifikator_bpkad,
            reject_reason: record.reject_reason,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl Proposal {
    /// Minimal record with a status and no sign-offs
    pub fn new(id: i64, status_code: i64) -> Self {
        Self {
            id: Some(id),
            status_code,
            nama_asb: None,
            id_opd: None,
            adpem_approved_by: None,
            bappeda_approved_by: None,
            bpkad_approved_by: None,
            reject_reason: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_approvals(mut self, approvals: Approvals) -> Self {
        self.adpem_approved_by = approvals.adpem;
        self.bappeda_approved_by = approvals.bappeda;
        self.bpkad_approved_by = approvals.bpkad;
        self
    }

    pub fn status(&self) -> Option<AsbStatus> {
        AsbStatus::from_code(self.status_code)
    }

    pub fn label(&self) -> &'static str {
        label_for(self.status_code)
    }

    pub fn approvals(&self) -> Approvals {
        Approvals::new(
            self.adpem_approved_by,
            self.bappeda_approved_by,
            self.bpkad_approved_by,
        )
    }

    pub fn outcome(&self) -> Outcome {
        classify_approvals(self.status_code, &self.approvals())
    }

    /// Rejected, or eligible with all three sign-offs; nothing more happens
    pub fn is_final(&self) -> bool {
        self.outcome() != Outcome::Proses
    }

    pub fn approval_given_by(&self, role: Role) -> bool {
        self.approvals().given_by(role)
    }

    /// Everything a screen needs to render this proposal for `role`.
    /// Without a role no action is enabled.
    pub fn evaluate(&self, role: Option<Role>) -> ProposalView {
        let approvals = self.approvals();
        let outcome = self.outcome();
        let actions = role
            .map(|role| available_actions(self.status_code, role, &approvals))
            .unwrap_or_default();
        let relevant_slots = self
            .status()
            .map(|status| status.relevant_slots().to_vec())
            .unwrap_or_default();

        ProposalView {
            id: self.id,
            status_code: self.status_code,
            label: self.label(),
            outcome,
            approvals,
            pending_slots: approvals.pending(),
            relevant_slots,
            is_final: outcome != Outcome::Proses,
            role,
            actions,
            reject_reason: match outcome {
                Outcome::Tolak => self.reject_reason.clone(),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalView {
    pub id: Option<i64>,
    pub status_code: i64,
    pub label: &'static str,
    pub outcome: Outcome,
    pub approvals: Approvals,
    pub pending_slots: Vec<VerifierSlot>,
    pub relevant_slots: Vec<VerifierSlot>,
    pub is_final: bool,
    pub role: Option<Role>,
    pub actions: Vec<GateAction>,
    /// Present only for rejected proposals, verbatim from the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}
