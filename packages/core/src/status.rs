// ABOUTME: ASB workflow status table and label resolution
// ABOUTME: Maps numeric status codes to labels, acting roles and relevant approval slots

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::Error;

use crate::approval::VerifierSlot;
use crate::draft::WizardStep;
use crate::outcome::Outcome;
use crate::role::Role;

/// Label returned for any code outside the status table
pub const UNKNOWN_LABEL: &str = "Unknown";

const OPD_ONLY: &[Role] = &[Role::Opd];
const VERIFIERS: &[Role] = &[Role::Adpem, Role::Bappeda, Role::Bpkad];
const NOBODY: &[Role] = &[];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Unknown ASB status code: {0}")]
pub struct UnknownStatusError(pub i64);

/// Workflow status of a proposal. The backend is the authority on which
/// status a record holds; this table must be kept in sync with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AsbStatus {
    GeneralDocuments,
    BuildingArea,
    StandardCost,
    NonStandardCost,
    AccountSetup,
    InVerification,
    Rejected,
    Eligible,
    VerifyBuildingArea,
    VerifyStandardCost,
    VerifyNonStandardCost,
    VerifyAccount,
    VerifyWorkCost,
}

impl AsbStatus {
    pub const ALL: [AsbStatus; 13] = [
        AsbStatus::GeneralDocuments,
        AsbStatus::BuildingArea,
        AsbStatus::StandardCost,
        AsbStatus::NonStandardCost,
        AsbStatus::AccountSetup,
        AsbStatus::InVerification,
        AsbStatus::Rejected,
        AsbStatus::Eligible,
        AsbStatus::VerifyBuildingArea,
        AsbStatus::VerifyStandardCost,
        AsbStatus::VerifyNonStandardCost,
        AsbStatus::VerifyAccount,
        AsbStatus::VerifyWorkCost,
    ];

    pub const fn code(&self) -> i64 {
        match self {
            AsbStatus::GeneralDocuments => 1,
            AsbStatus::BuildingArea => 2,
            AsbStatus::StandardCost => 3,
            AsbStatus::NonStandardCost => 4,
            AsbStatus::AccountSetup => 5,
            AsbStatus::InVerification => 6,
            AsbStatus::Rejected => 7,
            AsbStatus::Eligible => 8,
            AsbStatus::VerifyBuildingArea => 9,
            AsbStatus::VerifyStandardCost => 10,
            AsbStatus::VerifyNonStandardCost => 11,
            AsbStatus::VerifyAccount => 12,
            AsbStatus::VerifyWorkCost => 13,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(AsbStatus::GeneralDocuments),
            2 => Some(AsbStatus::BuildingArea),
            3 => Some(AsbStatus::StandardCost),
            4 => Some(AsbStatus::NonStandardCost),
            5 => Some(AsbStatus::AccountSetup),
            6 => Some(AsbStatus::InVerification),
            7 => Some(AsbStatus::Rejected),
            8 => Some(AsbStatus::Eligible),
            9 => Some(AsbStatus::VerifyBuildingArea),
            10 => Some(AsbStatus::VerifyStandardCost),
            11 => Some(AsbStatus::VerifyNonStandardCost),
            12 => Some(AsbStatus::VerifyAccount),
            13 => Some(AsbStatus::VerifyWorkCost),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            AsbStatus::GeneralDocuments => "General Documents",
            AsbStatus::BuildingArea => "Luas Total Bangunan (LTB), Koefesien Luas Bangunan (KLB) dan Koefesien Fungsi Bangunan (KFB)",
            AsbStatus::StandardCost => "Kebutuhan Biaya Pekerjaan Standar (BPS)",
            AsbStatus::NonStandardCost => "Kebutuhan Biaya Pekerjaan Non Standar (BPNS)",
            AsbStatus::AccountSetup => "Setup Rekening",
            AsbStatus::InVerification => "Proses Verifikasi",
            AsbStatus::Rejected => "Tidak Memenuhi Syarat",
            AsbStatus::Eligible => "Memenuhi Syarat",
            AsbStatus::VerifyBuildingArea => "Verifikasi LTB/KLB/KFB",
            AsbStatus::VerifyStandardCost => "Verifikasi BPS",
            AsbStatus::VerifyNonStandardCost => "Verifikasi BPNS",
            AsbStatus::VerifyAccount => "Verifikasi Rekening Belanja",
            AsbStatus::VerifyWorkCost => "Verifikasi Biaya Pekerjaan",
        }
    }

    /// Roles that have something to do while a proposal sits at this status
    pub const fn actors(&self) -> &'static [Role] {
        match self {
            AsbStatus::GeneralDocuments
            | AsbStatus::BuildingArea
            | AsbStatus::StandardCost
            | AsbStatus::NonStandardCost
            | AsbStatus::AccountSetup => OPD_ONLY,
            AsbStatus::Rejected => NOBODY,
            AsbStatus::InVerification
            | AsbStatus::Eligible
            | AsbStatus::VerifyBuildingArea
            | AsbStatus::VerifyStandardCost
            | AsbStatus::VerifyNonStandardCost
            | AsbStatus::VerifyAccount
            | AsbStatus::VerifyWorkCost => VERIFIERS,
        }
    }

    /// Approval slots that matter for the final decision at this status
    pub const fn relevant_slots(&self) -> &'static [VerifierSlot] {
        match self {
            AsbStatus::Eligible | AsbStatus::VerifyWorkCost => &VerifierSlot::ALL,
            _ => &[],
        }
    }

    /// Statuses 1-5 are filled in by the OPD through the draft wizard
    pub const fn is_wizard_step(&self) -> bool {
        self.wizard_step().is_some()
    }

    /// The draft wizard step that produces this status
    pub const fn wizard_step(&self) -> Option<WizardStep> {
        match self {
            AsbStatus::GeneralDocuments => Some(WizardStep::GeneralDocuments),
            AsbStatus::BuildingArea => Some(WizardStep::BuildingArea),
            AsbStatus::StandardCost => Some(WizardStep::StandardCost),
            AsbStatus::NonStandardCost => Some(WizardStep::NonStandardCost),
            AsbStatus::AccountSetup => Some(WizardStep::AccountSetup),
            _ => None,
        }
    }

    /// Outcome implied by the status alone. `None` at "Memenuhi Syarat",
    /// where it depends on the three approvals.
    pub const fn outcome_hint(&self) -> Option<Outcome> {
        match self {
            AsbStatus::Rejected => Some(Outcome::Tolak),
            AsbStatus::Eligible => None,
            _ => Some(Outcome::Proses),
        }
    }

    /// No workflow step follows this status
    pub const fn is_terminal(&self) -> bool {
        matches!(self, AsbStatus::Rejected)
    }
}

impl TryFrom<i64> for AsbStatus {
    type Error = UnknownStatusError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        AsbStatus::from_code(code).ok_or(UnknownStatusError(code))
    }
}

impl From<AsbStatus> for i64 {
    fn from(status: AsbStatus) -> i64 {
        status.code()
    }
}

/// Resolve the label of any status code, `"Unknown"` outside the table
pub fn label_for(code: i64) -> &'static str {
    AsbStatus::from_code(code)
        .map(|status| status.label())
        .unwrap_or(UNKNOWN_LABEL)
}

/// Serializable view of one row of the status table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub code: i64,
    pub label: &'static str,
    pub actors: Vec<Role>,
    pub relevant_slots: Vec<VerifierSlot>,
}

impl StatusInfo {
    /// Row for any code; unknown codes get the `"Unknown"` label and nobody
    /// may act on them.
    pub fn for_code(code: i64) -> Self {
        match AsbStatus::from_code(code) {
            Some(status) => Self::from(status),
            None => Self {
                code,
                label: UNKNOWN_LABEL,
                actors: Vec::new(),
                relevant_slots: Vec::new(),
            },
        }
    }
}

impl From<AsbStatus> for StatusInfo {
    fn from(status: AsbStatus) -> Self {
        Self {
            code: status.code(),
            label: status.label(),
            actors: status.actors().to_vec(),
            relevant_slots: status.relevant_slots().to_vec(),
        }
    }
}

/// The full status table in code order
pub fn status_table() -> Vec<StatusInfo> {
    AsbStatus::ALL.into_iter().map(StatusInfo::from).collect()
}
