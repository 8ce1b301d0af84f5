// ABOUTME: Proposal draft wizard state machine
// ABOUTME: Each wizard step completion is an explicit transition on a draft keyed by id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::VERIFICATION_QUEUE_CODE;
use crate::status::AsbStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Step {got} cannot be completed yet; the draft is at {expected}")]
    OutOfOrder {
        expected: WizardStep,
        got: WizardStep,
    },
    #[error("Draft has already been submitted")]
    AlreadySubmitted,
    #[error("Draft is incomplete: {0} has not been filled in")]
    Incomplete(WizardStep),
    #[error("Payload for {0} must be a JSON object")]
    InvalidPayload(WizardStep),
    #[error("Unknown wizard step: {0}")]
    UnknownStep(String),
}

/// The five OPD-facing form steps, in the order they must be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    GeneralDocuments,
    BuildingArea,
    StandardCost,
    NonStandardCost,
    AccountSetup,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::GeneralDocuments,
        WizardStep::BuildingArea,
        WizardStep::StandardCost,
        WizardStep::NonStandardCost,
        WizardStep::AccountSetup,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            WizardStep::GeneralDocuments => "general-documents",
            WizardStep::BuildingArea => "building-area",
            WizardStep::StandardCost => "standard-cost",
            WizardStep::NonStandardCost => "non-standard-cost",
            WizardStep::AccountSetup => "account-setup",
        }
    }

    /// The workflow status a proposal holds while this step is open
    pub const fn status(&self) -> AsbStatus {
        match self {
            WizardStep::GeneralDocuments => AsbStatus::GeneralDocuments,
            WizardStep::BuildingArea => AsbStatus::BuildingArea,
            WizardStep::StandardCost => AsbStatus::StandardCost,
            WizardStep::NonStandardCost => AsbStatus::NonStandardCost,
            WizardStep::AccountSetup => AsbStatus::AccountSetup,
        }
    }

    pub const fn code(&self) -> i64 {
        self.status().code()
    }

    pub fn from_code(code: i64) -> Option<Self> {
        WizardStep::ALL.into_iter().find(|step| step.code() == code)
    }

    pub const fn next(&self) -> Option<Self> {
        match self {
            WizardStep::GeneralDocuments => Some(WizardStep::BuildingArea),
            WizardStep::BuildingArea => Some(WizardStep::StandardCost),
            WizardStep::StandardCost => Some(WizardStep::NonStandardCost),
            WizardStep::NonStandardCost => Some(WizardStep::AccountSetup),
            WizardStep::AccountSetup => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = DraftError;

    /// Accepts the kebab-case step name or its status code ("1".."5")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return WizardStep::from_code(code).ok_or_else(|| DraftError::UnknownStep(s.to_string()));
        }

        let normalized = trimmed.to_lowercase().replace('_', "-");
        WizardStep::ALL
            .into_iter()
            .find(|step| step.as_str() == normalized)
            .ok_or_else(|| DraftError::UnknownStep(s.to_string()))
    }
}

/// A proposal being filled in by an OPD user, before the backend owns it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    pub opd_id: i64,
    /// Next step to fill in; `None` once every step is done
    pub current_step: Option<WizardStep>,
    pub steps: BTreeMap<WizardStep, serde_json::Value>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    pub fn new(id: String, opd_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            opd_id,
            current_step: Some(WizardStep::GeneralDocuments),
            steps: BTreeMap::new(),
            submitted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        WizardStep::ALL.iter().all(|step| self.steps.contains_key(step))
    }

    pub fn completed_steps(&self) -> Vec<WizardStep> {
        self.steps.keys().copied().collect()
    }

    /// Fill in `step`. The current step advances the cursor; a step that
    /// was already completed may be edited again without moving it.
    pub fn complete_step(
        &mut self,
        step: WizardStep,
        payload: serde_json::Value,
    ) -> Result<(), DraftError> {
        if self.is_submitted() {
            return Err(DraftError::AlreadySubmitted);
        }
        if !payload.is_object() {
            return Err(DraftError::InvalidPayload(step));
        }

        let cursor = self.current_step;
        match cursor {
            Some(current) if current == step => {
                self.current_step = step.next();
            }
            _ if self.steps.contains_key(&step) => {}
            Some(current) => {
                return Err(DraftError::OutOfOrder {
                    expected: current,
                    got: step,
                })
            }
            // cursor is only cleared after every step is stored
            None => return Err(DraftError::Incomplete(step)),
        }

        self.steps.insert(step, payload);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Hand the draft over to verification
    pub fn submit(&mut self) -> Result<(), DraftError> {
        if self.is_submitted() {
            return Err(DraftError::AlreadySubmitted);
        }
        if let Some(missing) = WizardStep::ALL
            .into_iter()
            .find(|step| !self.steps.contains_key(step))
        {
            return Err(DraftError::Incomplete(missing));
        }

        let now = Utc::now();
        self.submitted_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Workflow status code the draft corresponds to
    pub fn status_code(&self) -> i64 {
        if self.is_submitted() {
            return VERIFICATION_QUEUE_CODE;
        }
        self.current_step
            .unwrap_or(WizardStep::AccountSetup)
            .code()
    }

    /// Share of steps filled in, 0-100
    pub fn progress_percent(&self) -> u8 {
        let done = WizardStep::ALL
            .iter()
            .filter(|step| self.steps.contains_key(step))
            .count();
        (done * 100 / WizardStep::ALL.len()) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled(upto: usize) -> Draft {
        let mut draft = Draft::new("draft-test".to_string(), 12);
        for step in WizardStep::ALL.into_iter().take(upto) {
            draft.complete_step(step, json!({ "step": step.code() })).unwrap();
        }
        draft
    }

    #[test]
    fn test_new_draft_starts_at_general_documents() {
        let draft = Draft::new("draft-1".to_string(), 3);
        assert_eq!(draft.current_step, Some(WizardStep::GeneralDocuments));
        assert_eq!(draft.status_code(), 1);
        assert_eq!(draft.progress_percent(), 0);
        assert!(!draft.is_complete());
    }

    #[test]
    fn test_steps_advance_in_order() {
        let draft = filled(3);
        assert_eq!(draft.current_step, Some(WizardStep::NonStandardCost));
        assert_eq!(draft.status_code(), 4);
        assert_eq!(draft.progress_percent(), 60);
    }

    #[test]
    fn test_skipping_ahead_is_rejected() {
        let mut draft = filled(1);
        let err = draft
            .complete_step(WizardStep::StandardCost, json!({}))
            .unwrap_err();

        assert_eq!(
            err,
            DraftError::OutOfOrder {
                expected: WizardStep::BuildingArea,
                got: WizardStep::StandardCost,
            }
        );
        assert!(!draft.steps.contains_key(&WizardStep::StandardCost));
    }

    #[test]
    fn test_reediting_earlier_step_keeps_cursor() {
        let mut draft = filled(3);
        draft
            .complete_step(WizardStep::GeneralDocuments, json!({ "namaAsb": "Revisi" }))
            .unwrap();

        assert_eq!(draft.current_step, Some(WizardStep::NonStandardCost));
        assert_eq!(
            draft.steps[&WizardStep::GeneralDocuments],
            json!({ "namaAsb": "Revisi" })
        );
    }

    #[test]
    fn test_payload_must_be_object() {
        let mut draft = filled(0);
        let err = draft
            .complete_step(WizardStep::GeneralDocuments, json!([1, 2]))
            .unwrap_err();
        assert_eq!(err, DraftError::InvalidPayload(WizardStep::GeneralDocuments));
        assert_eq!(draft.current_step, Some(WizardStep::GeneralDocuments));
    }

    #[test]
    fn test_submit_requires_every_step() {
        let mut draft = filled(4);
        assert_eq!(
            draft.submit().unwrap_err(),
            DraftError::Incomplete(WizardStep::AccountSetup)
        );

        draft
            .complete_step(WizardStep::AccountSetup, json!({ "kodeRekening": "5.2.3" }))
            .unwrap();
        assert_eq!(draft.current_step, None);
        assert_eq!(draft.status_code(), 5);

        draft.submit().unwrap();
        assert!(draft.is_submitted());
        assert_eq!(draft.status_code(), 6);
        assert_eq!(draft.progress_percent(), 100);
    }

    #[test]
    fn test_submitted_draft_is_frozen() {
        let mut draft = filled(5);
        draft.submit().unwrap();

        assert_eq!(draft.submit().unwrap_err(), DraftError::AlreadySubmitted);
        assert_eq!(
            draft
                .complete_step(WizardStep::BuildingArea, json!({}))
                .unwrap_err(),
            DraftError::AlreadySubmitted
        );
    }

    #[test]
    fn test_step_parsing() {
        assert_eq!("building-area".parse::<WizardStep>().unwrap(), WizardStep::BuildingArea);
        assert_eq!("NON_STANDARD_COST".parse::<WizardStep>().unwrap(), WizardStep::NonStandardCost);
        assert_eq!("5".parse::<WizardStep>().unwrap(), WizardStep::AccountSetup);
        assert!("6".parse::<WizardStep>().is_err());
        assert!("summary".parse::<WizardStep>().is_err());
    }

    #[test]
    fn test_steps_map_to_wizard_statuses() {
        for step in WizardStep::ALL {
            assert!(step.status().is_wizard_step());
            assert_eq!(WizardStep::from_code(step.code()), Some(step));
        }
    }
}
