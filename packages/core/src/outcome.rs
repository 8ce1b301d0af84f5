// ABOUTME: Coarse outcome of a proposal (Sukses / Proses / Tolak)
// ABOUTME: Derived from the status code and the three verifier sign-offs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::approval::Approvals;
use crate::status::AsbStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown outcome: {0}. Must be one of: Sukses, Proses, Tolak")]
pub struct UnknownOutcomeError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Eligible and signed off by all three verifiers
    Sukses,
    /// Anything still moving through the workflow
    Proses,
    /// Rejected as not meeting requirements
    Tolak,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Sukses, Outcome::Proses, Outcome::Tolak];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Outcome::Sukses => "Sukses",
            Outcome::Proses => "Proses",
            Outcome::Tolak => "Tolak",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = UnknownOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sukses" => Ok(Outcome::Sukses),
            "proses" => Ok(Outcome::Proses),
            "tolak" => Ok(Outcome::Tolak),
            _ => Err(UnknownOutcomeError(s.to_string())),
        }
    }
}

/// Classify a proposal. Rejection is checked first, full sign-off at
/// "Memenuhi Syarat" second; everything else is still in process.
pub fn classify(
    status_code: i64,
    adpem_approved_by: Option<i64>,
    bappeda_approved_by: Option<i64>,
    bpkad_approved_by: Option<i64>,
) -> Outcome {
    let status = match AsbStatus::from_code(status_code) {
        Some(status) => status,
        None => return Outcome::Proses,
    };

    if let Some(hint) = status.outcome_hint() {
        return hint;
    }

    if adpem_approved_by.is_some() && bappeda_approved_by.is_some() && bpkad_approved_by.is_some()
    {
        return Outcome::Sukses;
    }

    Outcome::Proses
}

/// Same as [`classify`], taking the approvals as one value
pub fn classify_approvals(status_code: i64, approvals: &Approvals) -> Outcome {
    classify(
        status_code,
        approvals.adpem,
        approvals.bappeda,
        approvals.bpkad,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, None)]
    #[case(Some(1), Some(2), Some(3))]
    #[case(Some(1), None, Some(3))]
    fn test_reject_overrides_approvals(
        #[case] adpem: Option<i64>,
        #[case] bappeda: Option<i64>,
        #[case] bpkad: Option<i64>,
    ) {
        assert_eq!(classify(7, adpem, bappeda, bpkad), Outcome::Tolak);
    }

    #[test]
    fn test_sukses_requires_full_sign_off() {
        assert_eq!(classify(8, Some(1), Some(2), Some(3)), Outcome::Sukses);
        assert_eq!(classify(8, Some(1), Some(2), None), Outcome::Proses);
        assert_eq!(classify(8, None, Some(2), Some(3)), Outcome::Proses);
        assert_eq!(classify(8, Some(1), None, None), Outcome::Proses);
        assert_eq!(classify(8, None, None, None), Outcome::Proses);
    }

    #[rstest]
    #[case(3, None, None, None)]
    #[case(13, Some(1), Some(2), Some(3))]
    #[case(6, Some(1), Some(2), Some(3))]
    #[case(0, Some(1), Some(2), Some(3))]
    #[case(-1, None, None, None)]
    #[case(99, None, None, None)]
    fn test_default_is_proses(
        #[case] code: i64,
        #[case] adpem: Option<i64>,
        #[case] bappeda: Option<i64>,
        #[case] bpkad: Option<i64>,
    ) {
        assert_eq!(classify(code, adpem, bappeda, bpkad), Outcome::Proses);
    }

    #[test]
    fn test_classify_approvals_matches_classify() {
        let approvals = Approvals::new(Some(101), Some(202), Some(303));
        assert_eq!(classify_approvals(8, &approvals), Outcome::Sukses);
        assert_eq!(classify_approvals(12, &approvals), Outcome::Proses);
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!("tolak".parse::<Outcome>().unwrap(), Outcome::Tolak);
        assert_eq!("Sukses".parse::<Outcome>().unwrap(), Outcome::Sukses);
        assert!("selesai".parse::<Outcome>().is_err());
    }
}
