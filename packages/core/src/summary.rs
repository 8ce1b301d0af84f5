// ABOUTME: Dashboard aggregation over proposal lists
// ABOUTME: Outcome counters, per-status histogram and outcome filtering

use serde::Serialize;
use std::collections::BTreeMap;

use crate::outcome::Outcome;
use crate::proposal::Proposal;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSummary {
    pub total: usize,
    pub sukses: usize,
    pub proses: usize,
    pub tolak: usize,
    /// Proposals per raw status code, unknown codes included
    pub per_status: BTreeMap<i64, usize>,
}

impl OutcomeSummary {
    pub fn from_proposals<'a, I>(proposals: I) -> Self
    where
        I: IntoIterator<Item = &'a Proposal>,
    {
        let mut summary = Self::default();
        for proposal in proposals {
            summary.record(proposal);
        }
        summary
    }

    pub fn record(&mut self, proposal: &Proposal) {
        self.total += 1;
        match proposal.outcome() {
            Outcome::Sukses => self.sukses += 1,
            Outcome::Proses => self.proses += 1,
            Outcome::Tolak => self.tolak += 1,
        }
        *self.per_status.entry(proposal.status_code).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Sukses => self.sukses,
            Outcome::Proses => self.proses,
            Outcome::Tolak => self.tolak,
        }
    }
}

/// Keep only the proposals classified as `outcome`, in input order
pub fn filter_by_outcome(proposals: &[Proposal], outcome: Outcome) -> Vec<&Proposal> {
    proposals
        .iter()
        .filter(|proposal| proposal.outcome() == outcome)
        .collect()
}
