// ABOUTME: HTTP request handlers for evaluating backend proposal records
// ABOUTME: Per-role views, dashboard outcome summaries and outcome filtering

use axum::{extract::Query, response::Response, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use asb_core::{filter_by_outcome, Outcome, OutcomeSummary, Proposal, ProposalView, Role};

use super::error::AppError;
use super::response::ok;

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

impl RoleQuery {
    fn parse(&self) -> Result<Option<Role>, AppError> {
        self.role
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| raw.parse::<Role>())
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct OutcomeQuery {
    pub outcome: String,
}

fn parse_proposal(body: Value) -> Result<Proposal, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(format!("Invalid proposal: {}", e)))
}

fn parse_proposals(body: Value) -> Result<Vec<Proposal>, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid proposal list: {}", e)))
}

/// Evaluate one proposal for the caller's role
pub async fn evaluate_proposal(
    Query(query): Query<RoleQuery>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let role = query.parse()?;
    let proposal = parse_proposal(body)?;

    info!(
        "Evaluating proposal {:?} at status {} for role {:?}",
        proposal.id, proposal.status_code, role
    );

    Ok(ok(proposal.evaluate(role)))
}

/// Outcome counters over a list of proposals
pub async fn summarize_proposals(Json(body): Json<Value>) -> Result<Response, AppError> {
    let proposals = parse_proposals(body)?;
    let summary = OutcomeSummary::from_proposals(&proposals);

    debug!(
        "Summarised {} proposals ({} sukses, {} proses, {} tolak)",
        summary.total, summary.sukses, summary.proses, summary.tolak
    );

    Ok(ok(summary))
}

/// Proposals classified as `?outcome=`, evaluated for `?role=`
pub async fn filter_proposals(
    Query(outcome_query): Query<OutcomeQuery>,
    Query(role_query): Query<RoleQuery>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let outcome = outcome_query
        .outcome
        .parse::<Outcome>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let role = role_query.parse()?;
    let proposals = parse_proposals(body)?;

    let views: Vec<ProposalView> = filter_by_outcome(&proposals, outcome)
        .into_iter()
        .map(|proposal| proposal.evaluate(role))
        .collect();

    info!(
        "Filtered {} of {} proposals by outcome {}",
        views.len(),
        proposals.len(),
        outcome
    );

    Ok(ok(views))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_query_parsing() {
        let query = RoleQuery {
            role: Some("verifikator-bappeda".to_string()),
        };
        assert_eq!(query.parse().unwrap(), Some(Role::Bappeda));

        let blank = RoleQuery {
            role: Some("  ".to_string()),
        };
        assert_eq!(blank.parse().unwrap(), None);

        assert_eq!(RoleQuery::default().parse().unwrap(), None);
    }

    #[test]
    fn test_unknown_role_is_validation_error() {
        let query = RoleQuery {
            role: Some("camat".to_string()),
        };
        assert!(matches!(query.parse(), Err(AppError::Validation(_))));
    }
}
