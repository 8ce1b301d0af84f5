// ABOUTME: Terminal rendering for statuses, proposal views and outcome summaries
// ABOUTME: Builds comfy-table tables so commands and tests share one layout

use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use asb_core::{Outcome, OutcomeSummary, ProposalView, Role, StatusInfo, VerifierSlot};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn join_roles(roles: &[Role]) -> String {
    if roles.is_empty() {
        return "-".to_string();
    }
    roles
        .iter()
        .map(Role::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_slots(slots: &[VerifierSlot]) -> String {
    let roles: Vec<Role> = slots.iter().map(VerifierSlot::role).collect();
    join_roles(&roles)
}

pub fn colored_outcome(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Sukses => outcome.as_str().green().bold(),
        Outcome::Proses => outcome.as_str().yellow(),
        Outcome::Tolak => outcome.as_str().red().bold(),
    }
}

pub fn status_table(rows: &[StatusInfo]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Code", "Label", "Actors", "Approval slots"]);

    for row in rows {
        table.add_row(vec![
            row.code.to_string(),
            row.label.to_string(),
            join_roles(&row.actors),
            join_slots(&row.relevant_slots),
        ]);
    }

    table
}

pub fn view_table(view: &ProposalView) -> Table {
    let approval = |slot: VerifierSlot| match view.approvals.get(slot) {
        Some(verifier) => format!("approved by {}", verifier),
        None => "pending".to_string(),
    };

    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![
        "Proposal".to_string(),
        view.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
    ]);
    table.add_row(vec![
        "Status".to_string(),
        format!("{} ({})", view.label, view.status_code),
    ]);
    table.add_row(vec!["Outcome".to_string(), view.outcome.to_string()]);
    for slot in VerifierSlot::ALL {
        table.add_row(vec![slot.role().to_string(), approval(slot)]);
    }
    table.add_row(vec![
        "Role".to_string(),
        view.role.map_or_else(|| "-".to_string(), |role| role.to_string()),
    ]);
    let actions = if view.actions.is_empty() {
        "none".to_string()
    } else {
        view.actions
            .iter()
            .map(|action| action.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    table.add_row(vec!["Actions".to_string(), actions]);
    if let Some(reason) = &view.reject_reason {
        table.add_row(vec!["Reject reason".to_string(), reason.clone()]);
    }

    table
}

pub fn summary_table(summary: &OutcomeSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Outcome", "Proposals"]);
    for outcome in Outcome::ALL {
        table.add_row(vec![outcome.to_string(), summary.count(outcome).to_string()]);
    }
    table.add_row(vec!["Total".to_string(), summary.total.to_string()]);
    table
}

pub fn per_status_table(summary: &OutcomeSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Code", "Label", "Proposals"]);
    for (code, count) in &summary.per_status {
        table.add_row(vec![
            code.to_string(),
            asb_core::label_for(*code).to_string(),
            count.to_string(),
        ]);
    }
    table
}

pub fn print_view(view: &ProposalView) {
    println!(
        "{} {}",
        "ASB proposal".blue().bold(),
        colored_outcome(view.outcome)
    );
    println!("{}", view_table(view));
}

pub fn print_summary(summary: &OutcomeSummary) {
    println!("{}", "ASB proposal outcomes".blue().bold());
    println!("{}", summary_table(summary));
    if !summary.per_status.is_empty() {
        println!("{}", per_status_table(summary));
    }
}
