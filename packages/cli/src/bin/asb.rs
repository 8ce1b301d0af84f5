use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

use asb_cli::config::Config;
use asb_cli::output;
use asb_client::BackendClient;
use asb_core::{
    filter_by_outcome, status_table, GateAction, Outcome, OutcomeSummary, Proposal, ProposalView,
    Role, StatusInfo,
};

#[derive(Parser)]
#[command(name = "asb")]
#[command(about = "ASB proposal workflow - status engine, draft API and backend tools")]
#[command(version)]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long, help = "Keep drafts in memory instead of the database file")]
        ephemeral: bool,
    },
    /// Show the status table, or one status
    Status {
        /// Status code to resolve
        #[arg(allow_negative_numbers = true)]
        code: Option<i64>,
    },
    /// Evaluate a proposal JSON file
    Evaluate {
        file: PathBuf,
        /// Role to evaluate the proposal for (OPD, ADPEM, BAPPEDA, BPKAD, SUPERADMIN)
        #[arg(long)]
        role: Option<Role>,
    },
    /// Summarise a JSON array of proposals
    Summary {
        file: PathBuf,
        /// List the proposals with this outcome (Sukses, Proses, Tolak)
        #[arg(long)]
        outcome: Option<Outcome>,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Fetch a proposal from the backend and evaluate it
    Fetch {
        id: i64,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Perform a verifier action on a backend proposal
    Act {
        id: i64,
        /// verify-lantai, verify-bpns, verify-rekening, approve or reject
        action: GateAction,
        #[arg(long)]
        role: Role,
        /// Required when rejecting
        #[arg(long)]
        reason: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    asb_cli::init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command, cli.json).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Serve { ephemeral } => {
            let config = Config::from_env()?;
            asb_cli::run_server(config, ephemeral).await
        }
        Commands::Status { code } => {
            let rows: Vec<StatusInfo> = match code {
                Some(code) => vec![StatusInfo::for_code(code)],
                None => status_table(),
            };
            if json {
                return print_json(&rows);
            }
            println!("{}", output::status_table(&rows));
            Ok(())
        }
        Commands::Evaluate { file, role } => {
            let proposal: Proposal = read_json(&file)?;
            show_view(&proposal.evaluate(role), json)
        }
        Commands::Summary {
            file,
            outcome,
            role,
        } => {
            let proposals: Vec<Proposal> = read_json(&file)?;
            match outcome {
                Some(outcome) => {
                    let views: Vec<ProposalView> = filter_by_outcome(&proposals, outcome)
                        .into_iter()
                        .map(|proposal| proposal.evaluate(role))
                        .collect();
                    if json {
                        return print_json(&views);
                    }
                    if views.is_empty() {
                        println!("{}", format!("No {} proposals", outcome).yellow());
                    }
                    for view in &views {
                        output::print_view(view);
                    }
                    Ok(())
                }
                None => {
                    let summary = OutcomeSummary::from_proposals(&proposals);
                    if json {
                        return print_json(&summary);
                    }
                    output::print_summary(&summary);
                    Ok(())
                }
            }
        }
        Commands::Fetch { id, role } => {
            let client = backend_client()?;
            let proposal = client.get_proposal(id).await?;
            show_view(&proposal.evaluate(role), json)
        }
        Commands::Act {
            id,
            action,
            role,
            reason,
        } => {
            if action == GateAction::Reject && reason.is_none() {
                bail!("--reason is required to reject a proposal");
            }
            let client = backend_client()?;
            let proposal = client.get_proposal(id).await?;
            let updated = client
                .perform(&proposal, role, action, reason.as_deref())
                .await?;
            if !json {
                println!("{} {} by {}", "Done:".green().bold(), action, role);
            }
            show_view(&updated.evaluate(Some(role)), json)
        }
    }
}

fn backend_client() -> anyhow::Result<BackendClient> {
    let config = Config::from_env()?;
    let url = config.require_backend_url()?;
    Ok(BackendClient::new(
        url,
        config.backend_token.clone(),
        config.http_timeout,
    )?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid proposal JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show_view(view: &ProposalView, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(view);
    }
    output::print_view(view);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accepts_negative_code() {
        let cli = Cli::try_parse_from(["asb", "status", "-1"]).unwrap();
        match cli.command {
            Commands::Status { code } => assert_eq!(code, Some(-1)),
            _ => panic!("expected status command"),
        }
    }

    #[test]
    fn test_status_without_code_lists_table() {
        let cli = Cli::try_parse_from(["asb", "status", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Status { code: None }));
    }
}
