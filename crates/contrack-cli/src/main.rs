//! Contrack CLI — command-line client for the contract store.
//!
//! Set CONTRACK_API_URL and CONTRACK_USER_EMAIL (CONTRACK_API_TOKEN for a
//! real token; omitted, the demo login token is used).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use contrack_api_client::{ApiClient, Session};
use contrack_cli::{attention_summary, init_tracing};
use contrack_core::models::{manual_entry_id, ContractInput};
use contrack_core::status::{classify_contract, needing_attention, StatusSummary};
use contrack_core::ClientConfig;
use contrack_workflows::{
    content_type_for_extension, CandidateFile, ReportDesk, ReportOutcome, UploadObserver,
    UploadOrchestrator, UploadProgress,
};

#[derive(Parser)]
#[command(name = "contrack", about = "Contract store CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ContractFields {
    /// Service the contract covers
    #[arg(long)]
    service_name: Option<String>,
    /// Supplier party
    #[arg(long)]
    supplier: Option<String>,
    /// Customer party
    #[arg(long)]
    customer: Option<String>,
    /// Start date (YYYY/MM/DD)
    #[arg(long)]
    start_date: Option<String>,
    /// End date (YYYY/MM/DD)
    #[arg(long)]
    end_date: Option<String>,
    /// Free-text details
    #[arg(long)]
    details: Option<String>,
    /// Termination notice period
    #[arg(long)]
    notice_period: Option<String>,
}

impl ContractFields {
    fn into_input(self) -> ContractInput {
        ContractInput {
            id: None,
            service_name: self.service_name,
            supplier_name: self.supplier,
            customer_name: self.customer,
            contract_start_date: self.start_date,
            contract_end_date: self.end_date,
            contract_details: self.details,
            termination_notice_period: self.notice_period,
            document_link: None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List contracts
    List {
        /// Maximum number of contracts
        #[arg(long, default_value = "100")]
        limit: u32,
    },
    /// Get a single contract by id
    Get {
        /// Contract id
        id: String,
    },
    /// Create a contract from manually entered fields
    Create {
        #[command(flatten)]
        fields: ContractFields,
    },
    /// Partially update a contract
    Update {
        /// Contract id
        id: String,
        #[command(flatten)]
        fields: ContractFields,
    },
    /// Delete a contract
    Delete {
        /// Contract id
        id: String,
    },
    /// Contract service health probe
    Health,
    /// Upload contract documents for AI extraction
    Upload {
        /// Paths of PDF or image files to upload
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
    },
    /// Generate the AI analysis report for a contract
    Report {
        /// Contract id
        id: String,
    },
    /// Show contracts needing attention (expired, expiring soon, missing end date)
    Expiring {
        /// Maximum number of contracts to scan
        #[arg(long, default_value = "1000")]
        limit: u32,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Prints one line per stage change on stderr, keeping stdout valid JSON.
struct ConsoleObserver;

impl UploadObserver for ConsoleObserver {
    fn on_stage(&self, progress: &UploadProgress) {
        eprintln!(
            "[{}/{}] {}: {}",
            progress.file_index + 1,
            progress.total_files,
            progress.file_name,
            progress.stage
        );
    }

    fn on_refresh_needed(&self) {
        eprintln!("contract collection changed; re-run `contrack list` to see new entries");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env()?;
    let session = Session::from_env()
        .context("Failed to create session. Set CONTRACK_USER_EMAIL (and CONTRACK_API_TOKEN)")?;
    let client = ApiClient::new(&config, session)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::List { limit } => {
            let response = client.list_contracts(limit).await?;
            print_json(&response)?;
        }
        Commands::Get { id } => {
            let response = client.get_contract(&id).await?;
            print_json(&response)?;
        }
        Commands::Create { fields } => {
            let mut input = fields.into_input();
            input.id = Some(manual_entry_id(Utc::now()));
            let response = client.create_contract(&input).await?;
            print_json(&response)?;
        }
        Commands::Update { id, fields } => {
            let response = client.update_contract(&id, &fields.into_input()).await?;
            print_json(&response)?;
        }
        Commands::Delete { id } => {
            let response = client.delete_contract(&id).await?;
            print_json(&response)?;
        }
        Commands::Health => {
            let response = client.health().await?;
            print_json(&response)?;
        }
        Commands::Upload { files } => {
            let mut candidates = Vec::with_capacity(files.len());
            for path in &files {
                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("document")
                    .to_string();
                let content_type = content_type_for_extension(&file_name)
                    .unwrap_or("application/octet-stream")
                    .to_string();
                candidates.push(CandidateFile {
                    file_name,
                    content_type,
                    data,
                });
            }

            let orchestrator = UploadOrchestrator::new(Arc::new(client.clone()))
                .with_observer(Arc::new(ConsoleObserver));
            let outcome = orchestrator
                .upload_batch(candidates, &CancellationToken::new())
                .await;

            let results: Vec<serde_json::Value> = outcome
                .results
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "file_name": r.file_name,
                        "success": r.success,
                        "error": r.error,
                        "contract_id": r.response.as_ref().and_then(|resp| resp.contract_id.clone()),
                        "extracted_data": r.response.as_ref().and_then(|resp| resp.extracted_data.clone()),
                    })
                })
                .collect();
            print_json(&serde_json::json!({
                "succeeded": outcome.succeeded(),
                "failed": outcome.failed(),
                "results": results,
            }))?;
        }
        Commands::Report { id } => {
            let desk = ReportDesk::new(
                Arc::new(client.clone()),
                Duration::from_secs(config.report_timeout_secs),
            );
            match desk.open(&id).await? {
                ReportOutcome::Ready(report) => print_json(&report)?,
                ReportOutcome::Unavailable => print_json(&serde_json::json!({
                    "success": false,
                    "message": "No report available for this contract",
                }))?,
                ReportOutcome::Superseded => {
                    // Single request per invocation; nothing can supersede it.
                    anyhow::bail!("report request superseded");
                }
            }
        }
        Commands::Expiring { limit } => {
            let response = client.list_contracts(limit).await?;
            let now = Utc::now();
            let summary = StatusSummary::scan(&response.data, now, config.expiry_warning_days);
            eprintln!("{}", attention_summary(&summary));

            let attention: Vec<serde_json::Value> =
                needing_attention(&response.data, now, config.expiry_warning_days)
                    .into_iter()
                    .map(|contract| {
                        serde_json::json!({
                            "id": contract.id,
                            "service_name": contract.service_name,
                            "supplier_name": contract.supplier_name,
                            "contract_end_date": contract.contract_end_date,
                            "status": classify_contract(contract, now, config.expiry_warning_days)
                                .to_string(),
                        })
                    })
                    .collect();
            print_json(&attention)?;
        }
    }

    Ok(())
}
