//! # GEPx CLI Tool
//!
//! Command-line entry points for sessions and transactions. Every command
//! takes `org userID recordID` positionally; state-changing commands run the
//! full submission pipeline and print the confirmed record as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gepx_client::client::GepxClient;
use gepx_client::config::ClientConfig;
use gepx_client::ledger::HttpConnector;
use gepx_client::logging::init_structured_logging;
use gepx_client::models::{BidType, Record, RecordKind};
use gepx_client::pipeline::{PipelineFailure, PipelineOutcome};
use gepx_client::PipelineState;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "gepx-cli")]
#[command(about = "Submit dynamically endorsed operations against GEPx records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: ./gepx.toml if present)
    #[arg(short, long, global = true, env = "GEPX_CONFIG")]
    config: Option<PathBuf>,

    /// Record flavour to address (overrides configuration)
    #[arg(short, long, global = true)]
    kind: Option<RecordKind>,

    #[command(subcommand)]
    command: Commands,
}

/// Caller identity and target record shared by every command
#[derive(Debug, Clone, clap::Args)]
pub struct Target {
    /// Organization to act for (Org1 or Org2)
    org: String,
    /// Wallet label of the user
    user: String,
    /// Session or transaction id
    record_id: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read a record without submitting anything
    Query {
        #[command(flatten)]
        target: Target,
    },
    /// Create a record with the caller as admin
    Create {
        #[command(flatten)]
        target: Target,
    },
    /// Place a private bid; prints the bid id on stderr
    Bid {
        #[command(flatten)]
        target: Target,
        /// buy or sell
        bid_type: BidType,
        volume: u64,
    },
    /// Publish the hash of a placed bid
    SubmitBid {
        #[command(flatten)]
        target: Target,
        bid_id: String,
    },
    /// Reveal a placed bid after the record is closed
    FinalizeBid {
        #[command(flatten)]
        target: Target,
        bid_id: String,
    },
    /// Stop accepting bids
    Close {
        #[command(flatten)]
        target: Target,
    },
    /// Settle revealed bids and end the record
    End {
        #[command(flatten)]
        target: Target,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Query { .. } => "query",
            Self::Create { .. } => "create",
            Self::Bid { .. } => "bid",
            Self::SubmitBid { .. } => "submit-bid",
            Self::FinalizeBid { .. } => "finalize-bid",
            Self::Close { .. } => "close",
            Self::End { .. } => "end",
        }
    }

    fn target(&self) -> &Target {
        match self {
            Self::Query { target }
            | Self::Create { target }
            | Self::Bid { target, .. }
            | Self::SubmitBid { target, .. }
            | Self::FinalizeBid { target, .. }
            | Self::Close { target }
            | Self::End { target } => target,
        }
    }

    fn usage(&self) -> String {
        match self {
            Self::Bid { .. } => format!("Usage: gepx-cli {} org userID recordID bidType volume", self.name()),
            Self::SubmitBid { .. } | Self::FinalizeBid { .. } => {
                format!("Usage: gepx-cli {} org userID recordID bidID", self.name())
            }
            _ => format!("Usage: gepx-cli {} org userID recordID", self.name()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            // Nowhere left to report a failed write of the usage text
            if err.print().is_err() {
                return ExitCode::FAILURE;
            }
            return code;
        }
    };

    init_structured_logging();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("******** FAILED to run the application: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config =
        ClientConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(kind) = cli.kind {
        config.record_kind = kind;
    }

    let target = cli.command.target();
    if let Err(err) = config.find_organization(&target.org) {
        eprintln!("{}", cli.command.usage());
        eprintln!("{}", err_message(&err));
        return Ok(ExitCode::FAILURE);
    }

    info!(
        command = cli.command.name(),
        org = %target.org,
        record_id = %target.record_id,
        kind = %config.record_kind,
        "gepx-cli starting"
    );

    let connector = HttpConnector::new(&config);
    let client = GepxClient::connect(&config, &connector, &target.org, &target.user)
        .await
        .with_context(|| format!("failed to connect as {} of {}", target.user, target.org))?;

    let result = dispatch(&client, &cli.command).await;
    let disconnected = client.disconnect().await;

    let record = match (result, disconnected) {
        (Ok(record), Ok(())) => record,
        (Ok(_), Err(err)) => return Err(err).context("failed to disconnect from the gateway"),
        (Err(err), Ok(())) => return Err(err),
        (Err(err), Err(disconnect_err)) => {
            warn!(error = %disconnect_err, "Disconnect after a failed command also failed");
            return Err(err);
        }
    };

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(ExitCode::SUCCESS)
}

/// Run one command and return the record to print
async fn dispatch(client: &GepxClient, command: &Commands) -> anyhow::Result<Record> {
    let record_id = command.target().record_id.as_str();
    let outcome = match command {
        Commands::Query { .. } => return Ok(client.query(record_id).await?),
        Commands::Create { .. } => client.create(record_id).await,
        Commands::Bid {
            bid_type, volume, ..
        } => client.place_bid(record_id, *bid_type, *volume).await,
        Commands::SubmitBid { bid_id, .. } => client.submit_bid(record_id, bid_id).await,
        Commands::FinalizeBid { bid_id, .. } => client.finalize_bid(record_id, bid_id).await,
        Commands::Close { .. } => client.close(record_id).await,
        Commands::End { .. } => client.end(record_id).await,
    };

    let outcome: PipelineOutcome = outcome.map_err(report_failure)?;
    if let Some(bid_id) = &outcome.placed_bid_id {
        eprintln!("Bid id: {bid_id}");
    }
    Ok(outcome.confirmation.record)
}

fn report_failure(failure: PipelineFailure) -> anyhow::Error {
    if failure.reached(PipelineState::Confirming) {
        eprintln!(
            "{} was committed but the confirming read of {} failed",
            failure.operation, failure.record_id
        );
    }
    anyhow::Error::new(failure)
}

fn err_message(err: &gepx_client::GepxError) -> String {
    match err {
        gepx_client::GepxError::InvalidInput(message) => message.clone(),
        other => other.to_string(),
    }
}
