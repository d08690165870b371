#![allow(clippy::doc_markdown)] // Allow technical terms like GEPx, MSP in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # GEPx Client
//!
//! Dynamic-endorsement transaction submission for a permissioned,
//! multi-organization ledger that hosts trading sessions and transactions.
//!
//! ## Overview
//!
//! Every state-changing operation against a record must be endorsed by
//! exactly the organizations listed on that record. Rather than fixing the
//! endorsement policy up front, the client reads the record, derives the
//! endorsing set from its participant list, and only then submits. Private
//! bid data travels in the transient map and never appears in the public
//! arguments.
//!
//! ## Module Organization
//!
//! - [`pipeline`] - Read, resolve, build, submit and confirm
//! - [`state_machine`] - Pipeline stage tracking
//! - [`ledger`] - Gateway traits, wallet identities and the REST adapter
//! - [`models`] - Records, bids and their ledger JSON forms
//! - [`client`] - Connection-level entry points
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gepx_client::client::GepxClient;
//! use gepx_client::config::ClientConfig;
//! use gepx_client::ledger::HttpConnector;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::load(None)?;
//! let connector = HttpConnector::new(&config);
//! let client = GepxClient::connect(&config, &connector, "Org1", "appUser").await?;
//!
//! let outcome = client.close("session-1").await?;
//! println!("status is now {}", outcome.record().status);
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod state_machine;
pub mod utils;

pub use client::GepxClient;
pub use config::ClientConfig;
pub use error::{GepxError, Result};
pub use models::{Bid, BidType, Record, RecordKind, RecordStatus};
pub use pipeline::{Operation, Pipeline, PipelineFailure, PipelineOutcome, PipelineSettings};
pub use state_machine::{PipelineEvent, PipelineState, PipelineStateMachine};
