//! # ofd-client: HTTP Client for the 1-OFD Cabinet
//!
//! This crate talks to the 1-OFD cabinet API and produces the day's
//! receipts for an account, normalized by `ofd-core`.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   OfdClient (pipeline)                           │  │
//! │  │                                                                  │  │
//! │  │  get_receipts(date) ─► ReceiptBatch | Aborted { partial }        │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │    Session     │  │    Listers     │  │      Transport         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ POST login     │  │ devices        │  │ reqwest client         │    │
//! │  │ token in an    │  │ documents      │  │ X-XSRF-TOKEN header    │    │
//! │  │ RwLock slot    │  │ tickets        │  │ status + JSON decode   │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ENDPOINTS:                                                            │
//! │  • POST /api/user/login                                                │
//! │  • GET  /api/retail-places/kkms                                        │
//! │  • GET  /api/kkms/{id}/transactions?fromDate=..&toDate=..              │
//! │  • GET  /api/ticket/{id}                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pipeline`] - `OfdClient` and the `get_receipts` orchestration
//! - [`session`] - Login and token storage
//! - [`devices`] - Cash register listing
//! - [`documents`] - Per-device, per-day document listing
//! - [`tickets`] - Ticket fetch and normalization
//! - [`transport`] - JSON over HTTP
//! - [`config`] - Credentials and service settings (TOML + env)
//! - [`error`] - Client error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ofd_client::{OfdClient, OfdConfig};
//!
//! let config = OfdConfig::load_or_default(None);
//! let client = OfdClient::new(config)?;
//!
//! match client.get_receipts_today().await {
//!     Ok(batch) => println!("{} receipts", batch.receipts.len()),
//!     Err(aborted) => eprintln!("{} (kept {})", aborted, aborted.partial.receipts.len()),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod devices;
pub mod documents;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod tickets;
pub mod transport;

#[cfg(test)]
mod test_server;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{Credentials, OfdConfig, ServiceSettings};
pub use error::{OfdError, OfdResult};
pub use pipeline::{Aborted, OfdClient, ReceiptBatch};
pub use session::Session;
pub use transport::Transport;

pub use ofd_core::{Device, DocumentRef, Money, Product, Receipt};
