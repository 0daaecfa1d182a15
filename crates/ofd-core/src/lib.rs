//! # ofd-core: Pure Receipt Logic for OFD Receipts
//!
//! This crate turns payloads from the 1-OFD cabinet API into canonical
//! receipt records. Everything here is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      OFD Receipts Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Embedding application                           │   │
//! │  │        credentials + date ──► get_receipts() ──► Receipts       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  ofd-client (HTTP layer)                        │   │
//! │  │   login ─► list devices ─► list documents ─► fetch tickets      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ wire payloads                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ofd-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  window   │  │ normalize │  │   │
//! │  │   │  Receipt  │  │   Money   │  │ DayWindow │  │ VAT pick  │  │   │
//! │  │   │  Product  │  │  ×100     │  │ epoch ms  │  │ flatten   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Output records (Device, Receipt, Product)
//! - [`money`] - Money type in minor units, plus major→minor scaling
//! - [`window`] - Start/end of a calendar day as epoch milliseconds
//! - [`wire`] - JSON shapes returned by the OFD API
//! - [`normalize`] - Device flattening and ticket normalization
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ofd_core::money::Money;
//!
//! // The service reports totals as floats in roubles; receipts carry kopecks.
//! let total = Money::from_major_truncated(12.999);
//! assert_eq!(total.cents(), 1299);
//! ```

pub mod error;
pub mod money;
pub mod normalize;
pub mod types;
pub mod window;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use normalize::{flatten_devices, normalize_ticket, select_vat_bucket, Normalized};
pub use types::*;
pub use window::DayWindow;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Format of `transactionDate` in ticket payloads.
///
/// The service sends local wall-clock time without a zone designator, always
/// with three fractional digits: `2024-01-15T10:00:00.000`.
pub const TRANSACTION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Default prefix for receipt verification links.
pub const DEFAULT_LINK_BASE: &str = "https://consumer.1-ofd.ru/v1";
