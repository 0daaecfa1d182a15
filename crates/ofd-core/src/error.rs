//! # Error Types
//!
//! Domain-specific error types for ofd-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ofd-core errors (this file)                                           │
//! │  └── CoreError        - Payload fields that could not be interpreted   │
//! │                                                                         │
//! │  ofd-client errors (separate crate)                                    │
//! │  └── OfdError         - Transport, decode and authentication failures  │
//! │                                                                         │
//! │  Flow: CoreError ──► ReceiptBatch.warnings (never aborts a receipt)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Normalization never fails as a whole. A field that cannot be interpreted
//! is left at its zero value and reported as a `CoreError` next to the
//! receipt it belongs to.

use thiserror::Error;

/// Errors raised while interpreting a ticket payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// `transactionDate` did not match `YYYY-MM-DDTHH:MM:SS.mmm`.
    ///
    /// ## When This Occurs
    /// - The field is missing (empty string)
    /// - The service changed its timestamp format
    /// - Fractional seconds have a different number of digits
    #[error("Cannot parse transaction date '{value}': {reason}")]
    DateParse { value: String, reason: String },

    /// An item's quantity was neither a number nor a numeric string.
    #[error("Invalid quantity '{value}' for item '{item}'")]
    InvalidQuantity { item: String, value: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
