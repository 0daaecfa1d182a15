//! # Domain Types
//!
//! Records produced by the receipt pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Output Records                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Device      │   │     Receipt     │   │     Product     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  address        │   │  kkt_reg_id     │   │  name, quantity │       │
//! │  │  kkt_reg_id     │   │  fp, fd, fn     │   │  price (as-is)  │       │
//! │  └─────────────────┘   │  date (RFC3339) │   │  vat_price      │       │
//! │                        │  price (Money)  │   │  total_price    │       │
//! │  ┌─────────────────┐   │  vat_price      │   │  fp, fd, time   │◄──┐   │
//! │  │   DocumentRef   │   │  link           │   └─────────────────┘   │   │
//! │  │  opaque id      │   │  products ──────┼─────────────────────────┘   │
//! │  └─────────────────┘   └─────────────────┘   copies of parent fields   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Denormalization
//! Every `Product` repeats its receipt's FP, FD, FN and timestamp so callers
//! can iterate line items without carrying the receipt around.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Device
// =============================================================================

/// A cash register (KKT) registered to the account, with its store address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Device {
    /// Postal address of the retail place the device belongs to.
    pub address: String,

    /// The service's numeric device id, in string form.
    ///
    /// This is the key for the transactions endpoint, not the FNS
    /// registration number printed on receipts.
    pub kkt_reg_id: String,
}

// =============================================================================
// Document Reference
// =============================================================================

/// Opaque identifier of one fiscal document, as returned by the
/// transactions listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentRef(pub String);

impl DocumentRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentRef {
    fn from(id: &str) -> Self {
        DocumentRef(id.to_string())
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Canonical receipt record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    /// FNS registration number of the device, as reported in the ticket.
    pub kkt_reg_id: String,

    /// Fiscal sign (FP).
    pub fp: String,

    /// Fiscal document number (FD), in string form.
    pub fd: String,

    /// Fiscal drive number (FN).
    pub fiscal_drive_number: String,

    /// Transaction time as RFC3339. Empty when the ticket's date was unreadable.
    pub date: String,

    /// Line items in payload order.
    pub products: Vec<Product>,

    /// Consumer verification link.
    pub link: String,

    /// Grand total in kopecks.
    pub price: Money,

    /// VAT total in kopecks, from a single tax bucket.
    pub vat_price: Money,
}

impl Receipt {
    /// Returns false when the ticket's transaction date could not be parsed.
    pub fn has_date(&self) -> bool {
        !self.date.is_empty()
    }
}

// =============================================================================
// Product
// =============================================================================

/// One line item of a receipt.
///
/// `price` and `vat_price` are copied from the ticket unchanged; only the
/// receipt-level totals are rescaled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub name: String,

    /// Quantity truncated toward zero (1.75 kg → 1).
    pub quantity: i64,

    /// Unit price as reported by the service.
    pub price: i64,

    /// VAT rate. Not reported per line by the service; always 0.
    pub vat: i64,

    /// VAT amount for the line as reported by the service.
    pub vat_price: i64,

    /// The parent receipt's grand total, not a per-line sum.
    pub total_price: Money,

    pub fp: String,
    pub fd: String,
    pub fiscal_drive_number: String,

    /// The parent receipt's timestamp.
    pub time: String,
}
