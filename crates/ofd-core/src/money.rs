//! # Money Module
//!
//! Provides the `Money` type for receipt-level monetary values.
//!
//! ## Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE THE UNITS COME FROM                                              │
//! │                                                                         │
//! │  Ticket payload (OFD API):                                              │
//! │    totalSum: 10.0    nds20: 1.5       ← floats, major units (roubles)  │
//! │    items[].price: 500                 ← integer, left as reported      │
//! │                                                                         │
//! │  Receipt (our output):                                                  │
//! │    price: 1000       vat_price: 150   ← Money, minor units (kopecks)   │
//! │                                                                         │
//! │  Scaling is ×100 with TRUNCATION:  12.999 → 1299, never 1300           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ofd_core::money::Money;
//!
//! let total = Money::from_major_truncated(12.34);
//! assert_eq!(total.cents(), 1234);
//! assert_eq!(total.to_string(), "12.34");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Minor units per major unit (kopecks per rouble).
pub const MINOR_PER_MAJOR: i64 = 100;

/// Scaled values closer than this to a whole number are treated as that number.
///
/// `12.34 * 100.0` is not exactly `1234.0` in binary floating point for every
/// input; without snapping such values would truncate one kopeck low.
const SNAP_EPSILON: f64 = 1e-6;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (kopecks).
///
/// Serializes as a bare integer, so `Receipt { price: Money(1000) }` is
/// `{"price": 1000}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a float amount in major units into minor units.
    ///
    /// The amount is multiplied by 100 and truncated toward zero, so
    /// fractions of a kopeck are dropped rather than rounded:
    ///
    /// ```rust
    /// use ofd_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_truncated(12.34).cents(), 1234);
    /// assert_eq!(Money::from_major_truncated(12.999).cents(), 1299);
    /// assert_eq!(Money::from_major_truncated(-0.015).cents(), -1);
    /// ```
    ///
    /// Non-finite input (NaN, infinity) maps to zero.
    pub fn from_major_truncated(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        let scaled = amount * MINOR_PER_MAJOR as f64;
        let nearest = scaled.round();
        let minor = if (scaled - nearest).abs() < SNAP_EPSILON {
            nearest
        } else {
            scaled.trunc()
        };
        Money(minor as i64)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`1234` → `12.34`), for logs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
