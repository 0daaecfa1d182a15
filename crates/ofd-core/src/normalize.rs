//! # Normalization
//!
//! Reshapes wire payloads into output records.
//!
//! ## Ticket → Receipt
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ticket field              Receipt field        Rule                    │
//! │  ───────────────────────   ──────────────────   ─────────────────────   │
//! │  transactionDate           date                 parse .mmm → RFC3339    │
//! │  kktRegId                  kkt_reg_id           copy, else device id    │
//! │  fiscalId                  fp                   copy                    │
//! │  fiscalDocumentNumber      fd                   to string               │
//! │  fiscalDriveNumber         fiscal_drive_number  copy                    │
//! │  nds20 / nds0 / nds10      vat_price            first > 0, ×100, trunc  │
//! │  totalSum                  price                ×100, trunc             │
//! │  qrCode                    link                 link_base + "?" + qr    │
//! │  items[]                   products[]           see below               │
//! │                                                                         │
//! │  Item field                Product field                                │
//! │  quantity                  quantity             truncate to integer     │
//! │  price / ndsSum            price / vat_price    copy, NOT ×100          │
//! │  (none)                    total_price          receipt's price         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Device, Product, Receipt};
use crate::wire::{RetailPlace, Ticket};
use crate::TRANSACTION_DATE_FORMAT;

// =============================================================================
// Devices
// =============================================================================

/// Flattens retail places into one `Device` per (place, device) pair.
///
/// Order follows the response: places first, then devices within a place.
pub fn flatten_devices(places: &[RetailPlace]) -> Vec<Device> {
    places
        .iter()
        .flat_map(|place| {
            place.kkms.iter().map(move |kkm| Device {
                address: place.address.clone(),
                kkt_reg_id: kkm.id.to_string(),
            })
        })
        .collect()
}

// =============================================================================
// VAT
// =============================================================================

/// Picks the single VAT amount reported for a ticket, in roubles.
///
/// Precedence is 20% → 0% → 10%: the first bucket greater than zero wins and
/// the others are ignored, even when positive. Zero when none is positive.
pub fn select_vat_bucket(ticket: &Ticket) -> f64 {
    [ticket.nds20, ticket.nds0, ticket.nds10]
        .into_iter()
        .find(|amount| *amount > 0.0)
        .unwrap_or(0.0)
}

// =============================================================================
// Tickets
// =============================================================================

/// A normalized receipt plus the fields that could not be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub receipt: Receipt,
    pub warnings: Vec<CoreError>,
}

/// Length of `2024-01-15T10:00:00.000`.
const TRANSACTION_DATE_LEN: usize = 23;

/// Parses `transactionDate` and renders it as RFC3339 in UTC.
///
/// The service does not send a zone, so the wall-clock reading is kept as is
/// and marked `Z`. Exactly three fractional digits are required.
pub fn format_transaction_date(raw: &str) -> CoreResult<String> {
    let parse_error = |reason: String| CoreError::DateParse {
        value: raw.to_string(),
        reason,
    };

    // chrono's `%.3f` also accepts a missing fraction.
    if raw.len() != TRANSACTION_DATE_LEN || raw.as_bytes()[19] != b'.' {
        return Err(parse_error(format!(
            "expected {} characters in the form YYYY-MM-DDTHH:MM:SS.mmm",
            TRANSACTION_DATE_LEN
        )));
    }

    NaiveDateTime::parse_from_str(raw, TRANSACTION_DATE_FORMAT)
        .map(|dt| dt.and_utc().to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .map_err(|e| parse_error(e.to_string()))
}

/// Builds the consumer verification link for a QR payload.
pub fn verification_link(link_base: &str, qr_code: &str) -> String {
    format!("{}?{}", link_base, qr_code)
}

/// Converts a ticket into a `Receipt`.
///
/// `device_id` is the device the document was listed under; it stands in for
/// `kktRegId` when the ticket leaves that field empty.
///
/// Never fails: an unreadable date leaves `date` (and every product's `time`)
/// empty, an unreadable quantity becomes 0, and each such field is reported in
/// `warnings`.
pub fn normalize_ticket(ticket: &Ticket, device_id: &str, link_base: &str) -> Normalized {
    let mut warnings = Vec::new();

    let date = match format_transaction_date(&ticket.transaction_date) {
        Ok(date) => date,
        Err(e) => {
            warnings.push(e);
            String::new()
        }
    };

    let fd = ticket.fiscal_document_number.to_string();
    let price = Money::from_major_truncated(ticket.total_sum);
    let vat_price = Money::from_major_truncated(select_vat_bucket(ticket));

    let products = ticket
        .items
        .iter()
        .map(|item| {
            let quantity = match item.quantity.as_f64() {
                Some(q) if q.is_finite() => q.trunc() as i64,
                _ => {
                    warnings.push(CoreError::InvalidQuantity {
                        item: item.name.clone(),
                        value: item.quantity.to_string(),
                    });
                    0
                }
            };
            Product {
                name: item.name.clone(),
                quantity,
                price: item.price,
                vat: 0,
                vat_price: item.nds_sum,
                total_price: price,
                fp: ticket.fiscal_id.clone(),
                fd: fd.clone(),
                fiscal_drive_number: ticket.fiscal_drive_number.clone(),
                time: date.clone(),
            }
        })
        .collect();

    let kkt_reg_id = if ticket.kkt_reg_id.is_empty() {
        device_id.to_string()
    } else {
        ticket.kkt_reg_id.clone()
    };

    let receipt = Receipt {
        kkt_reg_id,
        fp: ticket.fiscal_id.clone(),
        fd,
        fiscal_drive_number: ticket.fiscal_drive_number.clone(),
        date,
        products,
        link: verification_link(link_base, &ticket.qr_code),
        price,
        vat_price,
    };

    Normalized { receipt, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{Kkm, Quantity, TicketItem};
    use crate::DEFAULT_LINK_BASE;

    fn place(address: &str, ids: &[i64]) -> RetailPlace {
        RetailPlace {
            address: address.to_string(),
            kkms: ids
                .iter()
                .map(|id| Kkm {
                    id: *id,
                    ..Kkm::default()
                })
                .collect(),
            ..RetailPlace::default()
        }
    }

    fn sample_ticket() -> Ticket {
        Ticket {
            transaction_date: "2024-01-15T10:00:00.000".to_string(),
            fiscal_id: "FP1".to_string(),
            fiscal_document_number: 42,
            kkt_reg_id: "0000000001012345".to_string(),
            fiscal_drive_number: "9289000100000001".to_string(),
            nds20: 1.5,
            total_sum: 10.0,
            items: vec![TicketItem {
                name: "Item".to_string(),
                quantity: Quantity::Text("2".to_string()),
                price: 500,
                nds_sum: 150,
                ..TicketItem::default()
            }],
            qr_code: "t=20240115T1000&s=10.00".to_string(),
            ..Ticket::default()
        }
    }

    #[test]
    fn test_flatten_two_by_two() {
        let devices = flatten_devices(&[place("Main St", &[1, 2]), place("Side St", &[3, 4])]);
        let flat: Vec<(&str, &str)> = devices
            .iter()
            .map(|d| (d.address.as_str(), d.kkt_reg_id.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![("Main St", "1"), ("Main St", "2"), ("Side St", "3"), ("Side St", "4")]
        );
    }

    #[test]
    fn test_flatten_skips_empty_places() {
        let devices = flatten_devices(&[place("Empty", &[]), place("Main St", &[7])]);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].kkt_reg_id, "7");
    }

    #[test]
    fn test_vat_twenty_percent_wins() {
        let ticket = Ticket {
            nds20: 5.0,
            nds0: 0.0,
            nds10: 3.0,
            ..Ticket::default()
        };
        assert_eq!(select_vat_bucket(&ticket), 5.0);
    }

    #[test]
    fn test_vat_zero_bucket_before_ten() {
        let ticket = Ticket {
            nds0: 2.0,
            nds10: 3.0,
            ..Ticket::default()
        };
        assert_eq!(select_vat_bucket(&ticket), 2.0);

        let ticket = Ticket {
            nds10: 3.0,
            nds18: 9.0,
            ..Ticket::default()
        };
        assert_eq!(select_vat_bucket(&ticket), 3.0);
    }

    #[test]
    fn test_vat_none_positive() {
        let ticket = Ticket {
            nds20: -1.0,
            nds_no: 4.0,
            ..Ticket::default()
        };
        assert_eq!(select_vat_bucket(&ticket), 0.0);
    }

    #[test]
    fn test_normalize_sample() {
        let Normalized { receipt, warnings } = normalize_ticket(&sample_ticket(), "7", DEFAULT_LINK_BASE);

        assert!(warnings.is_empty());
        assert_eq!(receipt.fp, "FP1");
        assert_eq!(receipt.fd, "42");
        assert_eq!(receipt.kkt_reg_id, "0000000001012345");
        assert_eq!(receipt.date, "2024-01-15T10:00:00Z");
        assert_eq!(receipt.price.cents(), 1000);
        assert_eq!(receipt.vat_price.cents(), 150);
        assert_eq!(
            receipt.link,
            "https://consumer.1-ofd.ru/v1?t=20240115T1000&s=10.00"
        );

        let product = &receipt.products[0];
        assert_eq!(product.name, "Item");
        assert_eq!(product.quantity, 2);
        assert_eq!(product.price, 500);
        assert_eq!(product.vat_price, 150);
        assert_eq!(product.total_price.cents(), 1000);
        assert_eq!(product.fp, "FP1");
        assert_eq!(product.fd, "42");
        assert_eq!(product.fiscal_drive_number, "9289000100000001");
        assert_eq!(product.time, receipt.date);
    }

    #[test]
    fn test_every_line_carries_receipt_total() {
        let mut ticket = sample_ticket();
        ticket.total_sum = 12.999;
        ticket.items.push(TicketItem {
            name: "Weighed".to_string(),
            quantity: Quantity::Number(1.75),
            price: 120,
            nds_sum: 20,
            ..TicketItem::default()
        });

        let receipt = normalize_ticket(&ticket, "7", DEFAULT_LINK_BASE).receipt;
        assert_eq!(receipt.price.cents(), 1299);
        assert_eq!(receipt.products.len(), 2);
        assert_eq!(receipt.products[1].quantity, 1);
        assert_eq!(receipt.products[1].price, 120);
        assert!(receipt.products.iter().all(|p| p.total_price == receipt.price));
    }

    #[test]
    fn test_bad_date_keeps_receipt() {
        let mut ticket = sample_ticket();
        ticket.transaction_date = "2024-01-15 10:00:00".to_string();

        let Normalized { receipt, warnings } = normalize_ticket(&ticket, "7", DEFAULT_LINK_BASE);
        assert!(!receipt.has_date());
        assert!(receipt.products[0].time.is_empty());
        assert_eq!(receipt.fp, "FP1");
        assert_eq!(receipt.price.cents(), 1000);
        assert!(matches!(warnings.as_slice(), [CoreError::DateParse { .. }]));
    }

    #[test]
    fn test_bad_quantity_is_zero_with_warning() {
        let mut ticket = sample_ticket();
        ticket.items[0].quantity = Quantity::Text("two".to_string());

        let Normalized { receipt, warnings } = normalize_ticket(&ticket, "7", DEFAULT_LINK_BASE);
        assert_eq!(receipt.products[0].quantity, 0);
        assert_eq!(
            warnings,
            vec![CoreError::InvalidQuantity {
                item: "Item".to_string(),
                value: "two".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_kkt_reg_id_uses_listing_device() {
        let mut ticket = sample_ticket();
        ticket.kkt_reg_id.clear();

        let receipt = normalize_ticket(&ticket, "7", DEFAULT_LINK_BASE).receipt;
        assert_eq!(receipt.kkt_reg_id, "7");
    }

    #[test]
    fn test_null_quantity_is_zero_with_warning() {
        let mut ticket = sample_ticket();
        ticket.items[0].quantity = Quantity::Null;

        let Normalized { receipt, warnings } = normalize_ticket(&ticket, "7", DEFAULT_LINK_BASE);
        assert_eq!(receipt.products[0].quantity, 0);
        assert!(matches!(
            warnings.as_slice(),
            [CoreError::InvalidQuantity { value, .. }] if value == "null"
        ));
    }

    #[test]
    fn test_date_format() {
        assert_eq!(
            format_transaction_date("2023-12-31T23:59:59.999").unwrap(),
            "2023-12-31T23:59:59Z"
        );
        assert!(format_transaction_date("").is_err());
        assert!(format_transaction_date("31.12.2023 23:59:59").is_err());
    }

    #[test]
    fn test_date_requires_three_fraction_digits() {
        for raw in [
            "2024-01-15T10:00:00",
            "2024-01-15T10:00:00.5",
            "2024-01-15T10:00:00.123456",
            "2024-01-15T10:00:00Z123",
        ] {
            assert!(
                matches!(format_transaction_date(raw), Err(CoreError::DateParse { .. })),
                "{raw}"
            );
        }
        assert_eq!(
            format_transaction_date("2024-01-15T10:00:00.000").unwrap(),
            "2024-01-15T10:00:00Z"
        );
    }
}
