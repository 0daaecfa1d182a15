//! # Wire Types
//!
//! JSON shapes exchanged with the 1-OFD cabinet API.
//!
//! ```text
//! POST /api/user/login              LoginRequest  ──► LoginResponse
//! GET  /api/retail-places/kkms                     ──► Vec<RetailPlace>
//! GET  /api/kkms/{id}/transactions                 ──► Vec<TransactionRef>
//! GET  /api/ticket/{id}                            ──► TicketEnvelope
//! ```
//!
//! Every field carries `#[serde(default)]`: the service omits fields freely
//! and a missing value must read as zero/empty rather than fail the decode.
//! Ticket fields also read an explicit `null` as zero/empty.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Authentication
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub auth_token: String,
}

// =============================================================================
// Retail places and devices
// =============================================================================

/// A retail place with the cash registers installed there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetailPlace {
    pub id: i64,
    pub title: String,
    pub address: String,
    pub kkms: Vec<Kkm>,
}

/// A cash register as listed under its retail place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kkm {
    pub id: i64,
    pub org_id: i64,
    pub retail_place_id: i64,
    pub internal_name: String,
    pub online_status: i64,
    pub status: i64,
    pub fns_kkm_id: String,
    pub billing_status: i64,
}

// =============================================================================
// Transactions
// =============================================================================

/// One entry of a device's transaction listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRef {
    pub id: String,
}

// =============================================================================
// Ticket
// =============================================================================

/// Response of `GET /api/ticket/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketEnvelope {
    pub ticket: Ticket,
}

/// Full fiscal document.
///
/// Totals and VAT buckets are floats in roubles; item amounts are integers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticket {
    /// Local wall-clock time, `YYYY-MM-DDTHH:MM:SS.mmm`.
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fiscal_drive_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ecash_total_sum: f64,
    /// Fiscal sign (FP).
    #[serde(deserialize_with = "null_as_default")]
    pub fiscal_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fiscal_document_number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub taxation_type: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub nds_no: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub nds0: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub nds10: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub nds18: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub nds20: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub user_inn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kkt_reg_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cash_total_sum: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_sum: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub operation_type: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<TicketItem>,
    /// Query string encoded in the receipt's QR code.
    #[serde(deserialize_with = "null_as_default")]
    pub qr_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketItem {
    pub quantity: Quantity,
    #[serde(deserialize_with = "null_as_default")]
    pub price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub nds_sum: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sum: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub product_type: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_type: i64,
}

/// Item quantity. The service sends either a JSON number or a numeric string,
/// occasionally `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
    Null,
}

impl Quantity {
    /// Numeric value, or `None` when a string quantity does not parse.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => Some(*n),
            Quantity::Text(s) => s.trim().parse().ok(),
            Quantity::Null => None,
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Number(0.0)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(s) => f.write_str(s),
            Quantity::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_decodes_with_missing_fields() {
        let envelope: TicketEnvelope = serde_json::from_str(
            r#"{"ticket": {
                "transactionDate": "2024-01-15T10:00:00.000",
                "fiscalId": "FP1",
                "fiscalDocumentNumber": 42,
                "nds20": 1.5,
                "totalSum": 10.0,
                "items": [{"name": "Item", "quantity": "2", "price": 500, "ndsSum": 150}],
                "qrCode": "t=20240115T1000"
            }}"#,
        )
        .unwrap();

        let ticket = envelope.ticket;
        assert_eq!(ticket.fiscal_id, "FP1");
        assert_eq!(ticket.fiscal_document_number, 42);
        assert_eq!(ticket.nds20, 1.5);
        assert_eq!(ticket.nds10, 0.0);
        assert!(ticket.kkt_reg_id.is_empty());
        assert_eq!(ticket.items[0].quantity, Quantity::Text("2".to_string()));
        assert_eq!(ticket.items[0].nds_sum, 150);
    }

    #[test]
    fn test_quantity_forms() {
        let items: Vec<TicketItem> =
            serde_json::from_str(r#"[{"quantity": 1.75}, {"quantity": " 3 "}, {"quantity": "n/a"}, {}]"#)
                .unwrap();
        let values: Vec<Option<f64>> = items.iter().map(|i| i.quantity.as_f64()).collect();
        assert_eq!(values, vec![Some(1.75), Some(3.0), None, Some(0.0)]);
    }

    #[test]
    fn test_null_fields_read_as_zero() {
        let envelope: TicketEnvelope = serde_json::from_str(
            r#"{"ticket": {
                "fiscalId": null,
                "fiscalDocumentNumber": null,
                "nds20": null,
                "totalSum": 10.0,
                "kktRegId": null,
                "items": [{"name": "Item", "quantity": null, "price": null, "ndsSum": 150}]
            }}"#,
        )
        .unwrap();

        let ticket = envelope.ticket;
        assert!(ticket.fiscal_id.is_empty());
        assert_eq!(ticket.fiscal_document_number, 0);
        assert_eq!(ticket.nds20, 0.0);
        assert_eq!(ticket.total_sum, 10.0);
        assert!(ticket.kkt_reg_id.is_empty());
        assert_eq!(ticket.items[0].quantity, Quantity::Null);
        assert_eq!(ticket.items[0].quantity.as_f64(), None);
        assert_eq!(ticket.items[0].price, 0);
        assert_eq!(ticket.items[0].nds_sum, 150);

        let envelope: TicketEnvelope =
            serde_json::from_str(r#"{"ticket": {"items": null}}"#).unwrap();
        assert!(envelope.ticket.items.is_empty());
    }

    #[test]
    fn test_places_decode() {
        let places: Vec<RetailPlace> = serde_json::from_str(
            r#"[{"id": 1, "title": "Shop", "address": "Main St",
                 "kkms": [{"id": 7, "orgId": 3, "retailPlaceId": 1, "internalName": "Till 1",
                           "onlineStatus": 1, "status": 2, "fnsKkmId": "0001", "billingStatus": 1}]}]"#,
        )
        .unwrap();
        assert_eq!(places[0].kkms[0].id, 7);
        assert_eq!(places[0].kkms[0].fns_kkm_id, "0001");
        assert_eq!(places[0].kkms[0].retail_place_id, 1);
    }
}
