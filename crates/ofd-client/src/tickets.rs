//! Ticket fetch: `GET /api/ticket/{id}`, then normalization into a `Receipt`.

use ofd_core::wire::{Ticket, TicketEnvelope};
use ofd_core::{normalize_ticket, DocumentRef, Normalized};
use tracing::{debug, warn};

use crate::error::OfdResult;
use crate::transport::Transport;

pub fn ticket_path(document: &DocumentRef) -> String {
    format!("/api/ticket/{}", document)
}

/// Fetches the raw ticket for one document.
pub async fn fetch_ticket(
    transport: &Transport,
    token: &str,
    document: &DocumentRef,
) -> OfdResult<Ticket> {
    let envelope: TicketEnvelope = transport
        .get_json(&ticket_path(document), &[], token)
        .await?;
    Ok(envelope.ticket)
}

/// Fetches one document and normalizes it.
///
/// `device_id` is the device the document was listed under.
///
/// Transport and decode failures are errors. Fields that cannot be
/// interpreted come back in `Normalized::warnings` next to the receipt.
pub async fn fetch_receipt(
    transport: &Transport,
    token: &str,
    device_id: &str,
    document: &DocumentRef,
    link_base: &str,
) -> OfdResult<Normalized> {
    let ticket = fetch_ticket(transport, token, document).await?;
    let normalized = normalize_ticket(&ticket, device_id, link_base);

    for warning in &normalized.warnings {
        warn!(document = %document, %warning, "Ticket field could not be interpreted");
    }
    debug!(
        document = %document,
        fd = %normalized.receipt.fd,
        total = %normalized.receipt.price,
        "Normalized OFD ticket"
    );
    Ok(normalized)
}
