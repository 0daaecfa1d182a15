//! Document listing: `GET /api/kkms/{device}/transactions`.

use chrono::{DateTime, TimeZone};
use ofd_core::wire::TransactionRef;
use ofd_core::{DayWindow, DocumentRef};
use tracing::debug;

use crate::error::OfdResult;
use crate::transport::Transport;

pub fn transactions_path(device_id: &str) -> String {
    format!("/api/kkms/{}/transactions", device_id)
}

/// Lists the documents a device produced on the calendar day of `date`,
/// in `date`'s own time zone.
pub async fn list_documents<Tz: TimeZone>(
    transport: &Transport,
    token: &str,
    device_id: &str,
    date: &DateTime<Tz>,
) -> OfdResult<Vec<DocumentRef>> {
    let window = DayWindow::for_instant(date);
    let query = [
        ("fromDate", window.start_ms.to_string()),
        ("toDate", window.end_ms.to_string()),
    ];

    let refs: Vec<TransactionRef> = transport
        .get_json(&transactions_path(device_id), &query, token)
        .await?;
    debug!(device_id, documents = refs.len(), "Listed OFD documents");

    Ok(refs.into_iter().map(|r| DocumentRef(r.id)).collect())
}
