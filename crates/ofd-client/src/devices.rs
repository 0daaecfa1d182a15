//! Device listing: `GET /api/retail-places/kkms`.

use chrono::{DateTime, TimeZone};
use ofd_core::wire::RetailPlace;
use ofd_core::{flatten_devices, Device};
use tracing::debug;

use crate::error::OfdResult;
use crate::transport::Transport;

pub const PLACES_PATH: &str = "/api/retail-places/kkms";

/// Lists every cash register on the account, one entry per (place, device).
///
/// The listing is the account's current state; `_date` is accepted so every
/// lister takes the same arguments, and is not sent.
pub async fn list_devices<Tz: TimeZone>(
    transport: &Transport,
    token: &str,
    _date: &DateTime<Tz>,
) -> OfdResult<Vec<Device>> {
    let places: Vec<RetailPlace> = transport.get_json(PLACES_PATH, &[], token).await?;
    let devices = flatten_devices(&places);
    debug!(places = places.len(), devices = devices.len(), "Listed OFD devices");
    Ok(devices)
}
