//! # Receipt Pipeline
//!
//! `OfdClient` ties the session, the transport, and the three listers into
//! one call: "give me every receipt for this day".
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_receipts(date)                                                     │
//! │                                                                         │
//! │  authenticate ──err──────────────────────────────► Aborted (empty)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  list_devices ──err──────────────────────────────► Aborted (empty)      │
//! │       │                                                                 │
//! │       ▼   for each device, in listing order                             │
//! │  list_documents ──err────────────────────────────► Aborted (partial)    │
//! │       │                                                                 │
//! │       ▼   for each document, in listing order                           │
//! │  fetch_receipt ──err──► warning, document skipped, keep going           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReceiptBatch { receipts, warnings }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Calls are sequential. Receipts come out in device order, then document
//! order within a device.

use chrono::{DateTime, TimeZone, Utc};
use ofd_core::{Device, DocumentRef, Normalized, Receipt};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::OfdConfig;
use crate::error::{OfdError, OfdResult};
use crate::session::Session;
use crate::transport::Transport;
use crate::{devices, documents, tickets};

/// Receipts collected by one run, plus everything that went wrong without
/// stopping it.
#[derive(Debug, Default)]
pub struct ReceiptBatch {
    pub receipts: Vec<Receipt>,
    pub warnings: Vec<OfdError>,
}

impl ReceiptBatch {
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

/// A run that stopped early. `partial` holds what was collected before the
/// failing step.
#[derive(Debug, Error)]
#[error("Receipt collection aborted: {source}")]
pub struct Aborted {
    #[source]
    pub source: OfdError,
    pub partial: ReceiptBatch,
}

/// Client for one OFD account.
#[derive(Debug)]
pub struct OfdClient {
    config: OfdConfig,
    transport: Transport,
    session: Session,
}

impl OfdClient {
    /// Validates the config and builds the HTTP client. No network traffic.
    pub fn new(config: OfdConfig) -> OfdResult<Self> {
        config.validate()?;
        let transport = Transport::new(&config)?;
        Ok(OfdClient {
            config,
            transport,
            session: Session::new(),
        })
    }

    pub fn config(&self) -> &OfdConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn authenticate(&self) -> OfdResult<()> {
        self.session
            .authenticate(&self.transport, &self.config.account)
            .await
    }

    pub async fn list_devices<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> OfdResult<Vec<Device>> {
        let token = self.session.token().await?;
        devices::list_devices(&self.transport, &token, date).await
    }

    pub async fn list_documents<Tz: TimeZone>(
        &self,
        device_id: &str,
        date: &DateTime<Tz>,
    ) -> OfdResult<Vec<DocumentRef>> {
        let token = self.session.token().await?;
        documents::list_documents(&self.transport, &token, device_id, date).await
    }

    /// Fetches and normalizes one document listed under `device_id`.
    pub async fn fetch_receipt(
        &self,
        device_id: &str,
        document: &DocumentRef,
    ) -> OfdResult<Normalized> {
        let token = self.session.token().await?;
        tickets::fetch_receipt(
            &self.transport,
            &token,
            device_id,
            document,
            &self.config.service.link_base,
        )
        .await
    }

    /// Receipts for today in the configured time zone.
    pub async fn get_receipts_today(&self) -> Result<ReceiptBatch, Aborted> {
        let now = Utc::now().with_timezone(&self.config.utc_offset());
        self.get_receipts(&now).await
    }

    /// Collects every receipt issued on the calendar day of `date`.
    pub async fn get_receipts<Tz: TimeZone>(
        &self,
        date: &DateTime<Tz>,
    ) -> Result<ReceiptBatch, Aborted> {
        let mut batch = ReceiptBatch::default();

        if let Err(source) = self.authenticate().await {
            return Err(Aborted { source, partial: batch });
        }

        let devices = match self.list_devices(date).await {
            Ok(devices) => devices,
            Err(source) => {
                error!(error = %source, "Device listing failed");
                return Err(Aborted { source, partial: batch });
            }
        };
        info!(devices = devices.len(), "Collecting receipts");

        for device in &devices {
            let documents = match self.list_documents(&device.kkt_reg_id, date).await {
                Ok(documents) => documents,
                Err(source) => {
                    error!(
                        device = %device.kkt_reg_id,
                        collected = batch.receipts.len(),
                        error = %source,
                        "Document listing failed"
                    );
                    return Err(Aborted { source, partial: batch });
                }
            };

            for document in &documents {
                match self.fetch_receipt(&device.kkt_reg_id, document).await {
                    Ok(Normalized { receipt, warnings }) => {
                        batch
                            .warnings
                            .extend(warnings.into_iter().map(|source| OfdError::Normalize {
                                document: document.to_string(),
                                source,
                            }));
                        batch.receipts.push(receipt);
                    }
                    Err(e) => {
                        warn!(document = %document, error = %e, "Skipping document");
                        batch.warnings.push(e);
                    }
                }
            }
        }

        info!(
            receipts = batch.receipts.len(),
            warnings = batch.warnings.len(),
            "Receipt collection finished"
        );
        Ok(batch)
    }
}
