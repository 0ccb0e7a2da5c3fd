//! # GATT Transport Seam
//!
//! The decoder never talks to a Bluetooth stack directly. Hosts supply a
//! [`GattClient`]; each connection is a [`GattSession`] that lives only for
//! the duration of one identity read.

use crate::ble::DeviceAddress;
use crate::cache::EnrichmentRecord;
use crate::enrichment::characteristic::{
    decode_string_value, DeviceInfoCharacteristic, DEVICE_INFORMATION_SERVICE,
};
use crate::error::OtodataError;
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use uuid::Uuid;

/// Opens connections to devices
#[async_trait]
pub trait GattClient: Send + Sync {
    async fn connect(
        &self,
        address: &DeviceAddress,
    ) -> Result<Box<dyn GattSession>, OtodataError>;
}

/// One established connection
#[async_trait]
pub trait GattSession: Send {
    async fn read_characteristic(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<Vec<u8>, OtodataError>;

    async fn disconnect(&mut self) -> Result<(), OtodataError>;
}

/// Outcome of reading the Device Information characteristics
#[derive(Debug, Clone, Default)]
pub struct ReadReport {
    pub record: EnrichmentRecord,
    pub failures: Vec<(DeviceInfoCharacteristic, String)>,
}

/// Read every Device Information characteristic over an open session.
///
/// Each read is independent; a failed read is recorded and the rest continue.
pub async fn read_device_information(session: &mut dyn GattSession) -> ReadReport {
    let mut report = ReadReport::default();

    for characteristic in DeviceInfoCharacteristic::ALL {
        let result = session
            .read_characteristic(DEVICE_INFORMATION_SERVICE, characteristic.uuid())
            .await;

        match result {
            Ok(raw) => match decode_string_value(&raw) {
                Some(value) => {
                    debug!("{}: {value}", characteristic.name());
                    report.record.set(characteristic, value);
                }
                None => report
                    .failures
                    .push((characteristic, "empty value".to_string())),
            },
            Err(e) => {
                debug!("Could not read {}: {e}", characteristic.name());
                report.failures.push((characteristic, e.to_string()));
            }
        }
    }

    report
}

/// Connect, read the identity characteristics, disconnect.
///
/// Connecting and reading share one deadline of `limit`. Once a session is
/// open it is always disconnected, also when the reads run out of time; the
/// disconnect gets its own `limit`. Fails only when the connection itself
/// cannot be established in time.
pub async fn read_with_session(
    client: &dyn GattClient,
    address: &DeviceAddress,
    limit: Duration,
) -> Result<ReadReport, OtodataError> {
    let deadline = Instant::now() + limit;

    let mut session = match timeout_at(deadline, client.connect(address)).await {
        Ok(Ok(session)) => session,
        Ok(Err(e @ OtodataError::EnrichmentUnavailable(_))) => return Err(e),
        Ok(Err(other)) => {
            return Err(OtodataError::EnrichmentUnavailable(format!(
                "connect to {address} failed: {other}"
            )))
        }
        Err(_) => {
            return Err(OtodataError::EnrichmentUnavailable(format!(
                "connect to {address} timed out after {limit:?}"
            )))
        }
    };

    let mut report = match timeout_at(deadline, read_device_information(session.as_mut())).await {
        Ok(report) => report,
        Err(_) => {
            warn!("Reading device information from {address} timed out after {limit:?}");
            ReadReport {
                record: EnrichmentRecord::default(),
                failures: DeviceInfoCharacteristic::ALL
                    .into_iter()
                    .map(|c| (c, "timed out".to_string()))
                    .collect(),
            }
        }
    };
    report.record.mac = Some(address.normalized());

    match timeout(limit, session.disconnect()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Disconnect from {address} failed: {e}"),
        Err(_) => warn!("Disconnect from {address} timed out"),
    }

    Ok(report)
}
