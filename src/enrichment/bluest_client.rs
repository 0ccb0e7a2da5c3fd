//! [`GattClient`] backed by the platform Bluetooth stack through `bluest`.
//!
//! Only compiled with the `ble` feature.

use crate::ble::DeviceAddress;
use crate::enrichment::client::{GattClient, GattSession};
use crate::error::OtodataError;
use async_trait::async_trait;
use bluest::{Adapter, Device};
use futures::StreamExt;
use log::debug;
use uuid::Uuid;

fn ble_error(e: bluest::Error) -> OtodataError {
    OtodataError::EnrichmentUnavailable(e.to_string())
}

/// Whether a platform device id refers to `wanted` (normalized address).
///
/// Platform ids are opaque; on BlueZ they embed the hardware address.
fn id_matches(device_id: &str, wanted: &str) -> bool {
    let hex: String = device_id
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .collect::<String>()
        .to_ascii_uppercase();
    hex.contains(wanted)
}

pub struct BluestClient {
    adapter: Adapter,
}

impl BluestClient {
    /// Open the default adapter and wait until it is powered on.
    pub async fn new() -> Result<Self, OtodataError> {
        let adapter = Adapter::default()
            .await
            .ok_or_else(|| {
                OtodataError::EnrichmentUnavailable("no Bluetooth adapter found".to_string())
            })?;
        adapter.wait_available().await.map_err(ble_error)?;
        Ok(Self { adapter })
    }

    /// Scan until a device with `address` is seen. Callers bound this with a timeout.
    async fn find_device(&self, address: &DeviceAddress) -> Result<Device, OtodataError> {
        let wanted = address.normalized();
        let mut devices = Box::pin(self.adapter.discover_devices(&[]).await.map_err(ble_error)?);

        while let Some(device) = devices.next().await {
            let device = device.map_err(ble_error)?;
            if id_matches(&format!("{:?}", device.id()), &wanted) {
                return Ok(device);
            }
        }

        Err(OtodataError::EnrichmentUnavailable(format!("device {address} not found")))
    }
}

#[async_trait]
impl GattClient for BluestClient {
    async fn connect(&self, address: &DeviceAddress) -> Result<Box<dyn GattSession>, OtodataError> {
        let device = self.find_device(address).await?;
        self.adapter.connect_device(&device).await.map_err(ble_error)?;
        debug!("Connected to {address}");

        Ok(Box::new(BluestSession {
            adapter: self.adapter.clone(),
            device,
        }))
    }
}

struct BluestSession {
    adapter: Adapter,
    device: Device,
}

#[async_trait]
impl GattSession for BluestSession {
    async fn read_characteristic(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
    ) -> Result<Vec<u8>, OtodataError> {
        let services = self
            .device
            .discover_services_with_uuid(service)
            .await
            .map_err(ble_error)?;
        let service = services.first().ok_or_else(|| {
            OtodataError::EnrichmentUnavailable(format!("service {service} not found"))
        })?;

        let characteristics = service
            .discover_characteristics_with_uuid(characteristic)
            .await
            .map_err(ble_error)?;
        let characteristic = characteristics.first().ok_or_else(|| {
            let message = format!("characteristic {characteristic} not found");
            OtodataError::EnrichmentUnavailable(message)
        })?;

        characteristic.read().await.map_err(ble_error)
    }

    async fn disconnect(&mut self) -> Result<(), OtodataError> {
        self.adapter.disconnect_device(&self.device).await.map_err(ble_error)
    }
}
