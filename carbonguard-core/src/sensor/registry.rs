//! Registry of deployed sensor devices
//!
//! Status changes arrive from connection and heartbeat handling outside the
//! core; the registry only records them and answers which devices are live.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{MonitoringError, MonitoringResult};
use crate::location::GeoPoint;

use super::SensorType;

/// Connection state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Active,
    Inactive,
    Error,
}

/// Long-lived registry entry for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDevice {
    pub id: String,
    pub sensor_type: SensorType,
    pub location: GeoPoint,
    pub status: DeviceStatus,
    /// When the status last changed, if ever
    pub status_changed_at: Option<DateTime<Utc>>,
}

impl SensorDevice {
    pub fn new(id: impl Into<String>, sensor_type: SensorType, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            sensor_type,
            location,
            status: DeviceStatus::Active,
            status_changed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DeviceStatus::Active
    }
}

/// Devices keyed by id, iterated in id order
#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    devices: BTreeMap<String, SensorDevice>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device; ids must be unique and locations valid
    pub fn register(&mut self, device: SensorDevice) -> MonitoringResult<()> {
        device.location.validate()?;
        if self.devices.contains_key(&device.id) {
            return Err(MonitoringError::InvalidInput {
                field: "sensor_id",
                reason: "device already registered",
            });
        }
        debug!("registered {} sensor {}", device.sensor_type, device.id);
        self.devices.insert(device.id.clone(), device);
        Ok(())
    }

    /// Record a status transition. Returns the previous status, or `None`
    /// for an unknown device.
    pub fn set_status(
        &mut self,
        id: &str,
        status: DeviceStatus,
        at: DateTime<Utc>,
    ) -> Option<DeviceStatus> {
        let Some(device) = self.devices.get_mut(id) else {
            warn!("status update for unknown sensor {}", id);
            return None;
        };
        let previous = device.status;
        if previous != status {
            debug!("sensor {}: {:?} -> {:?}", id, previous, status);
            device.status = status;
            device.status_changed_at = Some(at);
        }
        Some(previous)
    }

    pub fn get(&self, id: &str) -> Option<&SensorDevice> {
        self.devices.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<SensorDevice> {
        self.devices.remove(id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorDevice> {
        self.devices.values()
    }

    /// Devices currently reporting
    pub fn active(&self) -> impl Iterator<Item = &SensorDevice> {
        self.devices.values().filter(|d| d.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}
