//! Network interface sensors.
//!
//! Sensor names and indices match what the gadget's formatter and localizer
//! expect from a NIC: "Connection Speed" is a link speed in bits/s, the two
//! speed sensors are byte rates, and the two data sensors are totals in GB.

use sens_gadget_core::memory::{MemoryHardware, MemorySensor};
use sens_gadget_core::{SensorType, BYTES_PER_GB, LINK_SPEED_SENSOR};
use std::sync::Arc;

/// Utilization reported for a NIC, as `max(up, down) / link speed * 800`.
///
/// The rates are bytes/s and the link speed is bits/s, so the factor 800 is
/// 8 bits per byte times 100 percent. Returns `None` when the link speed is
/// unknown.
pub fn network_utilization(upload: f32, download: f32, link_speed: f32) -> Option<f32> {
    if link_speed <= 0.0 || !link_speed.is_finite() {
        return None;
    }
    Some(upload.max(download) / link_speed * 800.0)
}

/// Cumulative interface byte counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NicCounters {
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

pub struct NicSensors {
    pub connection_speed: Arc<MemorySensor>,
    pub utilization: Arc<MemorySensor>,
    pub data_uploaded: Arc<MemorySensor>,
    pub data_downloaded: Arc<MemorySensor>,
    pub upload_speed: Arc<MemorySensor>,
    pub download_speed: Arc<MemorySensor>,
    last: NicCounters,
}

impl NicSensors {
    /// Create the six NIC sensors on `hardware`, starting from `counters`
    pub fn attach(hardware: &Arc<MemoryHardware>, counters: NicCounters) -> Self {
        Self {
            connection_speed: hardware.add_sensor(LINK_SPEED_SENSOR, 0, SensorType::InternetSpeed),
            utilization: hardware.add_sensor("Network Utilization", 1, SensorType::Load),
            data_uploaded: hardware.add_sensor("Data Uploaded", 2, SensorType::Data),
            data_downloaded: hardware.add_sensor("Data Downloaded", 3, SensorType::Data),
            upload_speed: hardware.add_sensor("Upload Speed", 4, SensorType::InternetSpeed),
            download_speed: hardware.add_sensor("Download Speed", 5, SensorType::InternetSpeed),
            last: counters,
        }
    }

    /// Publish new readings from counters sampled `dt` seconds after the previous ones
    pub fn update(&mut self, link_speed: f32, counters: NicCounters, dt: f32) {
        if dt <= 0.0 {
            log::debug!("Skipping NIC update with non-positive interval {}", dt);
            return;
        }
        let upload = counters.bytes_sent.saturating_sub(self.last.bytes_sent) as f32 / dt;
        let download = counters.bytes_received.saturating_sub(self.last.bytes_received) as f32 / dt;

        self.connection_speed.set_value(Some(link_speed));
        self.upload_speed.set_value(Some(upload));
        self.download_speed.set_value(Some(download));
        self.utilization
            .set_value(network_utilization(upload, download, link_speed));
        self.data_uploaded
            .set_value(Some(counters.bytes_sent as f32 / BYTES_PER_GB));
        self.data_downloaded
            .set_value(Some(counters.bytes_received as f32 / BYTES_PER_GB));

        self.last = counters;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sens_gadget_core::{HardwareType, Identifier, Sensor};

    #[test]
    fn test_utilization_formula() {
        // 12.5 MB/s on a 100 Mbit link saturates it
        let util = network_utilization(1000.0, 12_500_000.0, 100_000_000.0).unwrap();
        assert!((util - 100.0).abs() < 1e-3);
        assert_eq!(network_utilization(10.0, 10.0, 0.0), None);
    }

    #[test]
    fn test_update_derives_rates() {
        let hw = MemoryHardware::new("Ethernet", HardwareType::Nic, Identifier::new(["nic", "0"]));
        let mut nic = NicSensors::attach(&hw, NicCounters::default());
        assert_eq!(hw.memory_sensors().len(), 6);

        nic.update(
            1_000_000_000.0,
            NicCounters {
                bytes_sent: 2048,
                bytes_received: 4096,
            },
            2.0,
        );
        assert_eq!(nic.upload_speed.value(), Some(1024.0));
        assert_eq!(nic.download_speed.value(), Some(2048.0));
        assert_eq!(nic.connection_speed.value(), Some(1_000_000_000.0));
        assert!(nic.utilization.value().unwrap() > 0.0);
    }

    #[test]
    fn test_zero_interval_is_ignored() {
        let hw = MemoryHardware::new("Ethernet", HardwareType::Nic, Identifier::new(["nic", "0"]));
        let mut nic = NicSensors::attach(&hw, NicCounters::default());
        nic.update(1e9, NicCounters::default(), 0.0);
        assert_eq!(nic.upload_speed.value(), None);
    }
}
