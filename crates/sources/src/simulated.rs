//! Simulated hardware tree for running the gadget without real sensors.
//!
//! Builds a desktop-like machine (mainboard with a Super I/O chip, CPU, GPU,
//! memory, an SSD and a network card) on top of the in-memory hardware tree
//! and moves every reading with a bounded random walk on each tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sens_gadget_core::memory::{MemoryComputer, MemoryHardware, MemorySensor};
use sens_gadget_core::{Computer, Hardware, HardwareType, Identifier, Sensor, SensorType};
use std::sync::Arc;

use crate::nic::{NicCounters, NicSensors};

const LINK_SPEED: f32 = 1_000_000_000.0;

/// One simulated reading: a random walk of at most `step` per second inside `min..=max`
struct Channel {
    sensor: Arc<MemorySensor>,
    min: f32,
    max: f32,
    step: f32,
    value: f32,
}

impl Channel {
    fn advance(&mut self, rng: &mut StdRng, dt: f32) {
        let step = self.step * dt;
        if step > 0.0 {
            self.value = (self.value + rng.gen_range(-step..=step)).clamp(self.min, self.max);
        }
        self.sensor.set_value(Some(self.value));
    }
}

/// (name, index, type, min, max, step, start)
type ChannelSpec = (&'static str, usize, SensorType, f32, f32, f32, f32);

const CPU_CHANNELS: &[ChannelSpec] = &[
    ("Bus Speed", 0, SensorType::Clock, 100.0, 100.0, 0.0, 100.0),
    ("CPU Core #1", 1, SensorType::Clock, 800.0, 4700.0, 600.0, 3700.0),
    ("CPU Core #2", 2, SensorType::Clock, 800.0, 4700.0, 600.0, 3700.0),
    ("CPU Core #3", 3, SensorType::Clock, 800.0, 4700.0, 600.0, 3700.0),
    ("CPU Core #4", 4, SensorType::Clock, 800.0, 4700.0, 600.0, 3700.0),
    ("CPU Core #1", 0, SensorType::Temperature, 30.0, 95.0, 3.0, 45.0),
    ("CPU Core #2", 1, SensorType::Temperature, 30.0, 95.0, 3.0, 47.0),
    ("CPU Core #3", 2, SensorType::Temperature, 30.0, 95.0, 3.0, 44.0),
    ("CPU Core #4", 3, SensorType::Temperature, 30.0, 95.0, 3.0, 46.0),
    ("CPU Package", 4, SensorType::Temperature, 30.0, 95.0, 2.5, 50.0),
    ("CPU Total", 0, SensorType::Load, 0.0, 100.0, 12.0, 20.0),
    ("CPU Core #1", 1, SensorType::Load, 0.0, 100.0, 20.0, 25.0),
    ("CPU Core #2", 2, SensorType::Load, 0.0, 100.0, 20.0, 15.0),
    ("CPU Core #3", 3, SensorType::Load, 0.0, 100.0, 20.0, 30.0),
    ("CPU Core #4", 4, SensorType::Load, 0.0, 100.0, 20.0, 10.0),
    ("CPU Package", 0, SensorType::Power, 5.0, 95.0, 8.0, 25.0),
    ("CPU Cores", 1, SensorType::Power, 2.0, 80.0, 7.0, 18.0),
];

const SUPERIO_CHANNELS: &[ChannelSpec] = &[
    ("CPU VCore", 0, SensorType::Voltage, 0.7, 1.4, 0.02, 1.2),
    ("AVCC", 1, SensorType::Voltage, 3.3, 3.5, 0.005, 3.4),
    ("3VCC", 2, SensorType::Voltage, 3.3, 3.4, 0.005, 3.36),
    ("Temperature #1", 0, SensorType::Temperature, 25.0, 60.0, 0.5, 36.0),
    ("Fan #1", 0, SensorType::Fan, 400.0, 2000.0, 60.0, 900.0),
    ("Fan #2", 1, SensorType::Fan, 400.0, 2000.0, 60.0, 1100.0),
    ("Fan Control #1", 0, SensorType::Control, 20.0, 100.0, 4.0, 40.0),
];

const GPU_CHANNELS: &[ChannelSpec] = &[
    ("GPU Core", 0, SensorType::Temperature, 30.0, 85.0, 2.0, 42.0),
    ("GPU Core", 0, SensorType::Clock, 300.0, 1900.0, 150.0, 1500.0),
    ("GPU Memory", 1, SensorType::Clock, 400.0, 4000.0, 0.0, 4000.0),
    ("GPU Core", 0, SensorType::Load, 0.0, 100.0, 15.0, 8.0),
    ("GPU Memory", 1, SensorType::Load, 0.0, 100.0, 3.0, 22.0),
    ("GPU", 0, SensorType::Fan, 0.0, 3000.0, 80.0, 1200.0),
    ("GPU Fan", 0, SensorType::Control, 0.0, 100.0, 3.0, 35.0),
    ("GPU Memory Used", 0, SensorType::SmallData, 300.0, 8192.0, 120.0, 1800.0),
    ("GPU Memory Total", 1, SensorType::SmallData, 8192.0, 8192.0, 0.0, 8192.0),
];

const RAM_CHANNELS: &[ChannelSpec] = &[
    ("Memory", 0, SensorType::Load, 10.0, 95.0, 1.5, 42.0),
    ("Used Memory", 0, SensorType::Data, 1.5, 15.0, 0.2, 6.7),
    ("Available Memory", 1, SensorType::Data, 1.0, 14.5, 0.2, 9.3),
];

const SSD_CHANNELS: &[ChannelSpec] = &[
    ("Temperature", 0, SensorType::Temperature, 25.0, 70.0, 0.5, 34.0),
    ("Used Space", 0, SensorType::Load, 61.0, 62.0, 0.01, 61.4),
    ("Write Amplification", 0, SensorType::Factor, 1.0, 1.3, 0.001, 1.08),
    ("Total Bytes Written", 0, SensorType::Data, 12_000.0, 13_000.0, 0.0, 12_345.6),
];

pub struct SimulatedComputer {
    computer: Arc<MemoryComputer>,
    channels: Vec<Channel>,
    nic: NicSensors,
    nic_counters: NicCounters,
    rng: StdRng,
}

impl SimulatedComputer {
    /// Build the simulated machine. The same seed yields the same readings.
    pub fn new(seed: u64) -> Self {
        let mut channels = Vec::new();

        let board = MemoryHardware::new("ASUS PRIME Z370-A", HardwareType::Mainboard, Identifier::new(["mainboard"]));
        let superio = board.add_sub_hardware("Nuvoton NCT6793D", HardwareType::SuperIo, "lpc");
        add_channels(&superio, SUPERIO_CHANNELS, &mut channels);

        let cpu = MemoryHardware::new("Intel Core i7-8700K", HardwareType::Cpu, Identifier::new(["intelcpu", "0"]));
        add_channels(&cpu, CPU_CHANNELS, &mut channels);

        let ram = MemoryHardware::new("Generic Memory", HardwareType::Ram, Identifier::new(["ram"]));
        add_channels(&ram, RAM_CHANNELS, &mut channels);

        let gpu = MemoryHardware::new("NVIDIA GeForce GTX 1070", HardwareType::GpuNvidia, Identifier::new(["nvidiagpu", "0"]));
        add_channels(&gpu, GPU_CHANNELS, &mut channels);

        let ssd = MemoryHardware::new("Samsung SSD 860 EVO", HardwareType::Hdd, Identifier::new(["hdd", "0"]));
        add_channels(&ssd, SSD_CHANNELS, &mut channels);

        let nic_hw = MemoryHardware::new("Ethernet", HardwareType::Nic, Identifier::new(["nic", "0"]));
        let nic_counters = NicCounters {
            bytes_sent: 3 * 1_073_741_824,
            bytes_received: 21 * 1_073_741_824,
        };
        let nic = NicSensors::attach(&nic_hw, nic_counters);

        let computer = Arc::new(MemoryComputer::new());
        for hardware in [board, cpu, ram, gpu, ssd, nic_hw] {
            computer.add_hardware(hardware);
        }

        log::info!("Simulated computer with {} sensors", channels.len() + 6);

        let mut simulated = Self {
            computer,
            channels,
            nic,
            nic_counters,
            rng: StdRng::seed_from_u64(seed),
        };
        simulated.tick(1.0);
        simulated
    }

    pub fn computer(&self) -> Arc<MemoryComputer> {
        self.computer.clone()
    }

    /// Every sensor in the tree, depth-first
    pub fn sensors(&self) -> Vec<Arc<dyn Sensor>> {
        fn walk(hardware: &Arc<dyn Hardware>, out: &mut Vec<Arc<dyn Sensor>>) {
            out.extend(hardware.sensors());
            for sub in hardware.sub_hardware() {
                walk(&sub, out);
            }
        }
        let mut sensors = Vec::new();
        for hardware in self.computer.hardware() {
            walk(&hardware, &mut sensors);
        }
        sensors
    }

    /// Advance every reading by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for channel in &mut self.channels {
            channel.advance(&mut self.rng, dt);
        }

        let sent = (self.rng.gen_range(0.0f32..200_000.0) * dt) as u64;
        let received = (self.rng.gen_range(0.0f32..6_000_000.0) * dt) as u64;
        self.nic_counters.bytes_sent += sent;
        self.nic_counters.bytes_received += received;
        self.nic.update(LINK_SPEED, self.nic_counters, dt);
    }
}

impl Default for SimulatedComputer {
    /// A machine with a random seed
    fn default() -> Self {
        Self::new(rand::random())
    }
}

fn add_channels(hardware: &Arc<MemoryHardware>, specs: &[ChannelSpec], channels: &mut Vec<Channel>) {
    for &(name, index, sensor_type, min, max, step, start) in specs {
        channels.push(Channel {
            sensor: hardware.add_sensor(name, index, sensor_type),
            min,
            max,
            step,
            value: start,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sensor_has_a_value_after_construction() {
        let sim = SimulatedComputer::new(7);
        let sensors = sim.sensors();
        assert!(sensors.len() > 40);
        assert!(sensors.iter().all(|s| s.value().is_some()));
    }

    #[test]
    fn test_identifiers_are_unique() {
        let sim = SimulatedComputer::new(7);
        let mut ids: Vec<_> = sim.sensors().iter().map(|s| s.identifier().clone()).collect();
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_ticks_stay_in_range() {
        let mut sim = SimulatedComputer::new(42);
        for _ in 0..200 {
            sim.tick(1.0);
        }
        for sensor in sim.sensors() {
            if sensor.sensor_type().is_percentage() && sensor.name() != "Network Utilization" {
                let value = sensor.value().unwrap();
                assert!((0.0..=100.0).contains(&value), "{} = {}", sensor.name(), value);
            }
        }
    }

    #[test]
    fn test_same_seed_same_readings() {
        let a = SimulatedComputer::new(3);
        let b = SimulatedComputer::new(3);
        let values = |sim: &SimulatedComputer| sim.sensors().iter().map(|s| s.value()).collect::<Vec<_>>();
        assert_eq!(values(&a), values(&b));
    }
}
