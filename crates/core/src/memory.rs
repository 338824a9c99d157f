//! In-memory hardware tree.
//!
//! A small, thread-safe implementation of [`Computer`], [`Hardware`] and
//! [`Sensor`] used by the simulated sources and by tests. Sensor values live
//! in an `ArcSwapOption` so a polling thread can replace them without the
//! paint path ever taking a lock.

use arc_swap::ArcSwapOption;
use sens_gadget_types::{HardwareType, Identifier, SensorType};
use std::sync::{Arc, Mutex, Weak};

use crate::hardware::{
    Computer, EventSink, GadgetEvent, Hardware, Listeners, Sensor, SubscriptionToken,
};

pub struct MemorySensor {
    identifier: Identifier,
    name: String,
    sensor_type: SensorType,
    index: usize,
    value: ArcSwapOption<f32>,
    hardware: Weak<MemoryHardware>,
}

impl MemorySensor {
    /// Atomically replace the current reading
    pub fn set_value(&self, value: Option<f32>) {
        self.value.store(value.map(Arc::new));
    }
}

impl Sensor for MemorySensor {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    fn index(&self) -> usize {
        self.index
    }

    fn value(&self) -> Option<f32> {
        self.value.load_full().map(|v| *v)
    }

    fn hardware(&self) -> Option<Arc<dyn Hardware>> {
        self.hardware
            .upgrade()
            .map(|h| h as Arc<dyn Hardware>)
    }
}

pub struct MemoryHardware {
    identifier: Identifier,
    name: String,
    hardware_type: HardwareType,
    parent: Option<Weak<MemoryHardware>>,
    sub_hardware: Mutex<Vec<Arc<MemoryHardware>>>,
    sensors: Mutex<Vec<Arc<MemorySensor>>>,
    listeners: Listeners,
}

impl MemoryHardware {
    /// Create a top-level hardware node
    pub fn new(name: impl Into<String>, hardware_type: HardwareType, identifier: Identifier) -> Arc<Self> {
        Arc::new(Self {
            identifier,
            name: name.into(),
            hardware_type,
            parent: None,
            sub_hardware: Mutex::new(Vec::new()),
            sensors: Mutex::new(Vec::new()),
            listeners: Listeners::new(),
        })
    }

    /// Attach a child node. Its identifier is nested under this node's.
    pub fn add_sub_hardware(
        self: &Arc<Self>,
        name: impl Into<String>,
        hardware_type: HardwareType,
        segment: &str,
    ) -> Arc<MemoryHardware> {
        let child = Arc::new(Self {
            identifier: self.identifier.child(segment),
            name: name.into(),
            hardware_type,
            parent: Some(Arc::downgrade(self)),
            sub_hardware: Mutex::new(Vec::new()),
            sensors: Mutex::new(Vec::new()),
            listeners: Listeners::new(),
        });
        self.sub_hardware
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(child.clone());
        child
    }

    /// Create a sensor and announce it to subscribers
    pub fn add_sensor(
        self: &Arc<Self>,
        name: impl Into<String>,
        index: usize,
        sensor_type: SensorType,
    ) -> Arc<MemorySensor> {
        let sensor = Arc::new(MemorySensor {
            identifier: self
                .identifier
                .child(sensor_type.as_segment())
                .child(&index.to_string()),
            name: name.into(),
            sensor_type,
            index,
            value: ArcSwapOption::empty(),
            hardware: Arc::downgrade(self),
        });
        self.sensors
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(sensor.clone());
        self.listeners
            .publish(GadgetEvent::SensorAdded(sensor.clone() as Arc<dyn Sensor>));
        sensor
    }

    /// Detach a sensor and announce the removal. Returns false if it was not attached.
    pub fn remove_sensor(&self, identifier: &Identifier) -> bool {
        let removed = {
            let mut sensors = self.sensors.lock().unwrap_or_else(|p| p.into_inner());
            let position = sensors.iter().position(|s| &s.identifier == identifier);
            position.map(|i| sensors.remove(i))
        };
        match removed {
            Some(sensor) => {
                self.listeners
                    .publish(GadgetEvent::SensorRemoved(sensor as Arc<dyn Sensor>));
                true
            }
            None => false,
        }
    }

    /// Concrete sensor handles, for sources that need to write values
    pub fn memory_sensors(&self) -> Vec<Arc<MemorySensor>> {
        self.sensors.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn memory_sub_hardware(&self) -> Vec<Arc<MemoryHardware>> {
        self.sub_hardware
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Hardware for MemoryHardware {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn hardware_type(&self) -> HardwareType {
        self.hardware_type
    }

    fn parent(&self) -> Option<Arc<dyn Hardware>> {
        self.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|p| p as Arc<dyn Hardware>)
    }

    fn sub_hardware(&self) -> Vec<Arc<dyn Hardware>> {
        self.memory_sub_hardware()
            .into_iter()
            .map(|h| h as Arc<dyn Hardware>)
            .collect()
    }

    fn sensors(&self) -> Vec<Arc<dyn Sensor>> {
        self.memory_sensors()
            .into_iter()
            .map(|s| s as Arc<dyn Sensor>)
            .collect()
    }

    fn subscribe(&self, sink: EventSink) -> SubscriptionToken {
        self.listeners.subscribe(sink)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.listeners.unsubscribe(token)
    }
}

/// Root of an in-memory hardware tree
#[derive(Default)]
pub struct MemoryComputer {
    hardware: Mutex<Vec<Arc<MemoryHardware>>>,
    listeners: Listeners,
}

impl MemoryComputer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hardware(&self, hardware: Arc<MemoryHardware>) {
        self.hardware
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(hardware.clone());
        self.listeners
            .publish(GadgetEvent::HardwareAdded(hardware as Arc<dyn Hardware>));
    }

    pub fn remove_hardware(&self, identifier: &Identifier) -> Option<Arc<MemoryHardware>> {
        let removed = {
            let mut hardware = self.hardware.lock().unwrap_or_else(|p| p.into_inner());
            let position = hardware.iter().position(|h| &h.identifier == identifier);
            position.map(|i| hardware.remove(i))
        };
        if let Some(hardware) = &removed {
            self.listeners
                .publish(GadgetEvent::HardwareRemoved(hardware.clone() as Arc<dyn Hardware>));
        }
        removed
    }

    pub fn memory_hardware(&self) -> Vec<Arc<MemoryHardware>> {
        self.hardware.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Computer for MemoryComputer {
    fn hardware(&self) -> Vec<Arc<dyn Hardware>> {
        self.memory_hardware()
            .into_iter()
            .map(|h| h as Arc<dyn Hardware>)
            .collect()
    }

    fn subscribe(&self, sink: EventSink) -> SubscriptionToken {
        self.listeners.subscribe(sink)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.listeners.unsubscribe(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{event_channel, root_hardware};

    #[test]
    fn test_sensor_identifier_nests_under_hardware() {
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["intelcpu", "0"]));
        let sensor = cpu.add_sensor("CPU Package", 3, SensorType::Temperature);
        assert_eq!(sensor.identifier().as_str(), "/intelcpu/0/temperature/3");
    }

    #[test]
    fn test_value_replacement() {
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        let sensor = cpu.add_sensor("Core", 0, SensorType::Load);
        assert_eq!(sensor.value(), None);
        sensor.set_value(Some(42.5));
        assert_eq!(sensor.value(), Some(42.5));
        sensor.set_value(None);
        assert_eq!(sensor.value(), None);
    }

    #[test]
    fn test_root_hardware_walks_parents() {
        let board = MemoryHardware::new("Board", HardwareType::Mainboard, Identifier::new(["mainboard"]));
        let superio = board.add_sub_hardware("NCT6775", HardwareType::SuperIo, "lpc");
        let fan = superio.add_sensor("Fan #1", 0, SensorType::Fan);
        let root = root_hardware(fan.as_ref()).unwrap();
        assert_eq!(root.identifier(), board.identifier());
    }

    #[test]
    fn test_events_reach_subscribers_until_unsubscribed() {
        let (sink, source) = event_channel();
        let gpu = MemoryHardware::new("GPU", HardwareType::GpuNvidia, Identifier::new(["nvidiagpu", "0"]));
        let token = Hardware::subscribe(gpu.as_ref(), sink);
        let sensor = gpu.add_sensor("GPU Core", 0, SensorType::Temperature);
        assert!(matches!(source.try_recv(), Ok(GadgetEvent::SensorAdded(_))));

        assert!(Hardware::unsubscribe(gpu.as_ref(), token));
        assert!(gpu.remove_sensor(sensor.identifier()));
        assert!(source.try_recv().is_err());
        assert!(!Hardware::unsubscribe(gpu.as_ref(), token));
    }

    #[test]
    fn test_computer_announces_hardware() {
        let (sink, source) = event_channel();
        let computer = MemoryComputer::new();
        Computer::subscribe(&computer, sink);
        let nic = MemoryHardware::new("eth0", HardwareType::Nic, Identifier::new(["nic", "0"]));
        computer.add_hardware(nic.clone());
        assert!(matches!(source.try_recv(), Ok(GadgetEvent::HardwareAdded(_))));
        assert!(computer.remove_hardware(nic.identifier()).is_some());
        assert!(matches!(source.try_recv(), Ok(GadgetEvent::HardwareRemoved(_))));
        assert!(computer.remove_hardware(nic.identifier()).is_none());
    }
}
