//! Sensor registry: the ordered, grouped view of visible sensors.
//!
//! Groups are keyed by the root hardware of each sensor and ordered by
//! (hardware type, identifier). Sensors inside a group are ordered by
//! (sensor type, index, identifier); sub-hardware is flattened into its root
//! group, so two chips can both carry `Fan` index 0. A group exists only while
//! it has sensors.
//!
//! The registry subscribes to every hardware node it has seen and receives
//! change events through its own channel. [`SensorRegistry::pump`] drains
//! that channel on the UI thread.

use sens_gadget_types::{HardwareType, Identifier, SensorType};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::constants::GADGET_KEY_SUFFIX;
use crate::hardware::{
    event_channel, root_hardware, Computer, EventSink, EventSource, GadgetEvent, Hardware, Sensor,
    SubscriptionToken,
};
use crate::settings::{SettingsExt, SettingsStore};

/// Persisted visibility key for a sensor, `<identifier>/gadget`
pub fn visibility_key(sensor: &dyn Sensor) -> String {
    sensor.identifier().child(GADGET_KEY_SUFFIX).to_string()
}

/// Group identity. Field order gives the display order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub hardware_type: HardwareType,
    pub identifier: Identifier,
}

impl GroupKey {
    fn of(hardware: &dyn Hardware) -> Self {
        Self {
            hardware_type: hardware.hardware_type(),
            identifier: hardware.identifier().clone(),
        }
    }
}

/// One root hardware entry and its visible sensors
pub struct SensorGroup {
    hardware: Arc<dyn Hardware>,
    sensors: Vec<Arc<dyn Sensor>>,
}

impl SensorGroup {
    pub fn hardware(&self) -> &Arc<dyn Hardware> {
        &self.hardware
    }

    pub fn sensors(&self) -> &[Arc<dyn Sensor>] {
        &self.sensors
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

fn sort_key(sensor: &dyn Sensor) -> (SensorType, usize, &Identifier) {
    (sensor.sensor_type(), sensor.index(), sensor.identifier())
}

struct Subscription {
    hardware: Arc<dyn Hardware>,
    token: SubscriptionToken,
}

pub struct SensorRegistry {
    groups: BTreeMap<GroupKey, SensorGroup>,
    settings: Arc<dyn SettingsStore>,
    sink: EventSink,
    source: EventSource,
    subscriptions: HashMap<Identifier, Subscription>,
    computer: Option<(Arc<dyn Computer>, SubscriptionToken)>,
    generation: u64,
}

impl SensorRegistry {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        let (sink, source) = event_channel();
        Self {
            groups: BTreeMap::new(),
            settings,
            sink,
            source,
            subscriptions: HashMap::new(),
            computer: None,
            generation: 0,
        }
    }

    /// Mirror a computer: take in its current hardware and follow future changes
    pub fn attach(&mut self, computer: Arc<dyn Computer>) {
        if let Some((previous, token)) = self.computer.take() {
            previous.unsubscribe(token);
        }
        let token = computer.subscribe(self.sink.clone());
        for hardware in computer.hardware() {
            self.on_hardware_added(&hardware);
        }
        self.computer = Some((computer, token));
    }

    /// Bumped on every mutation. Callers compare it to decide whether to relayout.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }

    pub fn on_hardware_added(&mut self, hardware: &Arc<dyn Hardware>) {
        let id = hardware.identifier().clone();
        if !self.subscriptions.contains_key(&id) {
            let token = hardware.subscribe(self.sink.clone());
            log::debug!("Subscribed to {} (token {})", id, token.id());
            self.subscriptions.insert(
                id,
                Subscription {
                    hardware: hardware.clone(),
                    token,
                },
            );
        }

        for sensor in hardware.sensors() {
            self.on_sensor_added(&sensor);
        }

        for sub in hardware.sub_hardware() {
            self.on_hardware_added(&sub);
        }
    }

    pub fn on_hardware_removed(&mut self, hardware: &Arc<dyn Hardware>) {
        if let Some(subscription) = self.subscriptions.remove(hardware.identifier()) {
            subscription.hardware.unsubscribe(subscription.token);
            log::debug!("Unsubscribed from {}", hardware.identifier());
        }

        for sensor in hardware.sensors() {
            self.on_sensor_removed(&sensor);
        }

        for sub in hardware.sub_hardware() {
            self.on_hardware_removed(&sub);
        }
    }

    /// Insert the sensor if its visibility flag is set
    pub fn on_sensor_added(&mut self, sensor: &Arc<dyn Sensor>) -> bool {
        if self.settings.get_value(&visibility_key(sensor.as_ref()), false) {
            self.insert(sensor)
        } else {
            false
        }
    }

    pub fn on_sensor_removed(&mut self, sensor: &Arc<dyn Sensor>) -> bool {
        self.remove(sensor.identifier())
    }

    /// User action: show the sensor and remember the choice
    pub fn add_explicit(&mut self, sensor: &Arc<dyn Sensor>) -> bool {
        self.settings.set_value(&visibility_key(sensor.as_ref()), true);
        self.insert(sensor)
    }

    /// User action: hide the sensor and forget its flag
    pub fn remove_explicit(&mut self, sensor: &Arc<dyn Sensor>) -> bool {
        self.settings.remove(&visibility_key(sensor.as_ref()));
        self.remove(sensor.identifier())
    }

    pub fn contains(&self, sensor: &dyn Sensor) -> bool {
        self.position_of(sensor.identifier()).is_some()
    }

    /// Apply one hardware event
    pub fn handle_event(&mut self, event: GadgetEvent) {
        log::trace!("Registry event {:?}", event);
        match event {
            GadgetEvent::HardwareAdded(hardware) => self.on_hardware_added(&hardware),
            GadgetEvent::HardwareRemoved(hardware) => self.on_hardware_removed(&hardware),
            GadgetEvent::SensorAdded(sensor) => {
                // Events can still be queued for hardware we already let go of
                let subscribed = sensor
                    .hardware()
                    .is_some_and(|h| self.subscriptions.contains_key(h.identifier()));
                if subscribed {
                    self.on_sensor_added(&sensor);
                } else {
                    log::debug!("Ignoring stale SensorAdded for {}", sensor.identifier());
                }
            }
            GadgetEvent::SensorRemoved(sensor) => {
                self.on_sensor_removed(&sensor);
            }
        }
    }

    /// Drain pending hardware events. Returns true if the registry changed.
    pub fn pump(&mut self) -> bool {
        let before = self.generation;
        while let Ok(event) = self.source.try_recv() {
            self.handle_event(event);
        }
        self.generation != before
    }

    pub fn groups(&self) -> impl Iterator<Item = &SensorGroup> {
        self.groups.values()
    }

    pub fn group_keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    /// Sensor count of every group, in display order
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.values().map(SensorGroup::len).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of visible sensors
    pub fn len(&self) -> usize {
        self.groups.values().map(SensorGroup::len).sum()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn position_of(&self, identifier: &Identifier) -> Option<(GroupKey, usize)> {
        self.groups.iter().find_map(|(key, group)| {
            group
                .sensors
                .iter()
                .position(|s| s.identifier() == identifier)
                .map(|i| (key.clone(), i))
        })
    }

    fn insert(&mut self, sensor: &Arc<dyn Sensor>) -> bool {
        if self.contains(sensor.as_ref()) {
            return false;
        }
        let Some(root) = root_hardware(sensor.as_ref()) else {
            log::debug!("Sensor {} has no live hardware, not shown", sensor.identifier());
            return false;
        };

        let group = self
            .groups
            .entry(GroupKey::of(root.as_ref()))
            .or_insert_with(|| SensorGroup {
                hardware: root.clone(),
                sensors: Vec::new(),
            });
        let key = sort_key(sensor.as_ref());
        let at = group.sensors.partition_point(|s| sort_key(s.as_ref()) < key);
        group.sensors.insert(at, sensor.clone());
        self.generation += 1;
        log::debug!("Showing {} ({})", sensor.name(), sensor.identifier());
        true
    }

    fn remove(&mut self, identifier: &Identifier) -> bool {
        let Some((key, index)) = self.position_of(identifier) else {
            return false;
        };
        if let Some(group) = self.groups.get_mut(&key) {
            group.sensors.remove(index);
            if group.sensors.is_empty() {
                self.groups.remove(&key);
            }
        }
        self.generation += 1;
        log::debug!("Hiding {}", identifier);
        true
    }
}

impl Drop for SensorRegistry {
    fn drop(&mut self) {
        for (_, subscription) in self.subscriptions.drain() {
            subscription.hardware.unsubscribe(subscription.token);
        }
        if let Some((computer, token)) = self.computer.take() {
            computer.unsubscribe(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryComputer, MemoryHardware, MemorySensor};
    use crate::settings::MemorySettings;
    use proptest::prelude::*;

    fn dyn_sensor(sensor: &Arc<MemorySensor>) -> Arc<dyn Sensor> {
        sensor.clone()
    }

    fn dyn_hardware(hardware: &Arc<MemoryHardware>) -> Arc<dyn Hardware> {
        hardware.clone()
    }

    fn registry() -> (SensorRegistry, Arc<MemorySettings>) {
        let settings = Arc::new(MemorySettings::new());
        (SensorRegistry::new(settings.clone()), settings)
    }

    fn names(registry: &SensorRegistry) -> Vec<Vec<String>> {
        registry
            .groups()
            .map(|g| g.sensors().iter().map(|s| s.name().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_visibility_key() {
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["intelcpu", "0"]));
        let load = cpu.add_sensor("Total", 0, SensorType::Load);
        assert_eq!(visibility_key(load.as_ref()), "/intelcpu/0/load/0/gadget");
    }

    #[test]
    fn test_sensor_without_flag_is_not_shown() {
        let (mut registry, _) = registry();
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        let load = cpu.add_sensor("Total", 0, SensorType::Load);
        assert!(!registry.on_sensor_added(&dyn_sensor(&load)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sorted_insertion_within_group() {
        let (mut registry, _) = registry();
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        let load = cpu.add_sensor("Load", 0, SensorType::Load);
        let temp1 = cpu.add_sensor("Core #2", 1, SensorType::Temperature);
        let clock = cpu.add_sensor("Clock", 0, SensorType::Clock);
        let temp0 = cpu.add_sensor("Core #1", 0, SensorType::Temperature);

        for sensor in [&load, &temp1, &clock, &temp0] {
            registry.add_explicit(&dyn_sensor(sensor));
        }

        assert_eq!(names(&registry), vec![vec!["Clock", "Core #1", "Core #2", "Load"]]);
    }

    #[test]
    fn test_groups_order_by_type_then_identifier() {
        let (mut registry, _) = registry();
        let nic = MemoryHardware::new("eth0", HardwareType::Nic, Identifier::new(["nic", "0"]));
        let gpu = MemoryHardware::new("GPU", HardwareType::GpuNvidia, Identifier::new(["gpu", "0"]));
        let cpu1 = MemoryHardware::new("CPU 1", HardwareType::Cpu, Identifier::new(["cpu", "1"]));
        let cpu0 = MemoryHardware::new("CPU 0", HardwareType::Cpu, Identifier::new(["cpu", "0"]));

        for hw in [&nic, &gpu, &cpu1, &cpu0] {
            let sensor = hw.add_sensor("Load", 0, SensorType::Load);
            registry.add_explicit(&dyn_sensor(&sensor));
        }

        let order: Vec<_> = registry.groups().map(|g| g.hardware().name().to_string()).collect();
        assert_eq!(order, vec!["CPU 0", "CPU 1", "GPU", "eth0"]);
    }

    #[test]
    fn test_sub_hardware_sensors_group_under_root() {
        let (mut registry, _) = registry();
        let board = MemoryHardware::new("Board", HardwareType::Mainboard, Identifier::new(["mainboard"]));
        let superio = board.add_sub_hardware("NCT6775", HardwareType::SuperIo, "lpc");
        let fan = superio.add_sensor("Fan #1", 0, SensorType::Fan);
        registry.add_explicit(&dyn_sensor(&fan));

        let keys: Vec<_> = registry.group_keys().cloned().collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].hardware_type, HardwareType::Mainboard);
    }

    #[test]
    fn test_ties_across_sub_hardware_keep_their_place() {
        let (mut registry, _) = registry();
        let board = MemoryHardware::new("Board", HardwareType::Mainboard, Identifier::new(["mainboard"]));
        let first = board.add_sub_hardware("NCT6793D", HardwareType::SuperIo, "lpc0");
        let second = board.add_sub_hardware("IT8686E", HardwareType::SuperIo, "lpc1");
        let fan_a = dyn_sensor(&first.add_sensor("Fan A", 0, SensorType::Fan));
        let fan_b = dyn_sensor(&second.add_sensor("Fan B", 0, SensorType::Fan));

        registry.add_explicit(&fan_b);
        registry.add_explicit(&fan_a);
        let before = names(&registry);
        assert_eq!(before, vec![vec!["Fan A", "Fan B"]]);

        registry.remove_explicit(&fan_a);
        registry.add_explicit(&fan_a);
        assert_eq!(names(&registry), before);

        registry.remove_explicit(&fan_b);
        registry.add_explicit(&fan_b);
        assert_eq!(names(&registry), before);
    }

    #[test]
    fn test_idempotent_add_and_remove() {
        let (mut registry, _) = registry();
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        let load = dyn_sensor(&cpu.add_sensor("Load", 0, SensorType::Load));

        assert!(registry.add_explicit(&load));
        let generation = registry.generation();
        assert!(!registry.add_explicit(&load));
        assert_eq!(registry.len(), 1);

        assert!(registry.on_sensor_removed(&load));
        assert!(registry.is_empty());
        assert!(!registry.on_sensor_removed(&load));
        assert_eq!(registry.generation(), generation + 1);
    }

    #[test]
    fn test_explicit_actions_persist_flag() {
        let (mut registry, settings) = registry();
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        let load = dyn_sensor(&cpu.add_sensor("Load", 0, SensorType::Load));
        let key = visibility_key(load.as_ref());

        registry.add_explicit(&load);
        assert_eq!(settings.get(&key).as_deref(), Some("true"));

        registry.remove_explicit(&load);
        assert!(!settings.contains(&key));
        assert!(!registry.on_sensor_added(&load));
    }

    #[test]
    fn test_attach_mirrors_existing_hardware_and_follows_events() {
        let (mut registry, settings) = registry();
        let computer = Arc::new(MemoryComputer::new());
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        let load = cpu.add_sensor("Load", 0, SensorType::Load);
        settings.set_value(&visibility_key(load.as_ref()), true);
        computer.add_hardware(cpu.clone());

        registry.attach(computer.clone());
        assert_eq!(registry.len(), 1);
        assert_eq!(cpu.subscriber_count(), 1);

        let temp = cpu.add_sensor("Package", 0, SensorType::Temperature);
        settings.set_value(&visibility_key(temp.as_ref()), true);
        // Flag was set after the event was queued; the event is read at pump time
        assert!(registry.pump());
        assert_eq!(names(&registry), vec![vec!["Package", "Load"]]);

        computer.remove_hardware(cpu.identifier());
        assert!(registry.pump());
        assert!(registry.is_empty());
        assert_eq!(cpu.subscriber_count(), 0);
        assert_eq!(registry.subscription_count(), 0);
    }

    #[test]
    fn test_stale_sensor_event_is_ignored() {
        let (mut registry, settings) = registry();
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        let cpu_dyn = dyn_hardware(&cpu);
        registry.on_hardware_added(&cpu_dyn);

        let load = cpu.add_sensor("Load", 0, SensorType::Load);
        settings.set_value(&visibility_key(load.as_ref()), true);
        registry.on_hardware_removed(&cpu_dyn);

        assert!(!registry.pump());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_recursive_removal_clears_sub_hardware() {
        let (mut registry, settings) = registry();
        let board = MemoryHardware::new("Board", HardwareType::Mainboard, Identifier::new(["mainboard"]));
        let superio = board.add_sub_hardware("NCT6775", HardwareType::SuperIo, "lpc");
        let fan = superio.add_sensor("Fan #1", 0, SensorType::Fan);
        settings.set_value(&visibility_key(fan.as_ref()), true);

        let board_dyn = dyn_hardware(&board);
        registry.on_hardware_added(&board_dyn);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.subscription_count(), 2);

        registry.on_hardware_removed(&board_dyn);
        assert!(registry.is_empty());
        assert_eq!(registry.subscription_count(), 0);
        assert_eq!(superio.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let computer = Arc::new(MemoryComputer::new());
        let cpu = MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu"]));
        computer.add_hardware(cpu.clone());
        {
            let (mut registry, _) = registry();
            registry.attach(computer.clone());
            assert_eq!(cpu.subscriber_count(), 1);
        }
        assert_eq!(cpu.subscriber_count(), 0);
    }

    const POOL_SIZE: usize = 26;

    /// Fixed pool of sensors spread over three hardware nodes plus a board
    /// whose two chips repeat the same (type, index) pairs
    fn pool() -> (Vec<Arc<MemoryHardware>>, Vec<Arc<dyn Sensor>>) {
        let hardware = vec![
            MemoryHardware::new("CPU", HardwareType::Cpu, Identifier::new(["cpu", "0"])),
            MemoryHardware::new("GPU", HardwareType::GpuAti, Identifier::new(["gpu", "0"])),
            MemoryHardware::new("eth0", HardwareType::Nic, Identifier::new(["nic", "0"])),
        ];
        let board = MemoryHardware::new("Board", HardwareType::Mainboard, Identifier::new(["mainboard"]));
        let chips = [
            board.add_sub_hardware("NCT6793D", HardwareType::SuperIo, "lpc0"),
            board.add_sub_hardware("IT8686E", HardwareType::SuperIo, "lpc1"),
        ];
        let mut sensors: Vec<Arc<dyn Sensor>> = Vec::new();
        for (c, chip) in chips.iter().enumerate() {
            for ty in [SensorType::Fan, SensorType::Temperature] {
                for index in 0..2 {
                    sensors.push(chip.add_sensor(format!("chip{} {:?} {}", c, ty, index), index, ty));
                }
            }
        }
        for hw in &hardware {
            for (n, ty) in [SensorType::Temperature, SensorType::Load, SensorType::Clock]
                .into_iter()
                .enumerate()
            {
                for index in 0..2 {
                    sensors.push(hw.add_sensor(format!("{} {}", n, index), index, ty));
                }
            }
        }
        let mut hardware = hardware;
        hardware.push(board);
        (hardware, sensors)
    }

    #[derive(Debug, Clone)]
    enum Op {
        Added(usize),
        Removed(usize),
        Show(usize),
        Hide(usize),
    }

    fn op_strategy(n: usize) -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..n).prop_map(Op::Added),
            (0..n).prop_map(Op::Removed),
            (0..n).prop_map(Op::Show),
            (0..n).prop_map(Op::Hide),
        ]
    }

    fn check_invariants(registry: &SensorRegistry) -> Result<(), TestCaseError> {
        let keys: Vec<_> = registry.group_keys().cloned().collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));

        let mut seen = std::collections::HashSet::new();
        for group in registry.groups() {
            prop_assert!(!group.is_empty());
            let order: Vec<_> = group.sensors().iter().map(|s| sort_key(s.as_ref())).collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
            for sensor in group.sensors() {
                prop_assert!(seen.insert(sensor.identifier().clone()));
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_registry_invariants(
            flags in prop::collection::vec(any::<bool>(), POOL_SIZE),
            ops in prop::collection::vec(op_strategy(POOL_SIZE), 0..64),
        ) {
            let (_hardware, sensors) = pool();
            let (mut registry, settings) = registry();
            for (sensor, flag) in sensors.iter().zip(&flags) {
                if *flag {
                    settings.set_value(&visibility_key(sensor.as_ref()), true);
                }
            }

            for op in ops {
                match op {
                    Op::Added(i) => { registry.on_sensor_added(&sensors[i]); }
                    Op::Removed(i) => { registry.on_sensor_removed(&sensors[i]); }
                    Op::Show(i) => { registry.add_explicit(&sensors[i]); }
                    Op::Hide(i) => { registry.remove_explicit(&sensors[i]); }
                }
                check_invariants(&registry)?;
            }
        }

        #[test]
        fn prop_toggle_restores_position(
            shown in prop::collection::vec(any::<bool>(), POOL_SIZE),
            pick in 0usize..POOL_SIZE,
        ) {
            let (_hardware, sensors) = pool();
            let (mut registry, _) = registry();
            for (sensor, show) in sensors.iter().zip(&shown) {
                if *show {
                    registry.add_explicit(sensor);
                }
            }
            registry.add_explicit(&sensors[pick]);
            let before = names(&registry);

            registry.remove_explicit(&sensors[pick]);
            prop_assert!(!registry.contains(sensors[pick].as_ref()));
            registry.add_explicit(&sensors[pick]);

            prop_assert_eq!(names(&registry), before);
        }
    }
}
