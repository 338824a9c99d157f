//! Hardware tree traits and the event channel the registry listens on.
//!
//! Hardware sources own their sensors. The gadget only keeps `Arc` handles
//! and learns about changes through [`GadgetEvent`]s pushed into an
//! [`EventSink`]. Each subscription returns a [`SubscriptionToken`] that must
//! be handed back to `unsubscribe` when the hardware goes away.

use crossbeam::channel::{Receiver, Sender};
use sens_gadget_types::{HardwareType, Identifier, SensorType};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A single named, typed, time-varying measurement
pub trait Sensor: Send + Sync {
    fn identifier(&self) -> &Identifier;

    fn name(&self) -> &str;

    fn sensor_type(&self) -> SensorType;

    /// Ordering index among sensors of the same type on the same hardware
    fn index(&self) -> usize;

    /// Current reading. Written by the polling side, read at paint time.
    fn value(&self) -> Option<f32>;

    /// Hardware node the sensor hangs off, if it is still alive
    fn hardware(&self) -> Option<Arc<dyn Hardware>>;
}

/// A node in the hardware tree
pub trait Hardware: Send + Sync {
    fn identifier(&self) -> &Identifier;

    fn name(&self) -> &str;

    fn hardware_type(&self) -> HardwareType;

    fn parent(&self) -> Option<Arc<dyn Hardware>>;

    fn sub_hardware(&self) -> Vec<Arc<dyn Hardware>>;

    /// Sensors currently present on this node (not including sub-hardware)
    fn sensors(&self) -> Vec<Arc<dyn Sensor>>;

    /// Start receiving `SensorAdded`/`SensorRemoved` for this node
    fn subscribe(&self, sink: EventSink) -> SubscriptionToken;

    /// Stop a subscription. Returns false if the token was unknown.
    fn unsubscribe(&self, token: SubscriptionToken) -> bool;
}

/// The root of the hardware tree, announcing top-level hardware
pub trait Computer: Send + Sync {
    fn hardware(&self) -> Vec<Arc<dyn Hardware>>;

    /// Start receiving `HardwareAdded`/`HardwareRemoved`
    fn subscribe(&self, sink: EventSink) -> SubscriptionToken;

    fn unsubscribe(&self, token: SubscriptionToken) -> bool;
}

/// Change notifications from the hardware tree
#[derive(Clone)]
pub enum GadgetEvent {
    HardwareAdded(Arc<dyn Hardware>),
    HardwareRemoved(Arc<dyn Hardware>),
    SensorAdded(Arc<dyn Sensor>),
    SensorRemoved(Arc<dyn Sensor>),
}

impl fmt::Debug for GadgetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GadgetEvent::HardwareAdded(h) => write!(f, "HardwareAdded({})", h.identifier()),
            GadgetEvent::HardwareRemoved(h) => write!(f, "HardwareRemoved({})", h.identifier()),
            GadgetEvent::SensorAdded(s) => write!(f, "SensorAdded({})", s.identifier()),
            GadgetEvent::SensorRemoved(s) => write!(f, "SensorRemoved({})", s.identifier()),
        }
    }
}

pub type EventSink = Sender<GadgetEvent>;

pub type EventSource = Receiver<GadgetEvent>;

/// Unbounded channel connecting hardware sources to the gadget
pub fn event_channel() -> (EventSink, EventSource) {
    crossbeam::channel::unbounded()
}

/// Handle identifying one subscription on one publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Subscriber list for a single publisher (a hardware node or a computer)
#[derive(Default)]
pub struct Listeners {
    next_id: AtomicU64,
    sinks: Mutex<Vec<(SubscriptionToken, EventSink)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, sink: EventSink) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        // Recover from a poisoned lock; the list itself is still consistent
        let mut sinks = self.sinks.lock().unwrap_or_else(|p| p.into_inner());
        sinks.push((token, sink));
        token
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut sinks = self.sinks.lock().unwrap_or_else(|p| p.into_inner());
        let before = sinks.len();
        sinks.retain(|(t, _)| *t != token);
        sinks.len() != before
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every subscriber. Sinks whose receiver is gone are dropped.
    pub fn publish(&self, event: GadgetEvent) {
        let mut sinks = self.sinks.lock().unwrap_or_else(|p| p.into_inner());
        sinks.retain(|(token, sink)| match sink.send(event.clone()) {
            Ok(()) => true,
            Err(_) => {
                log::debug!("Dropping subscription {} with closed receiver", token.id());
                false
            }
        });
    }
}

/// Walk parent pointers up to the ungrouped root hardware of a sensor
pub fn root_hardware(sensor: &dyn Sensor) -> Option<Arc<dyn Hardware>> {
    let mut hardware = sensor.hardware()?;
    while let Some(parent) = hardware.parent() {
        hardware = parent;
    }
    Some(hardware)
}
