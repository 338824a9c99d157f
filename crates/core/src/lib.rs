//! sens-gadget-core: sensor registry, layout engine and value formatting.
//!
//! Everything here is toolkit-agnostic. The hardware tree is reached through
//! the [`Hardware`]/[`Sensor`]/[`Computer`] traits, persisted state through
//! [`SettingsStore`], and nothing in this crate draws.

pub mod constants;
mod format;
mod hardware;
mod layout;
pub mod memory;
mod ramp;
mod registry;
mod settings;
mod translate;

pub use constants::{BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB, MISSING_VALUE, SETTINGS_PREFIX};
pub use format::{
    format_link_speed, format_throughput, BarFill, FormattedValue, ThroughputRole, ValueColor,
    ValueFormatter, LINK_SPEED_SENSOR, NEUTRAL_TEXT,
};
pub use hardware::{
    event_channel, root_hardware, Computer, EventSink, EventSource, GadgetEvent, Hardware,
    Listeners, Sensor, SubscriptionToken,
};
pub use layout::{BorderInsets, LayoutMetrics, PanelSize};
pub use ramp::{percentage_index, temperature_index, ColorRamp, RAMP_MAX};
pub use registry::{visibility_key, GroupKey, SensorGroup, SensorRegistry};
pub use settings::{JsonSettings, MemorySettings, SettingsExt, SettingsStore};
pub use translate::Localizer;

// Re-export types used in trait signatures for convenience
pub use sens_gadget_types::{HardwareType, Identifier, SensorType};
