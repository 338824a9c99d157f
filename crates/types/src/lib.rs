//! sens-gadget-types: Shared data types for the sens-gadget sensor overlay.
//!
//! This crate contains pure data types (colors, sensor and hardware tags,
//! identifiers, gadget configuration) that are shared across all sens-gadget
//! crates. Cairo is only pulled in behind the `cairo` feature.

pub mod color;
pub mod config;
pub mod identifier;
pub mod sensor;

// Re-export commonly used types at the crate root for convenience
pub use color::{Color, ColorStop};
pub use config::{
    CoverColor, GadgetConfig, GadgetLocation, Language, FONT_SIZE_PRESETS, OPACITY_PRESETS,
};
pub use identifier::Identifier;
pub use sensor::{HardwareType, SensorType, TemperatureUnit};
