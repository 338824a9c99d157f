//! Shared constants for the gadget core

/// Bytes per kilobyte (1024)
pub const BYTES_PER_KB: f32 = 1024.0;

/// Bytes per megabyte (1024²)
pub const BYTES_PER_MB: f32 = 1_048_576.0;

/// Bytes per gigabyte (1024³)
pub const BYTES_PER_GB: f32 = 1_073_741_824.0;

/// Suffix appended to a sensor identifier to build its visibility key
pub const GADGET_KEY_SUFFIX: &str = "gadget";

/// Prefix shared by every persisted gadget setting
pub const SETTINGS_PREFIX: &str = "sensorGadget";

/// Placeholder shown for a sensor without a current value
pub const MISSING_VALUE: &str = "-";
