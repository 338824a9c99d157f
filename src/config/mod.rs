//! Configuration management

mod gadget;

pub use gadget::{keys, load_config, sanitize_font_size};
