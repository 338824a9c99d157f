//! Loading [`GadgetConfig`] from the key/value settings store.
//!
//! Every knob lives under its own `sensorGadget.*` key so the registry's
//! per-sensor visibility flags and the gadget configuration can share one
//! store. The surface setters write one key at a time.

use sens_gadget_core::{SettingsExt, SettingsStore};
use sens_gadget_types::{GadgetConfig, GadgetLocation};

pub mod keys {
    pub const OPACITY: &str = "sensorGadget.Opacity";
    pub const BACKGROUND_IMAGE_OPACITY: &str = "sensorGadget.BackgroundImageOpacity";
    pub const COVER_OPACITY: &str = "sensorGadget.CoverOpacity";
    pub const COVER_COLOR: &str = "sensorGadget.CoverColor";
    pub const HARDWARE_BACKGROUND_OPACITY: &str = "sensorGadget.HardwareBackgroundOpacity";
    pub const PROGRESS_OPACITY: &str = "sensorGadget.ProgressOpacity";
    pub const FONT_SIZE: &str = "sensorGadget.FontSize";
    pub const SHOW_HARDWARE_NAMES: &str = "sensorGadget.Hardwarenames";
    pub const ALWAYS_ON_TOP: &str = "sensorGadget.AlwaysOnTop";
    pub const LOCK_POSITION_AND_SIZE: &str = "sensorGadget.LockPositionAndSize";
    pub const COLORFUL_TEMPERATURE: &str = "sensorGadget.ColorfulTemperature";
    pub const TEMPERATURE_UNIT: &str = "sensorGadget.TemperatureUnit";
    pub const LANGUAGE: &str = "sensorGadget.Language";
    pub const LOCATION_X: &str = "sensorGadget.Location.X";
    pub const LOCATION_Y: &str = "sensorGadget.Location.Y";
    pub const WIDTH: &str = "sensorGadget.Width";
}

/// Read the configuration, taking the default for every absent or unparseable key
pub fn load_config(store: &dyn SettingsStore) -> GadgetConfig {
    let d = GadgetConfig::default();
    let width = store
        .get(keys::WIDTH)
        .and_then(|raw| match raw.parse::<i32>() {
            Ok(w) if w > 0 => Some(w),
            _ => {
                log::warn!("Ignoring stored width {:?}", raw);
                None
            }
        });

    GadgetConfig {
        opacity: store.get_value(keys::OPACITY, d.opacity),
        background_image_opacity: store.get_value(keys::BACKGROUND_IMAGE_OPACITY, d.background_image_opacity),
        cover_opacity: store.get_value(keys::COVER_OPACITY, d.cover_opacity),
        cover_color: store.get_value(keys::COVER_COLOR, d.cover_color),
        hardware_background_opacity: store
            .get_value(keys::HARDWARE_BACKGROUND_OPACITY, d.hardware_background_opacity),
        progress_opacity: store.get_value(keys::PROGRESS_OPACITY, d.progress_opacity),
        font_size: sanitize_font_size(store.get_value(keys::FONT_SIZE, d.font_size)),
        show_hardware_names: store.get_value(keys::SHOW_HARDWARE_NAMES, d.show_hardware_names),
        always_on_top: store.get_value(keys::ALWAYS_ON_TOP, d.always_on_top),
        lock_position_and_size: store.get_value(keys::LOCK_POSITION_AND_SIZE, d.lock_position_and_size),
        colorful_temperature: store.get_value(keys::COLORFUL_TEMPERATURE, d.colorful_temperature),
        temperature_unit: store.get_value(keys::TEMPERATURE_UNIT, d.temperature_unit),
        language: store.get_value(keys::LANGUAGE, d.language),
        location: GadgetLocation {
            x: store.get_value(keys::LOCATION_X, d.location.x),
            y: store.get_value(keys::LOCATION_Y, d.location.y),
        },
        width,
    }
}

/// Font sizes outside a sane range fall back to the default
pub fn sanitize_font_size(size: f32) -> f32 {
    if size.is_finite() && (4.0..=48.0).contains(&size) {
        size
    } else {
        log::warn!("Font size {} out of range, using default", size);
        GadgetConfig::default().font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sens_gadget_core::MemorySettings;
    use sens_gadget_types::{CoverColor, Language, TemperatureUnit};

    #[test]
    fn test_empty_store_gives_defaults() {
        let store = MemorySettings::new();
        assert_eq!(load_config(&store), GadgetConfig::default());
    }

    #[test]
    fn test_stored_values_load() {
        let store = MemorySettings::new();
        store.set_value(keys::OPACITY, 204u8);
        store.set_value(keys::COVER_COLOR, CoverColor::White);
        store.set(keys::PROGRESS_OPACITY, "51");
        store.set_value(keys::FONT_SIZE, 9.0f32);
        store.set_value(keys::SHOW_HARDWARE_NAMES, false);
        store.set_value(keys::LOCK_POSITION_AND_SIZE, true);
        store.set_value(keys::TEMPERATURE_UNIT, TemperatureUnit::Fahrenheit);
        store.set_value(keys::LANGUAGE, Language::Chinese);
        store.set_value(keys::LOCATION_X, -20);
        store.set_value(keys::LOCATION_Y, 640);
        store.set_value(keys::WIDTH, 180);

        let expected = GadgetConfig {
            opacity: 204,
            cover_color: CoverColor::White,
            progress_opacity: 51,
            font_size: 9.0,
            show_hardware_names: false,
            lock_position_and_size: true,
            temperature_unit: TemperatureUnit::Fahrenheit,
            language: Language::Chinese,
            location: GadgetLocation { x: -20, y: 640 },
            width: Some(180),
            ..GadgetConfig::default()
        };
        assert_eq!(load_config(&store), expected);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let store = MemorySettings::new();
        store.set(keys::FONT_SIZE, "900");
        store.set(keys::COVER_OPACITY, "opaque");
        store.set(keys::WIDTH, "-5");
        let config = load_config(&store);
        assert_eq!(config.font_size, 7.5);
        assert_eq!(config.cover_opacity, 255);
        assert_eq!(config.width, None);
    }

    #[test]
    fn test_keys_share_prefix() {
        let all = [
            keys::OPACITY,
            keys::BACKGROUND_IMAGE_OPACITY,
            keys::COVER_OPACITY,
            keys::COVER_COLOR,
            keys::HARDWARE_BACKGROUND_OPACITY,
            keys::PROGRESS_OPACITY,
            keys::FONT_SIZE,
            keys::SHOW_HARDWARE_NAMES,
            keys::ALWAYS_ON_TOP,
            keys::LOCK_POSITION_AND_SIZE,
            keys::COLORFUL_TEMPERATURE,
            keys::TEMPERATURE_UNIT,
            keys::LANGUAGE,
            keys::LOCATION_X,
            keys::LOCATION_Y,
            keys::WIDTH,
        ];
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 16);
        for key in all {
            assert!(key.starts_with(sens_gadget_core::SETTINGS_PREFIX));
        }
    }
}
