//! The gadget surface: composition root that owns the registry, the
//! configuration, the layout metrics and the compositor.
//!
//! It knows nothing about windows. A host forwards paint, resize, pointer and
//! timer events to it and listens for [`ConfigChange`] callbacks to apply
//! window-level state (opacity, size, stacking).

use cairo::Context;
use sens_gadget_core::{
    Computer, Hardware, LayoutMetrics, PanelSize, Sensor, SensorRegistry, SettingsExt,
    SettingsStore,
};
use sens_gadget_render::{Compositor, FrameStats, GadgetAssets};
use sens_gadget_types::{CoverColor, GadgetConfig, GadgetLocation, Language, TemperatureUnit};
use std::sync::Arc;

use crate::config::{keys, load_config, sanitize_font_size};
use crate::hit_test::{hit_test, HitRegion};

/// A configuration knob changed. Sent after the new value is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Opacity,
    BackgroundImageOpacity,
    CoverOpacity,
    CoverColor,
    HardwareBackgroundOpacity,
    ProgressOpacity,
    FontSize,
    ShowHardwareNames,
    AlwaysOnTop,
    LockPositionAndSize,
    ColorfulTemperature,
    TemperatureUnit,
    Language,
    Location,
    /// The panel geometry changed, either by resize or by content
    Size(PanelSize),
}

type ConfigListener = Box<dyn Fn(ConfigChange, &GadgetConfig)>;

pub struct GadgetSurface {
    registry: SensorRegistry,
    settings: Arc<dyn SettingsStore>,
    computer: Option<Arc<dyn Computer>>,
    config: GadgetConfig,
    metrics: LayoutMetrics,
    compositor: Compositor,
    size: PanelSize,
    listeners: Vec<ConfigListener>,
}

impl GadgetSurface {
    /// Build a surface from persisted settings. `scale` is the surface DPI over 96.
    pub fn new(settings: Arc<dyn SettingsStore>, assets: GadgetAssets, scale: f32) -> Self {
        let config = load_config(settings.as_ref());
        let metrics = LayoutMetrics::new(config.font_size, scale);
        let compositor = Compositor::new(assets, &metrics);
        let registry = SensorRegistry::new(settings.clone());
        let width = config.width.unwrap_or(metrics.default_width).max(min_width(&metrics));
        let size = PanelSize {
            width,
            height: metrics.compute_height(&registry.group_sizes(), config.show_hardware_names),
        };
        log::info!(
            "Gadget surface {}x{} at font size {}",
            size.width,
            size.height,
            config.font_size
        );

        Self {
            registry,
            settings,
            computer: None,
            config,
            metrics,
            compositor,
            size,
            listeners: Vec::new(),
        }
    }

    /// Start mirroring `computer`. Visible sensors are added immediately.
    pub fn attach(&mut self, computer: Arc<dyn Computer>) {
        self.registry.attach(computer.clone());
        self.computer = Some(computer);
        self.relayout();
    }

    /// Register a callback for configuration and geometry changes.
    ///
    /// Callbacks run while the surface is mutably borrowed and must not call back into it.
    pub fn connect_config_changed<F>(&mut self, f: F)
    where
        F: Fn(ConfigChange, &GadgetConfig) + 'static,
    {
        self.listeners.push(Box::new(f));
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GadgetConfig {
        &self.config
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn size(&self) -> PanelSize {
        self.size
    }

    /// Every sensor of the attached computer, visible or not, in tree order
    pub fn available_sensors(&self) -> Vec<Arc<dyn Sensor>> {
        fn walk(hardware: &Arc<dyn Hardware>, out: &mut Vec<Arc<dyn Sensor>>) {
            out.extend(hardware.sensors());
            for sub in hardware.sub_hardware() {
                walk(&sub, out);
            }
        }
        let mut sensors = Vec::new();
        if let Some(computer) = &self.computer {
            for hardware in computer.hardware() {
                walk(&hardware, &mut sensors);
            }
        }
        sensors
    }

    /// Apply pending hardware events. Returns true when the registry changed.
    pub fn pump(&mut self) -> bool {
        let changed = self.registry.pump();
        if changed {
            self.relayout();
        }
        changed
    }

    /// Show or hide a sensor at the user's request; the choice is persisted
    pub fn set_sensor_visible(&mut self, sensor: &Arc<dyn Sensor>, visible: bool) -> bool {
        let changed = if visible {
            self.registry.add_explicit(sensor)
        } else {
            self.registry.remove_explicit(sensor)
        };
        if changed {
            self.relayout();
        }
        changed
    }

    /// Recompute the height from the registry shape. Returns true if it changed.
    pub fn relayout(&mut self) -> bool {
        let height = self
            .metrics
            .compute_height(&self.registry.group_sizes(), self.config.show_hardware_names);
        if height == self.size.height {
            return false;
        }
        log::debug!("Panel height {} -> {}", self.size.height, height);
        self.size.height = height;
        self.notify(ConfigChange::Size(self.size));
        true
    }

    /// Caller-chosen width. The height follows from the content.
    pub fn resize(&mut self, width: i32) -> PanelSize {
        let width = width.max(min_width(&self.metrics));
        if width != self.size.width {
            self.size.width = width;
            self.config.width = Some(width);
            self.settings.set_value(keys::WIDTH, width);
            let height = self
                .metrics
                .compute_height(&self.registry.group_sizes(), self.config.show_hardware_names);
            self.size.height = height;
            self.notify(ConfigChange::Size(self.size));
        }
        self.size
    }

    /// The host window moved
    pub fn set_location(&mut self, x: i32, y: i32) {
        let location = GadgetLocation { x, y };
        if self.config.location == location {
            return;
        }
        self.config.location = location;
        self.settings.set_value(keys::LOCATION_X, x);
        self.settings.set_value(keys::LOCATION_Y, y);
        self.notify(ConfigChange::Location);
    }

    pub fn hit_test(&self, x: f64) -> HitRegion {
        hit_test(
            x,
            self.size.width,
            self.metrics.insets,
            self.config.lock_position_and_size,
        )
    }

    /// Paint one frame at the current size
    pub fn paint(&mut self, cr: &Context) -> FrameStats {
        self.compositor
            .paint(cr, self.size, &self.registry, &self.config, &self.metrics)
    }

    /// Re-read the asset directory
    pub fn reload_assets(&mut self) {
        self.compositor.reload_assets();
    }

    pub fn set_opacity(&mut self, value: u8) {
        self.apply(keys::OPACITY, value, |c| &mut c.opacity, ConfigChange::Opacity);
    }

    pub fn set_background_image_opacity(&mut self, value: u8) {
        if self.apply(
            keys::BACKGROUND_IMAGE_OPACITY,
            value,
            |c| &mut c.background_image_opacity,
            ConfigChange::BackgroundImageOpacity,
        ) {
            self.compositor.invalidate_background();
        }
    }

    pub fn set_cover_opacity(&mut self, value: u8) {
        if self.apply(keys::COVER_OPACITY, value, |c| &mut c.cover_opacity, ConfigChange::CoverOpacity) {
            self.compositor.invalidate_background();
        }
    }

    pub fn set_cover_color(&mut self, value: CoverColor) {
        self.apply(keys::COVER_COLOR, value, |c| &mut c.cover_color, ConfigChange::CoverColor);
    }

    pub fn set_hardware_background_opacity(&mut self, value: u8) {
        if self.apply(
            keys::HARDWARE_BACKGROUND_OPACITY,
            value,
            |c| &mut c.hardware_background_opacity,
            ConfigChange::HardwareBackgroundOpacity,
        ) {
            self.compositor.invalidate_background();
        }
    }

    pub fn set_progress_opacity(&mut self, value: u8) {
        if self.apply(
            keys::PROGRESS_OPACITY,
            value,
            |c| &mut c.progress_opacity,
            ConfigChange::ProgressOpacity,
        ) {
            self.compositor.invalidate_background();
        }
    }

    /// New font size: every pixel metric is recomputed and the width resets to the
    /// font-derived default before the relayout
    pub fn set_font_size(&mut self, size: f32) {
        let size = sanitize_font_size(size);
        if (size - self.config.font_size).abs() < f32::EPSILON {
            return;
        }
        self.config.font_size = size;
        self.settings.set_value(keys::FONT_SIZE, size);
        // A width picked for the old font no longer fits; fall back to the derived one
        self.config.width = None;
        self.settings.remove(keys::WIDTH);
        self.rebuild_metrics(LayoutMetrics::new(size, self.metrics.scale));
        self.notify(ConfigChange::FontSize);
    }

    /// Display scale changed, e.g. the window moved to another monitor
    pub fn set_scale(&mut self, scale: f32) {
        if (scale - self.metrics.scale).abs() < f32::EPSILON || scale <= 0.0 {
            return;
        }
        self.rebuild_metrics(LayoutMetrics::new(self.config.font_size, scale));
    }

    pub fn set_show_hardware_names(&mut self, value: bool) {
        if self.apply(
            keys::SHOW_HARDWARE_NAMES,
            value,
            |c| &mut c.show_hardware_names,
            ConfigChange::ShowHardwareNames,
        ) {
            self.relayout();
        }
    }

    pub fn set_always_on_top(&mut self, value: bool) {
        self.apply(keys::ALWAYS_ON_TOP, value, |c| &mut c.always_on_top, ConfigChange::AlwaysOnTop);
    }

    pub fn set_lock_position_and_size(&mut self, value: bool) {
        self.apply(
            keys::LOCK_POSITION_AND_SIZE,
            value,
            |c| &mut c.lock_position_and_size,
            ConfigChange::LockPositionAndSize,
        );
    }

    pub fn set_colorful_temperature(&mut self, value: bool) {
        self.apply(
            keys::COLORFUL_TEMPERATURE,
            value,
            |c| &mut c.colorful_temperature,
            ConfigChange::ColorfulTemperature,
        );
    }

    pub fn set_temperature_unit(&mut self, value: TemperatureUnit) {
        self.apply(
            keys::TEMPERATURE_UNIT,
            value,
            |c| &mut c.temperature_unit,
            ConfigChange::TemperatureUnit,
        );
    }

    pub fn set_language(&mut self, value: Language) {
        self.apply(keys::LANGUAGE, value, |c| &mut c.language, ConfigChange::Language);
    }

    /// Drop the cached composite; the next paint rebuilds it
    pub fn dispose(&mut self) {
        self.compositor.dispose();
    }

    fn rebuild_metrics(&mut self, metrics: LayoutMetrics) {
        self.metrics = metrics;
        self.compositor.set_metrics(&self.metrics);
        self.compositor.invalidate_background();

        let width = self
            .config
            .width
            .unwrap_or(self.metrics.default_width)
            .max(min_width(&self.metrics));
        let height = self
            .metrics
            .compute_height(&self.registry.group_sizes(), self.config.show_hardware_names);
        let size = PanelSize { width, height };
        if size != self.size {
            self.size = size;
            self.notify(ConfigChange::Size(size));
        }
    }

    /// Store `value` into the config slot, persist it and notify. False if unchanged.
    fn apply<T>(
        &mut self,
        key: &str,
        value: T,
        slot: fn(&mut GadgetConfig) -> &mut T,
        change: ConfigChange,
    ) -> bool
    where
        T: PartialEq + ToString + Copy,
    {
        let current = slot(&mut self.config);
        if *current == value {
            return false;
        }
        *current = value;
        self.settings.set_value(key, value);
        self.notify(change);
        true
    }

    fn notify(&self, change: ConfigChange) {
        for listener in &self.listeners {
            listener(change, &self.config);
        }
    }
}

impl Drop for GadgetSurface {
    fn drop(&mut self) {
        self.compositor.dispose();
    }
}

/// Narrowest panel that still fits the margins and a bar
fn min_width(metrics: &LayoutMetrics) -> i32 {
    metrics.left_margin + metrics.right_margin + metrics.progress_width
}
