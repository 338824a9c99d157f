//! Per-frame overlays: the tint layer and the group/sensor lines.

use cairo::{Context, ImageSurface};
use sens_gadget_core::{
    BarFill, FormattedValue, LayoutMetrics, Localizer, Sensor, SensorGroup, SensorRegistry,
    ValueFormatter, NEUTRAL_TEXT,
};
use sens_gadget_types::{Color, CoverColor, GadgetConfig};

use crate::assets::GadgetAssets;
use crate::icons::draw_hardware_icon;
use crate::pango_text::{show_line, text_width, GadgetFonts, TextAlign};

/// Fill the whole panel with the cover color. Skipped at zero opacity.
pub fn paint_tint(
    cr: &Context,
    width: f64,
    height: f64,
    color: CoverColor,
    opacity: u8,
) -> Result<(), cairo::Error> {
    if opacity == 0 {
        return Ok(());
    }
    let base = match color {
        CoverColor::Black => Color::BLACK,
        CoverColor::White => Color::WHITE,
    };
    base.with_opacity(opacity).apply_to_cairo(cr);
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()
}

/// Paints the registry content for one frame
pub struct EntryPainter<'a> {
    pub metrics: &'a LayoutMetrics,
    pub fonts: &'a GadgetFonts,
    pub config: &'a GadgetConfig,
    pub assets: &'a GadgetAssets,
    pub formatter: ValueFormatter,
    pub localizer: Localizer,
}

impl<'a> EntryPainter<'a> {
    /// Paint every group and sensor line. Returns the number of lines that
    /// failed and were skipped.
    pub fn paint(&self, cr: &Context, registry: &SensorRegistry, width: i32) -> usize {
        let m = self.metrics;
        let w = width as f64;
        let mut y = m.top_margin as f64;
        let mut skipped = 0;

        if registry.is_empty() {
            let x = (m.insets.left + 1) as f64;
            Color::WHITE.apply_to_cairo(cr);
            show_line(
                cr,
                x,
                y - 1.0,
                Some(w - m.insets.right as f64 - x),
                self.localizer.empty_hint(),
                &self.fonts.small,
                TextAlign::Left,
                false,
            );
            return 0;
        }

        for group in registry.groups() {
            if self.config.show_hardware_names {
                if y > m.top_margin as f64 {
                    y += (m.hardware_line_height - m.sensor_line_height) as f64;
                }
                if let Err(e) = self.paint_header(cr, group, y, w) {
                    log::debug!("Skipping header of {}: {}", group.hardware().name(), e);
                    skipped += 1;
                }
                y += m.hardware_line_height as f64;
            }

            for sensor in group.sensors() {
                if let Err(e) = self.paint_sensor(cr, sensor.as_ref(), y, w) {
                    log::debug!("Skipping line for {}: {}", sensor.identifier(), e);
                    skipped += 1;
                }
                y += m.sensor_line_height as f64;
            }
        }

        skipped
    }

    fn paint_header(&self, cr: &Context, group: &SensorGroup, y: f64, w: f64) -> Result<(), cairo::Error> {
        let m = self.metrics;
        let opacity = self.config.hardware_background_opacity;
        if opacity != 0 {
            Color::BLACK.with_opacity(opacity).apply_to_cairo(cr);
            cr.rectangle(0.0, y - 8.0, w, (m.hardware_line_height + 5) as f64);
            cr.fill()?;
        }

        let mut x = (m.insets.left + 1) as f64;
        let icon = m.icon_size as f64;
        draw_hardware_icon(cr, group.hardware().hardware_type(), x, y + 1.0, icon)?;
        x += icon + 1.0;

        let name = self.localizer.group_name(group.hardware().name());
        Color::WHITE.apply_to_cairo(cr);
        show_line(
            cr,
            x,
            y - 1.0,
            Some(w - m.insets.right as f64 - x),
            &name,
            &self.fonts.large,
            TextAlign::Left,
            true,
        );
        cr.status()
    }

    fn paint_sensor(&self, cr: &Context, sensor: &dyn Sensor, y: f64, w: f64) -> Result<(), cairo::Error> {
        let m = self.metrics;
        let formatted: FormattedValue = self.formatter.format(sensor);

        if let Some(bar) = &formatted.bar {
            if self.config.progress_opacity != 0 {
                self.paint_bar(cr, bar, y, w)?;
            }
        }

        formatted.color.resolve().apply_to_cairo(cr);
        show_line(
            cr,
            -1.0,
            y - 1.0,
            Some(w - m.right_margin as f64 + 3.0),
            &formatted.text,
            &self.fonts.small,
            TextAlign::Right,
            false,
        );

        let value_width = text_width(cr, &formatted.text, &self.fonts.small).floor();
        let remaining = w - value_width - m.right_margin as f64 - (m.left_margin + 2) as f64;
        if remaining > 0.0 {
            let label = self.localizer.sensor_name(sensor.sensor_type(), sensor.name());
            NEUTRAL_TEXT.apply_to_cairo(cr);
            show_line(
                cr,
                (m.left_margin - 1) as f64,
                y - 1.0,
                Some(remaining),
                &label,
                &self.fonts.small,
                TextAlign::Left,
                true,
            );
        }
        cr.status()
    }

    fn paint_bar(&self, cr: &Context, bar: &BarFill, y: f64, w: f64) -> Result<(), cairo::Error> {
        let top = y - 3.0;
        let height = (self.metrics.sensor_line_height + 1) as f64;
        let fill = bar.fill_width(w as i32) as f64;
        let alpha = self.config.progress_opacity as f64 / 255.0;

        match self.assets.bar_images() {
            Some((back, fore)) => {
                paint_bar_image(cr, fore, (0.0, fill), top, w, height, alpha)?;
                paint_bar_image(cr, back, (fill, w - fill), top, w, height, alpha)
            }
            None => {
                bar.color().with_opacity(self.config.progress_opacity).apply_to_cairo(cr);
                cr.rectangle(0.0, top, fill, height);
                cr.fill()
            }
        }
    }
}

/// Stretch `image` across the full bar and show only the `span` (x, width) part of it
fn paint_bar_image(
    cr: &Context,
    image: &ImageSurface,
    span: (f64, f64),
    top: f64,
    w: f64,
    height: f64,
    alpha: f64,
) -> Result<(), cairo::Error> {
    let (x, span_width) = span;
    if span_width <= 0.0 || image.width() <= 0 || image.height() <= 0 {
        return Ok(());
    }
    cr.save()?;
    cr.rectangle(x, top, span_width, height);
    cr.clip();
    cr.translate(0.0, top);
    cr.scale(w / image.width() as f64, height / image.height() as f64);
    cr.set_source_surface(image, 0.0, 0.0)?;
    cr.paint_with_alpha(alpha)?;
    cr.restore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::Format;
    use sens_gadget_core::memory::MemoryHardware;
    use sens_gadget_core::{visibility_key, MemorySettings, SettingsExt};
    use sens_gadget_types::{HardwareType, Identifier, Language, SensorType, TemperatureUnit};
    use std::sync::Arc;

    fn cpu_registry() -> (SensorRegistry, Arc<MemoryHardware>) {
        let settings = Arc::new(MemorySettings::new());
        let mut registry = SensorRegistry::new(settings.clone());
        let cpu = MemoryHardware::new("Intel Core i7", HardwareType::Cpu, Identifier::new(["intelcpu", "0"]));
        let load = cpu.add_sensor("CPU Total", 0, SensorType::Load);
        let temp = cpu.add_sensor("CPU Package", 0, SensorType::Temperature);
        load.set_value(Some(42.0));
        temp.set_value(Some(55.0));
        for sensor in [load as Arc<dyn Sensor>, temp] {
            settings.set_value(&visibility_key(sensor.as_ref()), true);
            registry.on_sensor_added(&sensor);
        }
        (registry, cpu)
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn test_tint_fills_surface() {
        let mut surface = ImageSurface::create(Format::ARgb32, 4, 4).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            paint_tint(&cr, 4.0, 4.0, CoverColor::White, 255).unwrap();
        }
        surface.flush();
        let data = surface.data().unwrap();
        assert_eq!(&data[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_opacity_tint_is_skipped() {
        let mut surface = ImageSurface::create(Format::ARgb32, 4, 4).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            paint_tint(&cr, 4.0, 4.0, CoverColor::Black, 0).unwrap();
        }
        surface.flush();
        let data = surface.data().unwrap();
        assert!(data.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_failed_lines_are_counted_and_painting_continues() {
        let (registry, _cpu) = cpu_registry();
        let metrics = LayoutMetrics::default();
        let fonts = GadgetFonts::new(metrics.font_size as f64);
        let config = GadgetConfig::default();
        let assets = GadgetAssets::builtin();
        let painter = EntryPainter {
            metrics: &metrics,
            fonts: &fonts,
            config: &config,
            assets: &assets,
            formatter: ValueFormatter::new(TemperatureUnit::Celsius, true),
            localizer: Localizer::new(Language::English),
        };
        let height = metrics.compute_height(&registry.group_sizes(), true);

        let surface = ImageSurface::create(Format::ARgb32, metrics.default_width, height).unwrap();
        let broken = Context::new(&surface).unwrap();
        // Unbalanced restore leaves the context in an error state
        assert!(broken.restore().is_err());
        // One header and two sensor lines, each reported instead of aborting the frame
        assert_eq!(painter.paint(&broken, &registry, metrics.default_width), 3);

        let mut fresh = ImageSurface::create(Format::ARgb32, metrics.default_width, height).unwrap();
        {
            let cr = Context::new(&fresh).unwrap();
            assert_eq!(painter.paint(&cr, &registry, metrics.default_width), 0);
        }
        fresh.flush();
        let data = fresh.data().unwrap();
        assert!(data.iter().any(|b| *b != 0));
    }
}
