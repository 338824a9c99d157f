//! Frame compositor: cached background, tint layer, then the sensor lines.

use cairo::{Context, Operator};
use sens_gadget_core::{LayoutMetrics, Localizer, PanelSize, SensorRegistry, ValueFormatter};
use sens_gadget_types::GadgetConfig;

use crate::assets::GadgetAssets;
use crate::background::BackgroundCache;
use crate::painter::{paint_tint, EntryPainter};
use crate::pango_text::GadgetFonts;

/// Per-frame statistics, mostly for tests and trace logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub background_rebuilt: bool,
    pub skipped_lines: usize,
}

pub struct Compositor {
    assets: GadgetAssets,
    cache: BackgroundCache,
    fonts: GadgetFonts,
}

impl Compositor {
    pub fn new(assets: GadgetAssets, metrics: &LayoutMetrics) -> Self {
        Self {
            assets,
            cache: BackgroundCache::new(),
            fonts: GadgetFonts::new(font_points(metrics)),
        }
    }

    pub fn assets(&self) -> &GadgetAssets {
        &self.assets
    }

    /// Re-read asset files and refresh the background if anything changed
    pub fn reload_assets(&mut self) {
        if self.assets.reload() {
            self.cache.invalidate();
        }
    }

    /// Opacity or artwork settings changed
    pub fn invalidate_background(&mut self) {
        self.cache.invalidate();
    }

    /// Rebuild the fonts after a font size or scale change
    pub fn set_metrics(&mut self, metrics: &LayoutMetrics) {
        let size = font_points(metrics);
        if (size - self.fonts.size()).abs() > f64::EPSILON {
            self.fonts = GadgetFonts::new(size);
        }
    }

    /// Release the cached composite
    pub fn dispose(&mut self) {
        self.cache.clear();
    }

    pub fn background_rebuilds(&self) -> u64 {
        self.cache.rebuilds()
    }

    /// Paint one full frame into `cr`, which covers a panel of `size`
    pub fn paint(
        &mut self,
        cr: &Context,
        size: PanelSize,
        registry: &SensorRegistry,
        config: &GadgetConfig,
        metrics: &LayoutMetrics,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let (w, h) = (size.width as f64, size.height as f64);

        cr.save().ok();
        cr.set_operator(Operator::Clear);
        cr.paint().ok();
        cr.restore().ok();

        let before = self.cache.rebuilds();
        match self
            .cache
            .ensure(size.width, size.height, &self.assets, config.background_image_opacity)
        {
            Ok(background) => {
                let drawn = cr
                    .set_source_surface(background, 0.0, 0.0)
                    .and_then(|_| cr.paint());
                if let Err(e) = drawn {
                    log::debug!("Background paint failed: {}", e);
                }
            }
            Err(e) => log::warn!("Background composite failed: {}", e),
        }
        stats.background_rebuilt = self.cache.rebuilds() != before;

        if let Err(e) = paint_tint(cr, w, h, config.cover_color, config.cover_opacity) {
            log::debug!("Tint paint failed: {}", e);
        }

        let painter = EntryPainter {
            metrics,
            fonts: &self.fonts,
            config,
            assets: &self.assets,
            formatter: ValueFormatter::new(config.temperature_unit, config.colorful_temperature),
            localizer: Localizer::new(config.language),
        };
        stats.skipped_lines = painter.paint(cr, registry, size.width);

        log::trace!("Painted {}x{} frame: {:?}", size.width, size.height, stats);
        stats
    }
}

fn font_points(metrics: &LayoutMetrics) -> f64 {
    metrics.font_size as f64 * metrics.scale as f64
}
