//! Cached composite of the panel background.
//!
//! The composite is rebuilt only when the panel size changes or after
//! [`BackgroundCache::invalidate`]; every other frame reuses it as-is.

use cairo::{Context, Format, ImageSurface};
use sens_gadget_core::BorderInsets;

use crate::assets::{AssetKind, GadgetAssets};
use crate::nine_slice::{draw_nine_slice, fit_center};

#[derive(Default)]
pub struct BackgroundCache {
    surface: Option<ImageSurface>,
    size: (i32, i32),
    dirty: bool,
    rebuilds: u64,
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a rebuild on the next frame (opacity or artwork changed)
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_valid_for(&self, width: i32, height: i32) -> bool {
        self.surface.is_some() && !self.dirty && self.size == (width, height)
    }

    /// Number of times the composite has been rebuilt
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Drop the cached surface, e.g. when the panel is disposed
    pub fn clear(&mut self) {
        self.surface = None;
    }

    /// Composite for a `width` x `height` panel, rebuilding it if needed
    pub fn ensure(
        &mut self,
        width: i32,
        height: i32,
        assets: &GadgetAssets,
        background_opacity: u8,
    ) -> Result<&ImageSurface, cairo::Error> {
        if !self.is_valid_for(width, height) {
            let surface = compose(width, height, assets, background_opacity)?;
            self.surface = Some(surface);
            self.size = (width, height);
            self.dirty = false;
            self.rebuilds += 1;
            log::debug!("Rebuilt background composite at {}x{}", width, height);
        }
        self.surface.as_ref().ok_or(cairo::Error::NullPointer)
    }
}

fn compose(
    width: i32,
    height: i32,
    assets: &GadgetAssets,
    background_opacity: u8,
) -> Result<ImageSurface, cairo::Error> {
    let surface = ImageSurface::create(Format::ARgb32, width.max(1), height.max(1))?;
    let cr = Context::new(&surface)?;
    let (w, h) = (width as f64, height as f64);
    let insets = BorderInsets::GADGET;

    if let Some(back) = assets.get(AssetKind::Background) {
        draw_nine_slice(&cr, back, w, h, insets, background_opacity as f64 / 255.0)?;
    }
    if let Some(fore) = assets.get(AssetKind::Foreground) {
        draw_nine_slice(&cr, fore, w, h, insets, 1.0)?;
    }
    if let Some(image) = assets.get(AssetKind::Image) {
        let inner_w = w - (insets.left + insets.right) as f64;
        let inner_h = h - (insets.top + insets.bottom) as f64;
        if inner_w > 0.0 && inner_h > 0.0 && image.width() > 0 && image.height() > 0 {
            let (iw, ih) = (image.width() as f64, image.height() as f64);
            let dst = fit_center(iw, ih, insets.left as f64, insets.top as f64, inner_w, inner_h);
            cr.save()?;
            cr.translate(dst.x, dst.y);
            cr.scale(dst.width / iw, dst.height / ih);
            cr.set_source_surface(image, 0.0, 0.0)?;
            cr.paint()?;
            cr.restore()?;
        }
    }

    drop(cr);
    surface.flush();
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_reused_until_size_changes() {
        let assets = GadgetAssets::builtin();
        let mut cache = BackgroundCache::new();
        cache.ensure(130, 88, &assets, 255).unwrap();
        cache.ensure(130, 88, &assets, 255).unwrap();
        assert_eq!(cache.rebuilds(), 1);

        let surface = cache.ensure(150, 88, &assets, 255).unwrap();
        assert_eq!((surface.width(), surface.height()), (150, 88));
        assert_eq!(cache.rebuilds(), 2);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let assets = GadgetAssets::builtin();
        let mut cache = BackgroundCache::new();
        cache.ensure(130, 88, &assets, 255).unwrap();
        cache.invalidate();
        assert!(!cache.is_valid_for(130, 88));
        cache.ensure(130, 88, &assets, 102).unwrap();
        assert_eq!(cache.rebuilds(), 2);
        assert!(cache.is_valid_for(130, 88));
    }
}
