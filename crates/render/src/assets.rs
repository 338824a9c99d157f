//! Optional PNG artwork for the panel.
//!
//! Every asset is optional. A missing or broken file never reaches the
//! caller: the background falls back to a built-in image and the others are
//! simply absent. Reloading keeps whatever was loaded before when a file
//! fails.

use cairo::{Context, Format, ImageSurface};
use sens_gadget_core::BorderInsets;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: cairo::IoError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Well-known asset files, looked up in the asset directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Background,
    Foreground,
    Image,
    BarBackground,
    BarForeground,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Background,
        AssetKind::Foreground,
        AssetKind::Image,
        AssetKind::BarBackground,
        AssetKind::BarForeground,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            AssetKind::Background => "gadget_background.png",
            AssetKind::Foreground => "gadget_foreground.png",
            AssetKind::Image => "gadget_image.png",
            AssetKind::BarBackground => "gadget_bar_background.png",
            AssetKind::BarForeground => "gadget_bar_foreground.png",
        }
    }
}

/// Decode a PNG file into an image surface
pub fn load_png(path: &Path) -> Result<ImageSurface, AssetError> {
    if !path.exists() {
        return Err(AssetError::Missing(path.to_path_buf()));
    }
    let mut file = File::open(path)?;
    ImageSurface::create_from_png(&mut file).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Built-in background: a dark rounded panel with a thin light rim.
/// The rim sits inside the border insets so nine-slicing keeps it crisp.
pub fn default_background() -> Result<ImageSurface, cairo::Error> {
    let size = 32;
    let insets = BorderInsets::GADGET;
    let surface = ImageSurface::create(Format::ARgb32, size, size)?;
    {
        let cr = Context::new(&surface)?;
        let s = size as f64;
        let radius = insets.left.min(insets.top) as f64 - 1.0;
        rounded_rect(&cr, 0.5, 0.5, s - 1.0, s - 1.0, radius);
        cr.set_source_rgba(0.08, 0.08, 0.1, 0.85);
        cr.fill_preserve()?;
        cr.set_source_rgba(1.0, 1.0, 1.0, 0.25);
        cr.set_line_width(1.0);
        cr.stroke()?;
    }
    Ok(surface)
}

pub(crate) fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    use std::f64::consts::PI;
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

/// The panel's artwork set
pub struct GadgetAssets {
    dir: Option<PathBuf>,
    background: Option<ImageSurface>,
    foreground: Option<ImageSurface>,
    image: Option<ImageSurface>,
    bar_background: Option<ImageSurface>,
    bar_foreground: Option<ImageSurface>,
}

impl GadgetAssets {
    /// Built-in artwork only
    pub fn builtin() -> Self {
        let background = match default_background() {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::warn!("Failed to build default background: {}", e);
                None
            }
        };
        Self {
            dir: None,
            background,
            foreground: None,
            image: None,
            bar_background: None,
            bar_foreground: None,
        }
    }

    /// Built-in artwork overridden by whatever loads from `dir`
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let mut assets = Self::builtin();
        assets.dir = Some(dir.into());
        assets.reload();
        assets
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Re-read every asset file. Returns true if any image changed.
    pub fn reload(&mut self) -> bool {
        let Some(dir) = self.dir.clone() else {
            return false;
        };
        let mut changed = false;
        for kind in AssetKind::ALL {
            let path = dir.join(kind.file_name());
            match load_png(&path) {
                Ok(surface) => {
                    log::info!("Loaded {}", path.display());
                    *self.slot_mut(kind) = Some(surface);
                    changed = true;
                }
                Err(AssetError::Missing(_)) => {
                    log::debug!("No {}, keeping current image", kind.file_name());
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", kind.file_name(), e);
                }
            }
        }
        changed
    }

    fn slot_mut(&mut self, kind: AssetKind) -> &mut Option<ImageSurface> {
        match kind {
            AssetKind::Background => &mut self.background,
            AssetKind::Foreground => &mut self.foreground,
            AssetKind::Image => &mut self.image,
            AssetKind::BarBackground => &mut self.bar_background,
            AssetKind::BarForeground => &mut self.bar_foreground,
        }
    }

    pub fn get(&self, kind: AssetKind) -> Option<&ImageSurface> {
        match kind {
            AssetKind::Background => self.background.as_ref(),
            AssetKind::Foreground => self.foreground.as_ref(),
            AssetKind::Image => self.image.as_ref(),
            AssetKind::BarBackground => self.bar_background.as_ref(),
            AssetKind::BarForeground => self.bar_foreground.as_ref(),
        }
    }

    /// Bar artwork, only when both halves are present
    pub fn bar_images(&self) -> Option<(&ImageSurface, &ImageSurface)> {
        self.bar_background.as_ref().zip(self.bar_foreground.as_ref())
    }
}
