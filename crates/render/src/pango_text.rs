//! Pango text helpers for the panel.
//!
//! Cairo's toy font API keeps growing internal font caches, so all panel text
//! goes through Pango. Font descriptions are cached per thread; layouts are
//! created per call because they are bound to the Cairo context of the frame.

use cairo::Context;
use pango::prelude::*;
use pango::{EllipsizeMode, FontDescription, Weight as PangoWeight};
use pangocairo::functions::{create_layout, show_layout};
use std::cell::RefCell;
use std::collections::HashMap;

/// Family used for every line of the panel
pub const GADGET_FONT_FAMILY: &str = "Sans";

/// Cache for FontDescription objects to avoid repeated allocations
struct FontDescriptionCache {
    cache: HashMap<FontKey, FontDescription>,
    max_entries: usize,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct FontKey {
    family: String,
    bold: bool,
    size_pango: i32, // Size in Pango units (points * PANGO_SCALE)
}

impl FontDescriptionCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 16,
        }
    }

    fn get_or_create(&mut self, family: &str, bold: bool, size: f64) -> FontDescription {
        let size_pango = (size * pango::SCALE as f64).round() as i32;
        let key = FontKey {
            family: family.to_string(),
            bold,
            size_pango,
        };

        if let Some(desc) = self.cache.get(&key) {
            return desc.clone();
        }

        // Only a handful of presets exist, so a full clear is enough
        if self.cache.len() >= self.max_entries {
            self.cache.clear();
        }

        let mut desc = FontDescription::new();
        desc.set_family(family);
        desc.set_weight(if bold {
            PangoWeight::Bold
        } else {
            PangoWeight::Normal
        });
        desc.set_size(size_pango);

        self.cache.insert(key, desc.clone());
        desc
    }
}

thread_local! {
    static FONT_DESC_CACHE: RefCell<FontDescriptionCache> = RefCell::new(FontDescriptionCache::new());
}

/// Get a cached FontDescription
pub fn font_description(family: &str, bold: bool, size: f64) -> FontDescription {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().get_or_create(family, bold, size))
}

/// Whether the default font map can resolve a font for `desc`
pub fn font_loads(desc: &FontDescription) -> bool {
    let font_map = pangocairo::FontMap::new();
    let context = font_map.create_context();
    context.load_font(desc).is_some()
}

/// Header and body fonts for one font size
#[derive(Debug, Clone)]
pub struct GadgetFonts {
    pub large: FontDescription,
    pub small: FontDescription,
    size: f64,
}

impl GadgetFonts {
    /// `size` is in points, already multiplied by the display scale
    pub fn new(size: f64) -> Self {
        let small = font_description(GADGET_FONT_FAMILY, false, size);
        let bold = font_description(GADGET_FONT_FAMILY, true, size);
        let large = if font_loads(&bold) {
            bold
        } else {
            log::warn!("Bold {} unavailable, using regular weight for headers", GADGET_FONT_FAMILY);
            small.clone()
        };
        Self { large, small, size }
    }

    pub fn size(&self) -> f64 {
        self.size
    }
}

/// Horizontal placement of a line inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

/// Logical width of `text` in pixels
pub fn text_width(cr: &Context, text: &str, desc: &FontDescription) -> f64 {
    let layout = create_layout(cr);
    layout.set_font_description(Some(desc));
    layout.set_text(text);
    let (width, _) = layout.pixel_size();
    width as f64
}

/// Draw a single line with its top-left corner at (`x`, `y`).
///
/// With `width` set the line is laid out in a box of that width, aligned per
/// `align`, and elided with an ellipsis when `elide` is true.
pub fn show_line(
    cr: &Context,
    x: f64,
    y: f64,
    width: Option<f64>,
    text: &str,
    desc: &FontDescription,
    align: TextAlign,
    elide: bool,
) {
    let layout = create_layout(cr);
    layout.set_font_description(Some(desc));
    layout.set_single_paragraph_mode(true);
    if let Some(width) = width {
        layout.set_width((width.max(0.0) * pango::SCALE as f64) as i32);
        layout.set_alignment(match align {
            TextAlign::Left => pango::Alignment::Left,
            TextAlign::Right => pango::Alignment::Right,
        });
        if elide {
            layout.set_ellipsize(EllipsizeMode::End);
        }
    }
    layout.set_text(text);

    cr.move_to(x, y);
    show_layout(cr, &layout);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_key_hash() {
        let key1 = FontKey {
            family: "Sans".to_string(),
            bold: true,
            size_pango: 12 * pango::SCALE,
        };
        let key2 = key1.clone();
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_font_descriptions_are_cached_per_weight() {
        let regular = font_description("Sans", false, 7.5);
        let bold = font_description("Sans", true, 7.5);
        assert_eq!(regular.weight(), PangoWeight::Normal);
        assert_eq!(bold.weight(), PangoWeight::Bold);
        assert_eq!(regular.size(), (7.5 * pango::SCALE as f64).round() as i32);
    }

    #[test]
    fn test_longer_text_measures_wider() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 100, 20).unwrap();
        let cr = Context::new(&surface).unwrap();
        let desc = font_description("Sans", false, 9.0);
        assert!(text_width(&cr, "100.0%", &desc) >= text_width(&cr, "1%", &desc));
    }
}
