//! Layout engine: pixel metrics derived from the font size and the panel height
//! derived from the registry shape.

/// Fixed border insets of the background artwork, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderInsets {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl BorderInsets {
    pub const GADGET: BorderInsets = BorderInsets {
        top: 6,
        bottom: 7,
        left: 6,
        right: 7,
    };
}

/// Number of sensor lines reserved for the "no sensors" hint
const EMPTY_PLACEHOLDER_LINES: i32 = 4;

fn scaled_px(factor: f64, scaled: f64) -> i32 {
    (factor * scaled).round() as i32
}

/// Every pixel measure that depends on the active font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub font_size: f32,
    pub scale: f32,
    pub insets: BorderInsets,
    pub icon_size: i32,
    pub hardware_line_height: i32,
    pub sensor_line_height: i32,
    pub left_margin: i32,
    pub right_margin: i32,
    pub top_margin: i32,
    pub bottom_margin: i32,
    /// Width of the value column reserved for percentage bars
    pub progress_width: i32,
    /// Width used when no width has been chosen yet
    pub default_width: i32,
}

impl LayoutMetrics {
    /// `scale` is the surface DPI over 96
    pub fn new(font_size: f32, scale: f32) -> Self {
        let insets = BorderInsets::GADGET;
        let scaled = font_size as f64 * scale as f64;
        Self {
            font_size,
            scale,
            insets,
            icon_size: scaled_px(1.5, scaled),
            hardware_line_height: scaled_px(2.25, scaled),
            sensor_line_height: scaled_px(1.8, scaled),
            left_margin: insets.left + scaled_px(0.3, scaled),
            right_margin: insets.right + scaled_px(0.3, scaled),
            top_margin: insets.top,
            bottom_margin: insets.bottom + scaled_px(0.3, scaled),
            progress_width: scaled_px(5.3, scaled),
            default_width: scaled_px(17.3, scaled),
        }
    }

    /// Derived panel height for groups of the given sizes, in display order
    pub fn compute_height(&self, group_sizes: &[usize], show_headers: bool) -> i32 {
        let mut y = self.top_margin;
        for (i, count) in group_sizes.iter().enumerate() {
            if show_headers {
                if i > 0 {
                    y += self.hardware_line_height - self.sensor_line_height;
                }
                y += self.hardware_line_height;
            }
            y += *count as i32 * self.sensor_line_height;
        }
        if group_sizes.is_empty() {
            y += EMPTY_PLACEHOLDER_LINES * self.sensor_line_height + self.hardware_line_height;
        }
        y + self.bottom_margin
    }

    /// Height of the panel when nothing is shown
    pub fn empty_height(&self) -> i32 {
        self.compute_height(&[], true)
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::new(7.5, 1.0)
    }
}

/// Current panel geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSize {
    pub width: i32,
    pub height: i32,
}
