//! Precomputed heat ramp used for temperature text and percentage bars.

use once_cell::sync::Lazy;
use sens_gadget_types::{Color, ColorStop};

/// Highest ramp index; the table holds `RAMP_MAX + 1` entries
pub const RAMP_MAX: usize = 1000;

/// Temperature at which the ramp starts, in °C
pub const TEMPERATURE_BASELINE: f32 = 25.0;

/// Empirical stretch applied to degrees above the baseline
pub const TEMPERATURE_SCALE: f32 = 14.2857;

static GADGET_RAMP: Lazy<ColorRamp> = Lazy::new(|| {
    ColorRamp::from_stops(&[
        ColorStop::new(0.0, Color::from_rgb8(51, 153, 51)),
        ColorStop::new(0.85, Color::from_rgb8(255, 204, 51)),
        ColorStop::new(0.903, Color::from_rgb8(242, 174, 30)),
        ColorStop::new(1.0, Color::from_rgb8(246, 58, 15)),
    ])
});

/// Lookup table of `RAMP_MAX + 1` equally spaced colors
#[derive(Debug, Clone)]
pub struct ColorRamp {
    table: Vec<Color>,
}

impl ColorRamp {
    /// The green-yellow-red ramp shared by the whole gadget
    pub fn gadget() -> &'static ColorRamp {
        &GADGET_RAMP
    }

    /// Sample a piecewise-linear gradient. Stops must be sorted by position.
    pub fn from_stops(stops: &[ColorStop]) -> Self {
        let table = (0..=RAMP_MAX)
            .map(|i| sample(stops, i as f64 / RAMP_MAX as f64))
            .collect();
        Self { table }
    }

    /// Color at `index`, clamped to the table
    pub fn color_at(&self, index: usize) -> Color {
        self.table[index.min(self.table.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn sample(stops: &[ColorStop], t: f64) -> Color {
    let Some(first) = stops.first() else {
        return Color::WHITE;
    };
    if t <= first.position {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.position {
            let span = b.position - a.position;
            if span <= f64::EPSILON {
                return b.color;
            }
            return a.color.lerp(&b.color, (t - a.position) / span);
        }
    }
    stops[stops.len() - 1].color
}

fn clamp_index(raw: i64) -> usize {
    raw.clamp(0, RAMP_MAX as i64) as usize
}

/// Ramp index for a temperature in °C
pub fn temperature_index(celsius: f32) -> usize {
    let steps = ((celsius - TEMPERATURE_BASELINE) * TEMPERATURE_SCALE).trunc() as i64;
    clamp_index(steps.saturating_mul(3))
}

/// Ramp index for a 0..=100 reading
pub fn percentage_index(percent: f32) -> usize {
    clamp_index((percent * 10.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_maps_to_lowest_stop() {
        assert_eq!(temperature_index(25.0), 0);
        assert_eq!(temperature_index(10.0), 0);
    }

    #[test]
    fn test_hot_temperature_saturates_near_top() {
        let index = temperature_index(48.3);
        assert!(index >= 990, "index {}", index);
        assert_eq!(temperature_index(120.0), RAMP_MAX);
    }

    #[test]
    fn test_percentage_index_clamps() {
        assert_eq!(percentage_index(0.0), 0);
        assert_eq!(percentage_index(42.04), 420);
        assert_eq!(percentage_index(100.0), 1000);
        assert_eq!(percentage_index(150.0), 1000);
        assert_eq!(percentage_index(-5.0), 0);
        assert_eq!(percentage_index(f32::NAN), 0);
    }

    #[test]
    fn test_ramp_endpoints() {
        let ramp = ColorRamp::gadget();
        assert_eq!(ramp.len(), RAMP_MAX + 1);
        assert_eq!(ramp.color_at(0).to_rgba8(), (51, 153, 51, 255));
        assert_eq!(ramp.color_at(RAMP_MAX).to_rgba8(), (246, 58, 15, 255));
        assert_eq!(ramp.color_at(850).to_rgba8(), (255, 204, 51, 255));
        assert_eq!(ramp.color_at(5000), ramp.color_at(RAMP_MAX));
    }

    #[test]
    fn test_ramp_moves_from_green_to_red() {
        let ramp = ColorRamp::gadget();
        let low = ramp.color_at(100);
        let high = ramp.color_at(950);
        assert!(low.g > low.r);
        assert!(high.r > high.g);
    }
}
