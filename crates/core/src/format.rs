//! Value formatting: display text, text color and bar fill for one sensor reading.

use sens_gadget_types::{Color, SensorType, TemperatureUnit};

use crate::constants::{BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB, MISSING_VALUE};
use crate::hardware::Sensor;
use crate::ramp::{percentage_index, temperature_index, ColorRamp};

/// Text color used for everything that isn't ramp-colored
pub const NEUTRAL_TEXT: Color = Color::new(240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0, 1.0);

/// Sensor name the NIC source gives its link-speed sensor
pub const LINK_SPEED_SENSOR: &str = "Connection Speed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColor {
    Neutral,
    /// Index into the gadget ramp
    Ramp(usize),
}

impl ValueColor {
    pub fn resolve(&self) -> Color {
        match self {
            ValueColor::Neutral => NEUTRAL_TEXT,
            ValueColor::Ramp(index) => ColorRamp::gadget().color_at(*index),
        }
    }
}

/// Horizontal bar drawn behind a percentage reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFill {
    pub percent: f32,
    pub ramp_index: usize,
}

impl BarFill {
    /// Filled width in pixels for a panel `width` wide, floored and kept inside the panel
    pub fn fill_width(&self, width: i32) -> i32 {
        let raw = (width as f32 * self.percent / 100.0).floor();
        if raw.is_nan() {
            return 0;
        }
        (raw as i32).clamp(0, width.max(0))
    }

    pub fn color(&self) -> Color {
        ColorRamp::gadget().color_at(self.ramp_index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormattedValue {
    pub text: String,
    pub color: ValueColor,
    pub bar: Option<BarFill>,
}

impl FormattedValue {
    fn plain(text: String) -> Self {
        Self {
            text,
            color: ValueColor::Neutral,
            bar: None,
        }
    }
}

/// Semantic role of an internet-speed sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputRole {
    /// Negotiated link speed, in bits per second
    LinkSpeed,
    /// Transfer rate, in bytes per second
    Throughput,
}

impl ThroughputRole {
    pub fn for_sensor_name(name: &str) -> Self {
        if name == LINK_SPEED_SENSOR {
            ThroughputRole::LinkSpeed
        } else {
            ThroughputRole::Throughput
        }
    }
}

pub fn format_link_speed(bits_per_second: f32) -> String {
    match bits_per_second {
        v if v == 100_000_000.0 => "100Mbps".to_string(),
        v if v == 1_000_000_000.0 => "1Gbps".to_string(),
        v if v < BYTES_PER_KB => format!("{:.0} bps", v),
        v if v < BYTES_PER_MB => format!("{:.1} Kbps", v / BYTES_PER_KB),
        v if v < BYTES_PER_GB => format!("{:.1} Mbps", v / BYTES_PER_MB),
        v => format!("{:.1} Gbps", v / BYTES_PER_GB),
    }
}

pub fn format_throughput(bytes_per_second: f32) -> String {
    if bytes_per_second < BYTES_PER_MB {
        format!("{:.1} KB/s", bytes_per_second / BYTES_PER_KB)
    } else {
        format!("{:.1} MB/s", bytes_per_second / BYTES_PER_MB)
    }
}

/// Formats readings according to the user's unit and color preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueFormatter {
    pub temperature_unit: TemperatureUnit,
    pub colorful_temperature: bool,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::Celsius,
            colorful_temperature: true,
        }
    }
}

impl ValueFormatter {
    pub fn new(temperature_unit: TemperatureUnit, colorful_temperature: bool) -> Self {
        Self {
            temperature_unit,
            colorful_temperature,
        }
    }

    pub fn format(&self, sensor: &dyn Sensor) -> FormattedValue {
        self.format_reading(sensor.sensor_type(), sensor.name(), sensor.value())
    }

    pub fn format_reading(&self, sensor_type: SensorType, name: &str, value: Option<f32>) -> FormattedValue {
        let Some(value) = value else {
            return FormattedValue::plain(MISSING_VALUE.to_string());
        };

        if sensor_type.is_percentage() {
            return FormattedValue {
                text: format!("{:.1}%", value),
                color: ValueColor::Neutral,
                bar: Some(BarFill {
                    percent: value,
                    ramp_index: percentage_index(value),
                }),
            };
        }

        let text = match sensor_type {
            SensorType::Voltage => format!("{:.3} V", value),
            SensorType::Clock => format!("{:.0} MHz", value),
            SensorType::Temperature => match self.temperature_unit {
                TemperatureUnit::Celsius => format!("{:.1} °C", value),
                TemperatureUnit::Fahrenheit => {
                    format!("{:.1} °F", TemperatureUnit::celsius_to_fahrenheit(value))
                }
            },
            SensorType::Fan => format!("{:.0} RPM", value),
            SensorType::Flow => format!("{:.0} L/h", value),
            SensorType::Power => format!("{:.1} W", value),
            SensorType::Data => format!("{:.1} GB", value),
            SensorType::SmallData => format!("{:.0} MB", value),
            SensorType::Factor => format!("{:.3}", value),
            SensorType::InternetSpeed => match ThroughputRole::for_sensor_name(name) {
                ThroughputRole::LinkSpeed => format_link_speed(value),
                ThroughputRole::Throughput => format_throughput(value),
            },
            SensorType::Load | SensorType::Control | SensorType::Level => format!("{:.1}%", value),
        };

        let color = if sensor_type == SensorType::Temperature && self.colorful_temperature {
            ValueColor::Ramp(temperature_index(value))
        } else {
            ValueColor::Neutral
        };

        FormattedValue {
            text,
            color,
            bar: None,
        }
    }
}
