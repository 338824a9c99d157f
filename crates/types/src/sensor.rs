//! Sensor and hardware classification tags.
//!
//! The declaration order of both enums is significant: the registry sorts
//! groups by `HardwareType` and sensors by `SensorType` using the derived
//! `Ord`, so reordering variants reorders the panel.

use std::fmt;

/// Kind of measurement a sensor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorType {
    Voltage,
    Clock,
    Temperature,
    Load,
    Fan,
    Flow,
    Control,
    Level,
    Factor,
    Power,
    Data,
    SmallData,
    InternetSpeed,
}

impl SensorType {
    /// Load, control and level sensors report 0..=100 and are shown as bars
    pub fn is_percentage(&self) -> bool {
        matches!(self, SensorType::Load | SensorType::Control | SensorType::Level)
    }

    /// Plural group label, used by the localizer for section names
    pub fn label(&self) -> &'static str {
        match self {
            SensorType::Voltage => "Voltages",
            SensorType::Clock => "Clocks",
            SensorType::Temperature => "Temperatures",
            SensorType::Load => "Load",
            SensorType::Fan => "Fans",
            SensorType::Flow => "Flow",
            SensorType::Control => "Controls",
            SensorType::Level => "Levels",
            SensorType::Factor => "Factor",
            SensorType::Power => "Powers",
            SensorType::Data => "Data",
            SensorType::SmallData => "Data",
            SensorType::InternetSpeed => "Internet Speed",
        }
    }

    /// Path segment used when building sensor identifiers
    pub fn as_segment(&self) -> &'static str {
        match self {
            SensorType::Voltage => "voltage",
            SensorType::Clock => "clock",
            SensorType::Temperature => "temperature",
            SensorType::Load => "load",
            SensorType::Fan => "fan",
            SensorType::Flow => "flow",
            SensorType::Control => "control",
            SensorType::Level => "level",
            SensorType::Factor => "factor",
            SensorType::Power => "power",
            SensorType::Data => "data",
            SensorType::SmallData => "smalldata",
            SensorType::InternetSpeed => "internetspeed",
        }
    }

    pub fn all() -> &'static [SensorType] {
        &[
            SensorType::Voltage,
            SensorType::Clock,
            SensorType::Temperature,
            SensorType::Load,
            SensorType::Fan,
            SensorType::Flow,
            SensorType::Control,
            SensorType::Level,
            SensorType::Factor,
            SensorType::Power,
            SensorType::Data,
            SensorType::SmallData,
            SensorType::InternetSpeed,
        ]
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of hardware a sensor group belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HardwareType {
    Mainboard,
    SuperIo,
    Cpu,
    Ram,
    GpuNvidia,
    GpuAti,
    TBalancer,
    Heatmaster,
    Hdd,
    Nic,
}

/// Unit preference for temperature readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
        celsius * 1.8 + 32.0
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemperatureUnit::Celsius => "Celsius",
            TemperatureUnit::Fahrenheit => "Fahrenheit",
        })
    }
}

impl std::str::FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Celsius" => Ok(TemperatureUnit::Celsius),
            "Fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(format!("Unknown temperature unit: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_type_order_follows_declaration() {
        assert!(SensorType::Voltage < SensorType::Clock);
        assert!(SensorType::Temperature < SensorType::Load);
        assert!(SensorType::SmallData < SensorType::InternetSpeed);
        let mut sorted = SensorType::all().to_vec();
        sorted.sort();
        assert_eq!(sorted, SensorType::all());
    }

    #[test]
    fn test_percentage_types() {
        assert!(SensorType::Load.is_percentage());
        assert!(SensorType::Control.is_percentage());
        assert!(SensorType::Level.is_percentage());
        assert!(!SensorType::Temperature.is_percentage());
        assert!(!SensorType::InternetSpeed.is_percentage());
    }

    #[test]
    fn test_fahrenheit_conversion() {
        assert_eq!(TemperatureUnit::celsius_to_fahrenheit(0.0), 32.0);
        assert!((TemperatureUnit::celsius_to_fahrenheit(100.0) - 212.0).abs() < 1e-4);
    }
}
