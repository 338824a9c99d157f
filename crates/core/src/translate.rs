//! Display-name localization for group headers and sensor labels.
//!
//! English is the identity mapping. The Chinese tables cover the names the
//! hardware sources produce; anything not in a table is shown as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use sens_gadget_types::{Language, SensorType};

static TRAILING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+$").expect("Invalid regex"));

/// Exact sensor-name translations, per sensor type
const SENSOR_NAMES: &[(SensorType, &str, &str)] = &[
    (SensorType::Clock, "Bus Speed", "总线频率"),
    (SensorType::Clock, "GPU Core", "GPU核心频率"),
    (SensorType::Clock, "GPU Memory", "显存频率"),
    (SensorType::Clock, "GPU Shader", "GPU着色器频率"),
    (SensorType::Temperature, "CPU Core", "CPU核心温度"),
    (SensorType::Temperature, "CPU Package", "CPU封装温度"),
    (SensorType::Temperature, "GPU Core", "GPU核心温度"),
    (SensorType::Temperature, "Temperature", "温度"),
    (SensorType::Load, "CPU Total", "CPU总使用率"),
    (SensorType::Load, "Memory", "内存使用率"),
    (SensorType::Load, "GPU Core", "GPU核心负载"),
    (SensorType::Load, "GPU Memory Controller", "显存控制器负载"),
    (SensorType::Load, "GPU Video Engine", "视频引擎负载"),
    (SensorType::Load, "GPU Memory", "显存使用率"),
    (SensorType::Load, "Used Space", "已用空间"),
    (SensorType::Load, "Network Utilization", "网络利用率"),
    (SensorType::Data, "Used Memory", "已用内存"),
    (SensorType::Data, "Available Memory", "可用内存"),
    (SensorType::Data, "Total Bytes Written", "总写入量"),
    (SensorType::Data, "Data Uploaded", "已上传"),
    (SensorType::Data, "Data Downloaded", "已下载"),
    (SensorType::Data, "Total Data Downloaded in Static", "历史总下载"),
    (SensorType::Data, "Total Data Uploaded in Static", "历史总上传"),
    (SensorType::Data, "Total Data Flowed in Static", "历史总流量"),
    (SensorType::SmallData, "GPU Memory Free", "可用显存"),
    (SensorType::SmallData, "GPU Memory Used", "已用显存"),
    (SensorType::SmallData, "GPU Memory Total", "总显存"),
    (SensorType::Fan, "GPU", "显卡风扇转速"),
    (SensorType::Control, "GPU Fan", "显卡风扇转速(%)"),
    (SensorType::Power, "CPU Package", "CPU总功率"),
    (SensorType::Power, "CPU Cores", "CPU核心功率"),
    (SensorType::Power, "CPU Graphics", "核显功率"),
    (SensorType::Power, "CPU DRAM", "内存功率"),
    (SensorType::Voltage, "CPU VCore", "CPU电压"),
    (SensorType::Voltage, "AVCC", "3.3V交流电压"),
    (SensorType::Voltage, "3VCC", "3.3V主电压"),
    (SensorType::Voltage, "3VSB", "3.3V待机电压"),
    (SensorType::Voltage, "VBAT", "电池电压"),
    (SensorType::Voltage, "VTT", "内存控制器电压"),
    (SensorType::Factor, "Write Amplification", "写入放大"),
    (SensorType::InternetSpeed, "Connection Speed", "连接速度"),
    (SensorType::InternetSpeed, "Upload Speed", "上传速度"),
    (SensorType::InternetSpeed, "Download Speed", "下载速度"),
];

/// Numbered sensor names: (type, name prefix, template). `{n}` is replaced by
/// the trailing number of the name.
const SENSOR_PATTERNS: &[(SensorType, &str, &str)] = &[
    (SensorType::Clock, "CPU Core", "CPU#{n} 频率"),
    (SensorType::Temperature, "CPU Core", "CPU#{n} 温度"),
    (SensorType::Temperature, "Temperature", "温度#{n}"),
    (SensorType::Temperature, "Digital Sensor", "数字温度传感器 {n}"),
    (SensorType::Temperature, "Analog Sensor", "传感器集线器 {n}"),
    (SensorType::Load, "CPU Core", "CPU#{n} 使用率"),
    (SensorType::Fan, "Fan", "风扇#{n} 转速"),
    (SensorType::Control, "Fan Control", "风扇#{n} 转速(%)"),
    (SensorType::Control, "Fan Chanel", "风扇通道 {n}"),
    (SensorType::Voltage, "Voltage", "电压#{n}"),
    (SensorType::Flow, "Flowmeter", "流量计 {n}"),
];

/// Group, hardware and section names
const GROUP_NAMES: &[(&str, &str)] = &[
    ("Voltages", "电压"),
    ("Voltage", "电压"),
    ("Temperature", "温度"),
    ("Temperatures", "温度"),
    ("Fan", "风扇"),
    ("Fans", "风扇"),
    ("Control", "风扇控制器"),
    ("Controls", "风扇控制器"),
    ("Clock", "时钟"),
    ("Clocks", "时钟"),
    ("Load", "负载"),
    ("Power", "功耗"),
    ("Powers", "功耗"),
    ("Data", "数据"),
    ("Generic Hard Disk", "硬盘"),
    ("Generic Memory", "内存"),
    ("Flow", "流速"),
    ("Factor", "倍数"),
    ("Internet Speed", "网速"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Localizer {
    language: Language,
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Label for a sensor line
    pub fn sensor_name(&self, sensor_type: SensorType, name: &str) -> String {
        match self.language {
            Language::English => name.to_string(),
            Language::Chinese => chinese_sensor_name(sensor_type, name),
        }
    }

    /// Label for a group header or a section name
    pub fn group_name(&self, name: &str) -> String {
        match self.language {
            Language::English => name.to_string(),
            Language::Chinese => GROUP_NAMES
                .iter()
                .find(|(en, _)| *en == name)
                .map(|(_, zh)| zh.to_string())
                .unwrap_or_else(|| name.to_string()),
        }
    }

    /// Line painted when no sensor is shown
    pub fn empty_hint(&self) -> &'static str {
        match self.language {
            Language::English => "Right-click here and pick sensors to show.",
            Language::Chinese => "在此处右键，选择要在悬浮窗显示的传感器。",
        }
    }
}

fn chinese_sensor_name(sensor_type: SensorType, name: &str) -> String {
    if let Some((_, _, zh)) = SENSOR_NAMES
        .iter()
        .find(|(ty, en, _)| *ty == sensor_type && *en == name)
    {
        return zh.to_string();
    }

    // Later patterns win, so "Temperature 3" isn't caught by a shorter prefix
    let pattern = SENSOR_PATTERNS
        .iter()
        .rev()
        .find(|(ty, prefix, _)| *ty == sensor_type && name.starts_with(*prefix));
    let Some((_, _, template)) = pattern else {
        return name.to_string();
    };

    match TRAILING_NUMBER.find(name) {
        Some(number) => template.replace("{n}", number.as_str()),
        None => {
            log::debug!("No trailing number in {:?}, keeping raw name", name);
            name.to_string()
        }
    }
}
