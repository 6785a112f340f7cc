use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ConfigError;

/// 贪睡时长选项，按时钟应用下拉框中的顺序排列
pub const SNOOZE_OPTIONS: [&str; 6] = [
    "Desativado",
    "5 minutos",
    "10 minutos",
    "20 minutos",
    "30 minutos",
    "1 hora",
];

/// 编辑器打开时贪睡下拉框的默认选中项
pub const DEFAULT_SNOOZE: &str = "10 minutos";

/// 铃声选项，按时钟应用下拉框中的顺序排列
pub const SOUND_OPTIONS: [&str; 10] = [
    "Carrilhões",
    "Xilofone",
    "Acordes",
    "Toque",
    "Jingle",
    "Transição",
    "Descendente",
    "Ressalto",
    "Eco",
    "Ascendente",
];

/// 一个待创建的闹钟
///
/// `weekdays` 使用 1..=7 表示星期，周日为 1。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmSpec {
    pub hour: u8,
    pub minute: u8,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub weekdays: BTreeSet<u8>,
    #[serde(default = "default_snooze")]
    pub snooze: String,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub repeat: bool,
}

fn default_snooze() -> String {
    DEFAULT_SNOOZE.to_string()
}

impl AlarmSpec {
    pub fn new(hour: u8, minute: u8, label: impl Into<String>) -> Self {
        Self {
            hour,
            minute,
            label: label.into(),
            weekdays: BTreeSet::new(),
            snooze: default_snooze(),
            sound: None,
            repeat: false,
        }
    }

    pub fn with_weekdays(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.weekdays = days.into_iter().collect();
        self
    }

    pub fn with_snooze(mut self, snooze: impl Into<String>) -> Self {
        self.snooze = snooze.into();
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

impl fmt::Display for AlarmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02} 「{}」", self.hour, self.minute, self.label)
    }
}

/// 在贪睡选项中查找位置
pub fn snooze_index(value: &str) -> Result<usize, ConfigError> {
    SNOOZE_OPTIONS
        .iter()
        .position(|s| *s == value)
        .ok_or_else(|| ConfigError::UnknownSnooze(value.to_string()))
}

/// 在铃声选项中查找位置
pub fn sound_index(value: &str) -> Result<usize, ConfigError> {
    SOUND_OPTIONS
        .iter()
        .position(|s| *s == value)
        .ok_or_else(|| ConfigError::UnknownSound(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snooze_is_in_options() {
        assert_eq!(snooze_index(DEFAULT_SNOOZE), Ok(2));
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert_eq!(
            snooze_index("15 minutos"),
            Err(ConfigError::UnknownSnooze("15 minutos".into()))
        );
        assert!(sound_index("Sirene").is_err());
        assert_eq!(sound_index("Xilofone"), Ok(1));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let spec: AlarmSpec = toml::from_str("hour = 7\nminute = 30\n").unwrap();
        assert_eq!(spec.snooze, DEFAULT_SNOOZE);
        assert!(spec.weekdays.is_empty());
        assert!(spec.sound.is_none());
        assert!(!spec.repeat);
        assert_eq!(spec.to_string(), "07:30 「」");
    }
}
