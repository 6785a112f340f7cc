use serde::{Deserialize, Serialize};

/// 需要访问的网页分区
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub path: String,
}

impl Section {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// 未配置分区时使用的默认列表
    pub fn defaults() -> Vec<Section> {
        vec![
            Section::new("Elements", "/elements"),
            Section::new("Forms", "/forms"),
            Section::new("Alerts, Frame & Windows", "/alertsWindows"),
            Section::new("Widgets", "/widgets"),
            Section::new("Interactions", "/interaction"),
        ]
    }
}
