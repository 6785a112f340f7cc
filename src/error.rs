use thiserror::Error;

/// 应用程序错误类型
///
/// 分类对应运行中的容错边界：
/// - `Connection` 是唯一的致命错误，出现后整个运行终止
/// - `Stage` / `RowExtraction` 只影响当前阶段或当前行
/// - `Configuration` 必须在任何副作用之前暴露
#[derive(Debug, Error)]
pub enum AppError {
    /// 无法建立会话（浏览器连接、登录、桌面窗口）
    #[error("连接错误: {0}")]
    Connection(String),

    /// 单个阶段失败，运行继续
    #[error("阶段 {stage} 失败: {message}")]
    Stage { stage: String, message: String },

    /// 单行数据提取失败
    #[error(transparent)]
    RowExtraction(#[from] RowExtractionError),

    /// 配置错误（闹钟参数超出枚举范围等）
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// 键盘输入通道不可用
    #[error("键盘输入失败: {0}")]
    InputDispatch(String),

    /// 浏览器 / CDP 错误
    #[error("浏览器错误: {0}")]
    Browser(String),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Storage(#[from] rusqlite::Error),

    /// 文件读写错误
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// 等待条件超时
    #[error("等待超时 ({waited_ms}ms): {condition}")]
    Timeout { condition: String, waited_ms: u128 },
}

/// 行提取错误，携带原始 HTML 方便排查
#[derive(Debug, Error)]
#[error("行数据缺少字段 {missing:?} (第 {page} 页第 {row} 行)")]
pub struct RowExtractionError {
    pub page: usize,
    pub row: usize,
    pub missing: Vec<&'static str>,
    pub html: String,
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("小时 {0} 超出范围 0-23")]
    HourOutOfRange(u8),
    #[error("分钟 {0} 超出范围 0-59")]
    MinuteOutOfRange(u8),
    #[error("星期 {0} 超出范围 1-7")]
    WeekdayOutOfRange(u8),
    #[error("未知的贪睡时长: {0}")]
    UnknownSnooze(String),
    #[error("未知的铃声: {0}")]
    UnknownSound(String),
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(format!("脚本返回值解析失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建阶段错误
    pub fn stage(stage: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Stage {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    /// 创建连接错误
    pub fn connection(message: impl std::fmt::Display) -> Self {
        AppError::Connection(message.to_string())
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_names_stage() {
        let msg = AppError::stage("interact:Forms", "boom").to_string();
        assert_eq!(msg, "阶段 interact:Forms 失败: boom");
    }

    #[test]
    fn test_row_error_message_names_missing_fields() {
        let err = RowExtractionError {
            page: 1,
            row: 6,
            missing: vec!["publisher"],
            html: "<div></div>".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("publisher"));
        assert!(msg.contains("第 1 页第 6 行"));
    }
}
