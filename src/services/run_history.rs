//! 闹钟执行历史 - 业务能力层

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

pub const HISTORY_HEADER: &str = "Histórico de Execução dos Alarmes";

/// 追加写入执行历史
pub struct RunHistory {
    history_file_path: PathBuf,
}

impl RunHistory {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            history_file_path: path.into(),
        }
    }

    /// 记录一次执行，文件不存在时先写入标题
    pub fn record(&self, at: DateTime<Local>) -> Result<()> {
        let path = &self.history_file_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建目录: {}", parent.display()))?;
        }

        if !path.exists() {
            fs::write(path, format!("{}\n", HISTORY_HEADER))
                .with_context(|| format!("无法创建历史文件: {}", path.display()))?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .with_context(|| format!("无法打开历史文件: {}", path.display()))?;
        writeln!(file, "{}", at.format("%d/%m/%Y - %H:%M"))?;

        debug!("已记录闹钟执行历史: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_creates_header_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let history =
            RunHistory::with_path(dir.path().join("historico_robo").join("historico.txt"));

        history
            .record(Local.with_ymd_and_hms(2024, 3, 1, 7, 5, 0).unwrap())
            .unwrap();
        history
            .record(Local.with_ymd_and_hms(2024, 3, 2, 18, 45, 0).unwrap())
            .unwrap();

        let content =
            fs::read_to_string(dir.path().join("historico_robo").join("historico.txt")).unwrap();
        assert_eq!(
            content,
            format!("{}\n01/03/2024 - 07:05\n02/03/2024 - 18:45\n", HISTORY_HEADER)
        );
    }
}
