//! 错误汇总 - 业务能力层
//!
//! 每次运行创建一个实例，只追加，结束时写入一次报告文件。

use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// 无错误时写入的唯一一行
pub const NO_ERRORS_SENTINEL: &str = "本次运行未发生错误";

/// 单条错误记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub timestamp: DateTime<Local>,
    pub stage: String,
    pub message: String,
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 报告按行存储，消息中的换行要压平
        write!(
            f,
            "[{}] [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.stage,
            self.message.replace(['\r', '\n'], " | ")
        )
    }
}

/// 运行级错误汇总
///
/// 显式传递给各个流程，不使用全局状态。
#[derive(Debug)]
pub struct ErrorAggregator {
    started_at: DateTime<Local>,
    entries: Vec<ErrorEntry>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::started_at(Local::now())
    }

    pub fn started_at(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            entries: Vec::new(),
        }
    }

    /// 追加一条错误，从不失败
    pub fn add(&mut self, stage: impl Into<String>, message: impl fmt::Display) {
        let entry = ErrorEntry {
            timestamp: Local::now(),
            stage: stage.into(),
            message: message.to_string(),
        };
        error!("[{}] ❌ {}", entry.stage, entry.message);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 报告文件名，以运行开始时间（精确到毫秒）命名
    pub fn report_name(&self) -> String {
        format!("report_{}.txt", self.report_stem())
    }

    fn report_stem(&self) -> String {
        self.started_at.format("%Y-%m-%d_%H-%M-%S%.3f").to_string()
    }

    /// 按插入顺序写出全部错误，每行一条
    ///
    /// 消费自身，保证每次运行只写一次。同名报告已存在时追加 `_N` 后缀，
    /// 从不覆盖已有报告。
    pub fn flush(self, reports_dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(reports_dir)?;
        let (path, mut file) = self.create_report_file(reports_dir)?;

        if self.entries.is_empty() {
            writeln!(file, "{}", NO_ERRORS_SENTINEL)?;
        } else {
            for entry in &self.entries {
                writeln!(file, "{}", entry)?;
            }
        }

        debug!("错误报告已写入: {} ({} 条)", path.display(), self.entries.len());
        Ok(path)
    }

    fn create_report_file(&self, reports_dir: &Path) -> std::io::Result<(PathBuf, fs::File)> {
        let mut attempt = 0usize;
        loop {
            let name = match attempt {
                0 => self.report_name(),
                n => format!("report_{}_{}.txt", self.report_stem(), n),
            };
            let path = reports_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for ErrorAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_flush_without_entries_writes_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = ErrorAggregator::new().flush(dir.path()).unwrap();
        assert_eq!(read_lines(&path), vec![NO_ERRORS_SENTINEL.to_string()]);
    }

    #[test]
    fn test_flush_keeps_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut errors = ErrorAggregator::new();
        errors.add("connect", "primeiro");
        errors.add("scrape", "segundo\nstack");
        errors.add("export", "terceiro");

        let path = errors.flush(dir.path()).unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("[connect] primeiro"));
        assert!(lines[1].ends_with("[scrape] segundo | stack"));
        assert!(lines[2].ends_with("[export] terceiro"));
    }

    #[test]
    fn test_report_named_by_start_time() {
        let start = Local.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let errors = ErrorAggregator::started_at(start);
        assert_eq!(errors.report_name(), "report_2024-05-17_08-30-00.000.txt");
    }

    #[test]
    fn test_runs_started_together_keep_separate_reports() {
        let dir = tempfile::tempdir().unwrap();
        let start = Local.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();

        let mut first = ErrorAggregator::started_at(start);
        first.add("connect", "run A failure");
        let first_path = first.flush(dir.path()).unwrap();
        let second_path = ErrorAggregator::started_at(start).flush(dir.path()).unwrap();

        assert_ne!(first_path, second_path);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
        assert!(read_lines(&first_path)[0].ends_with("[connect] run A failure"));
        assert_eq!(read_lines(&second_path), vec![NO_ERRORS_SENTINEL.to_string()]);
        assert!(second_path.ends_with("report_2024-05-17_08-30-00.000_1.txt"));
    }
}
