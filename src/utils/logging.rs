/// 日志工具模块
///
/// 初始化 tracing 输出（控制台 + 日志文件），以及启动和结束时的汇总输出
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunSummary;
use crate::workflow::TerminationReason;

const LOG_FILE_NAME: &str = "rpa_log.log";

/// 初始化日志
///
/// # 参数
/// - `log_dir`: 日志目录，每次运行覆盖写入 `rpa_log.log`
/// - `verbose`: 未设置 `RUST_LOG` 时是否输出 debug 级别
///
/// # 返回
/// 返回日志文件路径
pub fn init(log_dir: &str, verbose: bool) -> Result<PathBuf> {
    fs::create_dir_all(log_dir).with_context(|| format!("无法创建日志目录: {}", log_dir))?;
    let log_path = Path::new(log_dir).join(LOG_FILE_NAME);

    let mut file = File::create(&log_path)
        .with_context(|| format!("无法创建日志文件: {}", log_path.display()))?;
    writeln!(
        file,
        "{}\n自动化运行日志 - {}\n{}\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    )?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout.and(Mutex::new(file)))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("日志初始化失败: {}", e))?;

    Ok(log_path)
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 网页 + 桌面自动化");
    match config.browser_debug_port {
        Some(port) => info!("🌐 连接已运行的浏览器 (端口: {})", port),
        None => info!("🌐 启动新浏览器 (无头模式: {})", config.headless),
    }
    info!("📂 报告目录: {}", config.reports_dir);
    info!("{}", "=".repeat(60));
}

/// 输出最终统计
pub fn print_final_stats(summary: &RunSummary, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    if summary.aborted {
        info!("🛑 连接失败，运行已终止");
    }
    info!(
        "✅ 阶段: 成功 {}/{}",
        summary.stages_run - summary.stages_failed,
        summary.stages_run
    );
    info!("📚 采集图书: {} 条", summary.records);
    if let Some(reason) = summary.termination {
        info!("🔚 翻页结束原因: {}", describe_termination(reason));
    }
    info!("❌ 错误条目: {}", summary.error_count);
    info!("{}", "=".repeat(60));
    match &summary.report_path {
        Some(path) => info!("\n错误报告已保存至: {}", path.display()),
        None => info!("\n错误报告未能保存，报告目录: {}", config.reports_dir),
    }
}

fn describe_termination(reason: TerminationReason) -> &'static str {
    match reason {
        TerminationReason::PageNotReady => "页面未就绪",
        TerminationReason::NoNextControl => "没有\"下一页\"按钮",
        TerminationReason::LastPage(_) => "已到最后一页",
    }
}

/// 截断文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_len).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_text("Relógio", 10), "Relógio");
        assert_eq!(truncate_text("Relógio", 4), "Reló...");
    }
}
