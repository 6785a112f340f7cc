//! 应用入口 - 编排层
//!
//! 1. **初始化**：创建输出目录、加载任务文件
//! 2. **运行**：构建阶段列表，交给 `WorkflowRunner` 顺序执行
//! 3. **汇总**：输出最终统计

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::models::{load_job, JobFile};
use crate::orchestrator::live::LiveStages;
use crate::orchestrator::runner::{RunSummary, WorkflowRunner};
use crate::services::ErrorAggregator;
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    job: JobFile,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        for dir in [&config.reports_dir, &config.data_dir] {
            fs::create_dir_all(dir).with_context(|| format!("无法创建目录: {}", dir))?;
        }
        ensure_parent(&config.database_path)?;
        ensure_parent(&config.csv_path)?;

        info!("\n📁 正在加载任务文件: {}", config.job_file);
        let job = load_job(Path::new(&config.job_file)).await?;

        Ok(Self { config, job })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let runner = WorkflowRunner::new(
            &self.job.sections,
            &self.job.alarms,
            &self.config.reports_dir,
        );
        info!("📋 共 {} 个阶段", runner.stages().len());

        let mut stages = LiveStages::new(&self.config);
        let summary = runner.run(&mut stages, ErrorAggregator::new()).await;

        print_final_stats(&summary, &self.config);
        Ok(summary)
    }
}

fn ensure_parent(file: &str) -> Result<()> {
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("无法创建目录: {}", parent.display()))?;
    }
    Ok(())
}
