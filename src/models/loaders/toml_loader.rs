use crate::models::{AlarmSpec, Section};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 任务文件内容
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub alarms: Vec<AlarmSpec>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl JobFile {
    /// 解析 TOML 文本；未配置分区时回落到默认分区
    pub fn parse(content: &str) -> Result<Self> {
        let mut job: JobFile = toml::from_str(content).context("无法解析任务文件")?;
        if job.sections.is_empty() {
            job.sections = Section::defaults();
        }
        Ok(job)
    }
}

/// 从 TOML 文件加载任务
///
/// 文件不存在时返回空闹钟列表和默认分区。
pub async fn load_job(job_file_path: &Path) -> Result<JobFile> {
    if !job_file_path.exists() {
        tracing::warn!(
            "⚠️ 任务文件不存在: {}，不创建闹钟，使用默认分区",
            job_file_path.display()
        );
        return Ok(JobFile {
            alarms: Vec::new(),
            sections: Section::defaults(),
        });
    }

    let content = fs::read_to_string(job_file_path)
        .await
        .with_context(|| format!("无法读取任务文件: {}", job_file_path.display()))?;

    let job = JobFile::parse(&content)
        .with_context(|| format!("无法解析任务文件: {}", job_file_path.display()))?;

    tracing::info!(
        "成功加载 {} 个闹钟, {} 个分区",
        job.alarms.len(),
        job.sections.len()
    );

    Ok(job)
}
