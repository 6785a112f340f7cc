//! 工作流编排器 - 编排层
//!
//! 按顺序执行阶段：
//! connect → interact(section)* → createAlarm(spec)* → 历史记录 → scrape → store → export
//!
//! 除 connect 外，每个阶段的失败只记录、不中断；
//! 无论以何种方式结束，错误报告都只写入一次。

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::models::{AlarmSpec, BookRecord, Section};
use crate::orchestrator::stages::{RunPhase, Stage, StageExecutor};
use crate::services::ErrorAggregator;
use crate::utils::logging::truncate_text;
use crate::workflow::TerminationReason;

/// 运行汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 结束前到达的最后状态
    pub last_phase: RunPhase,
    /// 因连接失败提前终止
    pub aborted: bool,
    pub stages_run: usize,
    pub stages_failed: usize,
    pub records: usize,
    pub termination: Option<TerminationReason>,
    pub error_count: usize,
    pub report_path: Option<PathBuf>,
}

/// 工作流编排器
pub struct WorkflowRunner {
    stages: Vec<Stage>,
    reports_dir: PathBuf,
}

impl WorkflowRunner {
    pub fn new(
        sections: &[Section],
        alarms: &[AlarmSpec],
        reports_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut stages = vec![Stage::Connect];
        stages.extend(sections.iter().cloned().map(Stage::Interact));
        stages.extend(alarms.iter().cloned().map(Stage::CreateAlarm));
        if !alarms.is_empty() {
            stages.push(Stage::RecordAlarmHistory);
        }
        stages.extend([Stage::Scrape, Stage::Store, Stage::Export]);

        Self {
            stages,
            reports_dir: reports_dir.into(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// 执行全部阶段
    pub async fn run<E: StageExecutor + ?Sized>(
        &self,
        executor: &mut E,
        errors: ErrorAggregator,
    ) -> RunSummary {
        let mut report = FlushOnDrop::new(errors, &self.reports_dir);
        let mut phase = RunPhase::NotStarted;
        let mut aborted = false;
        let mut stages_run = 0;
        let mut stages_failed = 0;
        let mut records: Vec<BookRecord> = Vec::new();
        let mut termination = None;

        for (i, stage) in self.stages.iter().enumerate() {
            phase = phase.entering(stage);
            let label = stage.label();
            info!("▶ [{}/{}] 阶段 {}", i + 1, self.stages.len(), label);
            stages_run += 1;

            let errors = report.errors();
            let result = match stage {
                Stage::Connect => executor.connect().await,
                Stage::Interact(section) => executor.interact(section).await,
                Stage::CreateAlarm(spec) => match executor.create_alarm(spec, errors).await {
                    Ok(true) => Ok(()),
                    Ok(false) => {
                        // 失败原因已由闹钟流程记录
                        stages_failed += 1;
                        warn!("⚠️ 闹钟 {} 未创建，继续下一阶段", spec);
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                Stage::RecordAlarmHistory => executor.record_alarm_history().await,
                Stage::Scrape => executor.scrape(errors).await.map(|outcome| {
                    termination = Some(outcome.termination);
                    records = outcome.records;
                }),
                Stage::Store => executor.store(&records).await.map(|_| ()),
                Stage::Export => executor.export(&records).await,
            };

            match result {
                Ok(()) => {
                    if *stage == Stage::Connect {
                        phase = RunPhase::Connected;
                    } else if *stage == Stage::Scrape {
                        phase = RunPhase::ScrapeDone;
                    }
                }
                Err(e) => {
                    stages_failed += 1;
                    errors.add(label.as_str(), &e);
                    if stage.is_fatal_on_failure() {
                        error!("❌ 阶段 {} 失败，终止运行", label);
                        aborted = true;
                        break;
                    }
                    warn!(
                        "⚠️ 阶段 {} 失败，继续下一阶段: {}",
                        label,
                        truncate_text(&e.to_string(), 200)
                    );
                }
            }
        }

        let error_count = report.errors().len();
        let report_path = match report.finish() {
            Ok(path) => {
                info!("📝 错误报告已保存至: {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("写入错误报告失败: {}", e);
                None
            }
        };
        executor.close().await;

        debug!("运行结束，最后状态: {:?} → {:?}", phase, RunPhase::Finished);
        RunSummary {
            last_phase: phase,
            aborted,
            stages_run,
            stages_failed,
            records: records.len(),
            termination,
            error_count,
            report_path,
        }
    }
}

/// 保证错误报告被写出：正常路径调用 `finish`，其余路径（包括 panic）在 drop 时写出
struct FlushOnDrop {
    errors: ErrorAggregator,
    reports_dir: PathBuf,
    done: bool,
}

impl FlushOnDrop {
    fn new(errors: ErrorAggregator, reports_dir: &Path) -> Self {
        Self {
            errors,
            reports_dir: reports_dir.to_path_buf(),
            done: false,
        }
    }

    fn errors(&mut self) -> &mut ErrorAggregator {
        &mut self.errors
    }

    fn finish(mut self) -> std::io::Result<PathBuf> {
        self.done = true;
        std::mem::take(&mut self.errors).flush(&self.reports_dir)
    }
}

impl Drop for FlushOnDrop {
    fn drop(&mut self) {
        if !self.done {
            if let Err(e) = std::mem::take(&mut self.errors).flush(&self.reports_dir) {
                error!("写入错误报告失败: {}", e);
            }
        }
    }
}
