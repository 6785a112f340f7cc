//! 阶段定义
//!
//! `StageExecutor` 是编排层与真实 I/O 之间的接缝：
//! 编排层只决定顺序和容错策略，具体操作由执行器完成。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{AlarmSpec, BookRecord, Section};
use crate::services::ErrorAggregator;
use crate::workflow::{ScrapeOutcome, ALARM_STAGE, SCRAPE_STAGE};

/// 运行中的单个阶段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Interact(Section),
    CreateAlarm(AlarmSpec),
    RecordAlarmHistory,
    Scrape,
    Store,
    Export,
}

impl Stage {
    /// 写入错误报告时使用的阶段标签
    pub fn label(&self) -> String {
        match self {
            Stage::Connect => "connect".to_string(),
            Stage::Interact(section) => format!("interact:{}", section.name),
            Stage::CreateAlarm(_) => ALARM_STAGE.to_string(),
            Stage::RecordAlarmHistory => "alarm-history".to_string(),
            Stage::Scrape => SCRAPE_STAGE.to_string(),
            Stage::Store => "store".to_string(),
            Stage::Export => "export".to_string(),
        }
    }

    /// 只有连接阶段的失败是致命的
    pub fn is_fatal_on_failure(&self) -> bool {
        matches!(self, Stage::Connect)
    }
}

/// 运行状态
///
/// `NotStarted → Connected → SectionsDone → AlarmsDone → ScrapeDone → Finished`，
/// 连接失败时从 `NotStarted` 直接到 `Finished`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    NotStarted,
    Connected,
    SectionsDone,
    AlarmsDone,
    ScrapeDone,
    Finished,
}

impl RunPhase {
    /// 进入某个阶段之前应处于的状态
    pub fn entering(self, stage: &Stage) -> RunPhase {
        let floor = match stage {
            Stage::Connect => RunPhase::NotStarted,
            Stage::Interact(_) => RunPhase::Connected,
            Stage::CreateAlarm(_) | Stage::RecordAlarmHistory => RunPhase::SectionsDone,
            Stage::Scrape => RunPhase::AlarmsDone,
            Stage::Store | Stage::Export => RunPhase::ScrapeDone,
        };
        self.max(floor)
    }
}

/// 阶段执行器
#[async_trait]
pub trait StageExecutor: Send {
    /// 建立会话（浏览器 + 登录）
    async fn connect(&mut self) -> AppResult<()>;

    async fn interact(&mut self, section: &Section) -> AppResult<()>;

    /// 创建闹钟，返回是否成功
    ///
    /// 返回 `Ok(false)` 时失败原因已记录在 `errors` 中，调用方只计数不再记录。
    async fn create_alarm(
        &mut self,
        spec: &AlarmSpec,
        errors: &mut ErrorAggregator,
    ) -> AppResult<bool>;

    async fn record_alarm_history(&mut self) -> AppResult<()>;

    /// 采集图书；坏行记录在 `errors` 中
    async fn scrape(&mut self, errors: &mut ErrorAggregator) -> AppResult<ScrapeOutcome>;

    /// 写入数据库，返回写入条数
    async fn store(&mut self, records: &[BookRecord]) -> AppResult<usize>;

    async fn export(&mut self, records: &[BookRecord]) -> AppResult<()>;

    /// 释放会话
    async fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Stage::Connect.label(), "connect");
        assert_eq!(
            Stage::Interact(Section::new("Forms", "/forms")).label(),
            "interact:Forms"
        );
        assert_eq!(Stage::CreateAlarm(AlarmSpec::new(7, 0, "")).label(), "alarm-creation");
    }

    #[test]
    fn test_phase_never_moves_backwards() {
        let phase = RunPhase::ScrapeDone;
        assert_eq!(phase.entering(&Stage::Interact(Section::new("a", "/a"))), RunPhase::ScrapeDone);
        assert_eq!(RunPhase::Connected.entering(&Stage::Scrape), RunPhase::AlarmsDone);
        assert_eq!(
            RunPhase::Connected.entering(&Stage::RecordAlarmHistory),
            RunPhase::SectionsDone
        );
    }
}
