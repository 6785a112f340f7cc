//! 闹钟创建流程 - 流程层
//!
//! 流程顺序：
//! 1. 编译按键计划（配置错误在任何按键之前暴露）
//! 2. 点击"添加闹钟"，等待编辑器就绪
//! 3. 按计划发送按键
//! 4. 保存后等待
//!
//! 任何失败都记录到错误汇总并返回，不影响后续闹钟。

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::ClockSession;
use crate::models::{AlarmSpec, NavigationPlan};
use crate::services::{AlarmPlanCompiler, ErrorAggregator};

pub const ALARM_STAGE: &str = "alarm-creation";

/// 闹钟编辑器的节奏参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmTiming {
    /// 点击"添加闹钟"后等待编辑器就绪
    pub open_delay: Duration,
    /// 保存后等待
    pub save_delay: Duration,
    /// 相邻按键之间的间隔
    pub inter_key_delay: Duration,
    /// 查找"添加闹钟"按钮的超时
    pub locate_timeout: Duration,
}

impl AlarmTiming {
    /// 无等待，供测试使用
    pub fn immediate() -> Self {
        Self {
            open_delay: Duration::ZERO,
            save_delay: Duration::ZERO,
            inter_key_delay: Duration::ZERO,
            locate_timeout: Duration::ZERO,
        }
    }
}

/// 闹钟创建流程
pub struct AlarmWorkflow {
    compiler: AlarmPlanCompiler,
    timing: AlarmTiming,
}

impl AlarmWorkflow {
    pub fn new(timing: AlarmTiming) -> Self {
        Self {
            compiler: AlarmPlanCompiler::new(),
            timing,
        }
    }

    /// 编译并执行一个闹钟，返回是否成功
    pub async fn create(
        &self,
        session: &dyn ClockSession,
        spec: &AlarmSpec,
        errors: &mut ErrorAggregator,
    ) -> bool {
        info!("⏰ 创建闹钟 {}", spec);
        let plan = match self.compiler.compile(spec) {
            Ok(plan) => plan,
            Err(e) => {
                errors.add(ALARM_STAGE, format!("闹钟 {} 配置错误: {}", spec, e));
                return false;
            }
        };
        debug!("按键计划共 {} 个按键", plan.len());
        self.run(session, &plan, errors).await
    }

    /// 执行已编译的计划，失败时记录到错误汇总
    pub async fn run(
        &self,
        session: &dyn ClockSession,
        plan: &NavigationPlan,
        errors: &mut ErrorAggregator,
    ) -> bool {
        match self.execute(session, plan).await {
            Ok(()) => {
                info!("✓ 闹钟创建成功");
                true
            }
            Err(e) => {
                errors.add(ALARM_STAGE, e);
                false
            }
        }
    }

    async fn execute(&self, session: &dyn ClockSession, plan: &NavigationPlan) -> AppResult<()> {
        session.open_alarm_editor(self.timing.locate_timeout).await?;
        sleep(self.timing.open_delay).await;

        session
            .navigator()
            .send(plan.events(), self.timing.inter_key_delay)
            .await?;

        sleep(self.timing.save_delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::infrastructure::{KeyboardNavigator, RecordingNavigator};
    use crate::models::KeyEvent;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeClock {
        navigator: RecordingNavigator,
        button_present: bool,
        opened: AtomicUsize,
    }

    impl FakeClock {
        fn new(button_present: bool) -> Self {
            Self {
                navigator: RecordingNavigator::new(),
                button_present,
                opened: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ClockSession for FakeClock {
        async fn open_alarm_editor(&self, _timeout: Duration) -> AppResult<()> {
            if !self.button_present {
                return Err(AppError::stage(ALARM_STAGE, "未找到 'Adicionar um alarme'"));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn navigator(&self) -> &dyn KeyboardNavigator {
            &self.navigator
        }
    }

    fn workflow() -> AlarmWorkflow {
        AlarmWorkflow::new(AlarmTiming::immediate())
    }

    #[tokio::test]
    async fn test_create_sends_compiled_plan() {
        let clock = FakeClock::new(true);
        let mut errors = ErrorAggregator::new();
        let spec = AlarmSpec::new(6, 30, "Acordar").with_weekdays([2, 4]);

        assert!(workflow().create(&clock, &spec, &mut errors).await);

        let expected = AlarmPlanCompiler::new().compile(&spec).unwrap();
        assert_eq!(clock.navigator.recorded(), expected.into_events());
        assert_eq!(clock.opened.load(Ordering::SeqCst), 1);
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_configuration_error_sends_nothing() {
        let clock = FakeClock::new(true);
        let mut errors = ErrorAggregator::new();
        let spec = AlarmSpec::new(6, 30, "x").with_sound("Sirene");

        assert!(!workflow().create(&clock, &spec, &mut errors).await);

        assert!(clock.navigator.recorded().is_empty());
        assert_eq!(clock.opened.load(Ordering::SeqCst), 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.entries()[0].stage, ALARM_STAGE);
    }

    #[tokio::test]
    async fn test_missing_button_is_recorded_not_raised() {
        let clock = FakeClock::new(false);
        let mut errors = ErrorAggregator::new();
        let plan = NavigationPlan::new(vec![KeyEvent::Space]);

        assert!(!workflow().run(&clock, &plan, &mut errors).await);
        assert!(clock.navigator.recorded().is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_recorded() {
        let clock = FakeClock {
            navigator: RecordingNavigator::failing_after(3),
            button_present: true,
            opened: AtomicUsize::new(0),
        };
        let mut errors = ErrorAggregator::new();
        let spec = AlarmSpec::new(6, 30, "x");

        assert!(!workflow().create(&clock, &spec, &mut errors).await);
        assert_eq!(clock.navigator.recorded().len(), 3);
        assert!(errors.entries()[0].message.contains("键盘输入失败"));
    }
}
