//! 键盘导航 - 基础设施层
//!
//! 向当前获得焦点的控件按顺序发送按键，没有任何语义反馈。

#[cfg(test)]
use crate::error::AppError;
use crate::error::AppResult;
use crate::models::KeyEvent;
use async_trait::async_trait;
#[cfg(test)]
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

/// 键盘导航能力
///
/// 输入通道不可用时返回 `AppError::InputDispatch`，由调用方决定是否致命。
#[async_trait]
pub trait KeyboardNavigator: Send + Sync {
    /// 发送单个按键
    async fn dispatch(&self, event: &KeyEvent) -> AppResult<()>;

    /// 依次发送按键，每两个按键之间等待 `inter_key_delay`
    ///
    /// 前一个按键发送返回之前不会发送下一个。
    async fn send(&self, events: &[KeyEvent], inter_key_delay: Duration) -> AppResult<()> {
        for (i, event) in events.iter().enumerate() {
            if i > 0 && !inter_key_delay.is_zero() {
                sleep(inter_key_delay).await;
            }
            self.dispatch(event).await?;
        }
        Ok(())
    }
}

/// 记录按键的导航器，用于在没有真实界面时检查计划
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<KeyEvent>>,
    fail_after: Option<usize>,
}

#[cfg(test)]
impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发送 `n` 个按键后输入通道失效
    pub fn failing_after(n: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_after: Some(n),
        }
    }

    pub fn recorded(&self) -> Vec<KeyEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl KeyboardNavigator for RecordingNavigator {
    async fn dispatch(&self, event: &KeyEvent) -> AppResult<()> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| AppError::InputDispatch("记录器锁已损坏".into()))?;
        if self.fail_after.is_some_and(|n| events.len() >= n) {
            return Err(AppError::InputDispatch("输入通道不可用".into()));
        }
        events.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_preserves_order() {
        let navigator = RecordingNavigator::new();
        let events = vec![KeyEvent::Digit(0), KeyEvent::Tab, KeyEvent::Space];
        navigator.send(&events, Duration::ZERO).await.unwrap();
        assert_eq!(navigator.recorded(), events);
    }

    #[tokio::test]
    async fn test_dispatch_failure_stops_sequence() {
        let navigator = RecordingNavigator::failing_after(2);
        let events = vec![KeyEvent::Tab; 5];
        let result = navigator.send(&events, Duration::from_millis(1)).await;
        assert!(matches!(result, Err(AppError::InputDispatch(_))));
        assert_eq!(navigator.recorded().len(), 2);
    }

    #[test]
    fn test_send_with_block_on() {
        let navigator = RecordingNavigator::new();
        tokio_test::assert_ok!(tokio_test::block_on(
            navigator.send(&[KeyEvent::Up, KeyEvent::Up], Duration::ZERO)
        ));
        assert_eq!(navigator.recorded(), vec![KeyEvent::Up, KeyEvent::Up]);
    }
}
