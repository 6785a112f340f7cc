//! 桌面时钟会话 - 基础设施层
//!
//! 持有时钟应用窗口，只暴露"打开闹钟编辑器"和"发送按键"的能力。

use crate::error::AppResult;
use crate::infrastructure::keyboard::KeyboardNavigator;
use async_trait::async_trait;
use std::time::Duration;

/// 闹钟应用会话
#[async_trait]
pub trait ClockSession: Send + Sync {
    /// 定位并激活"添加闹钟"按钮，超时或不可点击时返回错误
    async fn open_alarm_editor(&self, timeout: Duration) -> AppResult<()>;

    /// 向当前焦点发送按键的导航器
    fn navigator(&self) -> &dyn KeyboardNavigator;
}

pub const CLOCK_WINDOW_TITLE: &str = "Relógio";
pub const ALARM_TAB_TITLE: &str = "Alarme";
pub const ADD_ALARM_BUTTON_TITLE: &str = "Adicionar um alarme";

#[cfg(windows)]
pub use self::windows_clock::{ClockApp, UiaKeyboard};

#[cfg(windows)]
mod windows_clock {
    use super::*;
    use crate::error::AppError;
    use crate::models::KeyEvent;
    use std::sync::Arc;
    use tracing::{debug, info};
    use uiautomation::controls::ControlType;
    use uiautomation::inputs::Keyboard;
    use uiautomation::patterns::UISelectionItemPattern;
    use uiautomation::types::TreeScope;
    use uiautomation::{UIAutomation, UIElement};

    // UI Automation 对象只在当前流程中顺序使用
    #[derive(Clone)]
    struct SharedAutomation(Arc<UIAutomation>);
    unsafe impl Send for SharedAutomation {}
    unsafe impl Sync for SharedAutomation {}

    #[derive(Clone)]
    struct SharedElement(Arc<UIElement>);
    unsafe impl Send for SharedElement {}
    unsafe impl Sync for SharedElement {}

    /// 基于系统键盘输入的导航器
    pub struct UiaKeyboard;

    #[async_trait]
    impl KeyboardNavigator for UiaKeyboard {
        async fn dispatch(&self, event: &KeyEvent) -> AppResult<()> {
            Keyboard::new()
                .send_keys(&event.to_send_keys())
                .map_err(|e| AppError::InputDispatch(format!("发送 {} 失败: {}", event, e)))
        }
    }

    /// 已连接的时钟应用窗口
    pub struct ClockApp {
        automation: SharedAutomation,
        window: SharedElement,
        keyboard: UiaKeyboard,
    }

    impl ClockApp {
        /// 启动时钟应用，连接窗口并切换到闹钟页
        pub async fn attach(launch_delay: Duration, timeout: Duration) -> AppResult<Self> {
            info!("⏰ 正在打开时钟应用...");
            std::process::Command::new("cmd")
                .args(["/C", "start", "ms-clock:"])
                .spawn()
                .map_err(|e| AppError::connection(format!("无法启动时钟应用: {}", e)))?;
            tokio::time::sleep(launch_delay).await;

            let automation = UIAutomation::new()
                .map_err(|e| AppError::connection(format!("UI Automation 初始化失败: {}", e)))?;

            log_open_windows(&automation);

            let root = automation
                .get_root_element()
                .map_err(|e| AppError::connection(e.to_string()))?;
            let window = automation
                .create_matcher()
                .from_ref(&root)
                .control_type(ControlType::Window)
                .filter_fn(Box::new(|e: &UIElement| {
                    Ok(e.get_name().unwrap_or_default().contains(CLOCK_WINDOW_TITLE))
                }))
                .depth(2)
                .timeout(timeout.as_millis() as u64)
                .find_first()
                .map_err(|e| {
                    AppError::connection(format!("未找到时钟窗口 '{}': {}", CLOCK_WINDOW_TITLE, e))
                })?;
            info!("✓ 已连接时钟窗口: {}", window.get_name().unwrap_or_default());

            let app = Self {
                automation: SharedAutomation(Arc::new(automation)),
                window: SharedElement(Arc::new(window)),
                keyboard: UiaKeyboard,
            };
            app.select_alarm_tab(timeout)?;
            Ok(app)
        }

        fn find_descendant(
            &self,
            control_type: ControlType,
            title: &'static str,
            timeout: Duration,
        ) -> AppResult<UIElement> {
            self.automation
                .0
                .create_matcher()
                .from_ref(&self.window.0)
                .control_type(control_type)
                .filter_fn(Box::new(move |e: &UIElement| {
                    Ok(e.get_name().unwrap_or_default() == title)
                }))
                .timeout(timeout.as_millis() as u64)
                .find_first()
                .map_err(|e| {
                    AppError::stage("alarm-creation", format!("未找到 '{}': {}", title, e))
                })
        }

        fn select_alarm_tab(&self, timeout: Duration) -> AppResult<()> {
            let tab = self
                .find_descendant(ControlType::ListItem, ALARM_TAB_TITLE, timeout)
                .map_err(AppError::connection)?;
            let selected = match tab.get_pattern::<UISelectionItemPattern>() {
                Ok(pattern) => pattern.select(),
                Err(_) => tab.click(),
            };
            selected.map_err(|e| AppError::connection(format!("无法切换到闹钟页: {}", e)))?;
            info!("✓ 已切换到闹钟页");
            Ok(())
        }
    }

    #[async_trait]
    impl ClockSession for ClockApp {
        async fn open_alarm_editor(&self, timeout: Duration) -> AppResult<()> {
            let button =
                self.find_descendant(ControlType::Button, ADD_ALARM_BUTTON_TITLE, timeout)?;
            button.click().map_err(|e| {
                AppError::stage("alarm-creation", format!("无法点击添加闹钟按钮: {}", e))
            })?;
            debug!("已点击 '{}'", ADD_ALARM_BUTTON_TITLE);
            Ok(())
        }

        fn navigator(&self) -> &dyn KeyboardNavigator {
            &self.keyboard
        }
    }

    /// 列出顶层窗口标题，便于排查窗口名称
    fn log_open_windows(automation: &UIAutomation) {
        let windows = automation.get_root_element().and_then(|root| {
            let condition = automation.create_true_condition()?;
            root.find_all(TreeScope::Children, &condition)
        });
        match windows {
            Ok(windows) => {
                for window in windows {
                    debug!("窗口: {}", window.get_name().unwrap_or_default());
                }
            }
            Err(e) => debug!("无法枚举窗口: {}", e),
        }
    }
}

/// 非 Windows 平台没有时钟应用，`attach` 总是失败
#[cfg(not(windows))]
pub enum ClockApp {}

#[cfg(not(windows))]
impl ClockApp {
    pub async fn attach(_launch_delay: Duration, _timeout: Duration) -> AppResult<Self> {
        Err(crate::error::AppError::connection(
            "时钟应用自动化仅支持 Windows",
        ))
    }
}

#[cfg(not(windows))]
#[async_trait]
impl ClockSession for ClockApp {
    async fn open_alarm_editor(&self, _timeout: Duration) -> AppResult<()> {
        match *self {}
    }

    fn navigator(&self) -> &dyn KeyboardNavigator {
        match *self {}
    }
}
