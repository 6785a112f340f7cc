//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS"和"等待条件"的能力

use crate::error::{AppError, AppResult};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// 等待参数：固定超时 + 轮询间隔
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitOptions {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_millis(250))
    }
}

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() / wait_until() 能力
/// - 不认识图书、分区等业务概念
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航、输入等操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 轮询 JS 布尔表达式直到为真或超时
    ///
    /// 页面跳转期间脚本可能执行失败，按"尚未满足"处理。
    pub async fn wait_until(
        &self,
        condition: &str,
        predicate_js: &str,
        wait: WaitOptions,
    ) -> AppResult<()> {
        let started = Instant::now();
        loop {
            match self.eval_as::<bool>(predicate_js).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => debug!("等待 {} 时脚本执行失败: {}", condition, e),
            }

            if started.elapsed() >= wait.timeout {
                return Err(AppError::Timeout {
                    condition: condition.to_string(),
                    waited_ms: wait.timeout.as_millis(),
                });
            }
            sleep(wait.poll_interval).await;
        }
    }

    /// 等待当前 URL 包含指定片段
    pub async fn wait_for_url_contains(&self, fragment: &str, wait: WaitOptions) -> AppResult<()> {
        let js = format!(
            "window.location.href.includes({})",
            serde_json::to_string(fragment)?
        );
        self.wait_until(&format!("URL 包含 '{}'", fragment), &js, wait)
            .await
    }

    /// 等待选择器对应的元素出现
    pub async fn wait_for_selector(&self, selector: &str, wait: WaitOptions) -> AppResult<()> {
        let js = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        self.wait_until(&format!("元素 '{}' 出现", selector), &js, wait)
            .await
    }
}
