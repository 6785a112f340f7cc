//! 网页流程 - 流程层
//!
//! 登录、访问各个分区、打开图书目录。只依赖 JsExecutor 暴露的能力。

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{JsExecutor, WaitOptions};
use crate::models::Section;

const LOGIN_BUTTON_CLICKABLE_JS: &str = r#"(() => {
    const btn = document.querySelector('#login');
    if (!btn || btn.disabled) return false;
    const rect = btn.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
})()"#;

const DOCUMENT_READY_JS: &str = "document.readyState === 'complete'";

/// 登录凭据
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 网页流程
pub struct WebFlow {
    base_url: String,
    login_path: String,
    books_path: String,
    profile_url_marker: String,
    wait: WaitOptions,
}

impl WebFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            books_path: config.books_path.clone(),
            profile_url_marker: config.profile_url_marker.clone(),
            wait: WaitOptions::new(config.wait_timeout, config.poll_interval),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 登录；失败属于连接错误
    pub async fn login(&self, executor: &JsExecutor, credentials: &Credentials) -> AppResult<()> {
        info!("🔐 开始登录");
        self.try_login(executor, credentials)
            .await
            .map_err(|e| AppError::connection(format!("登录失败: {}", e)))?;
        info!("✓ 登录成功");
        Ok(())
    }

    async fn try_login(&self, executor: &JsExecutor, credentials: &Credentials) -> AppResult<()> {
        let page = executor.page();
        let url = self.url(&self.login_path);
        page.goto(url.as_str()).await?;

        executor.wait_for_selector("#userName", self.wait).await?;
        page.find_element("#userName")
            .await?
            .click()
            .await?
            .type_str(&credentials.username)
            .await?;
        page.find_element("#password")
            .await?
            .click()
            .await?
            .type_str(&credentials.password)
            .await?;
        debug!("已填写用户名和密码");

        executor
            .eval("(() => { document.querySelector('#login').scrollIntoView(); return true; })()")
            .await?;
        executor
            .wait_until("登录按钮可点击", LOGIN_BUTTON_CLICKABLE_JS, self.wait)
            .await?;
        page.find_element("#login").await?.click().await?;

        executor
            .wait_for_url_contains(&self.profile_url_marker, self.wait)
            .await
    }

    /// 访问一个分区
    pub async fn interact_with_section(
        &self,
        executor: &JsExecutor,
        section: &Section,
    ) -> AppResult<()> {
        info!("🧭 访问分区 {}", section.name);
        let url = self.url(&section.path);
        executor.page().goto(url.as_str()).await?;
        executor
            .wait_until(
                &format!("分区 {} 加载完成", section.name),
                DOCUMENT_READY_JS,
                self.wait,
            )
            .await?;
        info!("✓ 分区 {} 访问完成", section.name);
        Ok(())
    }

    /// 打开图书目录
    pub async fn open_catalog(&self, executor: &JsExecutor) -> AppResult<()> {
        info!("📚 打开图书目录");
        let url = self.url(&self.books_path);
        executor.page().goto(url.as_str()).await?;
        Ok(())
    }

    pub fn wait(&self) -> WaitOptions {
        self.wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials {
            username: "robo".into(),
            password: "segredo".into(),
        };
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("robo"));
        assert!(!debug.contains("segredo"));
    }

    #[test]
    fn test_urls_are_joined_with_base() {
        let flow = WebFlow::new(&Config {
            base_url: "https://demoqa.com/".into(),
            ..Config::default()
        });
        assert_eq!(flow.url("/forms"), "https://demoqa.com/forms");
    }
}
