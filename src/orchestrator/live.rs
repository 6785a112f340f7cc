//! 真实环境下的阶段执行器
//!
//! 唯一持有 Browser、JsExecutor 和时钟窗口的地方。
//! 时钟应用在第一个闹钟阶段时才连接，之后复用。

use async_trait::async_trait;
use chromiumoxide::Browser;
use chrono::Local;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{ClockApp, JsExecutor, WaitOptions};
use crate::models::{AlarmSpec, BookRecord, Section};
use crate::orchestrator::stages::StageExecutor;
use crate::services::{export_csv, BookStore, ErrorAggregator, RunHistory};
use crate::workflow::{
    AlarmTiming, AlarmWorkflow, BrowserCatalog, Credentials, PaginationScraper, ScrapeOutcome,
    WebFlow, ALARM_STAGE,
};

/// 浏览器会话
struct WebSession {
    browser: Browser,
    executor: JsExecutor,
    /// 由本程序启动的浏览器在结束时关闭；连接的浏览器保持打开
    launched: bool,
}

/// 时钟应用连接状态
enum ClockState {
    Detached,
    Attached(ClockApp),
    /// 连接失败后不再重试，后续闹钟直接报告同一原因
    Unavailable(String),
}

pub struct LiveStages {
    config: Config,
    credentials: Credentials,
    web_flow: WebFlow,
    alarm_workflow: AlarmWorkflow,
    scraper: PaginationScraper,
    web: Option<WebSession>,
    clock: ClockState,
}

impl LiveStages {
    pub fn new(config: &Config) -> Self {
        let timing = AlarmTiming {
            open_delay: config.alarm_open_delay,
            save_delay: config.alarm_save_delay,
            inter_key_delay: config.inter_key_delay,
            locate_timeout: config.wait_timeout,
        };
        Self {
            config: config.clone(),
            credentials: Credentials {
                username: config.username.clone(),
                password: config.password.clone(),
            },
            web_flow: WebFlow::new(config),
            alarm_workflow: AlarmWorkflow::new(timing),
            scraper: PaginationScraper::new(WaitOptions::new(
                config.wait_timeout,
                config.poll_interval,
            )),
            web: None,
            clock: ClockState::Detached,
        }
    }

    fn executor(&self, stage: &str) -> AppResult<&JsExecutor> {
        self.web
            .as_ref()
            .map(|web| &web.executor)
            .ok_or_else(|| AppError::stage(stage, "浏览器会话不存在"))
    }

    /// 首次调用时连接时钟应用；失败原因会被缓存
    async fn ensure_clock(&mut self) {
        if let ClockState::Detached = self.clock {
            let attached =
                ClockApp::attach(self.config.clock_launch_delay, self.config.wait_timeout).await;
            self.clock = match attached {
                Ok(app) => ClockState::Attached(app),
                Err(e) => ClockState::Unavailable(e.to_string()),
            };
        }
    }
}

#[async_trait]
impl StageExecutor for LiveStages {
    async fn connect(&mut self) -> AppResult<()> {
        let login_url = self.config.url(&self.config.login_path);
        let (browser, page, launched) = match self.config.browser_debug_port {
            Some(port) => {
                let (browser, page) =
                    browser::connect_to_browser_and_page(port, Some(&login_url)).await?;
                (browser, page, false)
            }
            None => {
                let (browser, page) = browser::launch_browser(
                    self.config.chrome_executable.as_deref(),
                    self.config.headless,
                    &login_url,
                )
                .await?;
                (browser, page, true)
            }
        };

        let session = WebSession {
            browser,
            executor: JsExecutor::new(page),
            launched,
        };
        // 先保存会话，登录失败时也能在 close 中释放浏览器
        let session = self.web.insert(session);
        self.web_flow
            .login(&session.executor, &self.credentials)
            .await
    }

    async fn interact(&mut self, section: &Section) -> AppResult<()> {
        let executor = self.executor("interact")?;
        self.web_flow.interact_with_section(executor, section).await
    }

    async fn create_alarm(
        &mut self,
        spec: &AlarmSpec,
        errors: &mut ErrorAggregator,
    ) -> AppResult<bool> {
        self.ensure_clock().await;
        let clock = match &self.clock {
            ClockState::Attached(app) => app,
            ClockState::Unavailable(reason) => return Err(AppError::stage(ALARM_STAGE, reason)),
            ClockState::Detached => return Err(AppError::stage(ALARM_STAGE, "时钟应用未连接")),
        };
        Ok(self.alarm_workflow.create(clock, spec, errors).await)
    }

    async fn record_alarm_history(&mut self) -> AppResult<()> {
        RunHistory::with_path(&self.config.history_file)
            .record(Local::now())
            .map_err(|e| AppError::stage("alarm-history", format!("{:#}", e)))?;
        info!("🗒️ 已记录闹钟执行历史: {}", self.config.history_file);
        Ok(())
    }

    async fn scrape(&mut self, errors: &mut ErrorAggregator) -> AppResult<ScrapeOutcome> {
        let executor = self.executor("scrape")?;
        self.web_flow.open_catalog(executor).await?;
        let catalog = BrowserCatalog::new(executor);
        let outcome = self.scraper.collect(&catalog, errors).await;
        info!(
            "✓ 采集完成: {} 页, {} 条记录, {} 行失败",
            outcome.pages,
            outcome.records.len(),
            outcome.row_errors
        );
        Ok(outcome)
    }

    async fn store(&mut self, records: &[BookRecord]) -> AppResult<usize> {
        let db_path = PathBuf::from(&self.config.database_path);
        let books = records.to_vec();
        let written = tokio::task::spawn_blocking(move || -> AppResult<usize> {
            let mut store = BookStore::open(&db_path)?;
            store.insert_all(&books)
        })
        .await
        .map_err(|e| AppError::stage("store", e))??;
        info!("💾 已写入数据库 {} 条: {}", written, self.config.database_path);
        Ok(written)
    }

    async fn export(&mut self, records: &[BookRecord]) -> AppResult<()> {
        export_csv(std::path::Path::new(&self.config.csv_path), records)?;
        info!("📤 已导出 CSV {} 条: {}", records.len(), self.config.csv_path);
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut web) = self.web.take() {
            if web.launched {
                match web.browser.close().await {
                    Ok(_) => info!("浏览器已关闭"),
                    Err(e) => warn!("关闭浏览器失败: {}", e),
                }
            }
        }
    }
}
