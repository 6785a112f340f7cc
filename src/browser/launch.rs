use crate::error::{AppError, AppResult};
use chromiumoxide::{Browser, BrowserConfig, Page};
use std::path::Path;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动浏览器并导航到指定 URL
pub async fn launch_browser(
    executable: Option<&str>,
    headless: bool,
    url: &str,
) -> AppResult<(Browser, Page)> {
    info!("🚀 启动浏览器 (无头模式: {})...", headless);
    debug!("目标 URL: {}", url);

    let mut builder = BrowserConfig::builder();
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = executable {
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-logging",
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            AppError::connection(format!("配置浏览器失败: {}", e))
        })?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::connection(format!("启动浏览器失败: {}", e))
    })?;
    debug!("浏览器启动成功");

    super::spawn_handler(handler);

    sleep(super::SETTLE_DELAY).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::connection(format!("创建页面失败: {}", e))
    })?;

    info!("✅ 浏览器已导航到: {}", url);
    Ok((browser, page))
}
