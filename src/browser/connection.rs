use crate::error::{AppError, AppResult};
use chromiumoxide::{Browser, Page};
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到已运行的浏览器并获取页面
///
/// 优先复用 URL 包含 `target_url` 的已有页面，否则新建页面并导航。
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
) -> AppResult<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {:?}", target_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::connection(format!("无法连接到浏览器 (端口: {}): {}", port, e))
    })?;
    debug!("浏览器连接成功");

    super::spawn_handler(handler);

    sleep(super::SETTLE_DELAY).await;

    let pages = browser.pages().await.map_err(AppError::connection)?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(url) = target_url {
        for p in pages.iter() {
            if let Ok(Some(page_url)) = p.url().await {
                if page_url.starts_with(url) {
                    info!("✓ 复用已有页面: {}", page_url);
                    return Ok((browser, p.clone()));
                }
            }
        }
        debug!("未找到匹配的页面，将创建新页面");
    }

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        AppError::connection(format!("创建页面失败: {}", e))
    })?;

    if let Some(url) = target_url {
        page.goto(url).await.map_err(|e| {
            error!("导航到 {} 失败: {}", url, e);
            AppError::connection(format!("导航到 {} 失败: {}", url, e))
        })?;
        info!("已导航到: {}", url);
    }

    Ok((browser, page))
}
