//! 需要真实浏览器或桌面环境的测试，默认忽略
//!
//! 运行方式：`cargo test -- --ignored`

use rpa_robot::browser::connect_to_browser_and_page;
use rpa_robot::config::Config;
use rpa_robot::infrastructure::{ClockApp, JsExecutor};
use rpa_robot::models::Section;
use rpa_robot::services::ErrorAggregator;
use rpa_robot::workflow::{BrowserCatalog, PaginationScraper, WebFlow};

#[tokio::test]
#[ignore] // 需要以 --remote-debugging-port 启动的浏览器
async fn test_browser_connection() {
    let config = Config::from_env();
    let port = config.browser_debug_port.unwrap_or(9222);

    let (_browser, page) = connect_to_browser_and_page(port, Some(&config.base_url))
        .await
        .expect("连接浏览器失败");

    let url = page.url().await.expect("获取 URL 失败");
    assert!(url.is_some());
}

#[tokio::test]
#[ignore]
async fn test_visit_section_and_scrape_books() {
    let config = Config::from_env();
    let port = config.browser_debug_port.unwrap_or(9222);
    let (_browser, page) = connect_to_browser_and_page(port, Some(&config.base_url))
        .await
        .expect("连接浏览器失败");
    let executor = JsExecutor::new(page);
    let flow = WebFlow::new(&config);

    flow.interact_with_section(&executor, &Section::new("Elements", "/elements"))
        .await
        .expect("访问分区失败");

    flow.open_catalog(&executor).await.expect("打开图书目录失败");
    let mut errors = ErrorAggregator::new();
    let outcome = PaginationScraper::new(flow.wait())
        .collect(&BrowserCatalog::new(&executor), &mut errors)
        .await;

    assert!(!outcome.records.is_empty());
}

#[tokio::test]
#[ignore] // 仅 Windows，需要葡萄牙语界面的时钟应用
async fn test_attach_clock_app() {
    let config = Config::from_env();
    ClockApp::attach(config.clock_launch_delay, config.wait_timeout)
        .await
        .expect("无法连接时钟应用");
}
