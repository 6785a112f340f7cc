//! 浏览器会话：连接已运行的浏览器，或自行启动一个

pub mod connection;
pub mod launch;

pub use connection::connect_to_browser_and_page;
pub use launch::launch_browser;

use chromiumoxide::Handler;
use futures::StreamExt;
use std::time::Duration;
use tracing::debug;

/// 建立会话后等待浏览器状态同步
const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// 在后台驱动 CDP 事件循环，连接断开时退出
fn spawn_handler(mut handler: Handler) {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("浏览器事件循环结束: {}", e);
                break;
            }
        }
    });
}
