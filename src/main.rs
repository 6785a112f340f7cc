use anyhow::Result;
use rpa_robot::utils::logging;
use rpa_robot::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(&config.log_dir, config.verbose_logging)?;

    // 初始化并运行应用
    let summary = App::initialize(config).await?.run().await?;

    if summary.aborted {
        anyhow::bail!("无法建立会话，运行已终止");
    }
    Ok(())
}
