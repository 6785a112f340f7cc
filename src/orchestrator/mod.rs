//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `stages` - 阶段定义
//! - `Stage`：connect / interact / alarm / scrape / store / export
//! - `StageExecutor`：执行阶段的接缝，测试中可以替换
//!
//! ### `runner` - 工作流编排器
//! - 顺序执行阶段，除连接外单阶段失败不影响后续阶段
//! - 无论如何结束都只写一次错误报告
//!
//! ### `live` - 真实环境的执行器
//! - 持有 Browser、JsExecutor 和时钟窗口
//!
//! ### `app` - 应用入口
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! runner (Vec<Stage>) ── live (StageExecutor)
//!     ↓
//! workflow (web_flow / alarm_flow / pagination)
//!     ↓
//! services (compiler / aggregator / store / export)
//!     ↓
//! infrastructure (JsExecutor / ClockSession / KeyboardNavigator)
//! ```

pub mod app;
pub mod live;
pub mod runner;
pub mod stages;

pub use app::App;
pub use live::LiveStages;
pub use runner::{RunSummary, WorkflowRunner};
pub use stages::{RunPhase, Stage, StageExecutor};
