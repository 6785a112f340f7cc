//! # RPA Robot
//!
//! 一次运行完成网页和桌面两类自动化任务：
//! 登录演示站点并访问各个分区，在系统时钟应用中创建闹钟，
//! 分页采集图书目录，写入 SQLite 并导出 CSV。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 和等待能力
//! - `ClockSession` - 时钟应用窗口，只暴露"打开闹钟编辑器"
//! - `KeyboardNavigator` - 按顺序发送按键
//!
//! ### ② 业务能力层（Services）
//! - `AlarmPlanCompiler` - 把闹钟配置编译成按键序列（纯函数）
//! - `ErrorAggregator` - 收集错误并在结束时写出报告
//! - `BookStore` / `export_csv` / `RunHistory` - 持久化
//!
//! ### ③ 流程层（Workflow）
//! - `WebFlow` - 登录、访问分区
//! - `AlarmWorkflow` - 创建单个闹钟
//! - `PaginationScraper` - 逐页采集图书
//!
//! ### ④ 编排层（Orchestration）
//! - `WorkflowRunner` - 按顺序执行阶段，隔离单阶段失败
//! - `App` - 应用入口
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use models::{AlarmSpec, BookRecord, Section};
pub use orchestrator::{App, RunSummary, WorkflowRunner};
pub use services::{AlarmPlanCompiler, ErrorAggregator};
