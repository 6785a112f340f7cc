//! 分页采集流程 - 流程层
//!
//! 逐页读取图书表格，单行失败只丢弃该行；
//! "下一页"按钮的状态按值返回，翻页结束是普通分支而不是异常。

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::{JsExecutor, WaitOptions};
use crate::models::{BookRecord, RawRow};
use crate::services::ErrorAggregator;

pub const SCRAPE_STAGE: &str = "scrape";

/// "下一页"按钮的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextControl {
    HasNext,
    Disabled,
    Absent,
}

/// 点击"下一页"的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Clicked,
    /// 按钮存在但被遮挡，点击落在其他元素上
    Intercepted,
}

/// 判定为最后一页的依据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastPageSignal {
    Disabled,
    // TODO: 遮挡可能只是短暂的浮层，目前与禁用同样处理，没有重试
    ClickIntercepted,
}

/// 翻页结束原因，都不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    PageNotReady,
    NoNextControl,
    LastPage(LastPageSignal),
}

impl TerminationReason {
    pub fn is_last_page(&self) -> bool {
        matches!(self, TerminationReason::LastPage(_))
    }
}

/// 图书目录页面
#[async_trait]
pub trait CatalogSurface: Send + Sync {
    /// 等待表格行出现
    async fn wait_for_rows(&self, wait: WaitOptions) -> AppResult<()>;

    /// 读取当前页全部原始行
    async fn read_rows(&self) -> AppResult<Vec<RawRow>>;

    /// 查询"下一页"按钮状态
    async fn next_control(&self) -> AppResult<NextControl>;

    /// 给当前页第一行打标记，用于判断翻页完成
    async fn mark_first_row(&self, marker: &str) -> AppResult<()>;

    /// 点击"下一页"
    async fn activate_next(&self) -> AppResult<Activation>;

    /// 等待带标记的行从文档中移除
    async fn wait_for_stale(&self, marker: &str, wait: WaitOptions) -> AppResult<()>;
}

/// 采集结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub records: Vec<BookRecord>,
    pub termination: TerminationReason,
    pub pages: usize,
    pub row_errors: usize,
}

/// 单次采集的临时状态
struct ScrapeSession {
    page_index: usize,
    records: Vec<BookRecord>,
    row_errors: usize,
}

impl ScrapeSession {
    fn finish(self, termination: TerminationReason) -> ScrapeOutcome {
        ScrapeOutcome {
            records: self.records,
            termination,
            pages: self.page_index,
            row_errors: self.row_errors,
        }
    }
}

/// 分页采集器
pub struct PaginationScraper {
    wait: WaitOptions,
}

impl PaginationScraper {
    pub fn new(wait: WaitOptions) -> Self {
        Self { wait }
    }

    /// 遍历全部页面，返回累计的记录和结束原因
    pub async fn collect<S: CatalogSurface + ?Sized>(
        &self,
        surface: &S,
        errors: &mut ErrorAggregator,
    ) -> ScrapeOutcome {
        let mut session = ScrapeSession {
            page_index: 0,
            records: Vec::new(),
            row_errors: 0,
        };

        let termination = loop {
            session.page_index += 1;
            let page = session.page_index;

            if let Err(e) = surface.wait_for_rows(self.wait).await {
                errors.add(SCRAPE_STAGE, format!("第 {} 页未就绪: {}", page, e));
                break TerminationReason::PageNotReady;
            }

            let rows = match surface.read_rows().await {
                Ok(rows) => rows,
                Err(e) => {
                    errors.add(SCRAPE_STAGE, format!("第 {} 页读取失败: {}", page, e));
                    break TerminationReason::PageNotReady;
                }
            };
            self.extract_rows(&mut session, &rows, errors);
            info!(
                "📄 第 {} 页处理完成，累计 {} 条记录",
                page,
                session.records.len()
            );

            match self.advance(surface, page, errors).await {
                Some(reason) => break reason,
                None => continue,
            }
        };

        match termination {
            TerminationReason::PageNotReady => {
                warn!("⚠️ 采集在第 {} 页提前结束", session.page_index)
            }
            TerminationReason::NoNextControl => info!("未找到\"下一页\"按钮，采集结束"),
            TerminationReason::LastPage(signal) => info!("已到达最后一页 ({:?})", signal),
        }

        session.finish(termination)
    }

    fn extract_rows(
        &self,
        session: &mut ScrapeSession,
        rows: &[RawRow],
        errors: &mut ErrorAggregator,
    ) {
        for (i, row) in rows.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            match row.extract(session.page_index, i + 1) {
                Ok(record) => {
                    debug!("  {}. {}", i + 1, record.title);
                    session.records.push(record);
                }
                Err(e) => {
                    session.row_errors += 1;
                    errors.add(SCRAPE_STAGE, format!("{}\nHTML: {}", e, e.html));
                }
            }
        }
    }

    /// 尝试翻到下一页；返回 `Some` 表示采集结束
    async fn advance<S: CatalogSurface + ?Sized>(
        &self,
        surface: &S,
        page: usize,
        errors: &mut ErrorAggregator,
    ) -> Option<TerminationReason> {
        let control = match surface.next_control().await {
            Ok(control) => control,
            Err(e) => {
                errors.add(SCRAPE_STAGE, format!("第 {} 页无法查询\"下一页\": {}", page, e));
                return Some(TerminationReason::PageNotReady);
            }
        };

        match control {
            NextControl::Absent => return Some(TerminationReason::NoNextControl),
            NextControl::Disabled => {
                return Some(TerminationReason::LastPage(LastPageSignal::Disabled))
            }
            NextControl::HasNext => {}
        }

        let marker = format!("page-{}", page);
        let turned = async {
            surface.mark_first_row(&marker).await?;
            match surface.activate_next().await? {
                Activation::Intercepted => return Ok(false),
                Activation::Clicked => {}
            }
            surface.wait_for_stale(&marker, self.wait).await?;
            Ok::<bool, AppError>(true)
        }
        .await;

        match turned {
            Ok(true) => {
                debug!("已翻到第 {} 页", page + 1);
                None
            }
            Ok(false) => Some(TerminationReason::LastPage(LastPageSignal::ClickIntercepted)),
            Err(e) => {
                errors.add(SCRAPE_STAGE, format!("第 {} 页翻页失败: {}", page, e));
                Some(TerminationReason::PageNotReady)
            }
        }
    }
}

// ========== 浏览器实现 ==========

const ROW_SELECTOR: &str = ".rt-tr-group";

const READ_ROWS_JS: &str = r#"
(() => Array.from(document.querySelectorAll('.rt-tr-group')).map(row => {
    const img = row.querySelector('img');
    const title = row.querySelector('span[id]');
    const cells = Array.from(row.querySelectorAll('div[class="rt-td"][role="gridcell"]'))
        .map(cell => cell.innerText.trim());
    return {
        image: img ? img.src : null,
        title: title ? title.innerText.trim() : null,
        cells: cells,
        html: row.outerHTML
    };
}))()
"#;

const FIND_NEXT_JS: &str =
    "Array.from(document.querySelectorAll('button')).find(b => b.textContent.trim() === 'Next')";

/// 基于浏览器页面的图书目录
pub struct BrowserCatalog<'a> {
    executor: &'a JsExecutor,
}

impl<'a> BrowserCatalog<'a> {
    pub fn new(executor: &'a JsExecutor) -> Self {
        Self { executor }
    }

    fn marker_selector(marker: &str) -> AppResult<String> {
        Ok(serde_json::to_string(&format!("[data-rpa-marker=\"{}\"]", marker))?)
    }
}

#[async_trait]
impl CatalogSurface for BrowserCatalog<'_> {
    async fn wait_for_rows(&self, wait: WaitOptions) -> AppResult<()> {
        self.executor.wait_for_selector(ROW_SELECTOR, wait).await
    }

    async fn read_rows(&self) -> AppResult<Vec<RawRow>> {
        self.executor.eval_as(READ_ROWS_JS).await
    }

    async fn next_control(&self) -> AppResult<NextControl> {
        let js = format!(
            r#"(() => {{
                const btn = {};
                if (!btn) return 'absent';
                return (btn.className.includes('disabled') || btn.disabled) ? 'disabled' : 'has_next';
            }})()"#,
            FIND_NEXT_JS
        );
        self.executor.eval_as(js).await
    }

    async fn mark_first_row(&self, marker: &str) -> AppResult<()> {
        let js = format!(
            r#"(() => {{
                const row = document.querySelector('{}');
                if (row) row.setAttribute('data-rpa-marker', {});
                return row !== null;
            }})()"#,
            ROW_SELECTOR,
            serde_json::to_string(marker)?
        );
        let marked: bool = self.executor.eval_as(js).await?;
        if !marked {
            return Err(AppError::stage(SCRAPE_STAGE, "当前页没有可标记的行"));
        }
        Ok(())
    }

    async fn activate_next(&self) -> AppResult<Activation> {
        let js = format!(
            r#"(() => {{
                const btn = {};
                if (!btn) return 'absent';
                btn.scrollIntoView({{ block: 'center' }});
                const rect = btn.getBoundingClientRect();
                const hit = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
                if (!hit || !(hit === btn || btn.contains(hit))) return 'intercepted';
                btn.click();
                return 'clicked';
            }})()"#,
            FIND_NEXT_JS
        );
        let result: String = self.executor.eval_as(js).await?;
        match result.as_str() {
            "clicked" => Ok(Activation::Clicked),
            "intercepted" => Ok(Activation::Intercepted),
            other => Err(AppError::stage(
                SCRAPE_STAGE,
                format!("\"下一页\"按钮在点击前消失 ({})", other),
            )),
        }
    }

    async fn wait_for_stale(&self, marker: &str, wait: WaitOptions) -> AppResult<()> {
        let js = format!(
            "document.querySelector({}) === null",
            Self::marker_selector(marker)?
        );
        self.executor
            .wait_until(&format!("第一行 '{}' 失效", marker), &js, wait)
            .await
    }
}
