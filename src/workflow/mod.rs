pub mod alarm_flow;
pub mod pagination;
pub mod web_flow;

pub use alarm_flow::{AlarmTiming, AlarmWorkflow, ALARM_STAGE};
pub use pagination::{
    Activation, BrowserCatalog, CatalogSurface, LastPageSignal, NextControl, PaginationScraper,
    ScrapeOutcome, TerminationReason, SCRAPE_STAGE,
};
pub use web_flow::{Credentials, WebFlow};
