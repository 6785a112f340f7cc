pub mod alarm_compiler;
pub mod book_store;
pub mod csv_export;
pub mod error_aggregator;
pub mod run_history;

pub use alarm_compiler::AlarmPlanCompiler;
pub use book_store::BookStore;
pub use csv_export::export_csv;
pub use error_aggregator::{ErrorAggregator, ErrorEntry, NO_ERRORS_SENTINEL};
pub use run_history::RunHistory;
