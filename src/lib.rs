//! Customer transaction dashboard.
//!
//! Loads a transaction table, filters it by year, customer segment and
//! industry, and summarises the result as KPIs, charts, a table and a short
//! insight text. The `data` and `view` modules hold the whole pipeline and
//! do not depend on egui; `app` and `ui` draw it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
pub mod view;

pub use data::cache::DatasetCache;
pub use data::filter::{filter, Selection};
pub use data::loader::{load_file, LoadedDataset, SourceOptions};
pub use data::model::{DayName, MonthName, RecordSet, TransactionRecord};
pub use error::{LoadError, ParseError};
pub use view::DashboardView;
