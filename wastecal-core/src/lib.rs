//! Versioned, file-backed store for waste collection calendars.
//!
//! Each calendar year lives in its own JSON file. Edits go to a per-year
//! draft that shadows the committed file until it is committed (with a
//! timestamped backup of the old file) or reverted.
//!
//! - `year` and `event` hold the in-memory model
//! - `codec`, `durable` and `draft` deal with files
//! - `store` ties them together behind a single lock

pub mod codec;
pub mod config;
pub mod draft;
pub mod durable;
pub mod error;
pub mod event;
pub mod layout;
pub mod store;
pub mod year;

pub use crate::config::WastecalConfig;
pub use error::{StoreError, StoreResult};
pub use event::{Event, WasteType, parse_date};
pub use layout::DataLayout;
pub use store::{LoadReport, Mode, Store, StoreStatus};
pub use year::{District, EditOutcome, YearData};
