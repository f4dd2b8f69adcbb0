//! Match report data
//!
//! Record model, tabular conversion, the diagnostics ledger, document sources,
//! and the extractors that populate a record from a parsed report.

pub mod extractors;
pub mod ledger;
pub mod record;
pub mod source;
pub mod table;

pub use ledger::{Ledger, LedgerEntry, LedgerValue};
pub use record::MatchRecord;
pub use source::{DocumentSource, FileSource, HttpSource};
pub use table::Table;
