//! Extractors that populate a [`MatchRecord`] from a parsed report page
//!
//! Each extractor is built against one document, runs once against one
//! record, and writes only its own fields plus diagnostics entries.

pub mod events;
pub mod lineups;
pub mod links;
pub mod stats;

pub use events::EventExtractor;
pub use lineups::LineupExtractor;
pub use links::extract_report_links;
pub use stats::StatsExtractor;

use crate::{Error, Layout, MatchRecord, Result, Side};
use scraper::{Html, Selector};

/// Compile a selector from layout config
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Run every extractor against one report page into a fresh record.
///
/// Missing sections only show up in `record.debug`; an error means the page
/// broke an assumption about a node that was present.
pub fn extract_match(document: &Html, layout: &Layout) -> Result<MatchRecord> {
    let mut record = MatchRecord::new();

    EventExtractor::new(document, layout)?.extract_events(&mut record)?;
    LineupExtractor::new(document, layout)?.extract_lineups(&mut record);

    let mut stats = StatsExtractor::new(document, layout)?;
    for side in Side::ALL {
        stats.extract_stats(&mut record, side);
    }

    log::debug!(
        "Extracted {} + {} events, {} + {} stats tables",
        record.home.events.len(),
        record.away.events.len(),
        record.home.stats.len(),
        record.away.stats.len()
    );
    Ok(record)
}
