//! Starting elevens and benches

use super::selector;
use crate::data::table::Table;
use crate::{Layout, MatchRecord, Result, Side};
use scraper::{Html, Selector};
use std::ops::{Range, RangeFrom};

/// Rows of the starting eleven
const SQUAD_ROWS: Range<usize> = 0..11;
/// Row 11 is the "Bench" separator row and belongs to neither slice
const BENCH_ROWS: RangeFrom<usize> = 12..;

const LINEUP_COLUMNS: [&str; 2] = ["shirt_number", "player"];

pub struct LineupExtractor<'a> {
    document: &'a Html,
    tables: Selector,
    lineups_missing: u32,
}

impl<'a> LineupExtractor<'a> {
    pub fn new(document: &'a Html, layout: &Layout) -> Result<Self> {
        Ok(LineupExtractor {
            document,
            tables: selector(&layout.lineup_tables)?,
            lineups_missing: 0,
        })
    }

    pub fn lineups_missing(&self) -> u32 {
        self.lineups_missing
    }

    /// Bind squad and bench for each lineup table found, home first
    pub fn extract_lineups(&mut self, record: &mut MatchRecord) {
        let tables: Vec<_> = self.document.select(&self.tables).collect();
        if tables.is_empty() {
            log::warn!("Missing lineups");
            self.lineups_missing += 1;
            record.debug.append_count("lineups_missing", 1);
            return;
        }
        record.debug.append_count("lineups_missing", 0);

        if tables.len() != Side::ALL.len() {
            log::warn!("Expected 2 lineup tables, found {}", tables.len());
        }

        for (side, table) in Side::ALL.into_iter().zip(&tables) {
            let (squad, bench) = split_lineup(&Table::from_element(table));
            log::debug!("{} lineup: {} starting, {} bench", side, squad.len(), bench.len());
            record.set_lineup(side, squad, bench);
        }
    }
}

/// Partition a lineup table into starting eleven and bench
fn split_lineup(table: &Table) -> (Table, Table) {
    let squad = table.slice_rows(SQUAD_ROWS).with_columns(&LINEUP_COLUMNS);
    let bench = table
        .slice_rows(BENCH_ROWS.start..table.len())
        .with_columns(&LINEUP_COLUMNS);
    (squad, bench)
}
