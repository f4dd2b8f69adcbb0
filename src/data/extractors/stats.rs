//! Per-side statistics tables
//!
//! A side's statistics group holds three parallel collections: the table
//! containers, the headings naming them, and optional tab labels. Tables are
//! bound only when containers and headings line up one to one.

use super::selector;
use crate::data::ledger::LedgerValue;
use crate::data::record::StatsEntry;
use crate::data::table::{normalize_text, Table};
use crate::{Layout, MatchRecord, Result, Side};
use scraper::{ElementRef, Html, Selector};

/// Heading filter: statistics and shot tables, but not the team summary
pub fn is_stats_heading(heading: &str) -> bool {
    (heading.contains("Stats") || heading.contains("Shots")) && !heading.contains("Team Stats")
}

pub struct StatsExtractor<'a> {
    document: &'a Html,
    groups: Selector,
    containers: Selector,
    table: Selector,
    headings: Selector,
    tabs: Selector,
    stats_missing: u32,
    table_names_missing: u32,
    tab_names_missing: u32,
}

impl<'a> StatsExtractor<'a> {
    pub fn new(document: &'a Html, layout: &Layout) -> Result<Self> {
        Ok(StatsExtractor {
            document,
            groups: selector(&layout.stats_groups)?,
            containers: selector(&layout.stats_tables)?,
            table: selector("table")?,
            headings: selector(&layout.stats_headings)?,
            tabs: selector(&layout.stats_tabs)?,
            stats_missing: 0,
            table_names_missing: 0,
            tab_names_missing: 0,
        })
    }

    pub fn stats_missing(&self) -> u32 {
        self.stats_missing
    }

    pub fn table_names_missing(&self) -> u32 {
        self.table_names_missing
    }

    pub fn tab_names_missing(&self) -> u32 {
        self.tab_names_missing
    }

    /// Reconcile and bind one side's statistics tables.
    ///
    /// Every call appends its counters to the record's diagnostics, tagged
    /// with the side. A container/heading count mismatch rejects the whole
    /// set and leaves `record.stats[side]` as it was.
    pub fn extract_stats(&mut self, record: &mut MatchRecord, side: Side) {
        let group = self.document.select(&self.groups).nth(side.index());

        let containers: Vec<ElementRef<'a>> = group
            .map(|g| g.select(&self.containers).collect())
            .unwrap_or_default();
        let table_names: Vec<String> = group
            .map(|g| {
                g.select(&self.headings)
                    .map(|h| normalize_text(h.text()))
                    .filter(|h| is_stats_heading(h))
                    .collect()
            })
            .unwrap_or_default();
        let tab_names: Vec<String> = group
            .map(|g| g.select(&self.tabs).map(|t| normalize_text(t.text())).collect())
            .unwrap_or_default();

        let debug = &mut record.debug;
        let stats_missing = self.count_missing(containers.is_empty(), Anomaly::Stats);
        let table_names_missing = self.count_missing(table_names.is_empty(), Anomaly::TableNames);
        let tab_names_missing = self.count_missing(tab_names.is_empty(), Anomaly::TabNames);
        debug.append_for(side, "stats_missing", LedgerValue::Count(stats_missing));
        debug.append_for(side, "table_names_missing", LedgerValue::Count(table_names_missing));
        debug.append_for(side, "tab_names_missing", LedgerValue::Count(tab_names_missing));
        debug.append_for(side, "table_names", LedgerValue::Names(table_names.clone()));
        debug.append_for(side, "tab_names", LedgerValue::Names(tab_names.clone()));

        let tabs_mismatch = tab_names.len() != table_names.len();
        debug.append_for(
            side,
            "tab_names_length_miss",
            LedgerValue::Count(tabs_mismatch as u64),
        );

        if containers.len() != table_names.len() {
            log::warn!(
                "{} stats rejected: {} tables but {} headings",
                side,
                containers.len(),
                table_names.len()
            );
            debug.append_for(side, "stats_components_length_miss", LedgerValue::Count(1));
            return;
        }
        debug.append_for(side, "stats_components_length_miss", LedgerValue::Count(0));

        let mut tab_names = tab_names.into_iter();
        let stats: Vec<StatsEntry> = containers
            .iter()
            .zip(table_names)
            .map(|(container, table_name)| StatsEntry {
                table_name,
                tab_name: tab_names.next(),
                table: self.convert(container),
            })
            .collect();

        log::debug!("{} stats: {} tables", side, stats.len());
        record.set_stats(side, stats);
    }

    /// The container's own table, or the container itself if it is one
    fn convert(&self, container: &ElementRef) -> Table {
        if container.value().name() == "table" {
            return Table::from_element(container);
        }
        container
            .select(&self.table)
            .next()
            .map(|t| Table::from_element(&t))
            .unwrap_or_default()
    }

    fn count_missing(&mut self, missing: bool, anomaly: Anomaly) -> u64 {
        if !missing {
            return 0;
        }
        let counter = match anomaly {
            Anomaly::Stats => &mut self.stats_missing,
            Anomaly::TableNames => &mut self.table_names_missing,
            Anomaly::TabNames => &mut self.tab_names_missing,
        };
        *counter += 1;
        log::warn!("Missing {}", anomaly.describe());
        1
    }
}

#[derive(Debug, Clone, Copy)]
enum Anomaly {
    Stats,
    TableNames,
    TabNames,
}

impl Anomaly {
    fn describe(&self) -> &'static str {
        match self {
            Anomaly::Stats => "stats tables",
            Anomaly::TableNames => "stats table names",
            Anomaly::TabNames => "stats tab names",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{page, stats_group};
    use super::*;

    fn extract(body: &str, side: Side) -> (MatchRecord, StatsCounts) {
        let document = Html::parse_document(&page(body));
        let mut extractor = StatsExtractor::new(&document, &Layout::default()).unwrap();
        let mut record = MatchRecord::new();
        extractor.extract_stats(&mut record, side);
        let counts = StatsCounts {
            stats: extractor.stats_missing(),
            table_names: extractor.table_names_missing(),
            tab_names: extractor.tab_names_missing(),
        };
        (record, counts)
    }

    #[derive(Debug, PartialEq)]
    struct StatsCounts {
        stats: u32,
        table_names: u32,
        tab_names: u32,
    }

    #[test]
    fn test_heading_filter() {
        assert!(is_stats_heading("Arsenal Player Stats"));
        assert!(is_stats_heading("Shots"));
        assert!(!is_stats_heading("Team Stats"));
        assert!(!is_stats_heading("Arsenal Team Stats Extra"));
        assert!(!is_stats_heading("Lineups"));
    }

    #[test]
    fn test_matching_counts_bind_triples() {
        let body = stats_group(
            &["Arsenal Player Stats", "Team Stats", "Arsenal Goalkeeper Stats", "Shots"],
            &["Summary", "Keeper", "All"],
            &["Gls", "Saves", "xG"],
        );
        let (record, counts) = extract(&body, Side::Home);
        let stats = &record.home.stats;

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].table_name, "Arsenal Player Stats");
        assert_eq!(stats[1].table_name, "Arsenal Goalkeeper Stats");
        assert_eq!(stats[2].table_name, "Shots");
        assert_eq!(stats[2].tab_name.as_deref(), Some("All"));
        assert_eq!(stats[1].table.columns(), &["Player", "Saves"]);
        assert_eq!(stats[0].table.get(0, "Gls"), Some("3"));
        assert_eq!(
            record.debug.count_for(Side::Home, "stats_components_length_miss"),
            Some(0)
        );
        assert_eq!(record.debug.count_for(Side::Home, "tab_names_length_miss"), Some(0));
        assert_eq!(
            counts,
            StatsCounts {
                stats: 0,
                table_names: 0,
                tab_names: 0
            }
        );
    }

    #[test]
    fn test_count_mismatch_rejects_binding() {
        let body = stats_group(
            &["Arsenal Player Stats", "Shots"],
            &["Summary", "All"],
            &["Gls", "Saves", "xG"],
        );
        let (record, _) = extract(&body, Side::Home);

        assert!(record.home.stats.is_empty());
        assert_eq!(
            record.debug.count_for(Side::Home, "stats_components_length_miss"),
            Some(1)
        );
    }

    #[test]
    fn test_tab_mismatch_does_not_block() {
        let body = stats_group(&["Arsenal Player Stats", "Shots"], &["Summary"], &["Gls", "xG"]);
        let (record, _) = extract(&body, Side::Home);

        assert_eq!(record.home.stats.len(), 2);
        assert_eq!(record.home.stats[1].tab_name, None);
        assert_eq!(record.debug.count_for(Side::Home, "tab_names_length_miss"), Some(1));
    }

    #[test]
    fn test_away_side_uses_second_group() {
        let body = [
            stats_group(&["Arsenal Player Stats"], &["Summary"], &["Gls"]),
            stats_group(&["Wolves Player Stats", "Shots"], &["Summary", "All"], &["Gls", "xG"]),
        ]
        .concat();
        let (record, _) = extract(&body, Side::Away);

        assert!(record.home.stats.is_empty());
        assert_eq!(record.away.stats.len(), 2);
        assert_eq!(record.away.stats[0].table_name, "Wolves Player Stats");
        assert_eq!(
            record.debug.last_for(Side::Away, "table_names"),
            Some(&LedgerValue::Names(vec![
                "Wolves Player Stats".to_string(),
                "Shots".to_string()
            ]))
        );
        assert_eq!(record.debug.last_for(Side::Home, "table_names"), None);
    }

    #[test]
    fn test_missing_inputs_are_tracked_independently() {
        let body = stats_group(&["Team Stats"], &[], &["Gls"]);
        let (record, counts) = extract(&body, Side::Home);

        assert_eq!(
            counts,
            StatsCounts {
                stats: 0,
                table_names: 1,
                tab_names: 1
            }
        );
        assert_eq!(record.debug.count_for(Side::Home, "stats_missing"), Some(0));
        assert_eq!(record.debug.count_for(Side::Home, "table_names_missing"), Some(1));
        assert_eq!(record.debug.count_for(Side::Home, "tab_names_missing"), Some(1));
        assert_eq!(
            record.debug.count_for(Side::Home, "stats_components_length_miss"),
            Some(1)
        );
    }

    #[test]
    fn test_missing_group_binds_nothing() {
        let (record, counts) = extract("<div class=\"scorebox\"></div>", Side::Away);

        assert!(record.away.stats.is_empty());
        assert_eq!(
            counts,
            StatsCounts {
                stats: 1,
                table_names: 1,
                tab_names: 1
            }
        );
        assert_eq!(
            record.debug.count_for(Side::Away, "stats_components_length_miss"),
            Some(0)
        );
    }
}
