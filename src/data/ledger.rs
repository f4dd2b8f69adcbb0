//! Append-only named-value ledger
//!
//! Backs both the diagnostics channel and the reserved per-match info bag.
//! Entries are never overwritten: appending a name twice keeps both, and the
//! value of a name is the last one appended.

use crate::Side;
use serde::Serialize;

/// Value kinds a ledger entry can hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LedgerValue {
    Count(u64),
    Names(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub name: String,
    /// Set when the entry describes one team's section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub value: LedgerValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: &str, value: LedgerValue) {
        self.push(name, None, value);
    }

    pub fn append_for(&mut self, side: Side, name: &str, value: LedgerValue) {
        self.push(name, Some(side), value);
    }

    pub fn append_count(&mut self, name: &str, count: u64) {
        self.append(name, LedgerValue::Count(count));
    }

    fn push(&mut self, name: &str, side: Option<Side>, value: LedgerValue) {
        self.entries.push(LedgerEntry {
            name: name.to_string(),
            side,
            value,
        });
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last value appended under `name`, regardless of side
    pub fn last(&self, name: &str) -> Option<&LedgerValue> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    /// Last value appended under `name` for one side
    pub fn last_for(&self, side: Side, name: &str) -> Option<&LedgerValue> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.name == name && e.side == Some(side))
            .map(|e| &e.value)
    }

    /// Last count appended under `name`, if that entry is a count
    pub fn count(&self, name: &str) -> Option<u64> {
        match self.last(name)? {
            LedgerValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn count_for(&self, side: Side, name: &str) -> Option<u64> {
        match self.last_for(side, name)? {
            LedgerValue::Count(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_are_appended() {
        let mut ledger = Ledger::new();
        ledger.append_count("lineups_missing", 1);
        ledger.append_count("lineups_missing", 0);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.count("lineups_missing"), Some(0));
        assert_eq!(ledger.entries()[0].value, LedgerValue::Count(1));
    }

    #[test]
    fn test_side_lookup_skips_other_side() {
        let mut ledger = Ledger::new();
        ledger.append_for(Side::Home, "stats_missing", LedgerValue::Count(0));
        ledger.append_for(Side::Away, "stats_missing", LedgerValue::Count(1));

        assert_eq!(ledger.count_for(Side::Home, "stats_missing"), Some(0));
        assert_eq!(ledger.count_for(Side::Away, "stats_missing"), Some(1));
        assert_eq!(ledger.count("stats_missing"), Some(1));
    }

    #[test]
    fn test_count_of_non_count_value() {
        let mut ledger = Ledger::new();
        ledger.append("table_names", LedgerValue::Names(vec!["Shots".into()]));

        assert_eq!(ledger.count("table_names"), None);
        assert_eq!(ledger.count("missing"), None);
    }
}
