//! Per-match record populated in place by the extractors

use super::ledger::Ledger;
use super::table::Table;
use crate::Side;
use serde::{Serialize, Serializer};
use std::fmt;

/// Kind of an in-game event, read from the event icon's type token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Goal,
    Assist,
    YellowCard,
    RedCard,
    SubstituteIn,
    SubstituteOut,
    /// Any other token (own goals, penalties, second yellows), kept verbatim
    Other(String),
}

impl EventKind {
    pub fn from_token(token: &str) -> Self {
        match token {
            "goal" => EventKind::Goal,
            "assist" => EventKind::Assist,
            "yellow_card" => EventKind::YellowCard,
            "red_card" => EventKind::RedCard,
            "substitute_in" => EventKind::SubstituteIn,
            "substitute_out" => EventKind::SubstituteOut,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Goal => "goal",
            EventKind::Assist => "assist",
            EventKind::YellowCard => "yellow_card",
            EventKind::RedCard => "red_card",
            EventKind::SubstituteIn => "substitute_in",
            EventKind::SubstituteOut => "substitute_out",
            EventKind::Other(token) => token,
        }
    }

    /// Kind of the event split off a two-player node of this kind
    pub fn second_player_kind(&self) -> Option<EventKind> {
        match self {
            EventKind::Goal => Some(EventKind::Assist),
            EventKind::SubstituteIn => Some(EventKind::SubstituteOut),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One atomic occurrence bound to at most one player
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Event {
    pub kind: EventKind,
    pub player_name: Option<String>,
    pub player_link: Option<String>,
    /// Raw minute token, e.g. "45+2"
    pub minute: String,
}

/// A statistics table with the heading and tab label it was matched to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsEntry {
    pub table_name: String,
    pub tab_name: Option<String>,
    pub table: Table,
}

/// Everything extracted for one team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideRecord {
    pub squad: Table,
    pub bench: Table,
    pub events: Vec<Event>,
    pub stats: Vec<StatsEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub home: SideRecord,
    pub away: SideRecord,
    /// Reserved for per-match scalar facts
    pub match_info: Ledger,
    /// Extraction anomalies and auxiliary scraped metadata
    pub debug: Ledger,
}

impl MatchRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &SideRecord {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideRecord {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// Replace a side's squad and bench wholesale
    pub fn set_lineup(&mut self, side: Side, squad: Table, bench: Table) {
        let record = self.side_mut(side);
        record.squad = squad;
        record.bench = bench;
    }

    pub fn set_events(&mut self, side: Side, events: Vec<Event>) {
        self.side_mut(side).events = events;
    }

    pub fn set_stats(&mut self, side: Side, stats: Vec<StatsEntry>) {
        self.side_mut(side).stats = stats;
    }
}
