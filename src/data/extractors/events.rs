//! In-game events: goals, cards, substitutions
//!
//! Each side's events sit in their own group of event nodes. A node names its
//! kind through the second class of a nested icon element and links one or two
//! players. Two-player nodes are split so every output event has one player:
//! a goal yields a separate assist, a substitution-in a separate
//! substitution-out.

use super::selector;
use crate::data::record::{Event, EventKind};
use crate::data::table::normalize_text;
use crate::{Error, Layout, MatchRecord, Result, Side};
use scraper::{ElementRef, Html, Selector};

/// Player name and profile link as found on an event node
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlayerRef {
    name: String,
    link: Option<String>,
}

/// One event node before flattening
#[derive(Debug, Clone)]
struct RawEvent {
    kind: EventKind,
    players: Vec<PlayerRef>,
    minute: String,
}

pub struct EventExtractor<'a> {
    document: &'a Html,
    groups: [Selector; 2],
    markers: [String; 2],
    icon: Selector,
    player: Selector,
    minute_delimiter: String,
    events_missing: u32,
}

impl<'a> EventExtractor<'a> {
    pub fn new(document: &'a Html, layout: &Layout) -> Result<Self> {
        Ok(EventExtractor {
            document,
            groups: [
                selector(&layout.home_events)?,
                selector(&layout.away_events)?,
            ],
            markers: [layout.home_events.clone(), layout.away_events.clone()],
            icon: selector(&layout.event_icon)?,
            player: selector(&layout.event_player)?,
            minute_delimiter: layout.minute_delimiter.clone(),
            events_missing: 0,
        })
    }

    /// Number of documents where no event group was found
    pub fn events_missing(&self) -> u32 {
        self.events_missing
    }

    /// Extract both sides' events into the record.
    ///
    /// A page without any event group is an anomaly, not an error: the counter
    /// and `events_missing` diagnostic are bumped and nothing is bound.
    pub fn extract_events(&mut self, record: &mut MatchRecord) -> Result<()> {
        let groups: Vec<Vec<ElementRef<'a>>> = Side::ALL
            .iter()
            .map(|side| self.document.select(&self.groups[side.index()]).collect())
            .collect();

        if groups.iter().all(Vec::is_empty) {
            log::warn!(
                "Missing events, verify selectors: {} and {}",
                self.markers[0],
                self.markers[1]
            );
            self.events_missing += 1;
            record.debug.append_count("events_missing", 1);
            return Ok(());
        }
        record.debug.append_count("events_missing", 0);

        // Read both sides before binding so a malformed node leaves no partial record
        let raw = groups
            .iter()
            .map(|nodes| nodes.iter().map(|node| self.read_node(node)).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<Vec<RawEvent>>>>()?;

        for (side, raw) in Side::ALL.into_iter().zip(raw) {
            let (events, dropped) = split_players(raw);
            if dropped > 0 {
                log::debug!("Dropped {} players on {} events", dropped, side);
            }
            log::debug!("{} events for {}", events.len(), side);
            record.set_events(side, events);
        }
        Ok(())
    }

    fn read_node(&self, node: &ElementRef) -> Result<RawEvent> {
        Ok(RawEvent {
            kind: self.event_kind(node)?,
            players: self.players(node),
            minute: self.minute(node),
        })
    }

    /// Second class of the icon node, e.g. `event_icon goal`
    fn event_kind(&self, node: &ElementRef) -> Result<EventKind> {
        let icon = node
            .select(&self.icon)
            .next()
            .ok_or_else(|| Error::MalformedNode("event node without an icon".to_string()))?;
        let token = icon
            .value()
            .attr("class")
            .and_then(|classes| classes.split_whitespace().nth(1))
            .ok_or_else(|| Error::MalformedNode("event icon without a type class".to_string()))?;
        Ok(EventKind::from_token(token))
    }

    fn players(&self, node: &ElementRef) -> Vec<PlayerRef> {
        node.select(&self.player)
            .map(|a| PlayerRef {
                name: normalize_text(a.text()),
                link: a.value().attr("href").map(str::to_string),
            })
            .collect()
    }

    /// Visible text up to the first minute delimiter
    fn minute(&self, node: &ElementRef) -> String {
        let text: String = node.text().map(str::trim).collect();
        text.split(self.minute_delimiter.as_str())
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Flatten raw nodes to one player per event.
///
/// Every node keeps its first player. The second player of a goal or
/// substitution-in becomes its own event at the same minute; these follow the
/// primary events in node order. Any other player is dropped and counted.
fn split_players(raw: Vec<RawEvent>) -> (Vec<Event>, usize) {
    let mut events = Vec::with_capacity(raw.len());
    let mut split_off = Vec::new();
    let mut dropped = 0;

    for node in raw {
        let mut players = node.players.into_iter();
        let first = players.next();
        let second = players.next();
        let mut extra = players.count();

        match (node.kind.second_player_kind(), second) {
            (Some(kind), Some(player)) => split_off.push(Event {
                kind,
                player_name: Some(player.name),
                player_link: player.link,
                minute: node.minute.clone(),
            }),
            (None, Some(_)) => extra += 1,
            (_, None) => {}
        }
        if extra > 0 {
            log::debug!(
                "Dropping {} extra players on {} at {}",
                extra,
                node.kind,
                node.minute
            );
            dropped += extra;
        }

        let (player_name, player_link) = match first {
            Some(p) => (Some(p.name), p.link),
            None => (None, None),
        };
        events.push(Event {
            kind: node.kind,
            player_name,
            player_link,
            minute: node.minute,
        });
    }

    events.extend(split_off);
    (events, dropped)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{event, page};
    use super::*;

    fn extract(body: &str) -> (MatchRecord, u32) {
        let document = Html::parse_document(&page(body));
        let mut extractor = EventExtractor::new(&document, &Layout::default()).unwrap();
        let mut record = MatchRecord::new();
        extractor.extract_events(&mut record).unwrap();
        (record, extractor.events_missing())
    }

    fn named(events: &[Event], kind: EventKind) -> Vec<(&str, &str)> {
        events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.player_name.as_deref().unwrap_or(""), e.minute.as_str()))
            .collect()
    }

    #[test]
    fn test_goal_with_assist_is_split() {
        let (record, _) = extract(&event(
            "a",
            "goal",
            "23",
            &[("Bukayo Saka", "/p/saka"), ("Ben White", "/p/white")],
        ));
        let events = &record.home.events;

        assert_eq!(events.len(), 2);
        assert_eq!(named(events, EventKind::Goal), vec![("Bukayo Saka", "23")]);
        assert_eq!(named(events, EventKind::Assist), vec![("Ben White", "23")]);
        assert_eq!(events[1].player_link.as_deref(), Some("/p/white"));
    }

    #[test]
    fn test_substitution_is_split() {
        let (record, _) = extract(&event(
            "b",
            "substitute_in",
            "67",
            &[("Pedro Neto", "/p/neto"), ("Hwang Hee-chan", "/p/hwang")],
        ));
        let events = &record.away.events;

        assert_eq!(named(events, EventKind::SubstituteIn), vec![("Pedro Neto", "67")]);
        assert_eq!(
            named(events, EventKind::SubstituteOut),
            vec![("Hwang Hee-chan", "67")]
        );
        assert!(record.home.events.is_empty());
    }

    #[test]
    fn test_single_player_nodes_are_not_split() {
        let body = [
            event("a", "goal", "12", &[("Kai Havertz", "/p/havertz")]),
            event("a", "substitute_in", "70", &[("Leandro Trossard", "/p/trossard")]),
            event("a", "yellow_card", "81", &[("Declan Rice", "/p/rice")]),
        ]
        .concat();
        let (record, _) = extract(&body);

        assert_eq!(record.home.events.len(), 3);
        assert!(record.home.events.iter().all(|e| e.kind != EventKind::Assist
            && e.kind != EventKind::SubstituteOut));
    }

    #[test]
    fn test_split_events_follow_primary_events() {
        let body = [
            event("a", "substitute_in", "46", &[("A", "/a"), ("B", "/b")]),
            event("a", "yellow_card", "50", &[("C", "/c")]),
            event("a", "goal", "77", &[("D", "/d"), ("E", "/e")]),
        ]
        .concat();
        let (record, _) = extract(&body);
        let kinds: Vec<&str> = record.home.events.iter().map(|e| e.kind.as_str()).collect();

        assert_eq!(
            kinds,
            vec!["substitute_in", "yellow_card", "goal", "substitute_out", "assist"]
        );
    }

    #[test]
    fn test_second_player_on_unsplit_kind_is_counted() {
        let raw = vec![
            RawEvent {
                kind: EventKind::Other("yellow_red_card".into()),
                players: vec![
                    PlayerRef { name: "A".into(), link: Some("/a".into()) },
                    PlayerRef { name: "B".into(), link: Some("/b".into()) },
                ],
                minute: "70".into(),
            },
            RawEvent {
                kind: EventKind::Goal,
                players: vec![
                    PlayerRef { name: "C".into(), link: None },
                    PlayerRef { name: "D".into(), link: None },
                    PlayerRef { name: "E".into(), link: None },
                ],
                minute: "75".into(),
            },
        ];
        let (events, dropped) = split_players(raw);

        assert_eq!(dropped, 2);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].player_name.as_deref(), Some("A"));
        assert_eq!(events[2].kind, EventKind::Assist);
        assert_eq!(events[2].player_name.as_deref(), Some("D"));
    }

    #[test]
    fn test_malformed_away_node_binds_no_side() {
        let body = [
            event("a", "goal", "10", &[("A", "/a")]),
            r#"<div class="event b"><div>20&rsquo;</div><a href="/b">B</a></div>"#.to_string(),
        ]
        .concat();
        let document = Html::parse_document(&page(&body));
        let mut extractor = EventExtractor::new(&document, &Layout::default()).unwrap();
        let mut record = MatchRecord::new();

        let err = extractor.extract_events(&mut record).unwrap_err();

        assert!(matches!(err, Error::MalformedNode(_)));
        assert!(record.home.events.is_empty());
        assert!(record.away.events.is_empty());
    }

    #[test]
    fn test_node_without_players_keeps_absent_player() {
        let (record, _) = extract(&event("a", "own_goal", "90+3", &[]));
        let ev = &record.home.events[0];

        assert_eq!(ev.kind, EventKind::Other("own_goal".into()));
        assert_eq!(ev.player_name, None);
        assert_eq!(ev.player_link, None);
        assert_eq!(ev.minute, "90+3");
    }

    #[test]
    fn test_missing_groups_are_counted_not_raised() {
        let (record, missing) = extract("<div class=\"scorebox\"></div>");

        assert_eq!(missing, 1);
        assert_eq!(record.debug.count("events_missing"), Some(1));
        assert!(record.home.events.is_empty() && record.away.events.is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let body = [
            event("a", "goal", "9", &[("A", "/a"), ("B", "/b")]),
            event("b", "red_card", "30", &[("C", "/c")]),
            event("b", "substitute_in", "60", &[("D", "/d"), ("E", "/e")]),
        ]
        .concat();
        let (first, _) = extract(&body);
        let (second, _) = extract(&body);

        for side in Side::ALL {
            let mut a = first.side(side).events.clone();
            let mut b = second.side(side).events.clone();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }
}
