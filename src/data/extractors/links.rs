//! Match report links on a dated results page
//!
//! Each results table belongs to one competition; its first link names the
//! competition and the "Match Report" links point at the individual reports.

use super::selector;
use crate::Result;
use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;
use std::collections::BTreeMap;

/// Report links keyed by `<League_Name>:<YYYY-MM-DD>`.
///
/// The league name is the first link's trimmed text with each whitespace run
/// replaced by one `_`, so "La   Liga" and "La Liga" share a key.
///
/// A later table with the same competition replaces the earlier one. Tables
/// without any link are skipped.
pub fn extract_report_links(
    document: &Html,
    date: NaiveDate,
) -> Result<BTreeMap<String, Vec<String>>> {
    let table_selector = selector("table")?;
    let link_selector = selector("a")?;
    let whitespace = Regex::new(r"\s+").unwrap();
    let suffix = format!(":{}", date.format("%Y-%m-%d"));

    let mut reports = BTreeMap::new();
    for table in document.select(&table_selector) {
        let links: Vec<_> = table.select(&link_selector).collect();
        let Some(first) = links.first() else {
            log::debug!("Skipping results table without links");
            continue;
        };

        let league = whitespace
            .replace_all(first.text().collect::<String>().trim(), "_")
            .into_owned();
        let hrefs: Vec<String> = links
            .iter()
            .filter(|a| a.text().collect::<String>().contains("Match Report"))
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        log::debug!("{}: {} match reports", league, hrefs.len());
        reports.insert(league + &suffix, hrefs);
    }

    log::info!("Found {} competitions on {}", reports.len(), date);
    Ok(reports)
}

/// Join a possibly relative report link onto the site base URL
pub fn report_url(base_url: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}
