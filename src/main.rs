//! Match report extraction CLI
//!
//! Finds match report links on dated results pages and extracts events,
//! lineups and statistics tables from each report.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use match_report::{Config, MatchRecord, Result};

#[derive(Parser)]
#[command(name = "match-report")]
#[command(about = "Extract events, lineups and stats from football match reports", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Site base URL joined with relative report links
    #[arg(long, env = "MATCH_DATA_BASIC_URL")]
    base_url: Option<String>,

    /// Results page URL; the date is appended
    #[arg(long, env = "MATCH_DATA_REPORTS_URL")]
    reports_url: Option<String>,

    /// Cache directory for HTML files
    #[arg(long)]
    cache: Option<String>,

    /// Use only cached files (no network requests)
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List match report links for one date
    Links {
        /// Results date (YYYY-MM-DD)
        #[arg(env = "START_DATE_SCRAPPING")]
        date: NaiveDate,
    },
    /// Extract a single match report
    Extract {
        /// Report URL or link relative to the base URL
        location: String,
        /// Output format
        #[arg(long, default_value = "summary")]
        format: OutputFormat,
    },
    /// Walk results pages day by day and extract every report found
    Crawl {
        /// First date to scrape (YYYY-MM-DD)
        #[arg(long, env = "START_DATE_SCRAPPING")]
        start_date: NaiveDate,
        /// Number of consecutive days
        #[arg(long, default_value = "1")]
        days: u32,
        /// Stop after this many reports
        #[arg(long)]
        limit: Option<usize>,
        /// Output format
        #[arg(long, default_value = "summary")]
        format: OutputFormat,
    },
    /// Extract every saved report in a directory in parallel
    ParseCache {
        /// Directory containing cached HTML files
        dir: String,
        /// Output format
        #[arg(long, default_value = "summary")]
        format: OutputFormat,
    },
    /// Write a default config file
    Init,
}

#[derive(Clone, Copy, Debug)]
enum OutputFormat {
    Summary,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use summary or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let mut config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(url) = cli.base_url {
        config.source.base_url = url;
    }
    if let Some(url) = cli.reports_url {
        config.source.reports_url = url;
    }
    if cli.cache.is_some() {
        config.source.cache_dir = cli.cache;
    }
    if cli.offline {
        config.source.offline = true;
    }

    let result = match cli.command {
        Commands::Links { date } => commands::links(&config, date),
        Commands::Extract { location, format } => commands::extract(&config, &location, format),
        Commands::Crawl {
            start_date,
            days,
            limit,
            format,
        } => commands::crawl(&config, start_date, days, limit, format),
        Commands::ParseCache { dir, format } => commands::parse_cache(&config, &dir, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use match_report::data::extractors::links::report_url;
    use match_report::data::extractors::extract_report_links;
    use match_report::data::{DocumentSource, HttpSource};
    use match_report::{extract_match, Side};
    use rayon::prelude::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to set the site URLs and page selectors", config_path);
        println!("  2. Run 'match-report links YYYY-MM-DD' to list match reports");
        println!("  3. Run 'match-report crawl --start-date YYYY-MM-DD' to extract them");

        Ok(())
    }

    fn report_links(
        config: &Config,
        source: &HttpSource,
        date: NaiveDate,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        let url = format!("{}{}", config.source.reports_url, date.format("%Y-%m-%d"));
        let document = source.document(&url)?;
        extract_report_links(&document, date)
    }

    pub fn links(config: &Config, date: NaiveDate) -> Result<()> {
        let source = HttpSource::new(&config.source)?;
        let reports = report_links(config, &source, date)?;

        if reports.is_empty() {
            println!("No results tables found for {}", date);
            return Ok(());
        }

        for (league, links) in &reports {
            println!("{} ({} reports)", league, links.len());
            for link in links {
                println!("  {}", report_url(&config.source.base_url, link));
            }
        }
        Ok(())
    }

    pub fn extract(config: &Config, location: &str, format: OutputFormat) -> Result<()> {
        let source = HttpSource::new(&config.source)?;
        let url = report_url(&config.source.base_url, location);
        let document = source.document(&url)?;
        let record = extract_match(&document, &config.layout)?;
        print_record(&url, &record, format)
    }

    pub fn crawl(
        config: &Config,
        start_date: NaiveDate,
        days: u32,
        limit: Option<usize>,
        format: OutputFormat,
    ) -> Result<()> {
        let source = HttpSource::new(&config.source)?;
        let mut extracted = 0usize;
        let mut failed = 0usize;

        for date in start_date.iter_days().take(days as usize) {
            log::info!("Fetching match reports for {}...", date);
            let reports = match report_links(config, &source, date) {
                Ok(reports) => reports,
                Err(e) => {
                    log::warn!("Failed to fetch results for {}: {}", date, e);
                    continue;
                }
            };

            for (league, links) in reports {
                log::info!("{}: {} reports", league, links.len());
                for link in links {
                    if limit.is_some_and(|max| extracted >= max) {
                        println!("Reached limit of {} reports", extracted);
                        return Ok(());
                    }

                    let url = report_url(&config.source.base_url, &link);
                    let record = source
                        .document(&url)
                        .and_then(|document| extract_match(&document, &config.layout));
                    match record {
                        Ok(record) => {
                            print_record(&url, &record, format)?;
                            extracted += 1;
                        }
                        Err(e) => {
                            log::warn!("Failed to extract {}: {}", url, e);
                            failed += 1;
                        }
                    }
                }
            }
        }

        println!("Extracted {} reports ({} failed)", extracted, failed);
        Ok(())
    }

    pub fn parse_cache(config: &Config, dir: &str, format: OutputFormat) -> Result<()> {
        println!("Parsing cached HTML files from {}...", dir);

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "html").unwrap_or(false) {
                paths.push(path);
            }
        }
        paths.sort();

        // Each worker owns its parsed page and record
        let results: Vec<(PathBuf, Result<MatchRecord>)> = paths
            .into_par_iter()
            .map(|path| {
                let record = std::fs::read_to_string(&path)
                    .map_err(Into::into)
                    .and_then(|html| {
                        let document = scraper::Html::parse_document(&html);
                        extract_match(&document, &config.layout)
                    });
                (path, record)
            })
            .collect();

        let mut failed = 0usize;
        for (path, record) in &results {
            match record {
                Ok(record) => print_record(&path.display().to_string(), record, format)?,
                Err(e) => {
                    log::warn!("  Failed {}: {}", path.display(), e);
                    failed += 1;
                }
            }
        }

        println!("Parsed {} files ({} failed)", results.len(), failed);
        Ok(())
    }

    fn print_record(location: &str, record: &MatchRecord, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "location": location, "record": record });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Summary => {
                println!("{}", location);
                println!("───────────────────────────────");
                for side in Side::ALL {
                    let team = record.side(side);
                    println!(
                        "  {:<5} squad {:>2}  bench {:>2}  events {:>2}  stats tables {:>2}",
                        side,
                        team.squad.len(),
                        team.bench.len(),
                        team.events.len(),
                        team.stats.len()
                    );
                }
                let anomalies: Vec<String> = record
                    .debug
                    .entries()
                    .iter()
                    .filter(|e| matches!(e.value, match_report::data::LedgerValue::Count(n) if n > 0))
                    .map(|e| match e.side {
                        Some(side) => format!("{} ({})", e.name, side),
                        None => e.name.clone(),
                    })
                    .collect();
                if !anomalies.is_empty() {
                    println!("  anomalies: {}", anomalies.join(", "));
                }
            }
        }
        Ok(())
    }
}
