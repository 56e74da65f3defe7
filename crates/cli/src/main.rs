mod cli;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use jidanjia_client::{CrawlConfig, Crawler, MissevanClient, collect_danmaku, export_danmaku, export_records};
use jidanjia_core::{AppConfig, RawListing, analyze_listing, clean_title};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// `analyze` accepts a single listing or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingInput {
    One(RawListing),
    Many(Vec<RawListing>),
}

fn parse_listings(text: &str) -> Result<Vec<RawListing>> {
    let input: ListingInput = serde_json::from_str(text).context("input is not a listing or a list of listings")?;
    Ok(match input {
        ListingInput::One(listing) => vec![listing],
        ListingInput::Many(listings) => listings,
    })
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn analyze(input: Option<&Path>, compact: bool) -> Result<()> {
    let listings = parse_listings(&read_input(input)?)?;

    let mut records = Vec::with_capacity(listings.len());
    for listing in &listings {
        match analyze_listing(listing) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(name = %listing.name, "skipped: {}", e),
        }
    }

    let json = if compact { serde_json::to_string(&records)? } else { serde_json::to_string_pretty(&records)? };
    println!("{json}");
    Ok(())
}

async fn crawl(mut config: AppConfig, output: Option<PathBuf>, max_pages: Option<u32>) -> Result<()> {
    if let Some(max_pages) = max_pages {
        anyhow::ensure!(max_pages > 0, "--max-pages must be at least 1");
        config.max_pages = max_pages;
    }
    let output = output.unwrap_or_else(|| config.output_path.clone());

    let client = MissevanClient::from_app_config(&config)?;
    let crawler = Crawler::new(client, CrawlConfig::from(&config));
    let report = crawler.run().await;

    export_records(&output, &report.records)?;

    println!(
        "{} records from {} pages ({} duplicate series, {} failed lookups, {} rejected) -> {}",
        report.records.len(),
        report.pages_fetched,
        report.duplicate_series,
        report.failed_lookups,
        report.rejected_listings,
        output.display()
    );
    Ok(())
}

fn default_danmaku_path(keyword: &str) -> PathBuf {
    PathBuf::from(format!("{}_首次弹幕.csv", keyword.trim()))
}

async fn danmaku(config: &AppConfig, keyword: &str, export: Option<Option<PathBuf>>) -> Result<()> {
    anyhow::ensure!(!keyword.trim().is_empty(), "keyword cannot be empty");

    let client = MissevanClient::from_app_config(config)?;
    let report = collect_danmaku(&client, keyword, config.sound_page_size).await;

    println!("keyword: {}", report.keyword);
    println!("paid sounds: {}", report.sounds.len());
    println!("danmaku total: {}", report.tally.total);
    println!("unique users: {}", report.tally.unique_users());

    if let Some(path) = export {
        let path = path.unwrap_or_else(|| default_danmaku_path(keyword));
        export_danmaku(&path, &report.tally)?;
        println!("exported -> {}", path.display());
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(Some(path))?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("jidanjia_core=debug,jidanjia_client=debug,jidanjia=debug")
        } else {
            EnvFilter::new("jidanjia_client=info,jidanjia=info,jidanjia_core=warn")
        }
    });

    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Title { name } => {
            println!("{}", clean_title(&name));
            Ok(())
        }
        Commands::Analyze { input, compact } => analyze(input.as_deref(), compact),
        Commands::Crawl { output, max_pages } => {
            let config = load_config(cli.config.as_deref())?;
            crawl(config, output, max_pages).await
        }
        Commands::Danmaku { keyword, export } => {
            let config = load_config(cli.config.as_deref())?;
            danmaku(&config, &keyword, export).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_single_and_many() {
        let one = parse_listings(r#"{"name": "某某", "id": 1, "price_units": 10, "abstract": "共2集"}"#).unwrap();
        assert_eq!(one.len(), 1);

        let many = parse_listings(
            r#"[{"name": "甲", "id": 1, "price_units": 10}, {"name": "乙", "id": "b2", "price_units": 20}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].name, "乙");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_listings("not json").is_err());
        assert!(parse_listings(r#"{"title": "missing fields"}"#).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.json");
        std::fs::write(&path, r#"{"name": "某某", "id": 1, "price_units": 10}"#).unwrap();

        let text = read_input(Some(&path)).unwrap();
        assert_eq!(parse_listings(&text).unwrap()[0].name, "某某");
    }

    #[test]
    fn test_danmaku_export_flag() {
        let cli = Cli::try_parse_from(["jidanjia", "danmaku", "某某", "--export"]).unwrap();
        let Commands::Danmaku { keyword, export } = cli.command else { panic!("expected danmaku") };
        assert_eq!(export, Some(None));
        assert_eq!(default_danmaku_path(&keyword), PathBuf::from("某某_首次弹幕.csv"));

        let cli = Cli::try_parse_from(["jidanjia", "danmaku", "某某", "--export", "out.csv"]).unwrap();
        let Commands::Danmaku { export, .. } = cli.command else { panic!("expected danmaku") };
        assert_eq!(export, Some(Some(PathBuf::from("out.csv"))));
    }
}
