//! Catalog crawl: walk the drama listing and analyze every paid series.
//!
//! Pages are fetched in order until an empty page, a failed page or the page
//! cap. Each paid listing is reduced to its series title; the first time a
//! series is seen, every priced season whose name contains that title is looked
//! up and analyzed. Later listings of the same series are skipped.

use std::time::Duration;

use jidanjia_core::{AppConfig, Error, MetadataRecord, UniqueSeq, analyze_listing, clean_title};
use serde::Serialize;

use crate::missevan::{DramaSummary, MissevanError};

/// Where the crawler gets listings from.
#[async_trait::async_trait]
pub trait DramaSource: Send + Sync {
    /// One page of the full catalog (1-based).
    async fn drama_page(&self, page: u32, page_size: u32) -> Result<Vec<DramaSummary>, MissevanError>;

    /// Every listing matching a series title.
    async fn search_series(&self, title: &str) -> Result<Vec<DramaSummary>, MissevanError>;
}

/// Crawl pacing and limits.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_pages: u32,
    pub page_size: u32,
    /// Pause after each page.
    pub page_delay: Duration,
    /// Pause after each series lookup.
    pub item_delay: Duration,
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            page_size: config.page_size,
            page_delay: config.page_delay(),
            item_delay: config.item_delay(),
        }
    }
}

/// Outcome of a crawl.
#[derive(Debug, Default, Serialize)]
pub struct CrawlReport {
    pub records: Vec<MetadataRecord>,
    /// Pages that returned at least one listing.
    pub pages_fetched: u32,
    /// Paid listings skipped because their series was already processed.
    pub duplicate_series: usize,
    /// Series whose lookup request failed.
    pub failed_lookups: usize,
    /// Priced seasons the engine rejected.
    pub rejected_listings: usize,
}

/// Catalog crawler over any [`DramaSource`].
pub struct Crawler<S> {
    source: S,
    config: CrawlConfig,
}

impl<S: DramaSource> Crawler<S> {
    pub fn new(source: S, config: CrawlConfig) -> Self {
        Self { source, config }
    }

    /// Walk the catalog and analyze every paid series once.
    pub async fn run(&self) -> CrawlReport {
        let mut report = CrawlReport::default();
        let mut seen: UniqueSeq<String> = UniqueSeq::new();

        for page in 1..=self.config.max_pages {
            tracing::info!(page, "fetching drama page");

            let dramas = match self.source.drama_page(page, self.config.page_size).await {
                Ok(dramas) => dramas,
                Err(e) => {
                    tracing::warn!(page, error = %e, "drama page failed, stopping crawl");
                    break;
                }
            };

            if dramas.is_empty() {
                tracing::info!(page, "empty page, crawl complete");
                break;
            }
            report.pages_fetched += 1;

            for drama in dramas.iter().filter(|d| d.is_paid()) {
                let series = clean_title(&drama.name);
                if !seen.insert(series.clone()) {
                    report.duplicate_series += 1;
                    continue;
                }

                match self.lookup_series(&series).await {
                    Ok(lookup) => {
                        if lookup.records.is_empty() {
                            tracing::debug!(series = %series, "no priced seasons found");
                        }
                        report.rejected_listings += lookup.rejected;
                        report.records.extend(lookup.records);
                    }
                    Err(e) => {
                        tracing::warn!(series = %series, error = %e, "series lookup failed");
                        report.failed_lookups += 1;
                    }
                }

                tokio::time::sleep(self.config.item_delay).await;
            }

            if page == self.config.max_pages {
                tracing::info!(max_pages = self.config.max_pages, "reached page limit");
            }
            tokio::time::sleep(self.config.page_delay).await;
        }

        tracing::info!(
            records = report.records.len(),
            pages = report.pages_fetched,
            failed = report.failed_lookups,
            "crawl finished"
        );
        report
    }

    /// Analyze every priced season of one series.
    pub async fn lookup_series(&self, series: &str) -> Result<SeriesLookup, Error> {
        let candidates = self.source.search_series(series).await?;
        Ok(analyze_seasons(series, &candidates))
    }
}

/// Records for one series plus the count of seasons the engine rejected.
#[derive(Debug, Default, Serialize)]
pub struct SeriesLookup {
    pub records: Vec<MetadataRecord>,
    pub rejected: usize,
}

/// Keep priced candidates whose name contains `series` and analyze each one.
pub fn analyze_seasons(series: &str, candidates: &[DramaSummary]) -> SeriesLookup {
    let mut lookup = SeriesLookup::default();

    for candidate in candidates.iter().filter(|c| c.price > 0 && c.name.contains(series)) {
        match analyze_listing(&candidate.to_listing()) {
            Ok(record) => {
                tracing::info!(
                    name = %record.name,
                    main = ?record.episodes.main_episodes,
                    total_price = record.pricing.total_price_rounded(),
                    "analyzed season"
                );
                lookup.records.push(record);
            }
            Err(e) => {
                tracing::warn!(name = %candidate.name, error = %e, "listing rejected");
                lookup.rejected += 1;
            }
        }
    }

    lookup
}
