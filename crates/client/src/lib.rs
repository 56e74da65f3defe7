//! Client code for jidanjia.
//!
//! This crate provides the Missevan API client, the catalog crawler, danmaku
//! collection and CSV export shared by the server and CLI.

pub mod crawl;
pub mod danmaku;
pub mod export;
pub mod missevan;

pub use crawl::{CrawlConfig, CrawlReport, Crawler, DramaSource, SeriesLookup, analyze_seasons};
pub use danmaku::{DanmakuReport, DanmakuTally, SoundSource, UserDanmaku, collect_danmaku, parse_danmaku};
pub use export::{export_danmaku, export_records, record_row};
pub use missevan::{DramaSummary, MissevanClient, MissevanConfig, MissevanError, SoundSummary};
