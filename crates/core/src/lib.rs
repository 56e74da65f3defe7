//! Core types and extraction engine for jidanjia.
//!
//! This crate provides:
//! - Abstract normalization and the episode-count rule cascade
//! - Chinese numeral conversion
//! - Producer, category and cover-date extraction
//! - Per-episode price derivation and record assembly
//! - Unified error types
//! - Configuration structures
//!
//! Everything here is synchronous and free of I/O; the same listing always
//! yields the same record.

pub mod category;
pub mod config;
pub mod cover;
pub mod episodes;
pub mod error;
pub mod numeral;
pub mod pricing;
pub mod producers;
pub mod record;
pub mod text;
pub mod title;
pub mod unique;

pub use category::{Category, classify};
pub use config::{AppConfig, ConfigError};
pub use cover::extract_cover_date;
pub use episodes::{EpisodeCounts, EpisodeRule, extract_episode_counts};
pub use error::Error;
pub use numeral::{NumeralError, parse_chinese_numeral};
pub use pricing::{PerEpisodePrice, PricingInfo, PricingWarning, calculate_pricing};
pub use producers::{ProducerSet, extract_producers};
pub use record::{ListingId, MetadataRecord, RawListing, analyze_listing};
pub use text::normalize_abstract;
pub use title::clean_title;
pub use unique::UniqueSeq;
