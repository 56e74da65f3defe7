//! Listing input and the assembled metadata record.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::category::{Category, classify};
use crate::cover::extract_cover_date;
use crate::episodes::{EpisodeCounts, extract_episode_counts};
use crate::pricing::{PricingInfo, PricingWarning, calculate_pricing};
use crate::producers::{ProducerSet, extract_producers};
use crate::text::normalize_abstract;
use crate::title::clean_title;

/// Listing identifier: numeric on the drama API, sometimes a string elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ListingId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingId::Numeric(id) => write!(f, "{id}"),
            ListingId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ListingId {
    fn from(id: u64) -> Self {
        ListingId::Numeric(id)
    }
}

/// A paid listing as supplied by the crawler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawListing {
    /// Listing name, possibly with a season suffix.
    pub name: String,
    pub id: ListingId,
    /// Price in diamonds (10 diamonds = 1 yuan).
    pub price_units: u64,
    /// Promotional abstract, may contain HTML.
    #[serde(default, alias = "abstract")]
    pub abstract_text: String,
    #[serde(default, alias = "cover")]
    pub cover_url: Option<String>,
}

/// Everything derived from one listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub name: String,
    /// Name with season/compilation suffix removed.
    pub series_title: String,
    pub id: ListingId,
    pub price_units: u64,
    #[serde(flatten)]
    pub episodes: EpisodeCounts,
    #[serde(flatten)]
    pub producers: ProducerSet,
    pub category: Category,
    #[serde(flatten)]
    pub pricing: PricingInfo,
    /// `YYYY-MM` from the cover URL, or `unknown`.
    pub cover_date: String,
    pub warnings: Vec<PricingWarning>,
}

/// Run the full extraction pipeline over one listing.
///
/// # Errors
///
/// - `InvalidInput` if the listing name is blank
/// - `FreeListing` if `price_units` is 0 (per-episode pricing is undefined)
pub fn analyze_listing(listing: &RawListing) -> Result<MetadataRecord, Error> {
    if listing.name.trim().is_empty() {
        return Err(Error::InvalidInput("listing name cannot be empty".into()));
    }
    if listing.price_units == 0 {
        return Err(Error::FreeListing(listing.name.clone()));
    }

    let text = normalize_abstract(&listing.abstract_text);

    let episodes = extract_episode_counts(&text);
    let producers = extract_producers(&text);
    let category = classify(&text);
    let pricing = calculate_pricing(listing.price_units, episodes.main_episodes, episodes.paid_episodes);
    let cover_date = extract_cover_date(listing.cover_url.as_deref());

    let warnings = pricing.warnings();
    for warning in &warnings {
        tracing::warn!(listing = %listing.name, id = %listing.id, "{warning}");
    }

    Ok(MetadataRecord {
        name: listing.name.clone(),
        series_title: clean_title(&listing.name),
        id: listing.id.clone(),
        price_units: listing.price_units,
        episodes,
        producers,
        category,
        pricing,
        cover_date,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episodes::EpisodeRule;
    use crate::pricing::PerEpisodePrice;

    fn listing(abstract_text: &str, price_units: u64) -> RawListing {
        RawListing {
            name: "某某 第二季".into(),
            id: ListingId::Numeric(12345),
            price_units,
            abstract_text: abstract_text.into(),
            cover_url: Some("https://static.maoercdn.com/dramacoversmini/202305/10/cover.jpg".into()),
        }
    }

    #[test]
    fn test_analyze_full_listing() {
        let raw = listing("<p>猫耳FM出品；</p><p>12集正剧，前2集限免</p>", 200);
        let record = analyze_listing(&raw).unwrap();

        assert_eq!(record.series_title, "某某");
        assert_eq!(record.episodes.main_episodes, Some(12));
        assert_eq!(record.episodes.paid_episodes, Some(10));
        assert_eq!(record.episodes.rule, Some(EpisodeRule::MainTagged));
        assert_eq!(record.producers.producers, vec!["猫耳FM出品".to_string()]);
        assert!(record.producers.platform_flag);
        assert_eq!(record.category, Category::RadioDrama);
        assert_eq!(record.pricing.total_price, 20.0);
        assert_eq!(record.pricing.unit_price_per_paid_episode, PerEpisodePrice::Value(2.0));
        assert_eq!(record.cover_date, "2023-05");
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_analyze_unknown_episodes_warns() {
        let record = analyze_listing(&listing("多人有声剧，敬请期待", 50)).unwrap();
        assert_eq!(record.category, Category::AudioDrama);
        assert_eq!(record.episodes.main_episodes, None);
        assert_eq!(record.pricing.avg_price_per_episode.sentinel(), 0.0);
        assert!(record.warnings.contains(&PricingWarning::MainEpisodesUnknown));
    }

    #[test]
    fn test_rejects_free_listing() {
        let result = analyze_listing(&listing("共10集", 0));
        assert!(matches!(result, Err(Error::FreeListing(_))));
    }

    #[test]
    fn test_rejects_blank_name() {
        let raw = RawListing { name: "  ".into(), ..listing("共10集", 10) };
        assert!(matches!(analyze_listing(&raw), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_idempotent_serialization() {
        let raw = listing("9集正剧，4集番外。共20集。某工作室制作，猫耳FM联合出品", 300);
        let first = serde_json::to_string(&analyze_listing(&raw).unwrap()).unwrap();
        let second = serde_json::to_string(&analyze_listing(&raw).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_json_shape() {
        let record = analyze_listing(&listing("共十二集", 120)).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 12345);
        assert_eq!(json["main_episodes"], 12);
        assert_eq!(json["total_episodes"], 12);
        assert_eq!(json["rule"], "numeral");
        assert_eq!(json["category"], "radio_drama");
        assert_eq!(json["avg_price_per_episode"], 1.0);
        assert!(json["producers"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_listing_deserialize_api_aliases() {
        let raw: RawListing = serde_json::from_str(
            r#"{"name":"某某","id":"abc","price_units":99,"abstract":"共3集","cover":"https://x/202101/a.jpg"}"#,
        )
        .unwrap();
        assert_eq!(raw.id, ListingId::Text("abc".into()));
        assert_eq!(raw.abstract_text, "共3集");
        assert_eq!(raw.cover_url.as_deref(), Some("https://x/202101/a.jpg"));
    }
}
