//! Missevan API payload types.
//!
//! Every list endpoint wraps its rows as `{"info": {"Datas": [...]}}`. Numeric
//! fields are not typed consistently across endpoints, so `pay_type` and
//! `price` accept either a JSON number or a numeric string.

use jidanjia_core::{ListingId, RawListing};
use serde::{Deserialize, Deserializer, Serialize};

/// `pay_type` value of a per-episode paid listing.
pub const PAID_PAY_TYPE: u32 = 2;

/// Raw list envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub info: ApiInfo<T>,
}

/// Rows container inside the envelope.
#[derive(Debug, Deserialize)]
pub struct ApiInfo<T> {
    #[serde(rename = "Datas", default = "Vec::new")]
    pub datas: Vec<T>,
}

impl<T> Default for ApiInfo<T> {
    fn default() -> Self {
        Self { datas: Vec::new() }
    }
}

impl<T> ApiEnvelope<T> {
    pub fn into_rows(self) -> Vec<T> {
        self.info.datas
    }
}

/// One row from the drama filter or drama search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DramaSummary {
    pub id: ListingId,
    pub name: String,
    /// Price in diamonds.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub price: u64,
    #[serde(default, deserialize_with = "flexible_u32")]
    pub pay_type: u32,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
}

impl DramaSummary {
    pub fn is_paid(&self) -> bool {
        self.pay_type == PAID_PAY_TYPE
    }

    /// Listing input for the extraction engine.
    pub fn to_listing(&self) -> RawListing {
        RawListing {
            name: self.name.clone(),
            id: self.id.clone(),
            price_units: self.price,
            abstract_text: self.abstract_text.clone().unwrap_or_default(),
            cover_url: self.cover.clone(),
        }
    }
}

/// One row from the sound search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSummary {
    pub id: ListingId,
    #[serde(default)]
    pub soundstr: String,
    #[serde(default, deserialize_with = "flexible_u32")]
    pub pay_type: u32,
}

impl SoundSummary {
    pub fn is_paid(&self) -> bool {
        self.pay_type == PAID_PAY_TYPE
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
    Null(()),
}

impl NumberOrString {
    fn value(self) -> u64 {
        match self {
            NumberOrString::Number(n) => n,
            NumberOrString::Text(s) => s.trim().parse().unwrap_or(0),
            NumberOrString::Null(()) => 0,
        }
    }
}

fn flexible_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = NumberOrString::deserialize(deserializer)?.value();
    Ok(u32::try_from(value).unwrap_or(0))
}

fn flexible_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(NumberOrString::deserialize(deserializer)?.value())
}
