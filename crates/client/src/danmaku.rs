//! Danmaku (弹幕) collection for paid episodes matching a keyword.
//!
//! Every `<d>` element counts toward the total; only the first comment of each
//! user is kept. The user id is the 7th comma-separated field of the `p`
//! attribute.

use chrono::{DateTime, Local};
use jidanjia_core::{ListingId, UniqueSeq};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;

use crate::missevan::{MissevanError, SoundSummary};

/// Index of the user id inside the `p` attribute.
const USER_ID_FIELD: usize = 6;

/// Where danmaku come from.
#[async_trait::async_trait]
pub trait SoundSource: Send + Sync {
    /// One page of sound search results (1-based).
    async fn sound_page(&self, keyword: &str, page: u32, page_size: u32) -> Result<Vec<SoundSummary>, MissevanError>;

    /// Raw danmaku XML for one sound.
    async fn danmaku_xml(&self, sound_id: &ListingId) -> Result<String, MissevanError>;
}

/// One `<d>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Danmaku {
    /// `None` when the `p` attribute has fewer than 7 fields.
    pub user_id: Option<String>,
    pub text: String,
}

/// A user's first comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDanmaku {
    pub user_id: String,
    pub text: String,
}

/// Running totals across sounds.
#[derive(Debug, Default, Serialize)]
pub struct DanmakuTally {
    /// Every `<d>` seen, attributed or not.
    pub total: usize,
    /// First comment per user, in first-seen order.
    pub first_by_user: Vec<UserDanmaku>,
    #[serde(skip)]
    seen_users: UniqueSeq<String>,
}

impl DanmakuTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, items: Vec<Danmaku>) {
        self.total += items.len();
        for item in items {
            let Some(user_id) = item.user_id else { continue };
            if self.seen_users.insert(user_id.clone()) {
                self.first_by_user.push(UserDanmaku { user_id, text: item.text });
            }
        }
    }

    pub fn unique_users(&self) -> usize {
        self.seen_users.len()
    }

    /// User ids in first-seen order.
    pub fn users(&self) -> &[String] {
        self.seen_users.as_slice()
    }
}

/// Result of a keyword collection run.
#[derive(Debug, Serialize)]
pub struct DanmakuReport {
    pub keyword: String,
    pub sounds: Vec<SoundSummary>,
    pub tally: DanmakuTally,
    pub collected_at: DateTime<Local>,
}

fn user_id_of(start: &BytesStart<'_>) -> Option<String> {
    let attr = start.try_get_attribute("p").ok()??;
    let value = attr.unescape_value().ok()?;
    value.split(',').nth(USER_ID_FIELD).map(str::to_string)
}

/// Parse a danmaku XML document.
pub fn parse_danmaku(xml: &[u8]) -> Result<Vec<Danmaku>, MissevanError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<Danmaku> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"d" => {
                current = Some(Danmaku { user_id: user_id_of(&e), text: String::new() });
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"d" => {
                items.push(Danmaku { user_id: user_id_of(&e), text: String::new() });
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut item) = current {
                    item.text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut item) = current {
                    item.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"d" => {
                if let Some(item) = current.take() {
                    items.push(item);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(MissevanError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

/// Page through sound search and keep paid sounds whose title contains `keyword`.
///
/// Stops at the first short or failed page.
pub async fn collect_paid_sounds<S: SoundSource + ?Sized>(source: &S, keyword: &str, page_size: u32) -> Vec<SoundSummary> {
    let needle = keyword.trim().to_lowercase();
    let mut sounds = Vec::new();
    let mut page = 1;

    loop {
        let rows = match source.sound_page(keyword, page, page_size).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(page, error = %e, "sound search failed");
                break;
            }
        };
        let fetched = rows.len();

        sounds.extend(rows.into_iter().filter(|s| s.is_paid() && s.soundstr.to_lowercase().contains(&needle)));

        if fetched < page_size as usize {
            break;
        }
        page += 1;
    }

    tracing::info!(keyword, sounds = sounds.len(), "collected paid sounds");
    sounds
}

/// Fetch and tally danmaku for each sound. Failed sounds are logged and skipped.
pub async fn tally_danmaku<S: SoundSource + ?Sized>(source: &S, sounds: &[SoundSummary]) -> DanmakuTally {
    let mut tally = DanmakuTally::new();

    for sound in sounds {
        let xml = match source.danmaku_xml(&sound.id).await {
            Ok(xml) => xml,
            Err(e) => {
                tracing::warn!(sound = %sound.id, error = %e, "danmaku fetch failed");
                continue;
            }
        };

        match parse_danmaku(xml.as_bytes()) {
            Ok(items) => {
                tracing::debug!(sound = %sound.id, count = items.len(), "parsed danmaku");
                tally.absorb(items);
            }
            Err(e) => tracing::warn!(sound = %sound.id, error = %e, "danmaku parse failed"),
        }
    }

    tally
}

/// Collect paid sounds for `keyword` and tally their danmaku.
pub async fn collect_danmaku<S: SoundSource + ?Sized>(source: &S, keyword: &str, page_size: u32) -> DanmakuReport {
    let sounds = collect_paid_sounds(source, keyword, page_size).await;
    let tally = tally_danmaku(source, &sounds).await;

    tracing::info!(total = tally.total, users = tally.unique_users(), "danmaku collected");
    DanmakuReport { keyword: keyword.trim().to_string(), sounds, tally, collected_at: Local::now() }
}
