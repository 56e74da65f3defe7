//! CSV export of analyzed records and danmaku tallies.
//!
//! Files start with a UTF-8 byte-order mark so spreadsheet tools pick the right
//! encoding. Unknown counts render as `未知`, never as 0.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use jidanjia_core::{Error, MetadataRecord};

use crate::danmaku::DanmakuTally;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rendering of an unknown value.
pub const UNKNOWN_CELL: &str = "未知";

pub const RECORD_HEADERS: [&str; 12] = [
    "剧名",
    "剧ID",
    "总集数（含番外）",
    "正剧集数",
    "付费集数",
    "总价（元）",
    "集均价（元）",
    "付费集单价（元）",
    "出品方",
    "猫耳出品",
    "类型",
    "封面日期",
];

pub const DANMAKU_HEADERS: [&str; 2] = ["用户ID", "首次弹幕内容"];

fn count_cell(value: Option<u32>) -> String {
    value.map_or_else(|| UNKNOWN_CELL.to_string(), |v| v.to_string())
}

/// Cells for one record, in [`RECORD_HEADERS`] order.
pub fn record_row(record: &MetadataRecord) -> Vec<String> {
    let producers = if record.producers.producers.is_empty() {
        UNKNOWN_CELL.to_string()
    } else {
        record.producers.joined("；")
    };

    vec![
        record.name.clone(),
        record.id.to_string(),
        count_cell(record.episodes.total_episodes),
        count_cell(record.episodes.main_episodes),
        count_cell(record.episodes.paid_episodes),
        format!("{:.2}", record.pricing.total_price_rounded()),
        record.pricing.avg_price_per_episode.to_string(),
        record.pricing.unit_price_per_paid_episode.to_string(),
        producers,
        if record.producers.platform_flag { "是" } else { "否" }.to_string(),
        record.category.label().to_string(),
        record.cover_date.clone(),
    ]
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W, I, S>(out: &mut W, cells: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line = cells.into_iter().map(|c| escape_field(c.as_ref()).into_owned()).collect::<Vec<_>>().join(",");
    out.write_all(line.as_bytes())?;
    out.write_all(b"\r\n")
}

/// Write records as CSV (header included, no BOM).
pub fn write_records<W: Write>(out: &mut W, records: &[MetadataRecord]) -> Result<(), Error> {
    write_row(out, RECORD_HEADERS)?;
    for record in records {
        write_row(out, record_row(record))?;
    }
    Ok(())
}

/// Write a danmaku tally as CSV (header included, no BOM).
pub fn write_danmaku<W: Write>(out: &mut W, tally: &DanmakuTally) -> Result<(), Error> {
    write_row(out, DANMAKU_HEADERS)?;
    for entry in &tally.first_by_user {
        write_row(out, [entry.user_id.as_str(), entry.text.as_str()])?;
    }
    Ok(())
}

fn create_with_bom(path: &Path) -> Result<BufWriter<File>, Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(BOM)?;
    Ok(out)
}

/// Export records to `path`.
pub fn export_records(path: &Path, records: &[MetadataRecord]) -> Result<(), Error> {
    let mut out = create_with_bom(path)?;
    write_records(&mut out, records)?;
    out.flush()?;
    tracing::info!(path = %path.display(), rows = records.len(), "exported records");
    Ok(())
}

/// Export a danmaku tally to `path`.
pub fn export_danmaku(path: &Path, tally: &DanmakuTally) -> Result<(), Error> {
    let mut out = create_with_bom(path)?;
    write_danmaku(&mut out, tally)?;
    out.flush()?;
    tracing::info!(path = %path.display(), rows = tally.first_by_user.len(), "exported danmaku");
    Ok(())
}
