//! Abstract text normalization.
//!
//! Listing abstracts arrive as HTML fragments. Every rule downstream works on the
//! plain text produced here: tags removed, entity references decoded.

use scraper::Html;

/// Strip markup and decode entities from a raw abstract.
///
/// Never fails: malformed markup is parsed best-effort by the HTML5 tokenizer and
/// whatever text nodes it yields are concatenated in document order. No whitespace
/// is inserted between adjacent elements.
pub fn normalize_abstract(raw: &str) -> String {
    if !raw.contains('<') && !raw.contains('&') {
        return raw.to_string();
    }

    let fragment = Html::parse_fragment(raw);
    fragment.root_element().text().collect()
}
