use crate::document::Document;
use regex::Regex;
use std::sync::LazyLock;

static TITLE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"imdb\.com/title/(tt[0-9]+)").expect("title link pattern should be valid")
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(tt[0-9]{6,10})\b").expect("id pattern should be valid"));

const EXTERNAL_LINK_SELECTOR: &str = "a.external";

/// IMDb title id referenced by a member page
///
/// Outbound external links are checked first; otherwise the raw markup is
/// scanned for a bare id. `None` simply means enrichment is skipped.
pub fn resolve_external_id(doc: &Document) -> Option<String> {
    let from_links = doc
        .attrs(EXTERNAL_LINK_SELECTOR, "href")
        .iter()
        .find_map(|href| TITLE_LINK.captures(href))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    if from_links.is_some() {
        return from_links;
    }

    BARE_ID
        .captures(doc.raw())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
