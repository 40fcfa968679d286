use crate::document::Document;
use crate::extract::fields::extract_infobox_value;
use crate::utils::join_fragments;
use regex::Regex;
use std::sync::LazyLock;

// A 1900-2099 year that is not the head or tail of a longer digit run
static YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])(19[0-9]{2}|20[0-9]{2})(?:[^0-9]|$)")
        .expect("year pattern should be valid")
});

const PROSE_SELECTOR: &str = "div.mw-parser-output > p";

/// First standalone four-digit year in `text`
pub fn find_year(text: &str) -> Option<&str> {
    YEAR.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Release year from the infobox, falling back to the article's opening prose
pub fn resolve_year<S: AsRef<str>>(doc: &Document, variants: &[S]) -> String {
    let infobox = extract_infobox_value(doc, variants);
    if let Some(year) = find_year(&infobox) {
        return year.to_string();
    }

    // text held in links or nested markup inside a paragraph is not considered
    let prose = join_fragments(doc.own_fragments(PROSE_SELECTOR));
    find_year(&prose).map(str::to_string).unwrap_or_default()
}
