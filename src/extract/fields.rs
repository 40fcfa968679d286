use crate::document::Document;

const TITLE_SELECTOR: &str = "h1#firstHeading";
const INFOBOX_SELECTOR: &str = "table[class*='infobox']";

/// Article title from the primary heading, or an empty string
pub fn extract_title(doc: &Document) -> String {
    doc.text(TITLE_SELECTOR)
}

/// Value of the first infobox row whose header contains one of `variants`
///
/// Variants are tried in order, so the order of the list (not the order of
/// rows in the table) decides between e.g. "Режиссёр" and "Режиссёры".
/// For one variant a row whose header equals it beats a row whose header
/// merely contains it. Rows with an empty value cell are skipped.
pub fn extract_infobox_value<S: AsRef<str>>(doc: &Document, variants: &[S]) -> String {
    let rows: Vec<_> = doc
        .table_rows(INFOBOX_SELECTOR)
        .into_iter()
        .filter(|row| !row.header.is_empty() && !row.value.is_empty())
        .collect();

    for variant in variants {
        let variant = variant.as_ref().trim();
        if variant.is_empty() {
            continue;
        }
        let found = rows
            .iter()
            .find(|row| row.header == variant)
            .or_else(|| rows.iter().find(|row| row.header.contains(variant)));
        if let Some(row) = found {
            return row.value.clone();
        }
    }
    String::new()
}
