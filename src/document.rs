use crate::utils::{collapse_whitespace, join_fragments};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched page as seen by the extractors
///
/// Wraps the parsed tree together with the raw markup so that selector
/// queries and regex fallbacks run against the same content. `scraper::Html`
/// is not `Send`, so a `Document` is built and dropped inside synchronous code.
pub struct Document {
    url: Option<Url>,
    raw: String,
    html: Html,
}

/// An `<a>` element reduced to its target and visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// One table row split into header (`th`) and value (`td`) text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub header: String,
    pub value: String,
}

impl Document {
    /// Parse markup fetched from `url`
    pub fn parse(url: &str, markup: &str) -> Self {
        Self {
            url: Url::parse(url).ok(),
            raw: markup.to_string(),
            html: Html::parse_document(markup),
        }
    }

    /// Page address, if it was a valid absolute URL
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The unparsed markup
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Every text node under every element matching `selector`, untrimmed
    pub fn fragments(&self, selector: &str) -> Vec<String> {
        let Some(selector) = compile(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .flat_map(|element| element.text())
            .map(|s| s.to_string())
            .collect()
    }

    /// Only the direct text children of each matching element, untrimmed
    ///
    /// Text inside nested elements (links, spans) is left out.
    pub fn own_fragments(&self, selector: &str) -> Vec<String> {
        let Some(selector) = compile(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .flat_map(|element| element.children())
            .filter_map(|node| node.value().as_text().map(|text| text.to_string()))
            .collect()
    }

    /// All text under the matching elements, joined and whitespace-collapsed
    pub fn text(&self, selector: &str) -> String {
        join_fragments(self.fragments(selector))
    }

    /// Values of `attr` on every element matching `selector`
    pub fn attrs(&self, selector: &str, attr: &str) -> Vec<String> {
        let Some(selector) = compile(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(|s| s.to_string())
            .collect()
    }

    /// Anchors matching `selector` that carry an href
    pub fn anchors(&self, selector: &str) -> Vec<Anchor> {
        let Some(selector) = compile(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                Some(Anchor {
                    href: href.to_string(),
                    text: element_text(&element),
                })
            })
            .collect()
    }

    /// Rows of every table matching `table_selector`, in document order
    pub fn table_rows(&self, table_selector: &str) -> Vec<TableRow> {
        let (Some(table), Some(row), Some(header), Some(value)) = (
            compile(table_selector),
            compile("tr"),
            compile("th"),
            compile("td"),
        ) else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for table in self.html.select(&table) {
            for tr in table.select(&row) {
                rows.push(TableRow {
                    header: join_fragments(tr.select(&header).map(|th| element_text(&th))),
                    value: join_fragments(tr.select(&value).map(|td| element_text(&td))),
                });
            }
        }
        rows
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            ::log::warn!("Invalid selector {:?}: {:?}", selector, e);
            None
        }
    }
}
