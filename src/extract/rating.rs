use crate::document::Document;
use crate::fetch::FetchRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const LD_JSON_SELECTOR: &str = "script[type='application/ld+json']";

/// The secondary site that ratings are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSite {
    /// Title pages live at `{base_url}{id}/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `Accept-Language` with every rating request
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

fn default_base_url() -> String {
    "https://www.imdb.com/title/".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

impl Default for RatingSite {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            accept_language: default_accept_language(),
        }
    }
}

impl RatingSite {
    /// Canonical detail page for a title id
    pub fn detail_url(&self, id: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}/{}/", base, id)
    }

    /// Request for a detail page, with the site's language preference
    pub fn request_for_url(&self, url: &str) -> FetchRequest {
        FetchRequest::get(url).with_header("Accept-Language", &self.accept_language)
    }
}

#[derive(Debug, Error)]
enum RatingError {
    #[error("no structured data block")]
    MissingBlock,
    #[error("malformed structured data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no aggregateRating.ratingValue")]
    MissingRating,
}

/// Rating from the page's JSON-LD block, or an empty string
pub fn extract_rating(doc: &Document) -> String {
    match rating_from_document(doc) {
        Ok(rating) => rating,
        Err(e) => {
            let url = doc.url().map(|u| u.as_str()).unwrap_or("<unknown>");
            ::log::warn!("No rating on {}: {}", url, e);
            String::new()
        }
    }
}

fn rating_from_document(doc: &Document) -> Result<String, RatingError> {
    // Only the first block is considered; title pages carry exactly one
    let block = doc
        .fragments(LD_JSON_SELECTOR)
        .into_iter()
        .next()
        .filter(|text| !text.trim().is_empty())
        .ok_or(RatingError::MissingBlock)?;
    rating_from_json(&block)
}

fn rating_from_json(text: &str) -> Result<String, RatingError> {
    let data: Value = serde_json::from_str(text.trim())?;

    let holder = match &data {
        Value::Array(items) => items.iter().find(|item| item.get("aggregateRating").is_some()),
        other => Some(other),
    };

    let value = holder
        .and_then(|item| item.get("aggregateRating"))
        .and_then(|agg| agg.get("ratingValue"))
        .ok_or(RatingError::MissingRating)?;

    let rating = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(RatingError::MissingRating),
    };
    if rating.is_empty() {
        return Err(RatingError::MissingRating);
    }
    Ok(rating)
}
