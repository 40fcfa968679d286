pub mod external_id;
pub mod fields;
pub mod rating;
pub mod year;

#[cfg(test)]
mod tests;

use crate::document::Document;
use crate::results::Record;
use serde::{Deserialize, Serialize};

/// Acceptable infobox header labels for each extracted field
///
/// Each list is ordered; the first label with a matching row wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoboxLabels {
    #[serde(default = "default_genre_labels")]
    pub genre: Vec<String>,

    #[serde(default = "default_director_labels")]
    pub director: Vec<String>,

    #[serde(default = "default_country_labels")]
    pub country: Vec<String>,

    #[serde(default = "default_year_labels")]
    pub year: Vec<String>,
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_genre_labels() -> Vec<String> {
    labels(&["Жанр", "Жанры"])
}

fn default_director_labels() -> Vec<String> {
    labels(&["Режиссёр", "Режиссер", "Режиссёры"])
}

fn default_country_labels() -> Vec<String> {
    labels(&["Страна", "Страны"])
}

fn default_year_labels() -> Vec<String> {
    labels(&["Год", "Год выхода", "Премьера"])
}

impl Default for InfoboxLabels {
    fn default() -> Self {
        Self {
            genre: default_genre_labels(),
            director: default_director_labels(),
            country: default_country_labels(),
            year: default_year_labels(),
        }
    }
}

/// Build a record from a member page; the rating is left empty
pub fn extract_record(doc: &Document, labels: &InfoboxLabels) -> Record {
    Record {
        title: fields::extract_title(doc),
        genre: fields::extract_infobox_value(doc, &labels.genre),
        director: fields::extract_infobox_value(doc, &labels.director),
        country: fields::extract_infobox_value(doc, &labels.country),
        year: year::resolve_year(doc, &labels.year),
        rating: String::new(),
    }
}
