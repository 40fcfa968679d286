use serde::{Deserialize, Serialize};

/// One harvested movie row
///
/// Every field is a plain string. A value that could not be found on the
/// page is left empty rather than treated as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Article title taken from the page heading
    pub title: String,

    /// Genre(s) as listed in the infobox
    pub genre: String,

    /// Director(s) as listed in the infobox
    pub director: String,

    /// Production country
    pub country: String,

    /// Four-digit release year
    pub year: String,

    /// Rating from the enrichment site (empty unless enrichment succeeded)
    pub rating: String,
}

impl Record {
    /// Returns the record with its rating replaced
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }
}
