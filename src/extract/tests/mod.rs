mod rating_tests;

use crate::document::Document;

pub(super) const FILM_PAGE: &str = include_str!("fixtures/film_page.html");
pub(super) const FILM_PROSE_ONLY: &str = include_str!("fixtures/film_prose_only.html");
pub(super) const DIRECTOR_VARIANTS: &str = include_str!("fixtures/director_variants.html");
pub(super) const IMDB_TITLE: &str = include_str!("fixtures/imdb_title.html");
pub(super) const IMDB_BROKEN: &str = include_str!("fixtures/imdb_broken.html");

pub(super) fn wiki_doc(markup: &str) -> Document {
    Document::parse("https://ru.wikipedia.org/wiki/Брат_(фильм)", markup)
}
