use super::*;
use crate::extract::rating::extract_rating;

fn imdb_doc(markup: &str) -> Document {
    Document::parse("https://www.imdb.com/title/tt0118767/", markup)
}

#[test]
fn test_rating_from_first_block() {
    assert_eq!(extract_rating(&imdb_doc(IMDB_TITLE)), "7.8");
}

#[test]
fn test_truncated_block_gives_empty_rating() {
    assert_eq!(extract_rating(&imdb_doc(IMDB_BROKEN)), "");
}

#[test]
fn test_missing_block_gives_empty_rating() {
    assert_eq!(extract_rating(&imdb_doc("<html><body>Blocked</body></html>")), "");
}

#[test]
fn test_wiki_page_has_no_rating() {
    assert_eq!(extract_rating(&wiki_doc(FILM_PAGE)), "");
}
