use crate::document::Document;
use crate::error::FetchError;
use crate::extract::external_id::resolve_external_id;
use crate::extract::rating::{RatingSite, extract_rating};
use crate::extract::{InfoboxLabels, extract_record};
use crate::fetch::{FetchRequest, FetchedPage};
use crate::filter::{LinkFilter, LinkKind};
use crate::results::Record;
use crate::state::CrawlState;
use std::sync::Arc;
use url::Url;

const SUBCATEGORY_LINKS: &str = "#mw-subcategories a";
const MEMBER_LINKS: &str = "#mw-pages div.mw-category a";
const MEMBER_LINKS_FALLBACK: &str = "div.mw-category a";
const PAGINATION_LINKS: &str = "#mw-pages a";

/// A pending unit of work, consumed exactly once by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlTarget {
    Category { url: String },
    MemberPage { url: String },
    /// Rating lookup for a record whose fields are already extracted
    EnrichmentPage { url: String, record: Record },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Category,
    MemberPage,
    EnrichmentPage,
}

impl CrawlTarget {
    pub fn url(&self) -> &str {
        match self {
            CrawlTarget::Category { url }
            | CrawlTarget::MemberPage { url }
            | CrawlTarget::EnrichmentPage { url, .. } => url,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            CrawlTarget::Category { .. } => TargetKind::Category,
            CrawlTarget::MemberPage { .. } => TargetKind::MemberPage,
            CrawlTarget::EnrichmentPage { .. } => TargetKind::EnrichmentPage,
        }
    }
}

/// Why a target ended without producing a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    CapReached,
    FetchFailed,
}

/// Where a target ended up after its document was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// A category page was expanded into further targets
    Expanded,
    /// A member page was extracted and now waits for its rating
    Enriching,
    Emitted,
    Discarded(DiscardReason),
}

/// Outcome of handling one target
#[derive(Debug)]
pub struct Step {
    pub state: TargetState,
    pub targets: Vec<CrawlTarget>,
    pub record: Option<Record>,
}

impl Step {
    fn expanded(targets: Vec<CrawlTarget>) -> Self {
        Self {
            state: TargetState::Expanded,
            targets,
            record: None,
        }
    }

    fn emitted(record: Record) -> Self {
        Self {
            state: TargetState::Emitted,
            targets: Vec::new(),
            record: Some(record),
        }
    }

    fn enriching(target: CrawlTarget) -> Self {
        Self {
            state: TargetState::Enriching,
            targets: vec![target],
            record: None,
        }
    }

    fn discarded(reason: DiscardReason) -> Self {
        Self {
            state: TargetState::Discarded(reason),
            targets: Vec::new(),
            record: None,
        }
    }
}

/// Switches that shape the traversal
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub enrich_ratings: bool,
    pub follow_subcategories: bool,
    /// Link texts that identify the "next page" link of a category listing
    pub next_page_labels: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            enrich_ratings: false,
            follow_subcategories: true,
            next_page_labels: vec!["Следующая страница".to_string(), "next page".to_string()],
        }
    }
}

/// Decides, for every fetched document, what to emit and what to fetch next
///
/// All handlers are synchronous; the dispatcher calls them once a target's
/// document is available, in any order and from any task.
pub struct Engine {
    state: Arc<CrawlState>,
    filter: LinkFilter,
    labels: InfoboxLabels,
    rating_site: RatingSite,
    options: EngineOptions,
}

impl Engine {
    pub fn new(
        state: Arc<CrawlState>,
        filter: LinkFilter,
        labels: InfoboxLabels,
        rating_site: RatingSite,
        options: EngineOptions,
    ) -> Self {
        Self {
            state,
            filter,
            labels,
            rating_site,
            options,
        }
    }

    pub fn state(&self) -> &Arc<CrawlState> {
        &self.state
    }

    /// The first target of a crawl
    pub fn seed(&self, start_url: &Url) -> CrawlTarget {
        let mut url = start_url.clone();
        url.set_fragment(None);
        let url = url.to_string();
        self.state.mark_category(&url);
        CrawlTarget::Category { url }
    }

    /// Whether a dispatched target is still worth fetching
    ///
    /// Enrichment targets already hold a reserved slot and always run.
    pub fn should_fetch(&self, target: &CrawlTarget) -> bool {
        match target {
            CrawlTarget::EnrichmentPage { .. } => true,
            _ => !self.state.is_exhausted(),
        }
    }

    pub fn request_for(&self, target: &CrawlTarget) -> FetchRequest {
        match target {
            CrawlTarget::EnrichmentPage { url, .. } => self.rating_site.request_for_url(url),
            other => FetchRequest::get(other.url()),
        }
    }

    /// Route a fetched page to the handler for its target
    pub fn on_document(&self, target: CrawlTarget, page: &FetchedPage) -> Step {
        let doc = Document::parse(&page.url, &page.body);
        match target {
            CrawlTarget::Category { .. } => Step::expanded(self.on_category_document(&doc)),
            CrawlTarget::MemberPage { .. } => self.on_member_document(&doc),
            CrawlTarget::EnrichmentPage { record, .. } => {
                Step::emitted(self.on_enrichment_document(&doc, record))
            }
        }
    }

    /// A target whose fetch failed: drop it, unless it carries a record
    pub fn on_fetch_failure(&self, target: CrawlTarget, error: &FetchError) -> Step {
        ::log::warn!("Failed to fetch {}: {}", target.url(), error);
        match target {
            CrawlTarget::EnrichmentPage { record, .. } => Step::emitted(record),
            _ => Step::discarded(DiscardReason::FetchFailed),
        }
    }

    /// Expand a category listing into subcategory, member and next-page targets
    pub fn on_category_document(&self, doc: &Document) -> Vec<CrawlTarget> {
        let mut targets = Vec::new();
        let Some(base) = doc.url() else {
            ::log::warn!("Category page without a usable address, skipping");
            return targets;
        };
        if self.state.is_exhausted() {
            return targets;
        }

        if self.options.follow_subcategories {
            for href in doc.attrs(SUBCATEGORY_LINKS, "href") {
                if self.state.is_exhausted() {
                    return targets;
                }
                let Some(url) = self.filter.resolve(base, &href) else {
                    continue;
                };
                if self.filter.classify(&url) != Some(LinkKind::Category) {
                    continue;
                }
                let url = url.to_string();
                if self.state.mark_category(&url) {
                    ::log::info!("Queuing subcategory: {}", url);
                    targets.push(CrawlTarget::Category { url });
                }
            }
        }

        let mut member_hrefs = doc.attrs(MEMBER_LINKS, "href");
        if member_hrefs.is_empty() {
            member_hrefs = doc.attrs(MEMBER_LINKS_FALLBACK, "href");
        }
        for href in member_hrefs {
            if self.state.is_exhausted() {
                return targets;
            }
            let Some(url) = self.filter.resolve(base, &href) else {
                continue;
            };
            if self.filter.classify(&url) != Some(LinkKind::Member) {
                continue;
            }
            let url = url.to_string();
            if self.state.mark_member(&url) {
                ::log::debug!("Queuing member page: {}", url);
                targets.push(CrawlTarget::MemberPage { url });
            }
        }

        if self.state.is_exhausted() {
            return targets;
        }
        if let Some(url) = self.next_page(doc, base) {
            if self.state.mark_category(&url) {
                ::log::info!("Queuing next listing page: {}", url);
                targets.push(CrawlTarget::Category { url });
            }
        }

        targets
    }

    /// Reserve a slot and extract a record from a member page
    pub fn on_member_document(&self, doc: &Document) -> Step {
        if !self.state.try_reserve() {
            ::log::debug!("Cap reached, discarding member page");
            return Step::discarded(DiscardReason::CapReached);
        }

        let record = extract_record(doc, &self.labels);
        if self.options.enrich_ratings {
            if let Some(id) = resolve_external_id(doc) {
                let url = self.rating_site.detail_url(&id);
                ::log::debug!("Enriching {:?} from {}", record.title, url);
                return Step::enriching(CrawlTarget::EnrichmentPage { url, record });
            }
            ::log::debug!("No external id for {:?}, emitting without rating", record.title);
        }
        Step::emitted(record)
    }

    /// Merge the rating from an enrichment page into the carried record
    pub fn on_enrichment_document(&self, doc: &Document, record: Record) -> Record {
        record.with_rating(extract_rating(doc))
    }

    fn next_page(&self, doc: &Document, base: &Url) -> Option<String> {
        let anchor = doc.anchors(PAGINATION_LINKS).into_iter().find(|anchor| {
            self.options
                .next_page_labels
                .iter()
                .any(|label| !label.is_empty() && anchor.text.contains(label.as_str()))
        })?;
        let url = self.filter.resolve(base, &anchor.href)?;
        if !self.filter.should_follow(&url) {
            return None;
        }
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::LinkFilterConfig;

    const START: &str = "https://ru.wikipedia.org/wiki/Категория:Фильмы";

    const CATEGORY_PAGE: &str = r#"<html><body>
        <div id="mw-subcategories">
          <a href="/wiki/Категория:Драмы">Драмы</a>
          <a href="/wiki/Категория:Комедии">Комедии</a>
          <a href="/wiki/Служебная:Поиск">not a category</a>
        </div>
        <div id="mw-pages">
          <a href="/w/index.php?title=Категория:Фильмы&amp;pagefrom=Б">Следующая страница</a>
          <div class="mw-category">
            <a href="/wiki/Фильм_А">Фильм А</a>
            <a href="/wiki/Категория:Драмы">duplicate category</a>
            <a href="/wiki/Фильм_Б#Сюжет">Фильм Б</a>
            <a href="/wiki/Фильм_Б">Фильм Б again</a>
            <a href="https://en.wikipedia.org/wiki/Film">offsite</a>
          </div>
        </div>
    </body></html>"#;

    const MEMBER_WITH_ID: &str = r#"<html><body>
        <h1 id="firstHeading">X</h1>
        <table class="infobox"><tr><th>Год</th><td>2001</td></tr></table>
        <a class="external" href="https://www.imdb.com/title/tt000123/">IMDb</a>
    </body></html>"#;

    const MEMBER_WITHOUT_ID: &str = r#"<html><body>
        <h1 id="firstHeading">Y</h1>
        <table class="infobox"><tr><th>Год</th><td>1999</td></tr></table>
    </body></html>"#;

    fn engine(cap: usize, options: EngineOptions) -> Engine {
        let filter = LinkFilter::new(LinkFilterConfig {
            required_host: Some("ru.wikipedia.org".to_string()),
            ..LinkFilterConfig::default()
        })
        .unwrap();
        Engine::new(
            CrawlState::new(cap),
            filter,
            InfoboxLabels::default(),
            RatingSite::default(),
            options,
        )
    }

    fn page(url: &str, body: &str) -> FetchedPage {
        FetchedPage {
            url: url.to_string(),
            body: body.to_string(),
        }
    }

    fn kinds(targets: &[CrawlTarget]) -> Vec<TargetKind> {
        targets.iter().map(CrawlTarget::kind).collect()
    }

    #[test]
    fn test_category_expansion() {
        let engine = engine(10, EngineOptions::default());
        let seed = engine.seed(&Url::parse(START).unwrap());
        let step = engine.on_document(seed, &page(START, CATEGORY_PAGE));

        assert_eq!(step.state, TargetState::Expanded);
        assert_eq!(
            kinds(&step.targets),
            vec![
                TargetKind::Category,
                TargetKind::Category,
                TargetKind::MemberPage,
                TargetKind::MemberPage,
                TargetKind::Category,
            ]
        );
        assert!(step.targets[2].url().ends_with("/wiki/%D0%A4%D0%B8%D0%BB%D1%8C%D0%BC_%D0%90"));
        assert!(step.targets[4].url().contains("pagefrom="));
    }

    #[test]
    fn test_revisited_category_yields_nothing_new() {
        let engine = engine(10, EngineOptions::default());
        let doc = Document::parse(START, CATEGORY_PAGE);

        let first = engine.on_category_document(&doc);
        assert_eq!(first.len(), 5);
        assert!(engine.on_category_document(&doc).is_empty());
    }

    #[test]
    fn test_subcategories_can_be_disabled() {
        let options = EngineOptions {
            follow_subcategories: false,
            ..EngineOptions::default()
        };
        let engine = engine(10, options);
        let targets = engine.on_category_document(&Document::parse(START, CATEGORY_PAGE));

        assert_eq!(
            kinds(&targets),
            vec![TargetKind::MemberPage, TargetKind::MemberPage, TargetKind::Category]
        );
    }

    #[test]
    fn test_exhausted_cap_enqueues_nothing() {
        let engine = engine(1, EngineOptions::default());
        assert!(engine.state().try_reserve());

        assert!(engine.on_category_document(&Document::parse(START, CATEGORY_PAGE)).is_empty());
        assert!(!engine.should_fetch(&CrawlTarget::MemberPage { url: START.to_string() }));
        assert!(engine.should_fetch(&CrawlTarget::EnrichmentPage {
            url: START.to_string(),
            record: Record::default(),
        }));
    }

    #[test]
    fn test_member_pages_respect_the_cap() {
        let engine = engine(1, EngineOptions::default());
        let doc = Document::parse("https://ru.wikipedia.org/wiki/X", MEMBER_WITH_ID);

        let first = engine.on_member_document(&doc);
        assert_eq!(first.state, TargetState::Emitted);
        assert_eq!(first.record.unwrap().year, "2001");

        let second = engine.on_member_document(&doc);
        assert_eq!(second.state, TargetState::Discarded(DiscardReason::CapReached));
        assert!(second.record.is_none());
    }

    #[test]
    fn test_enrichment_carries_the_record() {
        let options = EngineOptions {
            enrich_ratings: true,
            ..EngineOptions::default()
        };
        let engine = engine(5, options);
        let doc = Document::parse("https://ru.wikipedia.org/wiki/X", MEMBER_WITH_ID);

        let step = engine.on_member_document(&doc);
        assert_eq!(step.state, TargetState::Enriching);
        assert!(step.record.is_none());

        let target = step.targets.into_iter().next().unwrap();
        assert_eq!(target.url(), "https://www.imdb.com/title/tt000123/");
        assert_eq!(
            engine.request_for(&target).headers,
            vec![("Accept-Language".to_string(), "en-US,en;q=0.9".to_string())]
        );

        let imdb = r#"<script type="application/ld+json">
            {"aggregateRating":{"ratingValue":"7.8"}}
            </script>"#;
        let done = engine.on_document(target, &page("https://www.imdb.com/title/tt000123/", imdb));
        let record = done.record.unwrap();
        assert_eq!(done.state, TargetState::Emitted);
        assert_eq!((record.title.as_str(), record.year.as_str()), ("X", "2001"));
        assert_eq!(record.rating, "7.8");
    }

    #[test]
    fn test_enrichment_skipped_without_id() {
        let options = EngineOptions {
            enrich_ratings: true,
            ..EngineOptions::default()
        };
        let engine = engine(5, options);
        let doc = Document::parse("https://ru.wikipedia.org/wiki/Y", MEMBER_WITHOUT_ID);

        let step = engine.on_member_document(&doc);
        assert_eq!(step.state, TargetState::Emitted);
        assert!(step.targets.is_empty());
        assert_eq!(step.record.unwrap().rating, "");
    }

    #[test]
    fn test_failed_enrichment_still_emits() {
        let engine = engine(5, EngineOptions::default());
        let carried = Record {
            title: "X".to_string(),
            ..Record::default()
        };
        let target = CrawlTarget::EnrichmentPage {
            url: "https://www.imdb.com/title/tt1/".to_string(),
            record: carried.clone(),
        };
        let error = FetchError::Status {
            url: target.url().to_string(),
            status: 503,
        };

        let step = engine.on_fetch_failure(target, &error);
        assert_eq!(step.record, Some(carried));

        let member = CrawlTarget::MemberPage { url: START.to_string() };
        let step = engine.on_fetch_failure(member, &error);
        assert_eq!(step.state, TargetState::Discarded(DiscardReason::FetchFailed));
    }
}
