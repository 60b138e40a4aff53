//! Product Hunt front page extractor
//!
//! The server-rendered page links every product through `/posts/<slug>`,
//! usually more than once (thumbnail and name), so this extractor opts into
//! URL deduplication.

use super::{
    origin_prefix, resolve_href, selector, visible_text, ExtractionOutcome, Extractor, Outcomes,
    SkipReason,
};
use crate::pipeline::record::{Clock, ListingRecord};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static POST_LINK: Lazy<Selector> = Lazy::new(|| selector(r#"a[href*="/posts/"]"#));

const SOURCE_NAME: &str = "Product Hunt";

/// Titles this short are icon or badge links, not product names
const MIN_TITLE_CHARS: usize = 4;

/// Extractor for the Product Hunt front page
#[derive(Debug, Clone)]
pub struct ProductHunt {
    origin: Url,
}

impl ProductHunt {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    fn extract_link(
        &self,
        anchor: ElementRef<'_>,
        clock: &dyn Clock,
    ) -> Result<ListingRecord, SkipReason> {
        let title = visible_text(anchor);
        if title.chars().count() < MIN_TITLE_CHARS {
            return Err(SkipReason::FilteredOut(format!(
                "title '{}' shorter than {} characters",
                title, MIN_TITLE_CHARS
            )));
        }

        let url = resolve_href(&self.origin, anchor.value().attr("href").unwrap_or(""))?;

        Ok(ListingRecord::new(SOURCE_NAME, title, url, "N/A", clock.now()))
    }
}

impl Extractor for ProductHunt {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    fn context_tag(&self) -> &'static str {
        "producthunt"
    }

    fn target_url(&self) -> String {
        format!("{}/", origin_prefix(&self.origin))
    }

    fn dedupe_by_url(&self) -> bool {
        true
    }

    fn extract<'a>(
        &'a self,
        document: &'a Html,
        cap: usize,
        clock: &'a dyn Clock,
    ) -> Outcomes<'a> {
        Box::new(
            document
                .select(&POST_LINK)
                .take(cap)
                .map(move |anchor| ExtractionOutcome::from(self.extract_link(anchor, clock))),
        )
    }
}
