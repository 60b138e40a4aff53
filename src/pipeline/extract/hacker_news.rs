//! Hacker News front page extractor
//!
//! Each story spans two table rows: a `tr.athing` row carrying the title link
//! and the following row carrying the score ("123 points") in `span.score`.

use super::{
    origin_prefix, resolve_href, selector, visible_text, ExtractionOutcome, Extractor, Outcomes,
    SkipReason,
};
use crate::pipeline::record::{Clock, ListingRecord};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static STORY_ROW: Lazy<Selector> = Lazy::new(|| selector("tr.athing"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("span.titleline > a"));
static SCORE: Lazy<Selector> = Lazy::new(|| selector("span.score"));

const SOURCE_NAME: &str = "Hacker News";

/// Extractor for the Hacker News front page
#[derive(Debug, Clone)]
pub struct HackerNews {
    origin: Url,
}

impl HackerNews {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    fn extract_row(
        &self,
        row: ElementRef<'_>,
        clock: &dyn Clock,
    ) -> Result<ListingRecord, SkipReason> {
        let link = row
            .select(&TITLE_LINK)
            .next()
            .ok_or(SkipReason::MissingRequiredElement("span.titleline > a"))?;

        let subtext = next_row(row).ok_or(SkipReason::MissingRequiredElement("subtext row"))?;

        let title = visible_text(link);
        if title.is_empty() {
            return Err(SkipReason::MalformedField {
                field: "title",
                detail: "empty title text".to_string(),
            });
        }

        let url = resolve_href(&self.origin, link.value().attr("href").unwrap_or(""))?;

        let score = subtext
            .select(&SCORE)
            .next()
            .map(|element| strip_points(&visible_text(element)))
            .unwrap_or_else(|| "0".to_string());

        Ok(ListingRecord::new(SOURCE_NAME, title, url, score, clock.now()))
    }
}

impl Extractor for HackerNews {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    fn context_tag(&self) -> &'static str {
        "hn"
    }

    fn target_url(&self) -> String {
        format!("{}/", origin_prefix(&self.origin))
    }

    fn extract<'a>(
        &'a self,
        document: &'a Html,
        cap: usize,
        clock: &'a dyn Clock,
    ) -> Outcomes<'a> {
        Box::new(
            document
                .select(&STORY_ROW)
                .take(cap)
                .map(move |row| ExtractionOutcome::from(self.extract_row(row, clock))),
        )
    }
}

/// The subtext row following a story row
///
/// `None` when the next `tr` is itself a story row or there is none.
fn next_row(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "tr")
        .filter(|element| !element.value().classes().any(|class| class == "athing"))
}

/// "123 points" -> "123", "1 point" -> "1"
fn strip_points(text: &str) -> String {
    let text = text.trim();
    text.strip_suffix("points")
        .or_else(|| text.strip_suffix("point"))
        .unwrap_or(text)
        .trim()
        .to_string()
}
