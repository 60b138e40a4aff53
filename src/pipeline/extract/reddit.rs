//! Subreddit "hot" listing extractor (legacy markup)
//!
//! Link posts are `div.thing[data-type="link"]` containers. The title anchor
//! is `a.title`; the vote count sits in the `title` attribute of
//! `div.score.unvoted`.

use super::{
    origin_prefix, resolve_href, selector, visible_text, ExtractionOutcome, Extractor, Outcomes,
    SkipReason,
};
use crate::pipeline::record::{Clock, ListingRecord};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static LINK_POST: Lazy<Selector> = Lazy::new(|| selector(r#"div.thing[data-type="link"]"#));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("a.title"));
static SCORE: Lazy<Selector> = Lazy::new(|| selector("div.score.unvoted"));

/// Extractor for one subreddit's hot listing
#[derive(Debug, Clone)]
pub struct Reddit {
    origin: Url,
    subreddit: String,
    source_name: String,
}

impl Reddit {
    pub fn new(origin: Url, subreddit: impl Into<String>) -> Self {
        let subreddit = subreddit.into();
        Self {
            source_name: format!("Reddit r/{}", subreddit),
            origin,
            subreddit,
        }
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    fn extract_post(
        &self,
        post: ElementRef<'_>,
        clock: &dyn Clock,
    ) -> Result<ListingRecord, SkipReason> {
        let link = post
            .select(&TITLE_LINK)
            .next()
            .ok_or(SkipReason::MissingRequiredElement("a.title"))?;

        let title = visible_text(link);
        if title.is_empty() {
            return Err(SkipReason::MalformedField {
                field: "title",
                detail: "empty title text".to_string(),
            });
        }

        let url = resolve_href(&self.origin, link.value().attr("href").unwrap_or(""))?;

        let score = post
            .select(&SCORE)
            .next()
            .and_then(|element| element.value().attr("title"))
            .map(|votes| votes.trim().to_string())
            .filter(|votes| !votes.is_empty())
            .unwrap_or_else(|| "0".to_string());

        Ok(ListingRecord::new(
            self.source_name.as_str(),
            title,
            url,
            score,
            clock.now(),
        ))
    }
}

impl Extractor for Reddit {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn context_tag(&self) -> &'static str {
        "reddit"
    }

    fn target_url(&self) -> String {
        format!("{}/r/{}/hot/", origin_prefix(&self.origin), self.subreddit)
    }

    fn extract<'a>(
        &'a self,
        document: &'a Html,
        cap: usize,
        clock: &'a dyn Clock,
    ) -> Outcomes<'a> {
        Box::new(
            document
                .select(&LINK_POST)
                .take(cap)
                .map(move |post| ExtractionOutcome::from(self.extract_post(post, clock))),
        )
    }
}
