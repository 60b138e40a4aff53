//! Source-specific listing extraction
//!
//! Each supported site has an [`Extractor`] that walks the site's markup and
//! yields one [`ExtractionOutcome`] per candidate item:
//! - [`HackerNews`]: story rows of the front page
//! - [`ProductHunt`]: anchors pointing at product posts
//! - [`Reddit`]: link posts of a subreddit's "hot" listing
//!
//! Extraction is pure. A malformed item becomes a [`SkipReason`] that is logged
//! by [`extract_records`] and never stops the items after it.

mod hacker_news;
mod product_hunt;
mod reddit;

pub use hacker_news::HackerNews;
pub use product_hunt::ProductHunt;
pub use reddit::Reddit;

use crate::pipeline::record::{Clock, ListingRecord};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Why a candidate item produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// An element the item cannot do without is absent
    #[error("missing required element: {0}")]
    MissingRequiredElement(&'static str),

    /// The item is well formed but fails a source filter
    #[error("filtered out: {0}")]
    FilteredOut(String),

    /// A field is present but unusable (empty title, unsupported URL)
    #[error("malformed {field}: {detail}")]
    MalformedField { field: &'static str, detail: String },
}

/// Result of examining one candidate item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// A well-formed listing
    Record(ListingRecord),

    /// The item was dropped for the given reason
    Skipped(SkipReason),
}

impl From<Result<ListingRecord, SkipReason>> for ExtractionOutcome {
    fn from(result: Result<ListingRecord, SkipReason>) -> Self {
        match result {
            Ok(record) => ExtractionOutcome::Record(record),
            Err(reason) => ExtractionOutcome::Skipped(reason),
        }
    }
}

/// Lazy sequence of outcomes borrowed from a parsed document
pub type Outcomes<'a> = Box<dyn Iterator<Item = ExtractionOutcome> + 'a>;

/// Shared capability of the per-site extractors
pub trait Extractor: Send + Sync {
    /// Identifier stamped on every record, e.g. "Hacker News"
    fn source_name(&self) -> &str;

    /// Short tag used in log lines
    fn context_tag(&self) -> &'static str;

    /// Absolute URL of the page this extractor understands
    fn target_url(&self) -> String;

    /// Whether records of one page are deduplicated by URL
    fn dedupe_by_url(&self) -> bool {
        false
    }

    /// Examines at most `cap` candidate items of `document`, in document order
    fn extract<'a>(
        &'a self,
        document: &'a Html,
        cap: usize,
        clock: &'a dyn Clock,
    ) -> Outcomes<'a>;
}

/// Records extracted from one page plus the number of skipped items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<ListingRecord>,
    pub skipped: usize,
}

/// Parses `body`, runs `extractor` over it, and keeps the well-formed records
///
/// Skipped items are logged with the extractor's context tag. When the
/// extractor opts in, duplicate URLs are removed keeping the first occurrence.
pub fn extract_records(
    extractor: &dyn Extractor,
    body: &str,
    cap: usize,
    clock: &dyn Clock,
) -> Extraction {
    let document = Html::parse_document(body);
    let mut extraction = Extraction::default();

    for outcome in extractor.extract(&document, cap, clock) {
        match outcome {
            ExtractionOutcome::Record(record) => extraction.records.push(record),
            ExtractionOutcome::Skipped(reason) => {
                tracing::warn!(
                    context = extractor.context_tag(),
                    reason = %reason,
                    "Skipping item"
                );
                extraction.skipped += 1;
            }
        }
    }

    if extractor.dedupe_by_url() {
        extraction.records = dedupe_by_url(extraction.records);
    }

    extraction
}

/// Removes records whose URL was already seen, preserving first-seen order
pub fn dedupe_by_url(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.url().to_string());
            if !fresh {
                tracing::debug!(url = record.url(), "Dropping duplicate listing");
            }
            fresh
        })
        .collect()
}

/// Resolves an href against the source origin
///
/// Absolute http(s) hrefs pass through unchanged; relative ones are joined
/// onto `origin`. Anything that does not end up http(s) is rejected.
pub(crate) fn resolve_href(origin: &Url, href: &str) -> Result<String, SkipReason> {
    let href = href.trim();
    if href.is_empty() {
        return Err(SkipReason::MalformedField {
            field: "url",
            detail: "empty href".to_string(),
        });
    }

    let resolved = match Url::parse(href) {
        Ok(absolute) => {
            return if is_http(&absolute) {
                Ok(href.to_string())
            } else {
                Err(unsupported_scheme(&absolute))
            };
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            origin.join(href).map_err(|e| SkipReason::MalformedField {
                field: "url",
                detail: format!("cannot resolve '{}': {}", href, e),
            })?
        }
        Err(e) => {
            return Err(SkipReason::MalformedField {
                field: "url",
                detail: format!("'{}': {}", href, e),
            })
        }
    };

    if is_http(&resolved) {
        Ok(resolved.to_string())
    } else {
        Err(unsupported_scheme(&resolved))
    }
}

fn is_http(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

fn unsupported_scheme(url: &Url) -> SkipReason {
    SkipReason::MalformedField {
        field: "url",
        detail: format!("unsupported scheme '{}'", url.scheme()),
    }
}

/// Visible text of an element with whitespace runs collapsed and ends trimmed
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiles a selector literal
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{}': {:?}", css, e))
}

/// Strips trailing slashes so paths can be appended to an origin
pub(crate) fn origin_prefix(origin: &Url) -> &str {
    origin.as_str().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::log_capture::LogCapture;
    use crate::pipeline::record::FixedClock;
    use chrono::NaiveDate;
    use tracing::Level;

    fn origin() -> Url {
        Url::parse("https://news.ycombinator.com").unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    fn record(url: &str, title: &str) -> ListingRecord {
        ListingRecord::new("Test", title, url, "N/A", clock().now())
    }

    #[test]
    fn test_resolve_relative_item_reference() {
        assert_eq!(
            resolve_href(&origin(), "item?id=1").unwrap(),
            "https://news.ycombinator.com/item?id=1"
        );
    }

    #[test]
    fn test_resolve_root_relative_path() {
        let origin = Url::parse("https://old.reddit.com").unwrap();
        assert_eq!(
            resolve_href(&origin, "/r/rust/comments/abc/").unwrap(),
            "https://old.reddit.com/r/rust/comments/abc/"
        );
    }

    #[test]
    fn test_absolute_href_passes_through_unchanged() {
        let href = "https://Example.com/a/../b?x=1";
        assert_eq!(resolve_href(&origin(), href).unwrap(), href);
    }

    #[test]
    fn test_reject_non_http_schemes() {
        assert!(matches!(
            resolve_href(&origin(), "javascript:void(0)"),
            Err(SkipReason::MalformedField { field: "url", .. })
        ));
        assert!(matches!(
            resolve_href(&origin(), "mailto:a@b.c"),
            Err(SkipReason::MalformedField { .. })
        ));
    }

    #[test]
    fn test_reject_empty_href() {
        assert!(resolve_href(&origin(), "   ").is_err());
    }

    #[test]
    fn test_visible_text_collapses_whitespace() {
        let html = Html::parse_fragment("<a>  Hello\n   <b>big</b>  world </a>");
        let anchor = html.select(&selector("a")).next().unwrap();
        assert_eq!(visible_text(anchor), "Hello big world");
    }

    #[test]
    fn test_dedupe_keeps_first_seen() {
        let records = vec![
            record("https://a.test/1", "first"),
            record("https://a.test/2", "second"),
            record("https://a.test/1", "again"),
            record("https://a.test/3", "third"),
        ];

        let unique = dedupe_by_url(records);
        let titles: Vec<&str> = unique.iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_each_skipped_item_is_logged_once() {
        let body = r#"<html><body><table>
<tr class="athing"><td><span class="titleline"><a href="item?id=1">Kept</a></span></td></tr>
<tr><td><span class="score">4 points</span></td></tr>
<tr class="athing"><td>flagged</td></tr>
<tr><td></td></tr>
</table></body></html>"#;

        let (capture, _guard) = LogCapture::install();
        let extraction = extract_records(&HackerNews::new(origin()), body, 30, &clock());

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.skipped, 1);
        assert_eq!(capture.count(Level::WARN, "Skipping item"), 1);
    }

    #[test]
    fn test_origin_prefix() {
        assert_eq!(origin_prefix(&origin()), "https://news.ycombinator.com");
    }
}
