//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to stand in for every source site and drive a
//! full run through `scrape_all`.

use data_sentry::config::{Config, FetcherConfig, OutputConfig, SourceConfig, SourceKind};
use data_sentry::output::{format_summary, open_sinks, write_all};
use data_sentry::pipeline::{scrape_all, Clock, SystemClock};
use data_sentry::FetchError;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One mock server per site, since Hacker News and Product Hunt both live at "/"
struct Sites {
    hacker_news: MockServer,
    product_hunt: MockServer,
    reddit: MockServer,
}

impl Sites {
    async fn start() -> Self {
        Self {
            hacker_news: MockServer::start().await,
            product_hunt: MockServer::start().await,
            reddit: MockServer::start().await,
        }
    }

    /// The built-in four sources, pointed at the mock servers
    fn config(&self, timeout_secs: u64, data_dir: &str) -> Config {
        let mut hacker_news = SourceConfig::new(SourceKind::HackerNews);
        hacker_news.base_url = Some(self.hacker_news.uri());

        let mut product_hunt = SourceConfig::new(SourceKind::ProductHunt);
        product_hunt.base_url = Some(self.product_hunt.uri());

        let mut technology = SourceConfig::reddit("technology");
        technology.base_url = Some(self.reddit.uri());

        let mut programming = SourceConfig::reddit("programming");
        programming.base_url = Some(self.reddit.uri());

        Config {
            fetcher: FetcherConfig {
                timeout_secs,
                user_agent: "Mozilla/5.0 (IntegrationTest)".to_string(),
            },
            output: OutputConfig {
                data_dir: data_dir.to_string(),
                database_path: None,
            },
            sources: vec![hacker_news, product_hunt, technology, programming],
        }
    }
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Hacker News page with `valid` well-formed stories and `missing_title` rows without a title link
fn hacker_news_page(valid: usize, missing_title: usize) -> String {
    let mut rows = String::new();
    for i in 1..=valid {
        rows.push_str(&format!(
            r#"<tr class="athing" id="{i}"><td class="title"><span class="titleline"><a href="item?id={i}">Story {i}</a></span></td></tr>
<tr><td class="subtext"><span class="score">{} points</span></td></tr>
<tr class="spacer"></tr>"#,
            i * 10
        ));
    }
    for i in 0..missing_title {
        rows.push_str(&format!(
            r#"<tr class="athing" id="broken{i}"><td class="title">[flagged]</td></tr>
<tr><td class="subtext"></td></tr>"#
        ));
    }
    format!("<html><body><table id=\"hnmain\">{}</table></body></html>", rows)
}

fn product_hunt_page() -> String {
    r#"<html><body>
        <a href="/posts/alpha"><img src="alpha.png"></a>
        <a href="/posts/alpha">Alpha Notes</a>
        <a href="/posts/beta">Beta Board</a>
        <a href="/posts/beta">Beta Board</a>
        <a href="/posts/ok">OK</a>
    </body></html>"#
        .to_string()
}

fn reddit_page(subreddit: &str, count: usize) -> String {
    let posts: String = (1..=count)
        .map(|i| {
            format!(
                r#"<div class="thing" data-type="link" data-subreddit="{subreddit}"><div class="score unvoted" title="{i}00">{i}00</div><a class="title" href="/r/{subreddit}/comments/{i}/post/">{subreddit} post {i}</a></div>"#
            )
        })
        .collect();
    format!("<html><body><div id=\"siteTable\">{}</div></body></html>", posts)
}

async fn mount_all_healthy(sites: &Sites) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(hacker_news_page(5, 1)))
        .mount(&sites.hacker_news)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(product_hunt_page()))
        .mount(&sites.product_hunt)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/technology/hot/"))
        .respond_with(html_response(reddit_page("technology", 3)))
        .mount(&sites.reddit)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/programming/hot/"))
        .respond_with(html_response(reddit_page("programming", 2)))
        .mount(&sites.reddit)
        .await;
}

#[tokio::test]
async fn test_full_run_across_four_sources() {
    let sites = Sites::start().await;
    mount_all_healthy(&sites).await;

    let report = scrape_all(&sites.config(5, "unused"))
        .await
        .expect("Scrape failed");

    // 5 HN stories (one malformed row skipped), 2 unique PH products,
    // 3 + 2 Reddit posts
    assert_eq!(report.records.len(), 5 + 2 + 3 + 2);
    assert_eq!(report.failed_sources(), 0);

    let hn = &report.sources[0];
    assert_eq!(hn.source, "Hacker News");
    assert_eq!(hn.records, 5);
    assert_eq!(hn.skipped, 1);

    let mut grouped: Vec<&str> = report.records.iter().map(|r| r.source()).collect();
    grouped.dedup();
    assert_eq!(
        grouped,
        vec![
            "Hacker News",
            "Product Hunt",
            "Reddit r/technology",
            "Reddit r/programming"
        ]
    );

    let first = &report.records[0];
    assert_eq!(first.url(), format!("{}/item?id=1", sites.hacker_news.uri()));
    assert_eq!(first.score(), "10");

    let products: Vec<&str> = report
        .records
        .iter()
        .filter(|r| r.source() == "Product Hunt")
        .map(|r| r.title())
        .collect();
    assert_eq!(products, vec!["Alpha Notes", "Beta Board"]);

    let technology = report
        .records
        .iter()
        .find(|r| r.source() == "Reddit r/technology")
        .unwrap();
    assert_eq!(
        technology.url(),
        format!("{}/r/technology/comments/1/post/", sites.reddit.uri())
    );
    assert_eq!(technology.score(), "100");

    assert!(report
        .records
        .iter()
        .all(|r| r.url().starts_with("http://") || r.url().starts_with("https://")));
    assert!(report.records.iter().all(|r| !r.title().trim().is_empty()));
}

#[tokio::test]
async fn test_failed_source_does_not_affect_others() {
    let sites = Sites::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&sites.hacker_news)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(product_hunt_page()))
        .mount(&sites.product_hunt)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/technology/hot/"))
        .respond_with(html_response(reddit_page("technology", 4)))
        .mount(&sites.reddit)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/programming/hot/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&sites.reddit)
        .await;

    let report = scrape_all(&sites.config(5, "unused"))
        .await
        .expect("Scrape failed");

    assert_eq!(report.sources[0].error, Some(FetchError::BadStatus(500)));
    assert_eq!(report.sources[3].error, Some(FetchError::BadStatus(429)));
    assert_eq!(report.failed_sources(), 2);
    assert_eq!(report.records.len(), 2 + 4);
    assert!(report
        .records
        .iter()
        .all(|r| r.source() == "Product Hunt" || r.source() == "Reddit r/technology"));
}

#[tokio::test]
async fn test_all_sources_timing_out_yields_empty_report() {
    let sites = Sites::start().await;

    let slow = || {
        ResponseTemplate::new(200)
            .set_body_string("<html></html>")
            .set_delay(Duration::from_secs(3))
    };

    for server in [&sites.hacker_news, &sites.product_hunt, &sites.reddit] {
        Mock::given(method("GET"))
            .respond_with(slow())
            .mount(server)
            .await;
    }

    let started = std::time::Instant::now();
    let report = scrape_all(&sites.config(1, "unused"))
        .await
        .expect("Scrape must not fail when every source times out");

    assert!(report.is_empty());
    assert_eq!(report.failed_sources(), 4);
    assert!(report
        .sources
        .iter()
        .all(|s| s.error == Some(FetchError::Timeout)));

    // Jobs run concurrently, so the run takes about one timeout, not four.
    assert!(started.elapsed() < Duration::from_secs(3));

    let summary = format_summary(&report, &[]);
    assert!(summary.contains("No data scraped"));
}

#[tokio::test]
async fn test_run_written_to_csv() {
    let sites = Sites::start().await;
    mount_all_healthy(&sites).await;

    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let config = sites.config(5, &data_dir.display().to_string());

    let run_started = SystemClock.now();
    let report = scrape_all(&config).await.expect("Scrape failed");

    let sinks = open_sinks(&config.output, run_started).expect("Failed to open sinks");
    let receipts = write_all(&sinks, &report.records).expect("Failed to write sinks");

    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].rows, report.records.len());

    let content = std::fs::read_to_string(&receipts[0].location).expect("CSV missing");
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines[0], "source,title,url,score,scraped_at");
    assert_eq!(lines.len(), report.records.len() + 1);
    assert!(lines[1].starts_with("Hacker News,Story 1,"));
    assert!(lines.last().unwrap().starts_with("Reddit r/programming,"));
}
