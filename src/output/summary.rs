//! Console summary of a run

use crate::output::traits::SinkReceipt;
use crate::pipeline::ScrapeReport;
use std::fmt::Write;

/// Number of records shown in the sample table
const SAMPLE_ROWS: usize = 10;

/// Longest title shown in the sample table
const SAMPLE_TITLE_CHARS: usize = 60;

/// Prints the run summary to stdout
///
/// # Arguments
///
/// * `report` - The aggregated run result
/// * `receipts` - Where the sinks stored the records
pub fn print_summary(report: &ScrapeReport, receipts: &[SinkReceipt]) {
    print!("{}", format_summary(report, receipts));
}

/// Formats the run summary
///
/// The completion banner is always present. An empty run gets a distinct
/// "No data scraped" notice instead of totals and samples.
pub fn format_summary(report: &ScrapeReport, receipts: &[SinkReceipt]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n=== Scraping complete ===\n");

    let _ = writeln!(out, "Sources:");
    for source in &report.sources {
        match &source.error {
            Some(error) => {
                let _ = writeln!(out, "  ✗ {}: fetch failed ({})", source.source, error);
            }
            None => {
                let _ = writeln!(
                    out,
                    "  ✓ {}: {} items ({} skipped)",
                    source.source, source.records, source.skipped
                );
            }
        }
    }
    let _ = writeln!(out);

    if report.is_empty() {
        let _ = writeln!(out, "✗ No data scraped");
        return out;
    }

    let _ = writeln!(out, "Total items: {}", report.records.len());
    for receipt in receipts {
        let _ = writeln!(out, "Saved to: {}", receipt.location);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Sample data:");
    for (index, record) in report.records.iter().take(SAMPLE_ROWS).enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. [{}] {} ({})",
            index + 1,
            record.source(),
            truncate(record.title(), SAMPLE_TITLE_CHARS),
            record.score()
        );
    }

    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
