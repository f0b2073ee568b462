//! Output module for reporting crawl and index results
//!
//! This module handles:
//! - Ranking the per-page counts of a query term
//! - Printing index statistics
//! - Printing the summary of a crawl run

use crate::crawler::CrawlSummary;
use crate::index::{Index, IndexStats};
use crate::IndexError;
use std::collections::HashMap;
use std::fmt;

/// Per-page occurrence counts of one term, most frequent first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermReport {
    /// The queried term
    pub term: String,

    /// `(url, count)` pairs sorted by count descending, then url ascending
    pub entries: Vec<(String, u64)>,
}

impl TermReport {
    /// Sorts raw counts into a report
    pub fn from_counts(term: &str, counts: HashMap<String, u64>) -> Self {
        let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            term: term.to_string(),
            entries,
        }
    }

    /// Queries `index` for `term` and builds the report
    pub fn query<I: Index + ?Sized>(index: &I, term: &str) -> Result<Self, IndexError> {
        Ok(Self::from_counts(term, index.get_counts(term)?))
    }

    /// Sum of the term's occurrences across all pages
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for TermReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (url, count) in &self.entries {
            writeln!(f, "{}={}", url, count)?;
        }
        Ok(())
    }
}

/// Prints index statistics to stdout
pub fn print_index_stats(stats: &IndexStats) {
    println!("=== Index Statistics ===\n");
    println!("  Pages indexed: {}", stats.pages);
    println!("  Distinct terms: {}", stats.distinct_terms);
    match &stats.last_indexed_at {
        Some(at) => println!("  Last write: {}", at),
        None => println!("  Last write: never"),
    }
    println!();
}

/// Prints the summary of a crawl run to stdout
pub fn print_crawl_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");
    println!("  Steps: {}", summary.steps);
    println!("  Newly indexed: {}", summary.indexed.len());
    for url in &summary.indexed {
        println!("    * {}", url);
    }
    println!("  Already indexed: {}", summary.skipped);

    if !summary.failures.is_empty() {
        println!("  Failed: {}", summary.failures.len());
        for (url, error) in &summary.failures {
            println!("    ! {}: {}", url, error);
        }
    }

    if summary.exhausted {
        println!("  Queue exhausted");
    }
    println!("  Elapsed: {:.2?}", summary.elapsed);
    println!();
}
