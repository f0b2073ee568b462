//! Term counting for indexed text

use std::collections::HashMap;

/// Splits text into lowercase terms
///
/// Punctuation and symbols act as separators, so `"Java's"` yields `java` and `s`.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// Counts occurrences of each term across a sequence of texts
pub fn count_terms<'a, I>(texts: I) -> HashMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = HashMap::new();
    for text in texts {
        for term in tokenize(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
    }
    counts
}
