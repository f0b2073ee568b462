//! HTML parser for splitting pages into content blocks
//!
//! A page is reduced to the ordered list of elements matching the configured
//! content selector (paragraphs of the article body by default). Each block
//! keeps its markup, for link extraction, and its text, for indexing.

use scraper::{ElementRef, Html, Selector};

/// One paragraph-level fragment of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    /// Outer HTML of the block
    pub html: String,

    /// Concatenated text nodes of the block
    pub text: String,
}

impl ContentBlock {
    /// Builds a block from a parsed element
    pub fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            html: element.html(),
            text: element.text().collect(),
        }
    }

    /// Builds a block from an HTML fragment such as `<p>text</p>`
    pub fn from_html(fragment: &str) -> Self {
        let parsed = Html::parse_fragment(fragment);
        Self {
            html: fragment.to_string(),
            text: parsed.root_element().text().collect(),
        }
    }

    /// Returns every `href` attribute value in the block, in document order
    pub fn hrefs(&self) -> Vec<String> {
        let fragment = Html::parse_fragment(&self.html);
        let Ok(selector) = Selector::parse("[href]") else {
            return Vec::new();
        };

        fragment
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

/// Parses a page and returns the blocks matching `selector`, in document order
///
/// # Example
///
/// ```
/// use scraper::Selector;
/// use wiki_ripple::crawler::parse_content_blocks;
///
/// let html = r#"<div id="mw-content-text"><p>One</p><p>Two</p></div><p>Footer</p>"#;
/// let selector = Selector::parse("#mw-content-text p").unwrap();
/// let blocks = parse_content_blocks(html, &selector);
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[1].text, "Two");
/// ```
pub fn parse_content_blocks(html: &str, selector: &Selector) -> Vec<ContentBlock> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .map(ContentBlock::from_element)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs() -> Selector {
        Selector::parse("#mw-content-text p").unwrap()
    }

    #[test]
    fn test_only_content_paragraphs_selected() {
        let html = r#"
            <html><body>
                <div id="siteNotice"><p>Donate</p></div>
                <div id="mw-content-text">
                    <p>First <b>bold</b> paragraph.</p>
                    <table><tr><td><p>Nested</p></td></tr></table>
                    <p>Second paragraph.</p>
                </div>
            </body></html>
        "#;

        let blocks = parse_content_blocks(html, &paragraphs());

        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["First bold paragraph.", "Nested", "Second paragraph."]
        );
    }

    #[test]
    fn test_no_matching_content() {
        let html = r#"<html><body><p>Outside</p></body></html>"#;
        assert!(parse_content_blocks(html, &paragraphs()).is_empty());
    }

    #[test]
    fn test_block_keeps_markup() {
        let html = r#"<div id="mw-content-text"><p>See <a href="/wiki/Rust">Rust</a></p></div>"#;
        let blocks = parse_content_blocks(html, &paragraphs());

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].html.contains(r#"href="/wiki/Rust""#));
        assert_eq!(blocks[0].text, "See Rust");
    }

    #[test]
    fn test_hrefs_in_document_order() {
        let block = ContentBlock::from_html(
            r#"<p><a href="/wiki/B">B</a> then <a href="https://other.org/">x</a> then <a href="/wiki/A">A</a> <a name="anchor">no href</a></p>"#,
        );

        assert_eq!(
            block.hrefs(),
            vec!["/wiki/B", "https://other.org/", "/wiki/A"]
        );
    }

    #[test]
    fn test_from_html_text() {
        let block = ContentBlock::from_html("<p>Hello <i>wiki</i> world</p>");
        assert_eq!(block.text, "Hello wiki world");
    }
}
