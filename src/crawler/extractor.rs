//! Page content extraction
//!
//! Turns a parsed HTML document into normalized page text plus metadata:
//! - Boilerplate subtrees (scripts, styles, navigation, header, footer,
//!   side content) never contribute text
//! - The first matching main-content container wins; otherwise the whole
//!   body is used
//! - Whitespace is collapsed and characters outside a printable allow-list
//!   are dropped

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose subtrees are not page content
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "iframe",
    "svg",
];

/// Main-content containers in priority order
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    "#content",
    ".content",
    ".main-content",
    ".post-content",
    ".entry-content",
    ".article-body",
];

/// Punctuation kept in normalized text
const ALLOWED_PUNCTUATION: &str = ".,;:!?'\"()[]{}-_/&%$@#+=*<>|~`^\\";

/// Page metadata taken from the document head
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

/// Normalized page text and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub content: String,
    pub metadata: PageMetadata,
}

/// Extracts normalized content and metadata from a parsed page
///
/// Word-count policy is left to the caller.
///
/// # Example
///
/// ```
/// use koala_search::crawler::extract_content;
/// use scraper::Html;
///
/// let html = Html::parse_document(
///     "<html><head><title>Guide</title></head>\
///      <body><nav>Home | About</nav><main><p>Real   words here.</p></main></body></html>",
/// );
/// let extracted = extract_content(&html);
/// assert_eq!(extracted.content, "Real words here.");
/// assert_eq!(extracted.metadata.title.as_deref(), Some("Guide"));
/// ```
pub fn extract_content(document: &Html) -> ExtractedContent {
    let content = main_container_text(document)
        .unwrap_or_else(|| normalize_text(&fallback_text(document)));

    ExtractedContent {
        content,
        metadata: extract_metadata(document),
    }
}

/// Collapses whitespace, drops disallowed characters and trims
pub fn normalize_text(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(*c))
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text of the first content container that has any text
///
/// Empty shells (a `<main>` filled by scripts, say) are skipped in favour of
/// the next candidate.
fn main_container_text(document: &Html) -> Option<String> {
    CONTENT_SELECTORS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .map(|container| normalize_text(&container_text(container)))
            .find(|text| !text.is_empty())
    })
}

fn fallback_text(document: &Html) -> String {
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());

    match body {
        Some(body) => container_text(body),
        None => container_text(document.root_element()),
    }
}

fn container_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts.join(" ")
}

/// Depth-first text collection that skips stripped subtrees
fn collect_text(element: ElementRef<'_>, parts: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            Node::Element(el) => {
                if STRIPPED_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, parts);
                }
            }
            _ => {}
        }
    }
}

fn extract_metadata(document: &Html) -> PageMetadata {
    let title = first_text(document, "title");

    let description = first_attr(document, "meta[name='description']", "content")
        .or_else(|| first_attr(document, "meta[property='og:description']", "content"));

    let keywords = first_attr(document, "meta[name='keywords']", "content")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PageMetadata {
        title,
        description,
        keywords,
    }
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| normalize_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(normalize_whitespace)
        .find(|s| !s.is_empty())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> ExtractedContent {
        extract_content(&Html::parse_document(html))
    }

    #[test]
    fn test_prefers_main_container() {
        let extracted = extract(
            r#"<html><body>
                <div>Sidebar teaser</div>
                <main><h1>Heading</h1><p>Main body text.</p></main>
            </body></html>"#,
        );
        assert_eq!(extracted.content, "Heading Main body text.");
    }

    #[test]
    fn test_main_beats_article() {
        let extracted = extract(
            r#"<html><body>
                <article>Article text</article>
                <main>Main text</main>
            </body></html>"#,
        );
        assert_eq!(extracted.content, "Main text");
    }

    #[test]
    fn test_empty_main_falls_through_to_article() {
        let extracted = extract(
            r#"<html><body>
                <main><script>render()</script></main>
                <article>Article words survive</article>
            </body></html>"#,
        );
        assert_eq!(extracted.content, "Article words survive");
    }

    #[test]
    fn test_empty_main_falls_back_to_body() {
        let extracted = extract(
            r#"<html><body>
                <main>   </main>
                <div>Body paragraph with the real content.</div>
            </body></html>"#,
        );
        assert_eq!(extracted.content, "Body paragraph with the real content.");
    }

    #[test]
    fn test_content_class_container() {
        let extracted = extract(
            r#"<html><body>
                <div class="menu">Menu</div>
                <div class="post-content">Post words</div>
            </body></html>"#,
        );
        assert_eq!(extracted.content, "Post words");
    }

    #[test]
    fn test_fallback_strips_boilerplate() {
        let extracted = extract(
            r#"<html><head><style>body { color: red; }</style></head><body>
                <header>Site header</header>
                <nav><a href="/">Home</a></nav>
                <div>Useful paragraph.</div>
                <aside>Related links</aside>
                <script>var tracking = 1;</script>
                <footer>Copyright</footer>
            </body></html>"#,
        );
        assert_eq!(extracted.content, "Useful paragraph.");
    }

    #[test]
    fn test_boilerplate_inside_container_stripped() {
        let extracted = extract(
            r#"<html><body><main>
                <nav>Breadcrumbs</nav>
                <p>Kept text</p>
                <script>ignored()</script>
            </main></body></html>"#,
        );
        assert_eq!(extracted.content, "Kept text");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a\n\n b\t c  "), "a b c");
        assert_eq!(normalize_text("price: $5 (approx.)"), "price: $5 (approx.)");
        assert_eq!(normalize_text("emoji 🎉 gone"), "emoji gone");
        assert_eq!(normalize_text("café naïve"), "café naïve");
    }

    #[test]
    fn test_metadata_title_and_description() {
        let extracted = extract(
            r#"<html><head>
                <title>  My   Page </title>
                <meta name="description" content="Plain description">
                <meta property="og:description" content="OG description">
                <meta name="keywords" content="rust, crawler , ,search">
            </head><body>x</body></html>"#,
        );
        let metadata = extracted.metadata;
        assert_eq!(metadata.title.as_deref(), Some("My Page"));
        assert_eq!(metadata.description.as_deref(), Some("Plain description"));
        assert_eq!(metadata.keywords, vec!["rust", "crawler", "search"]);
    }

    #[test]
    fn test_metadata_og_description_fallback() {
        let extracted = extract(
            r#"<html><head>
                <meta property="og:description" content="OG description">
            </head><body>x</body></html>"#,
        );
        assert_eq!(
            extracted.metadata.description.as_deref(),
            Some("OG description")
        );
        assert_eq!(extracted.metadata.title, None);
        assert!(extracted.metadata.keywords.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let extracted = extract("");
        assert_eq!(extracted.content, "");
        assert_eq!(extracted.metadata, PageMetadata::default());
    }
}
