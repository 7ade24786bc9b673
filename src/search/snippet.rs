//! Query-context snippets
//!
//! Windows are measured in characters, never bytes, so multi-byte text is
//! never split mid-character.

/// Marker placed where a snippet was truncated
pub const ELLIPSIS: &str = "...";

/// Extracts a window of `content` around the first match of `query`
///
/// Matching is a case-insensitive exact substring search. When the query is
/// found, the snippet holds the match plus up to `window / 2` characters on
/// each side, with [`ELLIPSIS`] added at each end that was cut. When it is
/// not found, the snippet is the leading `window` characters followed by
/// [`ELLIPSIS`].
///
/// # Example
///
/// ```
/// use koala_search::search::extract_snippet;
///
/// let snippet = extract_snippet("the quick brown fox jumps", "BROWN", 3);
/// assert_eq!(snippet, "...brown...");
/// ```
pub fn extract_snippet(content: &str, query: &str, window: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    let needle: Vec<char> = query.trim().chars().map(fold).collect();

    let Some(start) = find_folded(&chars, &needle) else {
        let head: String = chars.iter().take(window).collect();
        return format!("{}{}", head.trim_end(), ELLIPSIS);
    };

    let half = window / 2;
    let from = start.saturating_sub(half);
    let to = (start + needle.len() + half).min(chars.len());

    let body: String = chars[from..to].iter().collect();
    let mut snippet = String::with_capacity(body.len() + 2 * ELLIPSIS.len());
    if from > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(body.trim());
    if to < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Character index of the first case-insensitive occurrence of `needle`
fn find_folded(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|candidate| candidate.iter().map(|c| fold(*c)).eq(needle.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_in_middle_is_bounded_by_ellipses() {
        let snippet = extract_snippet("the quick brown fox jumps", "brown", 3);
        assert!(snippet.contains("brown"));
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_match_is_case_insensitive_and_keeps_original_case() {
        let snippet = extract_snippet("Learn Rust Today", "rust", 100);
        assert_eq!(snippet, "Learn Rust Today");
    }

    #[test]
    fn test_match_at_start_has_no_leading_ellipsis() {
        let snippet = extract_snippet("alpha beta gamma delta", "alpha", 4);
        assert_eq!(snippet, "alpha b...");
    }

    #[test]
    fn test_match_at_end_has_no_trailing_ellipsis() {
        let snippet = extract_snippet("alpha beta gamma delta", "delta", 4);
        assert_eq!(snippet, "...a delta");
    }

    #[test]
    fn test_not_found_returns_leading_window() {
        let snippet = extract_snippet("the quick brown fox jumps", "zebra", 9);
        assert_eq!(snippet, "the quick...");
    }

    #[test]
    fn test_not_found_short_content_still_marked() {
        assert_eq!(extract_snippet("short", "zebra", 200), "short...");
    }

    #[test]
    fn test_empty_query_and_content_do_not_panic() {
        assert_eq!(extract_snippet("some text", "", 4), "some...");
        assert_eq!(extract_snippet("", "query", 10), "...");
        assert_eq!(extract_snippet("", "", 0), "...");
    }

    #[test]
    fn test_multibyte_content() {
        let snippet = extract_snippet("café au lait, crème brûlée", "CRÈME", 2);
        assert_eq!(snippet, "...crème...");
    }
}
