//! Synonym-based query expansion

/// Terms and the extra words they pull into a query
const SYNONYMS: &[(&str, &[&str])] = &[
    ("python", &["py", "python3"]),
    ("javascript", &["js", "ecmascript"]),
    ("database", &["db", "data store"]),
    ("web", &["website", "site"]),
    ("tutorial", &["guide", "howto", "how-to"]),
];

/// Lowercases the query and follows each known term with its synonyms
///
/// ```
/// use koala_search::search::expand_query;
///
/// assert_eq!(expand_query("Python Web"), "python py python3 web website site");
/// ```
pub fn expand_query(query: &str) -> String {
    let mut expanded = Vec::new();

    for word in query.to_lowercase().split_whitespace() {
        expanded.push(word.to_string());
        if let Some((_, synonyms)) = SYNONYMS.iter().find(|(term, _)| *term == word) {
            expanded.extend(synonyms.iter().map(|s| s.to_string()));
        }
    }

    expanded.join(" ")
}
