//! Tag token utilities shared by every IMAGEN stage.

/// Split a comma-separated tag string into trimmed, non-empty tokens.
/// Order is preserved and duplicates are kept; deduplication is the
/// caller's call.
pub fn parse_tokens(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Booru-style tags prefer 1-3 words; longer tags keep their first three.
pub fn compact(tag: &str) -> String {
    let words: Vec<&str> = tag.split_whitespace().collect();
    if words.len() > 3 {
        words[..3].join(" ")
    } else {
        tag.to_string()
    }
}

/// Drop repeated tokens, first occurrence wins.
pub fn dedup(tokens: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokens
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Total whitespace-split word count across all tokens.
pub fn word_count(tokens: &[String]) -> usize {
    tokens.iter().map(|t| t.split_whitespace().count()).sum()
}
