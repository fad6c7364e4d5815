//! Final pass over the IMAGEN line: normalizes punctuation, strips banned
//! terms and proper names, guarantees a generic subject, and enforces the
//! word-count floor and cap.

use lazy_static::lazy_static;
use regex::Regex;

use super::spans;
use super::tags;
use super::vocab;

/// Below this total word count, supplemental tags are appended.
const WORD_FLOOR: usize = 30;
/// Hard cap on the total word count of the tag line.
const WORD_CAP: usize = 100;

lazy_static! {
    static ref SEMI_RE: Regex = Regex::new(r";+").unwrap();
    static ref AND_RE: Regex = Regex::new(r"(?i)\s+and\s+").unwrap();
    static ref OF_RE: Regex = Regex::new(r"(?i)\s+of\s+").unwrap();
    static ref HINT_OF_RE: Regex = Regex::new(r"(?i)\s*hint of\s*").unwrap();
    static ref WS_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Sanitize the IMAGEN line in place. Without one the text is returned
/// unchanged; creating missing lines is the fallback builder's job.
pub fn sanitize(
    full_text: &str,
    agent_name: &str,
    user_name: Option<&str>,
    character_name: Option<&str>,
) -> String {
    let mut lines: Vec<String> = full_text.split('\n').map(str::to_string).collect();
    let Some(imagen_index) = spans::locate_imagen(&lines) else {
        return full_text.to_string();
    };
    let prefix = spans::imagen_prefix(&lines[imagen_index])
        .unwrap_or_else(|| "IMAGEN: ".to_string());
    let content = normalize_content(&spans::imagen_content(&lines[imagen_index]));

    let mut tokens: Vec<String> = tags::parse_tokens(&content)
        .iter()
        .map(|t| tags::compact(t))
        .collect();

    tokens.retain(|t| !vocab::BANNED_TERMS.iter().any(|banned| t.contains(banned)));

    // Strip any token mentioning the agent's or the user's name, keeping a
    // token equal to the configured character name as the sole exemption.
    let mut name_parts: Vec<String> = agent_name
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    name_parts.extend(
        user_name
            .unwrap_or_default()
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string),
    );
    let character_tag = character_name
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if !name_parts.is_empty() {
        tokens.retain(|t| {
            if !character_tag.is_empty() && *t == character_tag {
                return true;
            }
            !name_parts.iter().any(|part| t.contains(part.as_str()))
        });
    }

    let mut tokens = tags::dedup(tokens);

    ensure_subject(&mut tokens);

    if tags::word_count(&tokens) < WORD_FLOOR {
        pad_tokens(&mut tokens, full_text);
    }

    // Accumulate in order until the cap would be crossed.
    let mut limited: Vec<String> = Vec::new();
    let mut words = 0;
    for token in tokens {
        let count = token.split_whitespace().count();
        if words + count > WORD_CAP {
            break;
        }
        words += count;
        limited.push(token);
    }

    lines[imagen_index] = format!("{}{}", prefix, limited.join(", "));
    lines.join("\n")
}

/// Lower-cased, comma-tokenizable tag content: quotes, colons and periods
/// removed, semicolons and connective words turned into separators,
/// whitespace collapsed.
fn normalize_content(content: &str) -> String {
    let cleaned = content.replace(['"', '\''], "").replace([':', '.'], "");
    let cleaned = SEMI_RE.replace_all(&cleaned, ", ");
    let cleaned = AND_RE.replace_all(&cleaned, ", ");
    let cleaned = OF_RE.replace_all(&cleaned, ", ");
    let cleaned = HINT_OF_RE.replace_all(&cleaned, ", ");
    let cleaned = WS_RE.replace_all(&cleaned, " ");
    cleaned.trim().to_lowercase()
}

fn ensure_subject(tokens: &mut Vec<String>) {
    let has_subject = tokens
        .iter()
        .any(|t| vocab::SUBJECT_TAGS.contains(&t.as_str()));
    if !has_subject {
        tokens.insert(0, "1person".to_string());
        if !tokens.iter().any(|t| t == "solo") {
            tokens.insert(1, "solo".to_string());
        }
        if !tokens.iter().any(|t| t == "adult") {
            tokens.insert(2, "adult".to_string());
        }
    } else if !tokens.iter().any(|t| t == "adult") {
        tokens.insert(0, "adult".to_string());
    }
}

fn push_tag(tokens: &mut Vec<String>, tag: &str) {
    let tag = tags::compact(tag.trim().to_lowercase().as_str());
    if tag.is_empty() || tokens.contains(&tag) {
        return;
    }
    tokens.push(tag);
}

/// Append supplemental tags in fixed priority order: pose, lighting and
/// camera pools first, then environment and activity families keyed off the
/// action text, then generic visual detail until the floor is met.
fn pad_tokens(tokens: &mut Vec<String>, full_text: &str) {
    let action = spans::find_action(full_text)
        .unwrap_or_default()
        .to_lowercase();

    for tag in vocab::BASE_POSE {
        push_tag(tokens, tag);
    }
    for tag in vocab::BASE_LIGHT {
        push_tag(tokens, tag);
    }
    for tag in vocab::BASE_CAMERA {
        push_tag(tokens, tag);
    }

    for (pattern, rule_tags) in vocab::PADDING_ENVIRONMENT_RULES.iter() {
        if pattern.is_match(&action) {
            for tag in *rule_tags {
                push_tag(tokens, tag);
            }
        }
    }
    for (pattern, rule_tags) in vocab::PADDING_ACTIVITY_RULES.iter() {
        if pattern.is_match(&action) {
            for tag in *rule_tags {
                push_tag(tokens, tag);
            }
        }
    }

    for tag in vocab::VISUAL_DETAIL {
        if tags::word_count(tokens) >= WORD_FLOOR {
            break;
        }
        push_tag(tokens, tag);
    }
}
