//! Synthesizes an IMAGEN tag list from the last exchange when the generated
//! text carried no directive line at all.

use lazy_static::lazy_static;
use regex::Regex;

use super::tags;
use super::vocab;

lazy_static! {
    static ref QUOTES_RE: Regex = Regex::new(r#"["']+"#).unwrap();
    static ref PUNCT_RE: Regex = Regex::new(r"[:.;]+").unwrap();
}

/// Context available when synthesizing a fallback tag list.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackContext<'a> {
    pub last_user: Option<&'a str>,
    pub last_assistant: Option<&'a str>,
    pub image_prompt_master: Option<&'a str>,
    pub character_name: Option<&'a str>,
}

/// Build the tag-list portion of an IMAGEN line (no prefix) from the last
/// exchange. Pure: the same inputs always yield the same output.
pub fn build_fallback(ctx: &FallbackContext) -> String {
    let text = format!(
        "{} {}",
        ctx.last_assistant.unwrap_or_default(),
        ctx.last_user.unwrap_or_default()
    )
    .to_lowercase()
    .replace(['\n', '\r'], " ");
    let text = QUOTES_RE.replace_all(&text, "");
    let text = PUNCT_RE.replace_all(&text, " ");
    let text = text.trim();

    let mut collected: Vec<String> = vocab::MANDATORY_SUBJECT
        .iter()
        .map(|t| t.to_string())
        .collect();

    for word in vocab::FALLBACK_ENVIRONMENTS {
        if text.contains(word) {
            collected.push((*word).to_string());
        }
    }
    for word in vocab::FALLBACK_ACTIONS {
        if text.contains(word) {
            collected.push((*word).to_string());
        }
    }
    for word in vocab::FALLBACK_CLOTHING {
        if text.contains(word) {
            collected.push((*word).to_string());
        }
    }
    for color in vocab::HAIR_COLORS {
        let key = color.split_whitespace().next().unwrap_or_default();
        if text.contains(key) {
            collected.push((*color).to_string());
        }
    }
    for color in vocab::EYE_COLORS {
        let key = color.split_whitespace().next().unwrap_or_default();
        if text.contains(key) {
            collected.push((*color).to_string());
        }
    }

    collected.extend(vocab::BASELINE_STYLE.iter().map(|t| t.to_string()));

    if let Some(master) = ctx.image_prompt_master {
        collected.extend(vocab::appearance_traits(master));
    }
    if let Some(name) = ctx.character_name.map(str::trim).filter(|n| !n.is_empty()) {
        collected.push(name.to_lowercase());
    }

    tags::dedup(
        collected
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(tags::compact)
            .collect(),
    )
    .join(", ")
}
