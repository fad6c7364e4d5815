//! Rebuilds free-form generated text into the canonical three-line roleplay
//! block: `*action*`, `"dialogue"`, `[mood]`, each optional, in that order,
//! with the IMAGEN line preserved as the final line.

use lazy_static::lazy_static;
use regex::Regex;

use super::spans;

/// Dialogue shorter than this is considered too thin and gets replaced.
const MIN_DIALOGUE_CHARS: usize = 15;
/// When no span is detected at all, this much of the body becomes dialogue.
const BODY_SNIPPET_CHARS: usize = 220;
/// How much of the prior assistant message seeds an enriched dialogue.
const CONTEXT_SNIPPET_CHARS: usize = 120;

lazy_static! {
    static ref IMAGEN_FRAGMENT_RE: Regex = Regex::new(r"(?i)IMAGEN:[^\n]*").unwrap();
}

/// Compress a generated reply into a single roleplay block.
///
/// Dialogue enrichment never draws on `last_user`; a reply must not echo the
/// user's own words back. Thin dialogue is rebuilt from `last_assistant`
/// instead, or from a fixed proactive line when no prior assistant text
/// exists.
pub fn compress(
    full_text: &str,
    user_name: Option<&str>,
    last_user: Option<&str>,
    last_assistant: Option<&str>,
) -> String {
    let lines: Vec<&str> = full_text.split('\n').collect();
    let imagen_index = spans::locate_imagen(&lines);
    let imagen_line = imagen_index.map(|i| lines[i].to_string());

    // Keep only the last IMAGEN line; a model occasionally emits several and
    // stray earlier ones must not leak into the body.
    let body = lines
        .iter()
        .filter(|line| !spans::is_imagen_line(line))
        .copied()
        .collect::<Vec<&str>>()
        .join(" ");
    let body = normalize_ws(&body);

    let action = spans::find_action(&body);
    let dialogue = spans::find_dialogue(&body);
    let mood = spans::find_mood(&body).filter(|m| !m.is_empty());

    let mut result_lines: Vec<String> = Vec::new();

    if action.is_none() && dialogue.is_none() && mood.is_none() {
        // Nothing recognizable: the leading stretch of the body becomes the
        // dialogue line as-is.
        let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
        if !snippet.is_empty() {
            result_lines.push(format!("\"{}\"", snippet));
        }
    } else {
        if let Some(action) = &action {
            result_lines.push(format!("*{}*", normalize_ws(action)));
        }
        let mut final_dialogue = dialogue.unwrap_or_default();
        if dialogue_is_thin(&final_dialogue, user_name, last_user) {
            final_dialogue = enriched_dialogue(last_assistant, user_name);
        }
        if !final_dialogue.is_empty() {
            result_lines.push(format!("\"{}\"", normalize_ws(&final_dialogue)));
        }
        if let Some(mood) = &mood {
            result_lines.push(format!("[{}]", normalize_ws(mood)));
        }
    }

    if let Some(imagen) = imagen_line {
        result_lines.push(imagen);
    }
    result_lines.join("\n")
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn dialogue_is_thin(dialogue: &str, user_name: Option<&str>, last_user: Option<&str>) -> bool {
    if dialogue.is_empty() || dialogue.chars().count() < MIN_DIALOGUE_CHARS {
        return true;
    }
    if let Some(last_user) = last_user.map(str::trim).filter(|t| !t.is_empty()) {
        // Anti-echo: restating the user's own message counts as thin.
        if dialogue.to_lowercase() == last_user.to_lowercase() {
            return true;
        }
    }
    if let Some(name) = user_name.map(str::trim).filter(|n| !n.is_empty()) {
        let escaped = regex::escape(name);
        let mention = Regex::new(&format!(r"(?i)^@?{}$", escaped)).unwrap();
        let greeting = Regex::new(&format!(r"(?i)^hola[, ]*{}$", escaped)).unwrap();
        if mention.is_match(dialogue) || greeting.is_match(dialogue) {
            return true;
        }
    }
    false
}

fn enriched_dialogue(last_assistant: Option<&str>, user_name: Option<&str>) -> String {
    let name = user_name.map(str::trim).filter(|n| !n.is_empty());
    let last_assistant = last_assistant.filter(|t| !t.trim().is_empty());

    let Some(last_assistant) = last_assistant else {
        // Proactive default when the conversation has no assistant turn yet.
        return match name {
            Some(name) => format!("Te miro con deseo, {}. Ven más cerca.", name),
            None => "Te miro con deseo. Ven más cerca.".to_string(),
        };
    };

    let cleaned = IMAGEN_FRAGMENT_RE.replace(last_assistant, "");
    let cleaned = cleaned.replace(['"', '“', '”'], "");
    let cleaned = normalize_ws(&cleaned);
    let snippet: String = cleaned.chars().take(CONTEXT_SNIPPET_CHARS).collect();
    if snippet.is_empty() {
        return match name {
            Some(name) => format!("Susurro junto a tu oído, {}: quiero más de ti.", name),
            None => "Susurro junto a tu oído: quiero más de ti.".to_string(),
        };
    }
    match name {
        Some(name) => format!("{}... y ahora quiero más, {}. Acércate.", snippet, name),
        None => format!("{}... y ahora quiero más. Acércate.", snippet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_reassembles_block_in_fixed_order() {
        let raw = "[contenta] algo de relleno *Me acerco despacio*  más texto \"Quédate conmigo esta noche\"\nIMAGEN: bedroom, adult";
        let out = compress(raw, None, None, None);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[0], "*Me acerco despacio*");
        assert_eq!(lines[1], "\"Quédate conmigo esta noche\"");
        assert_eq!(lines[2], "[contenta]");
        assert_eq!(lines[3], "IMAGEN: bedroom, adult");
    }

    #[test]
    fn test_compress_keeps_only_last_imagen_line() {
        let raw = "IMAGEN: stray, early\n*Te miro*\n\"Ven aquí ahora mismo\"\nIMAGEN: bedroom, adult";
        let out = compress(raw, None, None, None);
        assert_eq!(out.matches("IMAGEN:").count(), 1);
        assert!(out.ends_with("IMAGEN: bedroom, adult"));
        assert!(!out.contains("stray"));
    }

    #[test]
    fn test_compress_wraps_plain_text_as_dialogue() {
        let out = compress("Te miro fijamente.", None, None, None);
        assert_eq!(out, "\"Te miro fijamente.\"");
    }

    #[test]
    fn test_compress_plain_text_caps_snippet() {
        let long = "palabra ".repeat(60);
        let out = compress(&long, None, None, None);
        assert!(out.starts_with('"') && out.ends_with('"'));
        assert!(out.chars().count() <= BODY_SNIPPET_CHARS + 2);
    }

    #[test]
    fn test_thin_dialogue_replaced_from_assistant_context() {
        let raw = "*Sonrío al verte entrar*\n\"@Marco\"";
        let out = compress(
            raw,
            Some("Marco"),
            Some("@Marco"),
            Some("Me acerco despacio y te miro a los ojos"),
        );
        let dialogue_line = out.split('\n').nth(1).unwrap();
        assert_ne!(dialogue_line, "\"@Marco\"");
        assert!(dialogue_line.contains("Me acerco despacio y te miro a los ojos"));
        assert!(dialogue_line.contains("Marco"));
    }

    #[test]
    fn test_thin_dialogue_proactive_default_without_context() {
        let raw = "*Sonrío*\n\"Hola, Marco\"";
        let out = compress(raw, Some("Marco"), None, None);
        assert!(out.contains("\"Te miro con deseo, Marco. Ven más cerca.\""));
    }

    #[test]
    fn test_dialogue_never_echoes_last_user() {
        let user_text = "Quiero que me digas un secreto";
        let raw = format!("*Te observo*\n\"{}\"", user_text);
        let out = compress(&raw, Some("Marco"), Some(user_text), Some("Anoche soñé contigo"));
        let dialogue_line = out.split('\n').nth(1).unwrap();
        assert_ne!(dialogue_line, format!("\"{}\"", user_text));
    }

    #[test]
    fn test_enrichment_strips_imagen_fragment_and_quotes() {
        let raw = "*Te miro*\n\"corto\"";
        let last = "\"Ven aquí\" IMAGEN: bedroom, adult";
        let out = compress(raw, None, None, Some(last));
        assert!(!out.split('\n').nth(1).unwrap().contains("IMAGEN"));
        assert!(out.split('\n').nth(1).unwrap().contains("Ven aquí"));
    }

    #[test]
    fn test_mood_label_stripped() {
        let raw = "*Me acerco lentamente*\n\"Quédate conmigo esta noche\"\n[Estado de ánimo: juguetona]";
        let out = compress(raw, None, None, None);
        assert!(out.contains("[juguetona]"));
    }
}
