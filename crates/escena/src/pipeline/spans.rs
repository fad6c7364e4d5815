//! Span extraction over generated roleplay text: the `*action*` stage
//! direction, the quoted dialogue, the bracketed mood note, and the IMAGEN
//! directive line.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ACTION_RE: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
    static ref DIALOGUE_RE: Regex = Regex::new(r#""([^"]+)"|“([^”]+)”"#).unwrap();
    static ref MOOD_RE: Regex = Regex::new(r"\[([^\]]+)\]").unwrap();
    static ref MOOD_LABEL_RE: Regex = Regex::new(r"(?i)^estado\s*de\s*ánimo\s*:\s*").unwrap();
    static ref IMAGEN_PREFIX_RE: Regex = Regex::new(r"(?i)^\s*IMAGEN:\s*").unwrap();
}

/// Inner text of the first `*action*` span, scanning lines in order.
/// Original casing is preserved; callers lower-case for keyword matching.
pub fn find_action(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(caps) = ACTION_RE.captures(line) {
            return Some(caps[1].trim().to_string());
        }
    }
    None
}

/// Inner text of the first quoted span, straight or typographic quotes.
pub fn find_dialogue(text: &str) -> Option<String> {
    DIALOGUE_RE.captures(text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// Inner text of the first bracketed span, with the mood label stripped.
pub fn find_mood(text: &str) -> Option<String> {
    MOOD_RE.captures(text).map(|caps| {
        let inner = caps[1].trim();
        MOOD_LABEL_RE.replace(inner, "").trim().to_string()
    })
}

/// Whether a line carries the IMAGEN directive.
pub fn is_imagen_line(line: &str) -> bool {
    IMAGEN_PREFIX_RE.is_match(line)
}

/// Index of the IMAGEN line, scanning from the last line backward. The
/// directive is expected near the end, and a backward scan picks the last
/// occurrence deterministically if a model emits more than one.
pub fn locate_imagen<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    (0..lines.len())
        .rev()
        .find(|&i| is_imagen_line(lines[i].as_ref()))
}

/// The literal `IMAGEN:` prefix of a line, whitespace included, so a rewrite
/// can preserve the original capitalization and spacing.
pub fn imagen_prefix(line: &str) -> Option<String> {
    IMAGEN_PREFIX_RE.find(line).map(|m| m.as_str().to_string())
}

/// Tag content of an IMAGEN line, prefix removed.
pub fn imagen_content(line: &str) -> String {
    IMAGEN_PREFIX_RE.replace(line, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_action_returns_first_span_with_case() {
        let text = "\"Hola\"\n*Me Acerco despacio* y *sonrío*";
        assert_eq!(find_action(text).as_deref(), Some("Me Acerco despacio"));
    }

    #[test]
    fn test_find_action_none_without_delimiters() {
        assert_eq!(find_action("sin accion aqui"), None);
    }

    #[test]
    fn test_find_dialogue_straight_and_typographic() {
        assert_eq!(
            find_dialogue("*acto* \"Ven aquí\"").as_deref(),
            Some("Ven aquí")
        );
        assert_eq!(find_dialogue("“Quédate”").as_deref(), Some("Quédate"));
    }

    #[test]
    fn test_find_mood_strips_label() {
        assert_eq!(
            find_mood("[Estado de ánimo: juguetona]").as_deref(),
            Some("juguetona")
        );
        assert_eq!(find_mood("[curiosa]").as_deref(), Some("curiosa"));
    }

    #[test]
    fn test_locate_imagen_picks_last_occurrence() {
        let lines = vec![
            "IMAGEN: first",
            "\"hola\"",
            "  imagen: second",
        ];
        assert_eq!(locate_imagen(&lines), Some(2));
    }

    #[test]
    fn test_locate_imagen_none() {
        let lines = vec!["\"hola\"", "*accion*"];
        assert_eq!(locate_imagen(&lines), None);
    }

    #[test]
    fn test_imagen_prefix_and_content() {
        let line = "  Imagen:  bedroom, adult";
        assert_eq!(imagen_prefix(line).as_deref(), Some("  Imagen:  "));
        assert_eq!(imagen_content(line), "bedroom, adult");
    }
}
