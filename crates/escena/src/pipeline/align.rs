//! Derives IMAGEN tags from the action span so the image tracks the
//! narrative. Keyword-driven and idempotent: the same action text always
//! yields the same tag set.

use super::spans;
use super::tags;
use super::vocab;

/// Rewrite the IMAGEN line from the detected action text plus appearance
/// hints. Without an action span there is no context to align to and the
/// text is returned unchanged.
pub fn align(
    full_text: &str,
    image_prompt_master: Option<&str>,
    character_name: Option<&str>,
) -> String {
    let Some(action) = spans::find_action(full_text) else {
        return full_text.to_string();
    };
    let action = action.to_lowercase();

    let mut collected: Vec<String> = vocab::MANDATORY_SUBJECT
        .iter()
        .map(|t| t.to_string())
        .collect();
    for (pattern, rule_tags) in vocab::ALIGN_RULES.iter() {
        if pattern.is_match(&action) {
            collected.extend(rule_tags.iter().map(|t| t.to_string()));
        }
    }
    if let Some(master) = image_prompt_master {
        collected.extend(vocab::appearance_traits(master));
    }
    if let Some(name) = character_name.map(str::trim).filter(|n| !n.is_empty()) {
        // The one identifier allowed to survive sanitization.
        collected.push(name.to_lowercase());
    }

    let collected = tags::dedup(
        collected
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(tags::compact)
            .collect(),
    );

    let new_line = format!("IMAGEN: {}", collected.join(", "));
    let mut lines: Vec<String> = full_text.split('\n').map(str::to_string).collect();
    match spans::locate_imagen(&lines) {
        Some(i) => lines[i] = new_line,
        None => lines.push(new_line),
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imagen_line(text: &str) -> String {
        text.lines()
            .find(|l| l.starts_with("IMAGEN:"))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_align_without_action_is_identity() {
        let text = "\"Hola\"\nIMAGEN: bedroom, adult";
        assert_eq!(align(text, None, None), text);
    }

    #[test]
    fn test_align_rewrites_line_from_action() {
        let text = "*Me acerco a la cama y te beso*\n\"Ven\"\nIMAGEN: old tags";
        let line = imagen_line(&align(text, None, None));
        assert!(line.contains("1person"));
        assert!(line.contains("bedroom"));
        assert!(line.contains("kissing"));
        assert!(!line.contains("old tags"));
    }

    #[test]
    fn test_align_appends_line_when_missing() {
        let text = "*Te abrazo en el sofá*\n\"Quédate\"";
        let aligned = align(text, None, None);
        let line = imagen_line(&aligned);
        assert!(aligned.ends_with(&line));
        assert!(line.contains("living room"));
    }

    #[test]
    fn test_align_adds_appearance_and_character_name() {
        let text = "*Te miro y me acerco*\nIMAGEN: x";
        let line = imagen_line(&align(text, Some("blonde hair, green eyes"), Some("Nyx")));
        assert!(line.contains("blonde hair"));
        assert!(line.contains("green eyes"));
        assert!(line.contains("nyx"));
    }

    #[test]
    fn test_align_is_idempotent_for_same_action() {
        let text = "*Te beso en la cama*\n\"Ven aquí\"\nIMAGEN: seed";
        let once = align(text, Some("red hair"), Some("nyx"));
        let twice = align(&once, Some("red hair"), Some("nyx"));
        assert_eq!(once, twice);
    }
}
