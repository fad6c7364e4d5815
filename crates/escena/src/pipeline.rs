//! Post-processing pipeline for generated roleplay replies.
//!
//! Every assistant reply runs through four passes before it is persisted:
//! compress into the canonical block, synthesize an IMAGEN line if none
//! exists, align the IMAGEN tags with the action span, sanitize. The order is
//! load-bearing: alignment must see a guaranteed-present IMAGEN line, and
//! sanitization runs last because every earlier pass can (re-)introduce names
//! or short tag lists.
//!
//! The pipeline is pure, synchronous string transformation. It is total over
//! its input domain: any string, including the empty one, produces a valid
//! output.

pub mod align;
pub mod compress;
pub mod fallback;
pub mod sanitize;
pub mod spans;
pub mod tags;
pub mod vocab;

use fallback::FallbackContext;

/// Everything one chat turn knows about its surroundings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnContext<'a> {
    pub agent_name: &'a str,
    pub user_name: Option<&'a str>,
    pub character_name: Option<&'a str>,
    pub image_prompt_master: Option<&'a str>,
    pub last_user: Option<&'a str>,
    pub last_assistant: Option<&'a str>,
}

/// Run the full pipeline over a raw generated reply.
pub fn process(raw: &str, ctx: &TurnContext) -> String {
    let mut text = compress::compress(raw, ctx.user_name, ctx.last_user, ctx.last_assistant);

    let has_imagen = {
        let lines: Vec<&str> = text.split('\n').collect();
        spans::locate_imagen(&lines).is_some()
    };
    if !has_imagen {
        let fallback_tags = fallback::build_fallback(&FallbackContext {
            last_user: ctx.last_user,
            last_assistant: ctx.last_assistant,
            image_prompt_master: ctx.image_prompt_master,
            character_name: ctx.character_name,
        });
        text = if text.is_empty() {
            format!("IMAGEN: {}", fallback_tags)
        } else {
            format!("{}\nIMAGEN: {}", text, fallback_tags)
        };
    }

    let text = align::align(&text, ctx.image_prompt_master, ctx.character_name);
    sanitize::sanitize(&text, ctx.agent_name, ctx.user_name, ctx.character_name)
}

/// Narrow entry point for user-initiated correction of a stored message:
/// replaces only the IMAGEN line's tag content with the supplied prompt and
/// re-sanitizes. No compression, no re-alignment; the rest of the message is
/// untouched.
pub fn apply_prompt_edit(
    current: &str,
    new_prompt: &str,
    agent_name: &str,
    user_name: Option<&str>,
    character_name: Option<&str>,
) -> String {
    let imagen_line = format!("IMAGEN: {}", new_prompt.trim());
    let mut lines: Vec<String> = current.split('\n').map(str::to_string).collect();
    match spans::locate_imagen(&lines) {
        Some(i) => lines[i] = imagen_line,
        None => lines.push(imagen_line),
    }
    sanitize::sanitize(&lines.join("\n"), agent_name, user_name, character_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_always_emits_exactly_one_imagen_line() {
        let ctx = TurnContext {
            agent_name: "Alexa",
            ..Default::default()
        };
        for raw in ["", "Te miro fijamente.", "*Te beso*\n\"Ven aquí ahora\"\nIMAGEN: x"] {
            let out = process(raw, &ctx);
            let imagen_lines = out
                .lines()
                .filter(|l| spans::is_imagen_line(l))
                .count();
            assert_eq!(imagen_lines, 1, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_process_appends_fallback_when_missing() {
        let ctx = TurnContext {
            agent_name: "Alexa",
            last_assistant: Some("walking on the beach at sunset"),
            ..Default::default()
        };
        let out = process("\"Quédate conmigo esta noche\"", &ctx);
        let line = out.lines().last().unwrap();
        assert!(spans::is_imagen_line(line));
        assert!(line.contains("beach"));
    }

    #[test]
    fn test_process_empty_input_yields_only_the_imagen_line() {
        let ctx = TurnContext {
            agent_name: "Alexa",
            ..Default::default()
        };
        let out = process("", &ctx);
        assert!(!out.starts_with('\n'));
        assert_eq!(out.lines().count(), 1);
        assert!(spans::is_imagen_line(&out));
    }

    #[test]
    fn test_apply_prompt_edit_replaces_and_sanitizes() {
        let current = "*Te miro*\n\"Hola, quédate\"\nIMAGEN: old tags, alexa";
        let out = apply_prompt_edit(current, "bedroom, soft light, alexa", "Alexa", None, None);
        assert!(out.starts_with("*Te miro*\n\"Hola, quédate\"\n"));
        let line = out.lines().last().unwrap();
        assert!(line.contains("bedroom"));
        assert!(line.contains("soft light"));
        assert!(!line.contains("alexa"));
    }

    #[test]
    fn test_apply_prompt_edit_appends_when_no_imagen_line() {
        let out = apply_prompt_edit("\"Hola, quédate\"", "bedroom", "Alexa", None, None);
        let line = out.lines().last().unwrap();
        assert!(spans::is_imagen_line(line));
        assert!(line.contains("bedroom"));
    }
}
