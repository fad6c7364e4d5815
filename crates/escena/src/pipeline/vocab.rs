//! Vocabulary tables for the IMAGEN stages. These are versioned data, not
//! logic: the transformation passes stay language-agnostic and the Spanish/
//! English keyword families live here where they can be extended in one place.

use lazy_static::lazy_static;
use regex::Regex;

/// Terms that must never appear inside an output tag, matched as
/// case-insensitive substrings of the lower-cased token.
pub const BANNED_TERMS: &[&str] = &[
    "school uniform",
    "youthful",
    "school setting",
    "after school",
    "student",
    "adolescent",
    "child",
    "young",
    "teenager",
];

/// Generic population-count tags; at least one must survive sanitization.
pub const SUBJECT_TAGS: &[&str] = &[
    "1girl", "1boy", "1person", "2girls", "2boys", "couple", "group", "solo", "adult",
];

/// Subject triple seeded into aligned and fallback tag lists.
pub const MANDATORY_SUBJECT: &[&str] = &["1person", "solo", "adult"];

/// Baseline style tags for context-synthesized IMAGEN lines.
pub const BASELINE_STYLE: &[&str] = &["cinematic lighting", "high detail", "hyperrealistic"];

// Padding pools, pushed in this order when the tag line is under the word
// floor.
pub const BASE_POSE: &[&str] = &[
    "natural pose",
    "dynamic pose",
    "looking at camera",
    "eye contact",
];
pub const BASE_LIGHT: &[&str] = &[
    "cinematic lighting",
    "soft lighting",
    "warm lighting",
    "dramatic shadows",
];
pub const BASE_CAMERA: &[&str] = &[
    "close-up",
    "medium shot",
    "full body",
    "portrait",
    "tilted angle",
    "from above",
    "from below",
    "over the shoulder",
];
pub const VISUAL_DETAIL: &[&str] = &[
    "high detail",
    "hyperrealistic",
    "shallow depth of field",
    "soft focus",
    "skin texture",
    "glossy skin",
    "highlighted curves",
    "sensual mood",
    "teasing smile",
    "delicate hands",
    "long eyelashes",
    "full lips",
];

// Appearance vocabularies. Hair and eye colors are matched by their first
// word as a substring of the hint; accessories are matched whole.
pub const HAIR_COLORS: &[&str] = &[
    "blonde hair",
    "brown hair",
    "black hair",
    "red hair",
    "white hair",
    "silver hair",
];
pub const EYE_COLORS: &[&str] = &[
    "blue eyes",
    "green eyes",
    "brown eyes",
    "hazel eyes",
    "grey eyes",
];
pub const ACCESSORIES: &[&str] = &[
    "glasses",
    "earrings",
    "necklace",
    "bracelet",
    "hat",
    "hoodie",
    "jacket",
];

// Simple-word vocabularies scanned by the fallback builder.
pub const FALLBACK_ENVIRONMENTS: &[&str] = &[
    "street", "room", "bedroom", "kitchen", "office", "forest", "beach", "city", "night",
    "sunset", "rain", "snow", "park", "balcony",
];
pub const FALLBACK_ACTIONS: &[&str] = &[
    "walking",
    "sitting",
    "running",
    "posing",
    "smiling",
    "reading",
    "typing",
    "drinking",
    "looking at camera",
];
pub const FALLBACK_CLOTHING: &[&str] = &[
    "dress", "skirt", "jeans", "jacket", "hoodie", "coat", "t-shirt", "shirt", "blouse",
    "sweater", "boots", "heels", "sneakers", "hat",
];

/// An ordered keyword family: when the pattern matches the lower-cased action
/// text, every tag in the family is appended.
pub type KeywordRule = (Regex, &'static [&'static str]);

fn rule(pattern: &str, tags: &'static [&'static str]) -> KeywordRule {
    (Regex::new(&format!("(?i){}", pattern)).unwrap(), tags)
}

lazy_static! {
    /// Action-to-tag families applied by the aligner. Rules are independent
    /// and additive; several may fire on the same action text.
    pub static ref ALIGN_RULES: Vec<KeywordRule> = vec![
        rule(r"cama|bed", &["bedroom", "bed", "soft lighting"]),
        rule(r"sof[áa]|sofa|couch", &["living room", "couch", "warm lighting"]),
        rule(r"ducha|shower", &["bathroom", "shower", "wet skin", "steamy"]),
        rule(r"cocina|kitchen", &["kitchen", "counter", "evening"]),
        rule(r"me acerco|acerc|closer|approach", &["close-up", "intimate"]),
        rule(r"bes|kiss", &["kissing", "mouth close-up", "lip contact"]),
        rule(r"toc|touch|acarici|caress", &["touching", "hands on body"]),
        rule(r"desvist|undress|quitar la ropa|strip", &["undressing", "clothes off"]),
        rule(r"susurr|whisper", &["whispering", "ear close-up"]),
        rule(
            r"blowjob|oral|suck|chupar|mamar|felaci[óo]n|fellatio",
            &["fellatio", "mouth", "tongue", "on knees", "handjob"],
        ),
        rule(
            r"sex|fuck|intercourse|penetration|penetrar|doggy|cowgirl|missionary|ride|mount",
            &["sexually explicit", "vaginal", "spread legs", "leg up", "on side", "arch back"],
        ),
        rule(r"pierna|leg", &["spread legs"]),
        rule(r"cadera|hip|trasero|culo|ass", &["ass"]),
        rule(r"vagina|pussy|entre tus piernas|entre mis piernas", &["pussy"]),
        rule(r"lengua|tongue", &["tongue out"]),
        rule(r"pen[eí]s|dick|erect", &["sexually active", "sexually explicit"]),
    ];

    /// Environment families used while padding toward the word floor.
    pub static ref PADDING_ENVIRONMENT_RULES: Vec<KeywordRule> = vec![
        rule(r"cama|bed", &["bedroom", "bed", "soft lighting"]),
        rule(r"sof[áa]|sofa|couch", &["living room", "couch", "warm lighting"]),
        rule(r"ducha|shower", &["bathroom", "shower", "wet skin", "steamy"]),
    ];

    /// Activity families used while padding toward the word floor.
    pub static ref PADDING_ACTIVITY_RULES: Vec<KeywordRule> = vec![
        rule(
            r"kiss|kissing|beso|besar",
            &["kissing", "lip contact", "tongue", "mouth close-up", "intimate"],
        ),
        rule(
            r"blowjob|oral|suck|chupar|mamar|felaci[óo]n|fellatio",
            &["fellatio", "mouth", "tongue", "on knees", "handjob"],
        ),
        rule(
            r"sex|fuck|intercourse|penetration|penetrar|doggy|cowgirl|missionary|ride|mount",
            &["sexually explicit", "vaginal", "spread legs", "leg up", "on side", "arch back"],
        ),
        rule(r"hug|embrace|abraz", &["intimate", "close contact", "hands on body"]),
    ];
}

/// Appearance traits recognized inside an image-prompt-master hint.
pub fn appearance_traits(hint: &str) -> Vec<String> {
    let hint = hint.to_lowercase();
    let mut traits = Vec::new();
    for color in HAIR_COLORS {
        let key = color.split_whitespace().next().unwrap_or_default();
        if hint.contains(key) {
            traits.push((*color).to_string());
        }
    }
    for color in EYE_COLORS {
        let key = color.split_whitespace().next().unwrap_or_default();
        if hint.contains(key) {
            traits.push((*color).to_string());
        }
    }
    for accessory in ACCESSORIES {
        if hint.contains(accessory) {
            traits.push((*accessory).to_string());
        }
    }
    traits
}
