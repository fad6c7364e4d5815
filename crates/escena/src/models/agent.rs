use serde::{Deserialize, Serialize};

/// A roleplay persona. `name` is the display name the sanitizer must strip
/// from image tags; `character_name` is the one identifier explicitly allowed
/// to survive sanitization; `image_prompt_master` seeds appearance tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt_master: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
}

impl Agent {
    pub fn new<S: Into<String>, T: Into<String>>(id: S, name: T) -> Self {
        Agent {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_character_name<S: Into<String>>(mut self, character_name: S) -> Self {
        self.character_name = Some(character_name.into());
        self
    }

    pub fn with_image_prompt_master<S: Into<String>>(mut self, master: S) -> Self {
        self.image_prompt_master = Some(master.into());
        self
    }

    pub fn with_scenario<S: Into<String>>(mut self, scenario: S) -> Self {
        self.scenario = Some(scenario.into());
        self
    }
}
