//! Persona definitions.
//!
//! A persona document is a JSON object whose fields are all optional. Missing
//! fields resolve to defaults when the document is turned into a [`Persona`].

use serde::{Deserialize, Serialize};

/// Id of the persona used when nothing else resolves.
pub const DEFAULT_PERSONA_ID: &str = "default";

/// Raw persona document as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub language_style: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// A loaded persona with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    /// Name shown inside the system prompt.
    pub name: String,
    /// Name shown in listings; falls back to the id.
    pub display_name: String,
    pub description: String,
    pub personality: String,
    pub rules: Vec<String>,
    pub language_style: String,
    pub context: String,
}

impl Persona {
    pub const DEFAULT_NAME: &'static str = "Chatbot";
    pub const DEFAULT_PERSONALITY: &'static str = "Friendly";
    pub const DEFAULT_LANGUAGE_STYLE: &'static str = "Natural";
    pub const DEFAULT_DESCRIPTION: &'static str = "Không có mô tả";

    /// Resolve a document into a persona.
    ///
    /// Defaults fill only absent fields; an explicit `""` is kept. The listing
    /// name alone falls back to the id when the name is blank.
    pub fn from_document(id: impl Into<String>, doc: PersonaDocument) -> Self {
        let id = id.into();
        Self {
            display_name: doc
                .name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| id.clone()),
            name: doc.name.unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
            description: doc
                .description
                .unwrap_or_else(|| Self::DEFAULT_DESCRIPTION.to_string()),
            personality: doc
                .personality
                .unwrap_or_else(|| Self::DEFAULT_PERSONALITY.to_string()),
            rules: doc.rules,
            language_style: doc
                .language_style
                .unwrap_or_else(|| Self::DEFAULT_LANGUAGE_STYLE.to_string()),
            context: doc.context.unwrap_or_default(),
            id,
        }
    }

    pub fn summary(&self) -> PersonaSummary {
        PersonaSummary {
            id: self.id.clone(),
            name: self.display_name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Listing entry for a persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Whether `id` is a well-formed persona id (ASCII alphanumerics, `-`, `_`).
pub fn is_valid_persona_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
