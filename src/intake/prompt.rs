//! Description instructions sent alongside the image.
//!
//! [`PromptBuilder`] picks one of three fixed instructions per
//! [`DetailLevel`]. English (`"en"`) and French (`"fr"`) have dedicated
//! phrasings; any other language code falls back to English.

use super::encoder::DetailLevel;

// ---------------------------------------------------------------------------
// English instructions
// ---------------------------------------------------------------------------

const BRIEF_EN: &str = "\
Describe this image briefly for a blind person. \
Give only the main subject and its setting in one or two short sentences.";

const MODERATE_EN: &str = "\
Describe this image concisely for a blind person. \
Cover the main subject, the setting, notable colours and any visible text. \
Stay factual and avoid speculation.";

const DETAILED_EN: &str = "\
Describe this image as precisely as possible for a blind person. \
Cover every subject and its position, the setting, colours, lighting, \
facial expressions and any visible text, read out word for word. \
Order the description from the most to the least important element. \
Stay factual and say so when something cannot be identified.";

// ---------------------------------------------------------------------------
// French instructions
// ---------------------------------------------------------------------------

const BRIEF_FR: &str = "\
Décris brièvement cette image pour une personne aveugle. \
Indique seulement le sujet principal et le lieu en une ou deux phrases courtes.";

const MODERATE_FR: &str = "\
Décris cette image de façon concise pour une personne aveugle. \
Indique le sujet principal, le lieu, les couleurs marquantes et le texte visible. \
Reste factuel et évite les suppositions.";

const DETAILED_FR: &str = "\
Décris cette image de la manière la plus précise possible pour une personne aveugle. \
Indique chaque sujet et sa position, le lieu, les couleurs, la lumière, \
les expressions des visages et tout texte visible, lu mot pour mot. \
Ordonne la description de l'élément le plus important au moins important. \
Reste factuel et signale ce qui ne peut pas être identifié.";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Selects the instruction text for a detail level.
///
/// # Example
/// ```rust
/// use image_narrator::intake::{prompt::PromptBuilder, DetailLevel};
///
/// let builder = PromptBuilder::new("en");
/// assert!(builder.instruction(DetailLevel::Brief).contains("blind"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: String,
}

impl PromptBuilder {
    /// Create a builder for an ISO-639-1 language code.
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
        }
    }

    pub fn instruction(&self, level: DetailLevel) -> &'static str {
        match (self.language.as_str(), level) {
            ("fr", DetailLevel::Brief) => BRIEF_FR,
            ("fr", DetailLevel::Moderate) => MODERATE_FR,
            ("fr", DetailLevel::Detailed) => DETAILED_FR,
            (_, DetailLevel::Brief) => BRIEF_EN,
            (_, DetailLevel::Moderate) => MODERATE_EN,
            (_, DetailLevel::Detailed) => DETAILED_EN,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
