//! Spoken announcements and record failure messages.
//!
//! English (`"en"`) and French (`"fr"`) are available; any other code falls
//! back to English.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lang {
    En,
    Fr,
}

/// Phrase set for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phrasebook {
    lang: Lang,
}

impl Phrasebook {
    pub fn new(language: &str) -> Self {
        let lang = if language.trim().eq_ignore_ascii_case("fr") {
            Lang::Fr
        } else {
            Lang::En
        };
        Self { lang }
    }

    pub fn analysing(&self, file_name: &str) -> String {
        match self.lang {
            Lang::En => format!("Analysing image {file_name}. Please wait."),
            Lang::Fr => format!("Analyse de l'image {file_name} en cours. Veuillez patienter."),
        }
    }

    pub fn description(&self, file_name: &str, text: &str) -> String {
        match self.lang {
            Lang::En => format!("Description of image {file_name}: {text}"),
            Lang::Fr => format!("Description de l'image {file_name} : {text}"),
        }
    }

    /// Spoken on failure; includes the underlying error detail.
    pub fn error(&self, detail: &str) -> String {
        match self.lang {
            Lang::En => format!("An error occurred while analysing the image: {detail}"),
            Lang::Fr => format!("Une erreur est survenue lors de l'analyse de l'image : {detail}"),
        }
    }

    /// Stored on a failed record. Fixed text, never the raw error.
    pub fn failure_message(&self, auth: bool) -> &'static str {
        match (self.lang, auth) {
            (Lang::En, false) => "Error while analysing the image.",
            (Lang::En, true) => {
                "The description service is not configured. Check the API key."
            }
            (Lang::Fr, false) => "Erreur lors de l'analyse de l'image.",
            (Lang::Fr, true) => {
                "Le service de description n'est pas configuré. Vérifiez la clé d'API."
            }
        }
    }

    pub fn welcome(&self) -> &'static str {
        match self.lang {
            Lang::En => {
                "Accessible image description loaded. Select an image to hear its description."
            }
            Lang::Fr => {
                "Application de description d'images accessible chargée. \
                 Vous pouvez sélectionner une image pour obtenir sa description."
            }
        }
    }

    pub fn test_sentence(&self) -> &'static str {
        match self.lang {
            Lang::En => {
                "This is a speech synthesis test. Hello and welcome to the accessible image description application."
            }
            Lang::Fr => {
                "Ceci est un test de la synthèse vocale. \
                 Bonjour et bienvenue dans l'application de description d'images accessible."
            }
        }
    }
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self::new("en")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_name_the_file() {
        let en = Phrasebook::new("en");
        assert!(en.analysing("cat.png").contains("cat.png"));
        assert!(en.description("cat.png", "A cat.").contains("cat.png"));
        assert!(en.description("cat.png", "A cat.").ends_with("A cat."));
    }

    #[test]
    fn error_includes_detail_but_failure_message_does_not() {
        let en = Phrasebook::new("en");
        assert!(en.error("connection refused").contains("connection refused"));
        assert!(!en.failure_message(false).is_empty());
        assert_ne!(en.failure_message(false), en.failure_message(true));
    }

    #[test]
    fn french_and_fallback() {
        assert!(Phrasebook::new("FR").analysing("a.png").starts_with("Analyse"));
        assert_eq!(Phrasebook::new("de"), Phrasebook::default());
    }
}
