//! Flat bilingual message table for user-facing strings.
//!
//! Lookup falls back to English when a key has no translation in the active
//! language, and echoes the key itself when it is missing everywhere. The
//! fallback is logged so missing translations surface in development.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Nl,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Nl => "nl",
        }
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    /// Unknown language codes fall back to English rather than failing.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "nl" => Self::Nl,
            _ => Self::En,
        })
    }
}

/// Resolve a message key for the given language.
pub fn message<'a>(language: Language, key: &'a str) -> &'a str {
    if let Some(text) = lookup(language, key) {
        return text;
    }
    if language != Language::En {
        if let Some(text) = lookup(Language::En, key) {
            tracing::warn!(
                event_name = "i18n_fallback",
                language = language.code(),
                key,
                "missing translation, falling back to English"
            );
            return text;
        }
    }
    tracing::warn!(event_name = "i18n_missing_key", key, "message key missing in every language");
    key
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    let text = match (language, key) {
        (Language::En, "wizard.missing-tier") => "Please choose a package to continue.",
        (Language::Nl, "wizard.missing-tier") => "Kies een pakket om verder te gaan.",
        (Language::En, "wizard.missing-technology") => {
            "Please choose a technology to continue."
        }
        (Language::Nl, "wizard.missing-technology") => {
            "Kies een technologie om verder te gaan."
        }
        (Language::En, "wizard.consultation-cta") => {
            "We will contact you to discuss your custom project."
        }
        (Language::Nl, "wizard.consultation-cta") => {
            "Wij nemen contact met u op om uw maatwerkproject te bespreken."
        }
        (Language::En, "submit.in-progress") => "Your request is being sent...",
        (Language::Nl, "submit.in-progress") => "Uw aanvraag wordt verzonden...",
        (Language::En, "submit.success") => {
            "Thank you for your request! We will contact you as soon as possible."
        }
        (Language::Nl, "submit.success") => {
            "Bedankt voor uw aanvraag! Wij nemen zo snel mogelijk contact met u op."
        }
        (Language::En, "submit.network-error") => {
            "Something went wrong while sending your request. Please try again."
        }
        (Language::Nl, "submit.network-error") => {
            "Er is iets misgegaan bij het verzenden van uw aanvraag. Probeer het opnieuw."
        }
        (Language::En, "submit.missing-contact-fields") => {
            "Please fill in your first name, last name and email address."
        }
        (Language::Nl, "submit.missing-contact-fields") => {
            "Vul uw voornaam, achternaam en e-mailadres in."
        }
        _ => return None,
    };
    Some(text)
}
