//! Language definitions for the languages served by the Bhashini pipeline
//!
//! English is the working language of the generative backends; every other
//! language is routed through translation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
    Gujarati,
    Kannada,
    Malayalam,
    Marathi,
    Odia,
    Punjabi,
    Tamil,
    Telugu,
    Assamese,
    Urdu,
}

/// Model family used to pick ASR/TTS service ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFamily {
    English,
    IndoAryan,
    Dravidian,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Bengali => "bn",
            Self::Gujarati => "gu",
            Self::Kannada => "kn",
            Self::Malayalam => "ml",
            Self::Marathi => "mr",
            Self::Odia => "or",
            Self::Punjabi => "pa",
            Self::Tamil => "ta",
            Self::Telugu => "te",
            Self::Assamese => "as",
            Self::Urdu => "ur",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Bengali => "Bengali",
            Self::Gujarati => "Gujarati",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Marathi => "Marathi",
            Self::Odia => "Odia",
            Self::Punjabi => "Punjabi",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Assamese => "Assamese",
            Self::Urdu => "Urdu",
        }
    }

    pub fn family(&self) -> LanguageFamily {
        match self {
            Self::English => LanguageFamily::English,
            Self::Kannada | Self::Malayalam | Self::Tamil | Self::Telugu => {
                LanguageFamily::Dravidian
            }
            _ => LanguageFamily::IndoAryan,
        }
    }

    /// Parse from string (case-insensitive, accepts codes and names)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "en" | "eng" | "english" => Some(Self::English),
            "hi" | "hin" | "hindi" => Some(Self::Hindi),
            "bn" | "ben" | "bengali" | "bangla" => Some(Self::Bengali),
            "gu" | "guj" | "gujarati" => Some(Self::Gujarati),
            "kn" | "kan" | "kannada" => Some(Self::Kannada),
            "ml" | "mal" | "malayalam" => Some(Self::Malayalam),
            "mr" | "mar" | "marathi" => Some(Self::Marathi),
            "or" | "ori" | "odia" | "oriya" => Some(Self::Odia),
            "pa" | "pan" | "punjabi" | "panjabi" => Some(Self::Punjabi),
            "ta" | "tam" | "tamil" => Some(Self::Tamil),
            "te" | "tel" | "telugu" => Some(Self::Telugu),
            "as" | "asm" | "assamese" => Some(Self::Assamese),
            "ur" | "urd" | "urdu" => Some(Self::Urdu),
            _ => None,
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Self::English,
            Self::Hindi,
            Self::Bengali,
            Self::Gujarati,
            Self::Kannada,
            Self::Malayalam,
            Self::Marathi,
            Self::Odia,
            Self::Punjabi,
            Self::Tamil,
            Self::Telugu,
            Self::Assamese,
            Self::Urdu,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| Error::UnsupportedLanguage(s.to_string()))
    }
}

// Serialized as the ISO code so wire payloads carry "hi", not "Hindi".
impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str_loose(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported language: {}", s)))
    }
}
