// Supported translation languages and their NLLB-200 codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TopicError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    Es,
    De,
    It,
    Pt,
    Ru,
    Zh,
    Ja,
    Ko,
    Hi,
    Ar,
    Bn,
    Ta,
    Te,
    Ml,
}

impl Language {
    pub const ALL: [Language; 16] = [
        Language::En,
        Language::Fr,
        Language::Es,
        Language::De,
        Language::It,
        Language::Pt,
        Language::Ru,
        Language::Zh,
        Language::Ja,
        Language::Ko,
        Language::Hi,
        Language::Ar,
        Language::Bn,
        Language::Ta,
        Language::Te,
        Language::Ml,
    ];

    /// Two-letter ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Hi => "hi",
            Language::Ar => "ar",
            Language::Bn => "bn",
            Language::Ta => "ta",
            Language::Te => "te",
            Language::Ml => "ml",
        }
    }

    /// Language-plus-script code expected by NLLB models.
    pub fn nllb_code(&self) -> &'static str {
        match self {
            Language::En => "eng_Latn",
            Language::Fr => "fra_Latn",
            Language::Es => "spa_Latn",
            Language::De => "deu_Latn",
            Language::It => "ita_Latn",
            Language::Pt => "por_Latn",
            Language::Ru => "rus_Cyrl",
            Language::Zh => "zho_Hans",
            Language::Ja => "jpn_Jpan",
            Language::Ko => "kor_Hang",
            Language::Hi => "hin_Deva",
            Language::Ar => "ara_Arab",
            Language::Bn => "ben_Beng",
            Language::Ta => "tam_Taml",
            Language::Te => "tel_Telu",
            Language::Ml => "mal_Mlym",
        }
    }
}

impl FromStr for Language {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == lower)
            .ok_or_else(|| TopicError::UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
