// src/types/cv_data.rs
//! CV data structures shared by the parser, the translation service and the exports

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CvError;

// ===== Spreadsheet side =====

/// First two cells of one spreadsheet row, rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub section: Option<String>,
    pub detail: Option<String>,
}

impl RawRow {
    pub fn new(section: Option<String>, detail: Option<String>) -> Self {
        Self { section, detail }
    }

    /// Convenience for literal rows; empty strings become empty cells
    pub fn cells(section: &str, detail: &str) -> Self {
        let cell = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self::new(cell(section), cell(detail))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSection {
    pub title: String,
    pub items: Vec<String>,
}

// ===== Translation side =====

/// One section as returned by the translation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedSection {
    pub ar_title: String,
    pub en_title: String,
    pub en_items: Vec<String>,
    pub icon: String,
}

/// Unified bilingual section, the unit every view and export works on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvSection {
    pub id: String,
    pub ar_title: String,
    pub ar_items: Vec<String>,
    pub en_title: String,
    pub en_items: Vec<String>,
    pub icon: String,
}

impl CvSection {
    pub fn title(&self, language: Language) -> &str {
        match language {
            Language::Ar => &self.ar_title,
            Language::En => &self.en_title,
        }
    }

    pub fn items(&self, language: Language) -> &[String] {
        match language {
            Language::Ar => &self.ar_items,
            Language::En => &self.en_items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCv {
    pub sections: Vec<CvSection>,
    pub source_file: String,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedCv {
    pub fn new(sections: Vec<CvSection>, source_file: impl Into<String>) -> Self {
        Self {
            sections,
            source_file: source_file.into(),
            generated_at: Utc::now(),
        }
    }
}

// ===== Presentation side =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Language::Ar
    }

    pub fn dir(self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }

    pub fn font_family(self) -> &'static str {
        match self {
            Language::Ar => "'Cairo', sans-serif",
            Language::En => "'Poppins', sans-serif",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "arabic" | "العربية" => Ok(Language::Ar),
            "en" | "english" => Ok(Language::En),
            other => Err(CvError::InvalidInput(format!(
                "Unsupported language: {}. Use ar or en",
                other
            ))),
        }
    }
}

pub const DEFAULT_PROFILE_PICTURE: &str = "https://placehold.co/96x96/FFFFFF/3B82F6?text=CV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePicture {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ProfilePicture {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }

    /// File extension used when the picture is written next to an export
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

/// Image source for headers and sidebars: the uploaded picture or the placeholder
pub fn picture_src(picture: Option<&ProfilePicture>) -> String {
    picture
        .map(ProfilePicture::data_url)
        .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("AR".parse::<Language>().unwrap(), Language::Ar);
        assert_eq!(" english ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Ar);
    }

    #[test]
    fn test_language_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"ar\"").unwrap();
        assert_eq!(lang, Language::Ar);
    }

    #[test]
    fn test_translated_section_requires_all_fields() {
        let missing_icon = r#"[{"ar_title":"التعليم","en_title":"Education","en_items":[]}]"#;
        assert!(serde_json::from_str::<Vec<TranslatedSection>>(missing_icon).is_err());
    }

    #[test]
    fn test_picture_data_url() {
        let picture = ProfilePicture::new(vec![1, 2, 3], "image/png");
        assert_eq!(picture.data_url(), "data:image/png;base64,AQID");
        assert_eq!(picture_src(None), DEFAULT_PROFILE_PICTURE);
        assert_eq!(ProfilePicture::new(vec![], "image/jpeg").extension(), "jpg");
    }

    #[test]
    fn test_section_localized_accessors() {
        let section = CvSection {
            id: "education".to_string(),
            ar_title: "التعليم".to_string(),
            ar_items: vec!["بكالوريوس".to_string()],
            en_title: "Education".to_string(),
            en_items: vec!["BSc".to_string()],
            icon: "fas fa-graduation-cap".to_string(),
        };
        assert_eq!(section.title(Language::En), "Education");
        assert_eq!(section.items(Language::Ar), ["بكالوريوس".to_string()]);
    }
}
