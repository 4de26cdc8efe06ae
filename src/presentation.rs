// src/presentation.rs
//! View derivations over the current CV: sidebar card, navigation, scroll tracking

use serde::{Deserialize, Serialize};

use crate::core::state::StateSnapshot;
use crate::types::cv_data::{picture_src, CvSection, Language};
use crate::utils::value_after_colon;

/// Marker in the Arabic title of the personal-information section
const PERSONAL_INFO_MARKER: &str = "الشخصية";
/// How far above a section's top the scroll position may be and still count as inside it
const ACTIVE_SECTION_OFFSET: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCard {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionOffset {
    pub id: String,
    pub top: f64,
}

/// Everything a client needs to draw the current CV
#[derive(Debug, Clone, Serialize)]
pub struct CvView {
    pub language: Language,
    pub dir: &'static str,
    pub profile: ProfileCard,
    pub picture: String,
    pub navigation: Vec<NavEntry>,
    pub active_section: Option<String>,
    pub sections: Vec<CvSection>,
    pub source_file: String,
    pub generated_at: String,
}

impl CvView {
    /// `None` until a CV has been generated
    pub fn from_snapshot(snapshot: &StateSnapshot) -> Option<Self> {
        let cv = snapshot.cv.as_ref()?;
        let language = snapshot.language;
        let active = snapshot.active_section.as_deref();

        Some(Self {
            language,
            dir: language.dir(),
            profile: sidebar_profile(Some(&cv.sections), language),
            picture: picture_src(snapshot.profile_picture.as_deref()),
            navigation: navigation(&cv.sections, language, active),
            active_section: snapshot.active_section.clone(),
            sections: cv.sections.clone(),
            source_file: cv.source_file.clone(),
            generated_at: cv.generated_at.to_rfc3339(),
        })
    }
}

fn personal_info(sections: &[CvSection]) -> Option<&CvSection> {
    sections
        .iter()
        .find(|section| section.ar_title.contains(PERSONAL_INFO_MARKER))
}

/// First item containing any of `keys` (case-insensitive), reduced to its value
fn find_value<'a>(items: &'a [String], keys: &[&str]) -> Option<&'a str> {
    items
        .iter()
        .find(|item| {
            let item = item.to_lowercase();
            keys.iter().any(|key| item.contains(key))
        })
        .map(|item| value_after_colon(item))
        .filter(|value| !value.is_empty())
}

/// Name and title shown in the sidebar, in the selected language
pub fn sidebar_profile(sections: Option<&[CvSection]>, language: Language) -> ProfileCard {
    let Some(sections) = sections else {
        return ProfileCard {
            name: "CV Generator".to_string(),
            title: "Upload a file to start".to_string(),
        };
    };

    let Some(section) = personal_info(sections) else {
        return ProfileCard {
            name: "Your Name".to_string(),
            title: "Your Title".to_string(),
        };
    };

    let (name_keys, title_keys, name_fallback, title_fallback): (&[&str], &[&str], &str, &str) =
        match language {
            Language::Ar => (&["الإس"], &["الوظيفة"], "اسمك", "منصبك"),
            Language::En => (&["name"], &["role", "title"], "Your Name", "Your Title"),
        };

    let items = section.items(language);
    ProfileCard {
        name: find_value(items, name_keys)
            .unwrap_or(name_fallback)
            .to_string(),
        title: find_value(items, title_keys)
            .unwrap_or(title_fallback)
            .to_string(),
    }
}

/// Name and title for export headers; always read from the English items
pub fn export_header(sections: &[CvSection]) -> ProfileCard {
    let items = personal_info(sections)
        .map(|section| section.en_items.as_slice())
        .unwrap_or_default();

    ProfileCard {
        name: find_value(items, &["name"]).unwrap_or("CV").to_string(),
        title: find_value(items, &["role", "title"])
            .unwrap_or("Details")
            .to_string(),
    }
}

pub fn navigation(sections: &[CvSection], language: Language, active: Option<&str>) -> Vec<NavEntry> {
    sections
        .iter()
        .map(|section| NavEntry {
            id: section.id.clone(),
            label: section.title(language).to_string(),
            icon: section.icon.clone(),
            active: active == Some(section.id.as_str()),
        })
        .collect()
}

/// The last section, in document order, whose top (less the offset) the
/// scroll position has passed
pub fn active_section(offsets: &[SectionOffset], scroll_y: f64) -> Option<String> {
    offsets
        .iter()
        .filter(|offset| scroll_y >= offset.top - ACTIVE_SECTION_OFFSET)
        .last()
        .map(|offset| offset.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::cv_data::GeneratedCv;
    use std::sync::Arc;

    fn section(id: &str, ar_title: &str, ar_items: &[&str], en_items: &[&str]) -> CvSection {
        CvSection {
            id: id.to_string(),
            ar_title: ar_title.to_string(),
            ar_items: ar_items.iter().map(|s| s.to_string()).collect(),
            en_title: id.to_string(),
            en_items: en_items.iter().map(|s| s.to_string()).collect(),
            icon: "fas fa-user".to_string(),
        }
    }

    fn sample() -> Vec<CvSection> {
        vec![
            section(
                "personal-information",
                "المعلومات الشخصية",
                &["الإســم : جين دو", "الوظيفة الحالية : مهندسة"],
                &["Name: Jane Doe", "Current Role: Engineer", "Phone: 555"],
            ),
            section("education", "المؤهلات العلمية", &["بكالوريوس"], &["BSc"]),
        ]
    }

    #[test]
    fn test_sidebar_profile_without_cv() {
        let card = sidebar_profile(None, Language::Ar);
        assert_eq!(card.name, "CV Generator");
        assert_eq!(card.title, "Upload a file to start");
    }

    #[test]
    fn test_sidebar_profile_without_personal_section() {
        let sections = vec![section("education", "المؤهلات العلمية", &[], &[])];
        let card = sidebar_profile(Some(&sections), Language::En);
        assert_eq!(card.name, "Your Name");
        assert_eq!(card.title, "Your Title");
    }

    #[test]
    fn test_sidebar_profile_per_language() {
        let sections = sample();

        let en = sidebar_profile(Some(&sections), Language::En);
        assert_eq!(en.name, "Jane Doe");
        assert_eq!(en.title, "Engineer");

        let ar = sidebar_profile(Some(&sections), Language::Ar);
        assert_eq!(ar.name, "جين دو");
        assert_eq!(ar.title, "مهندسة");
    }

    #[test]
    fn test_sidebar_profile_arabic_fallbacks() {
        let sections = vec![section(
            "personal-information",
            "المعلومات الشخصية",
            &["رقم التليفون : 555"],
            &["Phone: 555"],
        )];
        let card = sidebar_profile(Some(&sections), Language::Ar);
        assert_eq!(card.name, "اسمك");
        assert_eq!(card.title, "منصبك");
    }

    #[test]
    fn test_sidebar_profile_empty_value_falls_back() {
        let sections = vec![section("p", "المعلومات الشخصية", &[], &["Name:   "])];
        let card = sidebar_profile(Some(&sections), Language::En);
        assert_eq!(card.name, "Your Name");
    }

    #[test]
    fn test_export_header() {
        let header = export_header(&sample());
        assert_eq!(header.name, "Jane Doe");
        assert_eq!(header.title, "Engineer");

        let fallback = export_header(&[]);
        assert_eq!(fallback.name, "CV");
        assert_eq!(fallback.title, "Details");
    }

    #[test]
    fn test_navigation_marks_active() {
        let nav = navigation(&sample(), Language::Ar, Some("education"));
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].label, "المعلومات الشخصية");
        assert!(!nav[0].active);
        assert!(nav[1].active);
    }

    #[test]
    fn test_active_section() {
        let offsets = vec![
            SectionOffset { id: "a".to_string(), top: 100.0 },
            SectionOffset { id: "b".to_string(), top: 600.0 },
            SectionOffset { id: "c".to_string(), top: 1200.0 },
        ];

        assert_eq!(active_section(&offsets, 0.0).as_deref(), Some("a"));
        assert_eq!(active_section(&offsets, 449.0).as_deref(), Some("a"));
        assert_eq!(active_section(&offsets, 450.0).as_deref(), Some("b"));
        assert_eq!(active_section(&offsets, 5000.0).as_deref(), Some("c"));
        assert_eq!(active_section(&offsets[1..], 10.0), None);
        assert_eq!(active_section(&[], 10.0), None);
    }

    #[test]
    fn test_view_from_snapshot() {
        let empty = StateSnapshot {
            cv: None,
            language: Language::Ar,
            active_section: None,
            profile_picture: None,
        };
        assert!(CvView::from_snapshot(&empty).is_none());

        let snapshot = StateSnapshot {
            cv: Some(Arc::new(GeneratedCv::new(sample(), "cv.xlsx"))),
            language: Language::En,
            active_section: Some("education".to_string()),
            profile_picture: None,
        };
        let view = CvView::from_snapshot(&snapshot).unwrap();

        assert_eq!(view.dir, "ltr");
        assert_eq!(view.profile.name, "Jane Doe");
        assert_eq!(view.sections.len(), 2);
        assert!(view.navigation[1].active);
        assert!(view.picture.starts_with("https://placehold.co"));
    }
}
