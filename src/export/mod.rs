// src/export/mod.rs
//! Standalone document exports of the current CV

pub mod html;
pub mod pdf;

pub use html::{html_file_name, render_html};
pub use pdf::{pdf_file_name, render_typst, PdfExporter};

use std::sync::Arc;

use crate::core::state::StateSnapshot;
use crate::error::CvError;
use crate::presentation::export_header;
use crate::types::cv_data::{picture_src, CvSection, GeneratedCv, Language, ProfilePicture};
use crate::utils::sanitize_filename;

/// Header block shared by both export formats
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub name: String,
    pub title: String,
    pub picture: Option<Arc<ProfilePicture>>,
    pub language: Language,
}

impl HeaderInfo {
    pub fn new(sections: &[CvSection], picture: Option<Arc<ProfilePicture>>, language: Language) -> Self {
        let card = export_header(sections);
        Self {
            name: card.name,
            title: card.title,
            picture,
            language,
        }
    }

    pub fn picture_src(&self) -> String {
        picture_src(self.picture.as_deref())
    }

    /// Name reduced to characters safe in a download file name
    pub fn file_stem(&self) -> String {
        sanitize_filename(&self.name)
    }
}

/// Everything an export needs, taken from one state snapshot
#[derive(Debug, Clone)]
pub struct ExportInput {
    pub cv: Arc<GeneratedCv>,
    pub header: HeaderInfo,
}

impl ExportInput {
    pub fn new(cv: Arc<GeneratedCv>, picture: Option<Arc<ProfilePicture>>, language: Language) -> Self {
        let header = HeaderInfo::new(&cv.sections, picture, language);
        Self { cv, header }
    }

    pub fn from_snapshot(snapshot: StateSnapshot) -> Result<Self, CvError> {
        let cv = snapshot.cv.ok_or(CvError::NoCv)?;
        Ok(Self::new(cv, snapshot.profile_picture, snapshot.language))
    }

    pub fn sections(&self) -> &[CvSection] {
        &self.cv.sections
    }

    pub fn language(&self) -> Language {
        self.header.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_input_requires_cv() {
        let snapshot = StateSnapshot {
            cv: None,
            language: Language::Ar,
            active_section: None,
            profile_picture: None,
        };
        assert!(matches!(
            ExportInput::from_snapshot(snapshot),
            Err(CvError::NoCv)
        ));
    }

    #[test]
    fn test_header_file_stem() {
        let sections = vec![CvSection {
            id: "personal-info".to_string(),
            ar_title: "المعلومات الشخصية".to_string(),
            ar_items: vec![],
            en_title: "Personal Info".to_string(),
            en_items: vec!["Full Name: Jane O'Doe".to_string()],
            icon: "fas fa-user".to_string(),
        }];
        let header = HeaderInfo::new(&sections, None, Language::En);

        assert_eq!(header.name, "Jane O'Doe");
        assert_eq!(header.file_stem(), "Jane_ODoe");
        assert!(header.picture_src().starts_with("https://"));
    }
}
