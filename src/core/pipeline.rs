// src/core/pipeline.rs
//! One upload, start to finish: decode, parse, translate, normalize

use std::sync::Arc;
use tracing::Instrument;

use crate::core::normalizer::{normalize, unmatched_titles};
use crate::core::parser::parse;
use crate::core::spreadsheet::{read_rows, SpreadsheetFormat};
use crate::core::translator::Translator;
use crate::error::CvError;
use crate::types::cv_data::{GeneratedCv, ParsedSection};
use crate::{app_log, app_span};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Decode an uploaded file and group its rows into sections.
/// Decoding runs on the blocking pool.
pub async fn load_sections(file_name: &str, bytes: Vec<u8>) -> Result<Vec<ParsedSection>, CvError> {
    let format = SpreadsheetFormat::from_file_name(file_name)?;

    let rows = tokio::task::spawn_blocking(move || read_rows(&bytes, format))
        .await
        .map_err(|e| CvError::FileRead(format!("Spreadsheet decoding aborted: {}", e)))??;

    Ok(parse(&rows))
}

pub struct CvPipeline {
    translator: Arc<dyn Translator>,
    max_upload_bytes: u64,
}

impl CvPipeline {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Any failure aborts the whole run; nothing partial is returned.
    pub async fn run(&self, file_name: &str, bytes: Vec<u8>) -> Result<GeneratedCv, CvError> {
        let span = app_span!("cv_pipeline", file = %file_name, size = bytes.len());
        self.run_stages(file_name, bytes).instrument(span).await
    }

    async fn run_stages(&self, file_name: &str, bytes: Vec<u8>) -> Result<GeneratedCv, CvError> {
        if bytes.len() as u64 > self.max_upload_bytes {
            return Err(CvError::FileRead(format!(
                "File size exceeds the {} byte limit",
                self.max_upload_bytes
            )));
        }

        let original = load_sections(file_name, bytes).await?;
        app_log!(info, "Parsed {} sections from {}", original.len(), file_name);

        let translated = self.translator.translate(&original).await?;

        let unmatched = unmatched_titles(&original, &translated);
        if !unmatched.is_empty() {
            app_log!(
                warn,
                "Translated titles with no Arabic source, items left empty: {:?}",
                unmatched
            );
        }

        let sections = normalize(&original, translated);
        app_log!(info, "Generated CV with {} sections", sections.len());

        Ok(GeneratedCv::new(sections, file_name))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::cv_data::TranslatedSection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes every section back with an English title of `EN <title>`
    #[derive(Default)]
    pub(crate) struct EchoTranslator {
        pub calls: AtomicUsize,
    }

    #[rocket::async_trait]
    impl Translator for EchoTranslator {
        async fn translate(
            &self,
            sections: &[ParsedSection],
        ) -> Result<Vec<TranslatedSection>, CvError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sections
                .iter()
                .map(|s| TranslatedSection {
                    ar_title: s.title.clone(),
                    en_title: format!("EN {}", s.title),
                    en_items: s.items.iter().map(|i| format!("en:{}", i)).collect(),
                    icon: "fas fa-circle".to_string(),
                })
                .collect())
        }
    }

    pub(crate) struct FailingTranslator;

    #[rocket::async_trait]
    impl Translator for FailingTranslator {
        async fn translate(
            &self,
            _sections: &[ParsedSection],
        ) -> Result<Vec<TranslatedSection>, CvError> {
            Err(CvError::Translation("service unavailable".to_string()))
        }
    }

    pub(crate) const SAMPLE_CSV: &str =
        "section,details\nPersonal Info,Name: Jane\n,Phone: 555\nEducation,BSc CS\n";

    #[tokio::test]
    async fn test_runs_end_to_end() {
        let pipeline = CvPipeline::new(Arc::new(EchoTranslator::default()));
        let cv = pipeline
            .run("cv.csv", SAMPLE_CSV.as_bytes().to_vec())
            .await
            .unwrap();

        assert_eq!(cv.source_file, "cv.csv");
        assert_eq!(cv.sections.len(), 2);
        assert_eq!(cv.sections[0].id, "en-personal-info");
        assert_eq!(
            cv.sections[0].ar_items,
            vec!["Name: Jane".to_string(), "Phone: 555".to_string()]
        );
        assert_eq!(cv.sections[1].en_items, vec!["en:BSc CS".to_string()]);
    }

    #[tokio::test]
    async fn test_translation_failure_aborts() {
        let pipeline = CvPipeline::new(Arc::new(FailingTranslator));
        let result = pipeline.run("cv.csv", SAMPLE_CSV.as_bytes().to_vec()).await;
        assert!(matches!(result, Err(CvError::Translation(_))));
    }

    #[tokio::test]
    async fn test_unsupported_format_never_reaches_translator() {
        let translator = Arc::new(EchoTranslator::default());
        let pipeline = CvPipeline::new(translator.clone());

        let result = pipeline.run("cv.docx", b"whatever".to_vec()).await;

        assert!(matches!(result, Err(CvError::UnsupportedFormat(_))));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let pipeline =
            CvPipeline::new(Arc::new(EchoTranslator::default())).with_max_upload_bytes(8);
        let result = pipeline.run("cv.csv", SAMPLE_CSV.as_bytes().to_vec()).await;
        assert!(matches!(result, Err(CvError::FileRead(_))));
    }

    #[tokio::test]
    async fn test_header_only_file_yields_empty_cv() {
        let pipeline = CvPipeline::new(Arc::new(EchoTranslator::default()));
        let cv = pipeline
            .run("cv.csv", b"section,details\n".to_vec())
            .await
            .unwrap();
        assert!(cv.sections.is_empty());
    }

    #[tokio::test]
    async fn test_load_sections_from_template() {
        let bytes = crate::core::spreadsheet::write_template().unwrap();
        let sections = load_sections("cv_template.xlsx", bytes).await.unwrap();
        assert_eq!(sections.len(), 3);
    }
}
