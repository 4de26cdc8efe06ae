// src/core/state.rs
//! Application state with explicit update entry points

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::app_log;
use crate::types::cv_data::{GeneratedCv, Language, ProfilePicture};

/// The single owned state of the service.
///
/// The current CV is only ever replaced wholesale by a successful run.
/// The processing flag is advisory: it refuses new submissions, it does not
/// guard reads.
#[derive(Default)]
pub struct AppState {
    current: RwLock<Option<Arc<GeneratedCv>>>,
    language: RwLock<Language>,
    active_section: RwLock<Option<String>>,
    profile_picture: RwLock<Option<Arc<ProfilePicture>>>,
    processing: AtomicBool,
}

/// Point-in-time copy handed to views and exports
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub cv: Option<Arc<GeneratedCv>>,
    pub language: Language,
    pub active_section: Option<String>,
    pub profile_picture: Option<Arc<ProfilePicture>>,
}

/// Clears the processing flag when dropped, whatever the outcome of the run
pub struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another run holds the flag
    pub fn try_begin_processing(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard {
                flag: &self.processing,
            })
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Install a freshly generated CV; the view switches back to Arabic
    pub async fn replace_cv(&self, cv: GeneratedCv) -> Arc<GeneratedCv> {
        let cv = Arc::new(cv);
        {
            let mut current = self.current.write().await;
            *current = Some(cv.clone());
        }
        *self.language.write().await = Language::Ar;
        *self.active_section.write().await = None;

        app_log!(
            info,
            "Current CV replaced: {} sections from {}",
            cv.sections.len(),
            cv.source_file
        );
        cv
    }

    pub async fn current_cv(&self) -> Option<Arc<GeneratedCv>> {
        self.current.read().await.clone()
    }

    pub async fn language(&self) -> Language {
        *self.language.read().await
    }

    pub async fn set_language(&self, language: Language) {
        *self.language.write().await = language;
    }

    pub async fn set_active_section(&self, id: Option<String>) {
        *self.active_section.write().await = id;
    }

    pub async fn set_profile_picture(&self, picture: ProfilePicture) {
        *self.profile_picture.write().await = Some(Arc::new(picture));
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            cv: self.current.read().await.clone(),
            language: *self.language.read().await,
            active_section: self.active_section.read().await.clone(),
            profile_picture: self.profile_picture.read().await.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::tests::{EchoTranslator, FailingTranslator, SAMPLE_CSV};
    use crate::core::pipeline::CvPipeline;
    use crate::error::CvError;

    #[test]
    fn test_processing_flag_is_exclusive() {
        let state = AppState::new();

        let guard = state.try_begin_processing().expect("first run starts");
        assert!(state.is_processing());
        assert!(state.try_begin_processing().is_none());

        drop(guard);
        assert!(!state.is_processing());
        assert!(state.try_begin_processing().is_some());
    }

    #[tokio::test]
    async fn test_replace_cv_resets_view() {
        let state = AppState::new();
        state.set_language(Language::En).await;
        state.set_active_section(Some("skills".to_string())).await;

        state
            .replace_cv(GeneratedCv::new(Vec::new(), "cv.xlsx"))
            .await;

        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.language, Language::Ar);
        assert!(snapshot.active_section.is_none());
        assert_eq!(snapshot.cv.unwrap().source_file, "cv.xlsx");
    }

    #[tokio::test]
    async fn test_failed_run_keeps_previous_cv() {
        let state = AppState::new();
        let ok = CvPipeline::new(std::sync::Arc::new(EchoTranslator::default()));
        let failing = CvPipeline::new(std::sync::Arc::new(FailingTranslator));

        let first = ok
            .run("first.csv", SAMPLE_CSV.as_bytes().to_vec())
            .await
            .unwrap();
        state.replace_cv(first).await;
        state.set_language(Language::En).await;

        {
            let _guard = state.try_begin_processing().unwrap();
            let result = failing.run("second.csv", SAMPLE_CSV.as_bytes().to_vec()).await;
            assert!(matches!(result, Err(CvError::Translation(_))));
        }

        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.cv.unwrap().source_file, "first.csv");
        assert_eq!(snapshot.language, Language::En);
        assert!(!state.is_processing());
    }

    #[tokio::test]
    async fn test_profile_picture() {
        let state = AppState::new();
        assert!(state.snapshot().await.profile_picture.is_none());

        state
            .set_profile_picture(ProfilePicture::new(vec![0x89, 0x50], "image/png"))
            .await;
        let picture = state.snapshot().await.profile_picture.unwrap();
        assert_eq!(picture.content_type, "image/png");
    }
}
