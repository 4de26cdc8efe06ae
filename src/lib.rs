//! Bilingual CV builder: Arabic spreadsheet upload, English translation, HTML/PDF export

pub mod core;
pub mod environment;
pub mod error;
pub mod export;
pub mod logging;
pub mod presentation;
pub mod types;
pub mod utils;
pub mod web;

pub use crate::core::{
    normalize, parse, read_rows, write_template, AppState, ConfigManager, CvPipeline,
    GeminiTranslator, SpreadsheetFormat, Translator,
};
pub use crate::error::CvError;
pub use crate::types::cv_data::{
    CvSection, GeneratedCv, Language, ParsedSection, ProfilePicture, RawRow, TranslatedSection,
};
pub use crate::web::start_web_server;
