// src/core/mod.rs
//! Core services: spreadsheet decoding, section parsing, translation and state

pub mod config_manager;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod spreadsheet;
pub mod state;
pub mod translator;

pub use config_manager::{ConfigManager, TranslationConfig};
pub use normalizer::normalize;
pub use parser::parse;
pub use pipeline::{load_sections, CvPipeline};
pub use spreadsheet::{read_rows, write_template, SpreadsheetFormat};
pub use state::{AppState, ProcessingGuard, StateSnapshot};
pub use translator::{GeminiTranslator, Translator};
