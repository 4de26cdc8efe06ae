// src/export/pdf.rs
//! Paginated PDF export: Typst markup compiled in a scratch workspace

use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::Instrument;

use super::{ExportInput, HeaderInfo};
use crate::error::CvError;
use crate::types::cv_data::{CvSection, Language, ProfilePicture};
use crate::{app_log, app_span};

const MAIN_FILE: &str = "main.typ";
const OUTPUT_FILE: &str = "cv.pdf";
const PAGE_MARGIN_PT: u32 = 40;

pub fn pdf_file_name(header: &HeaderInfo) -> String {
    format!("{}-CV.pdf", header.file_stem())
}

/// Scratch file name for the header picture; `None` for formats left out of
/// the PDF (WebP needs a newer typst than the deployed one)
fn picture_file_name(picture: &ProfilePicture) -> Option<String> {
    match picture.content_type.as_str() {
        "image/png" | "image/jpeg" | "image/jpg" | "image/gif" => {
            Some(format!("profile.{}", picture.extension()))
        }
        _ => None,
    }
}

/// Typst string literal
fn typst_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn fonts(language: Language) -> &'static str {
    match language {
        Language::Ar => r#"("Cairo", "Noto Naskh Arabic", "Amiri")"#,
        Language::En => r#"("Poppins", "Libertinus Serif")"#,
    }
}

fn render_section(out: &mut String, section: &CvSection, language: Language) {
    // unbreakable: a section that does not fit moves to the next page whole
    out.push_str("#block(breakable: false, width: 100%, below: 20pt)[\n");
    out.push_str(&format!(
        "  #text(size: 16pt, weight: \"bold\", fill: rgb(\"#1e3a8a\"), {})\n",
        typst_str(section.title(language))
    ));
    out.push_str("  #line(length: 100%, stroke: 2pt + rgb(\"#3b82f6\"))\n");

    let items = section.items(language);
    if !items.is_empty() {
        out.push_str("  #list(\n");
        for item in items {
            out.push_str(&format!("    {},\n", typst_str(item)));
        }
        out.push_str("  )\n");
    }
    out.push_str("]\n\n");
}

/// A4 document with a header block and one block per section.
/// `picture_file` is a path relative to the compile root.
pub fn render_typst(input: &ExportInput, picture_file: Option<&str>) -> String {
    let header = &input.header;
    let language = header.language;
    let mut out = String::new();

    out.push_str(&format!(
        "#set page(paper: \"a4\", margin: {}pt)\n",
        PAGE_MARGIN_PT
    ));
    out.push_str(&format!(
        "#set text(font: {}, size: 11pt, lang: \"{}\", dir: {})\n",
        fonts(language),
        language.code(),
        language.dir()
    ));
    out.push_str("#set par(justify: false)\n\n");

    out.push_str("#block(width: 100%, inset: 20pt, below: 24pt)[\n");
    let heading = format!(
        "[#text(size: 24pt, weight: \"bold\", fill: rgb(\"#1e3a8a\"), {}) \\ #text(size: 14pt, fill: rgb(\"#374151\"), {})]",
        typst_str(&header.name),
        typst_str(&header.title)
    );
    match picture_file {
        Some(file) => {
            out.push_str(&format!(
                "  #grid(columns: (auto, 1fr), column-gutter: 20pt, align: horizon,\n    box(clip: true, radius: 40pt, image({}, width: 80pt, height: 80pt, fit: \"cover\")),\n    {},\n  )\n",
                typst_str(file),
                heading
            ));
        }
        None => {
            out.push_str(&format!("  {}\n", &heading[1..heading.len() - 1]));
        }
    }
    out.push_str("]\n\n");

    for section in input.sections() {
        render_section(&mut out, section, language);
    }

    out
}

/// Compiles exports with an external `typst` binary
#[derive(Debug, Clone)]
pub struct PdfExporter {
    typst_bin: String,
    scratch_dir: PathBuf,
}

/// One uuid-named directory under the scratch root, removed after each export
struct ExportWorkspace {
    dir: PathBuf,
}

impl ExportWorkspace {
    async fn prepare(scratch_dir: &Path) -> Result<Self, CvError> {
        let dir = scratch_dir.join(format!("export_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            CvError::Export(format!(
                "Failed to create export workspace {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    async fn write(&self, name: &str, contents: &[u8]) -> Result<(), CvError> {
        tokio::fs::write(self.dir.join(name), contents)
            .await
            .map_err(|e| CvError::Export(format!("Failed to write {}: {}", name, e)))
    }

    async fn compile(&self, typst_bin: &str) -> Result<Vec<u8>, CvError> {
        let output = Command::new(typst_bin)
            .current_dir(&self.dir)
            .arg("compile")
            .arg(MAIN_FILE)
            .arg(OUTPUT_FILE)
            .output()
            .await
            .map_err(|e| CvError::Export(format!("Failed to execute {}: {}", typst_bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CvError::Export(format!(
                "Typst compilation failed: {}",
                stderr.trim()
            )));
        }

        tokio::fs::read(self.dir.join(OUTPUT_FILE))
            .await
            .map_err(|e| CvError::Export(format!("Failed to read generated PDF: {}", e)))
    }

    async fn cleanup(self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
            app_log!(
                warn,
                "Failed to remove export workspace {}: {}",
                self.dir.display(),
                e
            );
        }
    }
}

impl PdfExporter {
    pub fn new(typst_bin: impl Into<String>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            typst_bin: typst_bin.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    pub async fn export(&self, input: &ExportInput) -> Result<Vec<u8>, CvError> {
        let span = app_span!("pdf_export", sections = input.sections().len());
        async {
            let workspace = ExportWorkspace::prepare(&self.scratch_dir).await?;
            let result = self.compile_in(&workspace, input).await;
            workspace.cleanup().await;

            if let Ok(bytes) = &result {
                app_log!(info, "PDF export produced {} bytes", bytes.len());
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn compile_in(
        &self,
        workspace: &ExportWorkspace,
        input: &ExportInput,
    ) -> Result<Vec<u8>, CvError> {
        let picture_file = match input.header.picture.as_deref() {
            Some(picture) => match picture_file_name(picture) {
                Some(name) => {
                    workspace.write(&name, &picture.bytes).await?;
                    Some(name)
                }
                None => {
                    app_log!(
                        warn,
                        "Leaving {} profile picture out of the PDF header",
                        picture.content_type
                    );
                    None
                }
            },
            None => None,
        };

        let source = render_typst(input, picture_file.as_deref());
        workspace.write(MAIN_FILE, source.as_bytes()).await?;
        workspace.compile(&self.typst_bin).await
    }
}
