// src/web/handlers/export_handlers.rs
use rocket::http::ContentType;
use rocket::State;

use crate::app_log;
use crate::core::state::AppState;
use crate::export::{html_file_name, pdf_file_name, render_html, ExportInput, PdfExporter};
use crate::web::types::{ApiResult, FileResponse, ServerConfig};

pub async fn export_html_handler(state: &State<AppState>) -> ApiResult<FileResponse> {
    let input = ExportInput::from_snapshot(state.snapshot().await)?;
    let filename = html_file_name(&input.header);
    let html = render_html(&input);

    app_log!(info, "Exported {} ({} bytes)", filename, html.len());
    Ok(FileResponse::with_filename(
        html.into_bytes(),
        ContentType::HTML,
        filename,
    ))
}

pub async fn export_pdf_handler(
    state: &State<AppState>,
    config: &State<ServerConfig>,
) -> ApiResult<FileResponse> {
    let input = ExportInput::from_snapshot(state.snapshot().await)?;
    let filename = pdf_file_name(&input.header);

    let exporter = PdfExporter::new(config.typst_bin.clone(), config.scratch_dir.clone());
    let pdf = exporter.export(&input).await.map_err(|e| {
        app_log!(error, "PDF export failed: {}", e);
        e
    })?;

    app_log!(info, "Exported {} ({} bytes)", filename, pdf.len());
    Ok(FileResponse::with_filename(pdf, ContentType::PDF, filename))
}
