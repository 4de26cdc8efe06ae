// src/web/handlers/system_handlers.rs
use rocket::http::ContentType;
use rocket::serde::json::Json;

use crate::app_log;
use crate::core::spreadsheet::{write_template, TEMPLATE_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::web::types::{ApiResult, FileResponse, TextResponse};

pub async fn health_handler() -> Json<TextResponse> {
    app_log!(debug, "Health check");
    Json(TextResponse::success("OK".to_string()))
}

pub async fn template_handler() -> ApiResult<FileResponse> {
    let bytes = write_template().map_err(|e| {
        app_log!(error, "Failed to build template workbook: {}", e);
        e
    })?;

    Ok(FileResponse::with_filename(
        bytes,
        ContentType::parse_flexible(XLSX_CONTENT_TYPE).unwrap_or(ContentType::Binary),
        TEMPLATE_FILE_NAME.to_string(),
    ))
}
