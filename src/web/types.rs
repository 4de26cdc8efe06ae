// src/web/types.rs
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use std::path::PathBuf;

use crate::error::CvError;
use crate::presentation::SectionOffset;

pub struct ServerConfig {
    pub typst_bin: String,
    pub scratch_dir: PathBuf,
}

/// Binary download with an optional attachment name
pub struct FileResponse {
    pub data: Vec<u8>,
    pub content_type: ContentType,
    pub filename: Option<String>,
}

impl FileResponse {
    pub fn with_filename(data: Vec<u8>, content_type: ContentType, filename: String) -> Self {
        Self {
            data,
            content_type,
            filename: Some(filename),
        }
    }
}

impl<'r> Responder<'r, 'static> for FileResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let mut binding = Response::build();
        let mut response = binding
            .header(self.content_type)
            .sized_body(self.data.len(), std::io::Cursor::new(self.data));

        if let Some(filename) = self.filename {
            response = response.raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            );
        }

        response.ok()
    }
}

#[derive(FromForm)]
pub struct CvUploadForm<'f> {
    pub cv_file: TempFile<'f>,
}

#[derive(FromForm)]
pub struct PictureUploadForm<'f> {
    pub file: TempFile<'f>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LanguageRequest {
    pub language: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ActiveSectionRequest {
    pub scroll_y: f64,
    pub offsets: Vec<SectionOffset>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActiveSectionData {
    pub active_section: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

impl From<&CvError> for StandardErrorResponse {
    fn from(err: &CvError) -> Self {
        Self::new(
            err.to_string(),
            err.error_code().to_string(),
            err.suggestions(),
        )
    }
}

/// Error envelope paired with the HTTP status it is sent with
pub struct ApiError {
    pub status: Status,
    pub body: StandardErrorResponse,
}

pub fn status_for(err: &CvError) -> Status {
    match err {
        CvError::FileRead(_) => Status::UnprocessableEntity,
        CvError::UnsupportedFormat(_) => Status::UnsupportedMediaType,
        CvError::Translation(_) => Status::BadGateway,
        CvError::Export(_) => Status::InternalServerError,
        CvError::Busy => Status::Conflict,
        CvError::NoCv => Status::NotFound,
        CvError::InvalidInput(_) => Status::BadRequest,
    }
}

impl From<CvError> for ApiError {
    fn from(err: CvError) -> Self {
        Self {
            status: status_for(&err),
            body: StandardErrorResponse::from(&err),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(Json(self.body).respond_to(request)?)
            .status(self.status)
            .ok()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let busy = ApiError::from(CvError::Busy);
        assert_eq!(busy.status, Status::Conflict);
        assert_eq!(busy.body.error_code, "PROCESSING");
        assert!(!busy.body.success);

        assert_eq!(status_for(&CvError::NoCv), Status::NotFound);
        assert_eq!(
            status_for(&CvError::UnsupportedFormat("docx".to_string())),
            Status::UnsupportedMediaType
        );
        assert_eq!(
            status_for(&CvError::Translation("timeout".to_string())),
            Status::BadGateway
        );
    }

    #[test]
    fn test_envelope_serialization() {
        let body = rocket::serde::json::to_value(DataResponse::success(
            "ok".to_string(),
            vec![1, 2],
        ))
        .unwrap();
        assert_eq!(body["type"], "data");
        assert_eq!(body["data"][1], 2);

        let action = rocket::serde::json::to_value(ActionResponse::success(
            "done".to_string(),
            "language_changed".to_string(),
        ))
        .unwrap();
        assert_eq!(action["type"], "action");
        assert_eq!(action["action"], "language_changed");
    }
}
