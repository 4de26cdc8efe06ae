// src/web/handlers/cv_handlers.rs
//! CV generation and view-state handlers

use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::State;
use std::path::Path;
use tracing::Instrument;

use crate::core::pipeline::CvPipeline;
use crate::core::state::AppState;
use crate::error::CvError;
use crate::presentation::{active_section, CvView};
use crate::types::cv_data::{Language, ProfilePicture};
use crate::web::types::{
    ActionResponse, ActiveSectionData, ActiveSectionRequest, ApiError, ApiResult, CvUploadForm,
    DataResponse, LanguageRequest, PictureUploadForm, ServerConfig,
};
use crate::{app_log, app_span};

const MAX_PICTURE_BYTES: u64 = 5 * 1024 * 1024;

/// Client-supplied file name, last path segment only; falls back to the
/// content type's extension
fn upload_file_name(file: &TempFile<'_>, fallback: &str) -> String {
    file.raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(|raw| raw.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            file.content_type()
                .and_then(|ct| ct.extension())
                .map(|ext| format!("{}.{}", fallback, ext))
        })
        .unwrap_or_else(|| fallback.to_string())
}

/// Copy the upload into the scratch directory, read it back, remove it
async fn read_upload(file: &mut TempFile<'_>, scratch_dir: &Path) -> Result<Vec<u8>, CvError> {
    let temp_path = scratch_dir.join(format!("upload_{}", uuid::Uuid::new_v4()));

    file.move_copy_to(&temp_path)
        .await
        .map_err(|e| CvError::FileRead(format!("Failed to save uploaded file: {}", e)))?;

    let bytes = tokio::fs::read(&temp_path)
        .await
        .map_err(|e| CvError::FileRead(format!("Failed to read uploaded file: {}", e)));

    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        app_log!(warn, "Failed to remove {}: {}", temp_path.display(), e);
    }

    bytes
}

async fn current_view(state: &AppState) -> Result<CvView, CvError> {
    CvView::from_snapshot(&state.snapshot().await).ok_or(CvError::NoCv)
}

pub async fn generate_cv_handler(
    mut upload: Form<CvUploadForm<'_>>,
    state: &State<AppState>,
    pipeline: &State<CvPipeline>,
    config: &State<ServerConfig>,
) -> ApiResult<Json<DataResponse<CvView>>> {
    let file_name = upload_file_name(&upload.cv_file, "cv_upload");
    let span = app_span!("cv_generate", file = %file_name, size = upload.cv_file.len());

    async {
        let _guard = state.try_begin_processing().ok_or_else(|| {
            app_log!(warn, "Rejected {}: a CV is already being processed", file_name);
            CvError::Busy
        })?;

        app_log!(info, "Generating CV from {}", file_name);

        let bytes = read_upload(&mut upload.cv_file, &config.scratch_dir).await?;
        let cv = pipeline.run(&file_name, bytes).await.map_err(|e| {
            app_log!(error, "CV generation failed for {}: {}", file_name, e);
            e
        })?;
        state.replace_cv(cv).await;

        let view = current_view(state).await?;
        Ok::<_, ApiError>(Json(DataResponse::success(
            format!("CV generated with {} sections", view.sections.len()),
            view,
        )))
    }
    .instrument(span)
    .await
}

pub async fn get_cv_handler(state: &State<AppState>) -> ApiResult<Json<DataResponse<CvView>>> {
    let view = current_view(state).await?;
    Ok(Json(DataResponse::success(
        "Current CV".to_string(),
        view,
    )))
}

pub async fn set_language_handler(
    request: Json<LanguageRequest>,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    let language: Language = request.language.parse().map_err(|e: CvError| {
        app_log!(warn, "Rejected language change: {}", e);
        e
    })?;

    state.set_language(language).await;
    app_log!(info, "Display language set to {}", language);

    Ok(Json(ActionResponse::success(
        format!("Language set to {}", language),
        "language_changed".to_string(),
    )))
}

pub async fn set_active_section_handler(
    request: Json<ActiveSectionRequest>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<ActiveSectionData>>> {
    let request = request.into_inner();
    if !request.scroll_y.is_finite() {
        return Err(CvError::InvalidInput("scroll_y must be a finite number".to_string()).into());
    }

    let active = active_section(&request.offsets, request.scroll_y);
    state.set_active_section(active.clone()).await;

    Ok(Json(DataResponse::success(
        "Active section updated".to_string(),
        ActiveSectionData {
            active_section: active,
        },
    )))
}

pub async fn upload_picture_handler(
    mut upload: Form<PictureUploadForm<'_>>,
    state: &State<AppState>,
    config: &State<ServerConfig>,
) -> ApiResult<Json<ActionResponse>> {
    let content_type = upload
        .file
        .content_type()
        .filter(|ct| ct.is_png() || ct.is_jpeg() || ct.is_webp() || ct.is_gif())
        .map(|ct| format!("{}/{}", ct.top(), ct.sub()))
        .ok_or_else(|| {
            CvError::InvalidInput("Profile picture must be PNG, JPEG, WebP or GIF".to_string())
        })?;

    if upload.file.len() > MAX_PICTURE_BYTES {
        return Err(CvError::InvalidInput("Profile picture exceeds 5MB limit".to_string()).into());
    }

    let bytes = read_upload(&mut upload.file, &config.scratch_dir).await?;
    let size = bytes.len();
    state
        .set_profile_picture(ProfilePicture::new(bytes, content_type))
        .await;

    app_log!(info, "Profile picture updated ({} bytes)", size);

    Ok(Json(ActionResponse::success(
        "Profile picture updated".to_string(),
        "picture_uploaded".to_string(),
    )))
}
