// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::{Context, Result};
use rocket::data::{ByteUnit, Limits};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;

use crate::app_log;
use crate::core::{AppState, ConfigManager, CvPipeline, GeminiTranslator};
use crate::presentation::CvView;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new(
            "Access-Control-Expose-Headers",
            "Content-Disposition",
        ));
    }
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[get("/template")]
pub async fn download_template() -> ApiResult<FileResponse> {
    handlers::template_handler().await
}

#[post("/cv/generate", data = "<upload>")]
pub async fn generate_cv(
    upload: Form<CvUploadForm<'_>>,
    state: &State<AppState>,
    pipeline: &State<CvPipeline>,
    config: &State<ServerConfig>,
) -> ApiResult<Json<DataResponse<CvView>>> {
    handlers::generate_cv_handler(upload, state, pipeline, config).await
}

#[get("/cv")]
pub async fn get_cv(state: &State<AppState>) -> ApiResult<Json<DataResponse<CvView>>> {
    handlers::get_cv_handler(state).await
}

#[post("/cv/language", data = "<request>")]
pub async fn set_language(
    request: Json<LanguageRequest>,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    handlers::set_language_handler(request, state).await
}

#[post("/cv/active-section", data = "<request>")]
pub async fn set_active_section(
    request: Json<ActiveSectionRequest>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<ActiveSectionData>>> {
    handlers::set_active_section_handler(request, state).await
}

#[post("/cv/picture", data = "<upload>")]
pub async fn upload_picture(
    upload: Form<PictureUploadForm<'_>>,
    state: &State<AppState>,
    config: &State<ServerConfig>,
) -> ApiResult<Json<ActionResponse>> {
    handlers::upload_picture_handler(upload, state, config).await
}

#[get("/cv/export/html")]
pub async fn export_html(state: &State<AppState>) -> ApiResult<FileResponse> {
    handlers::export_html_handler(state).await
}

#[get("/cv/export/pdf")]
pub async fn export_pdf(
    state: &State<AppState>,
    config: &State<ServerConfig>,
) -> ApiResult<FileResponse> {
    handlers::export_pdf_handler(state, config).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Uploaded file is too large".to_string(),
        "FILE_TOO_LARGE".to_string(),
        vec!["Upload a smaller file".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the server without launching it
pub fn build_rocket(server_config: ServerConfig, pipeline: CvPipeline, port: u16) -> Rocket<Build> {
    let upload_limit = ByteUnit::from(pipeline.max_upload_bytes());
    let limits = Limits::default()
        .limit("file", upload_limit)
        .limit("data-form", upload_limit + ByteUnit::Mebibyte(1));

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(server_config)
        .manage(pipeline)
        .manage(AppState::new())
        .register(
            "/api",
            catchers![bad_request, payload_too_large, internal_error],
        )
        .mount(
            "/api",
            routes![
                health,
                download_template,
                generate_cv,
                get_cv,
                set_language,
                set_active_section,
                upload_picture,
                export_html,
                export_pdf,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    config.ensure_directories().await?;

    let translator = GeminiTranslator::new(&config.translation)
        .context("Failed to initialize translation service")?;
    let pipeline = CvPipeline::new(Arc::new(translator))
        .with_max_upload_bytes(config.environment.max_upload_bytes);

    let server_config = ServerConfig {
        typst_bin: config.environment.typst_bin.clone(),
        scratch_dir: config.scratch_dir(),
    };

    app_log!(info, "Starting CV Builder API server");
    app_log!(info, "Translation model: {}", config.translation.model);
    app_log!(info, "Scratch directory: {}", server_config.scratch_dir.display());
    app_log!(info, "Server: http://0.0.0.0:{}", config.environment.port);

    build_rocket(server_config, pipeline, config.environment.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}
