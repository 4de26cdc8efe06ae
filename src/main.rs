use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cv_builder::app_log;
use cv_builder::core::spreadsheet::TEMPLATE_FILE_NAME;
use cv_builder::core::{load_sections, ConfigManager, CvPipeline, GeminiTranslator};
use cv_builder::export::{render_html, ExportInput, PdfExporter};
use cv_builder::logging::{init_tracing, LogFormat};
use cv_builder::{start_web_server, write_template, Language};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cv-builder")]
#[command(about = "Build bilingual Arabic/English CVs from a spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web server (default)
    Serve,
    /// Write the spreadsheet template
    Template {
        #[arg(default_value = TEMPLATE_FILE_NAME)]
        out: PathBuf,
    },
    /// Print the sections of a spreadsheet as JSON, without translating
    Parse { file: PathBuf },
    /// Translate a spreadsheet and write the requested exports
    Generate {
        file: PathBuf,
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long)]
        pdf: Option<PathBuf>,
        #[arg(long, default_value = "ar")]
        lang: String,
    },
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_input(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((file_name(path), bytes))
}

async fn generate(
    config: ConfigManager,
    file: PathBuf,
    html: Option<PathBuf>,
    pdf: Option<PathBuf>,
    lang: String,
) -> Result<()> {
    let language: Language = lang.parse()?;
    let translator = GeminiTranslator::new(&config.translation)?;
    let pipeline = CvPipeline::new(Arc::new(translator))
        .with_max_upload_bytes(config.environment.max_upload_bytes);

    let (name, bytes) = read_input(&file).await?;
    let cv = pipeline.run(&name, bytes).await?;
    let input = ExportInput::new(Arc::new(cv), None, language);

    if html.is_none() && pdf.is_none() {
        println!("{}", serde_json::to_string_pretty(input.cv.as_ref())?);
    }

    if let Some(path) = html {
        tokio::fs::write(&path, render_html(&input))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        app_log!(info, "HTML written to {}", path.display());
    }

    if let Some(path) = pdf {
        config.ensure_directories().await?;
        let exporter = PdfExporter::new(config.environment.typst_bin.clone(), config.scratch_dir());
        let bytes = exporter.export(&input).await?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        app_log!(info, "PDF written to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(LogFormat::from_env())?;

    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,
        Command::Template { out } => {
            let bytes = write_template()?;
            tokio::fs::write(&out, bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            app_log!(info, "Template written to {}", out.display());
            Ok(())
        }
        Command::Parse { file } => {
            let (name, bytes) = read_input(&file).await?;
            let sections = load_sections(&name, bytes).await?;
            println!("{}", serde_json::to_string_pretty(&sections)?);
            Ok(())
        }
        Command::Generate {
            file,
            html,
            pdf,
            lang,
        } => generate(config, file, html, pdf, lang).await,
    }
}
