//! Downloadable workout documents.
//!
//! [`export`] renders a successful [`GenerationResult`] together with the
//! request that produced it into a PDF or Markdown document named after
//! the current local time. [`write_document`] puts the bytes on disk.

mod pdf;

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::info;

use crate::pipeline::GenerationResult;
use crate::request::WorkoutRequest;

/// Heading at the top of every document.
pub const DOCUMENT_TITLE: &str = "Personalized Workout Plan";

#[derive(Debug, Error)]
pub enum ExportError {
    /// The result holds a failure message, not a plan.
    #[error("no workout plan to export: {0}")]
    NoPlan(String),
    #[error("unknown document format `{0}` (expected pdf or markdown)")]
    UnknownFormat(String),
    #[error("failed to render PDF: {0}")]
    Pdf(String),
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    fn io(path: &Path, source: io::Error) -> Self {
        ExportError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Output document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Pdf,
    Markdown,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Markdown => "md",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Markdown => "text/markdown",
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// A rendered document ready to be saved or offered for download.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

/// `Workout_Plan_YYYYmmdd_HHMMSS.<ext>` for the given local time.
pub fn document_filename(format: DocumentFormat, at: NaiveDateTime) -> String {
    format!(
        "Workout_Plan_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Render `result` for `request`, stamped with the current local time.
pub fn export(
    result: &GenerationResult,
    request: &WorkoutRequest,
    format: DocumentFormat,
) -> Result<ExportedDocument, ExportError> {
    export_at(result, request, format, Local::now().naive_local())
}

/// Same as [`export`] with an explicit timestamp.
pub fn export_at(
    result: &GenerationResult,
    request: &WorkoutRequest,
    format: DocumentFormat,
    at: NaiveDateTime,
) -> Result<ExportedDocument, ExportError> {
    let plan = match result {
        GenerationResult::Success { text } => text,
        GenerationResult::Failure { message } => return Err(ExportError::NoPlan(message.clone())),
    };

    let bytes = match format {
        DocumentFormat::Pdf => pdf::render(DOCUMENT_TITLE, &plain_body(request, plan))?,
        DocumentFormat::Markdown => markdown(request, plan).into_bytes(),
    };

    Ok(ExportedDocument {
        filename: document_filename(format, at),
        format,
        bytes,
    })
}

/// Parameter block followed by the plan, as plain lines.
fn plain_body(request: &WorkoutRequest, plan: &str) -> String {
    let mut body = String::new();
    for (label, value) in request.parameters() {
        body.push_str(&format!("{label}: {value}\n"));
    }
    body.push('\n');
    body.push_str(plan);
    body
}

fn markdown(request: &WorkoutRequest, plan: &str) -> String {
    let mut doc = format!("# {DOCUMENT_TITLE}\n\n");
    for (label, value) in request.parameters() {
        doc.push_str(&format!("- **{label}:** {value}\n"));
    }
    doc.push_str("\n---\n\n");
    doc.push_str(plan.trim_end());
    doc.push('\n');
    doc
}

/// Write `doc` into `dir`, creating the directory if needed.
///
/// Writes to a temp file first and renames it into place, so a partial
/// document is never left under the final name.
pub fn write_document(doc: &ExportedDocument, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;

    let final_path = dir.join(&doc.filename);
    let tmp_path = dir.join(format!(".{}.tmp", doc.filename));

    std::fs::write(&tmp_path, &doc.bytes).map_err(|e| ExportError::io(&tmp_path, e))?;
    std::fs::rename(&tmp_path, &final_path).map_err(|e| ExportError::io(&final_path, e))?;

    info!(
        path = %final_path.display(),
        bytes = doc.bytes.len(),
        "Exported workout plan"
    );
    Ok(final_path)
}
