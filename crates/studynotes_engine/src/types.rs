use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub latex_available: bool,
    #[serde(default)]
    pub gemini_configured: Option<bool>,
}

/// Body of `POST /api/process`, on success and on failure alike.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ProcessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub latex_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub tips: Option<TipsPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct TipsPayload {
    #[serde(default)]
    pub latex_quality: Option<String>,
    #[serde(default)]
    pub pdf_quality: Option<String>,
    #[serde(default)]
    pub for_professional_output: Option<String>,
    #[serde(default)]
    pub overleaf_steps: Vec<String>,
}

/// Body of `GET /api/compile/{name}.tex`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct CompileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Only the `error` field of a failed response is of interest.
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Multipart submission for `POST /api/process`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file_name: String,
    pub content: Arc<[u8]>,
    pub note_type: String,
    pub include_questions: bool,
    pub compile_pdf: bool,
    pub use_overleaf: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Latex,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    StatusDismiss,
    ProgressReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    HealthChecked(Result<HealthResponse, ApiError>),
    /// Response headers of a process request arrived; the body is still pending.
    ProcessHeaders,
    ProcessCompleted(Result<ProcessResponse, ApiError>),
    CompileCompleted(Result<CompileResponse, ApiError>),
    DownloadCompleted {
        artifact: Artifact,
        result: Result<PathBuf, ApiError>,
    },
    TimerElapsed(TimerKind),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    /// The service answered but reported failure.
    #[error("{}", describe_service_failure(.status, .error))]
    Service { status: u16, error: Option<String> },
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("could not save file: {0}")]
    Persist(String),
}

impl ApiError {
    /// Whether the failure happened before a usable response was obtained.
    pub fn is_transport(&self) -> bool {
        !matches!(self, ApiError::Service { .. })
    }

    /// Server-supplied error text, if the service reported one.
    pub fn service_error(&self) -> Option<&str> {
        match self {
            ApiError::Service { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

fn describe_service_failure(status: &u16, error: &Option<String>) -> String {
    match error {
        Some(error) => format!("{error} (http status {status})"),
        None => format!("http status {status}"),
    }
}
