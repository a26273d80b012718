//! Settled outcomes of the service calls, already split into the two error tiers:
//! transport failures (no usable response) and application failures (the
//! service answered but reported an error).

use std::path::PathBuf;

use crate::JobHandle;

/// Advisory block returned when the backend suggests follow-up steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tips {
    pub latex_quality: Option<String>,
    pub pdf_quality: Option<String>,
    pub for_professional_output: Option<String>,
    pub overleaf_steps: Vec<String>,
}

/// A successful process response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub preview: String,
    pub latex_url: Option<String>,
    pub pdf_url: Option<String>,
    pub handle: Option<JobHandle>,
    pub tips: Option<Tips>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessReply {
    Completed(JobResult),
    Rejected { error: Option<String> },
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileReply {
    Compiled { pdf_url: String },
    Rejected { error: Option<String> },
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthReport {
    pub status: Option<String>,
    pub latex_available: bool,
    pub generator_configured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthReply {
    Online(HealthReport),
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadReply {
    Saved(PathBuf),
    Failed(String),
}
