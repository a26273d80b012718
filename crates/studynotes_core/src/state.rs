use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::reply::{HealthReport, JobResult, Tips};
use crate::view_model::{ApiStatusView, AppViewModel, FileInfoView, StatusView};

/// How long a status message stays visible.
pub const STATUS_DISMISS_DELAY: Duration = Duration::from_secs(5);
/// How long the progress bar lingers after a process call settles.
pub const PROGRESS_RESET_DELAY: Duration = Duration::from_secs(1);

pub(crate) const PROGRESS_IDLE: u8 = 0;
pub(crate) const PROGRESS_FILE_SELECTED: u8 = 10;
pub(crate) const PROGRESS_SUBMITTED: u8 = 30;
pub(crate) const PROGRESS_HEADERS: u8 = 70;
pub(crate) const PROGRESS_DONE: u8 = 100;

/// The file the user picked or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub content: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }
}

/// Opaque identifier of a generated job, used to address later compile requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    /// Returns `None` for an empty identifier; the backend never issues one.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the LaTeX source the backend stores for this job.
    pub fn tex_filename(&self) -> String {
        format!("{}.tex", self.0)
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteType {
    #[default]
    Detailed,
    Concise,
    Outline,
}

impl NoteType {
    pub const ALL: [NoteType; 3] = [NoteType::Detailed, NoteType::Concise, NoteType::Outline];

    /// Form value understood by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            NoteType::Detailed => "detailed",
            NoteType::Concise => "concise",
            NoteType::Outline => "outline",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoteType::Detailed => "Detailed notes",
            NoteType::Concise => "Concise summary",
            NoteType::Outline => "Structured outline",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown note type '{0}' (expected detailed, concise or outline)")]
pub struct UnknownNoteType(pub String);

impl FromStr for NoteType {
    type Err = UnknownNoteType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownNoteType(s.to_string()))
    }
}

/// Options sent alongside the file; built fresh from the controls on every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingRequest {
    pub note_type: NoteType,
    pub include_questions: bool,
    pub compile_pdf: bool,
    pub use_overleaf: bool,
}

/// Live values of the option controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingControls {
    pub note_type: NoteType,
    pub include_questions: bool,
    pub compile_pdf: bool,
    pub use_overleaf: bool,
    /// Capability gate: the compile-directly toggle stays disabled until the
    /// backend reports a LaTeX compiler.
    pub compile_directly_available: bool,
}

impl Default for ProcessingControls {
    fn default() -> Self {
        Self {
            note_type: NoteType::Detailed,
            include_questions: true,
            compile_pdf: false,
            use_overleaf: false,
            compile_directly_available: false,
        }
    }
}

impl ProcessingControls {
    fn request(&self) -> ProcessingRequest {
        ProcessingRequest {
            note_type: self.note_type,
            include_questions: self.include_questions,
            compile_pdf: self.compile_pdf,
            use_overleaf: self.use_overleaf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusMessage {
    text: String,
    severity: Severity,
    visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ApiStatus {
    #[default]
    Unknown,
    Online {
        generator_configured: Option<bool>,
    },
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ResultsPanel {
    visible: bool,
    preview: String,
    latex_url: Option<String>,
    pdf_url: Option<String>,
    compile_visible: bool,
    tips: Option<Tips>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selected_file: Option<SelectedFile>,
    job_handle: Option<JobHandle>,
    controls: ProcessingControls,
    api_status: ApiStatus,
    status: Option<StatusMessage>,
    progress: u8,
    loading: bool,
    /// Tracks the submit control itself: a new selection re-enables it even mid-request.
    submit_enabled: bool,
    drag_highlight: bool,
    results: ResultsPanel,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let api_status = match &self.api_status {
            ApiStatus::Unknown => ApiStatusView {
                text: "Checking API...".to_string(),
                online: None,
            },
            ApiStatus::Online {
                generator_configured: Some(false),
            } => ApiStatusView {
                text: "API Online (generator not configured)".to_string(),
                online: Some(true),
            },
            ApiStatus::Online { .. } => ApiStatusView {
                text: "API Online".to_string(),
                online: Some(true),
            },
            ApiStatus::Offline => ApiStatusView {
                text: "API Offline".to_string(),
                online: Some(false),
            },
        };

        AppViewModel {
            process_enabled: self.submit_enabled,
            file_info: self.selected_file.as_ref().map(|file| FileInfoView {
                name: file.name.clone(),
                size_label: crate::format_file_size(file.size),
            }),
            upload_highlight: self.drag_highlight,
            loading: self.loading,
            progress: self.progress,
            status: self
                .status
                .as_ref()
                .filter(|status| status.visible)
                .map(|status| StatusView {
                    text: status.text.clone(),
                    severity: status.severity,
                }),
            api_status,
            note_type: self.controls.note_type,
            include_questions: self.controls.include_questions,
            compile_pdf: self.controls.compile_pdf,
            use_overleaf: self.controls.use_overleaf,
            compile_directly_enabled: self.controls.compile_directly_available,
            results_visible: self.results.visible,
            preview: self.results.preview.clone(),
            latex_link: self.results.latex_url.clone(),
            pdf_link: self.results.pdf_url.clone(),
            compile_visible: self.results.compile_visible,
            tips: self.results.tips.as_ref().map(crate::tips_blocks),
            dirty: self.dirty,
        }
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn job_handle(&self) -> Option<&JobHandle> {
        self.job_handle.as_ref()
    }

    pub fn controls(&self) -> &ProcessingControls {
        &self.controls
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Link target of a generated artifact, if the current result has one.
    pub fn artifact_url(&self, kind: crate::ArtifactKind) -> Option<&str> {
        match kind {
            crate::ArtifactKind::Latex => self.results.latex_url.as_deref(),
            crate::ArtifactKind::Pdf => self.results.pdf_url.as_deref(),
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn processing_request(&self) -> ProcessingRequest {
        self.controls.request()
    }

    pub(crate) fn controls_mut(&mut self) -> &mut ProcessingControls {
        self.dirty = true;
        &mut self.controls
    }

    pub(crate) fn select_file(&mut self, file: SelectedFile) {
        self.selected_file = Some(file);
        self.submit_enabled = true;
        self.progress = PROGRESS_FILE_SELECTED;
        self.dirty = true;
    }

    pub(crate) fn set_drag_highlight(&mut self, highlight: bool) {
        if self.drag_highlight != highlight {
            self.drag_highlight = highlight;
            self.dirty = true;
        }
    }

    pub(crate) fn set_progress(&mut self, percent: u8) {
        self.progress = percent.min(PROGRESS_DONE);
        self.dirty = true;
    }

    pub(crate) fn begin_processing(&mut self) {
        self.loading = true;
        self.submit_enabled = false;
        self.results.visible = false;
        self.set_progress(PROGRESS_SUBMITTED);
    }

    pub(crate) fn end_processing(&mut self) {
        self.loading = false;
        self.submit_enabled = self.selected_file.is_some();
        self.dirty = true;
    }

    /// Replaces the current result wholesale and supersedes the job handle.
    pub(crate) fn apply_result(&mut self, result: JobResult) {
        self.results.preview = result.preview;
        self.results.compile_visible = result.pdf_url.is_none();
        self.results.latex_url = result.latex_url;
        self.results.pdf_url = result.pdf_url;
        if let Some(tips) = result.tips {
            self.results.tips = Some(tips);
        }
        self.results.visible = true;
        self.job_handle = result.handle;
        self.dirty = true;
    }

    pub(crate) fn apply_compiled(&mut self, pdf_url: String) {
        self.results.pdf_url = Some(pdf_url);
        self.results.compile_visible = false;
        self.dirty = true;
    }

    pub(crate) fn apply_health(&mut self, report: Option<HealthReport>) {
        self.api_status = match report {
            Some(report) => {
                if report.latex_available {
                    self.controls.compile_directly_available = true;
                }
                ApiStatus::Online {
                    generator_configured: report.generator_configured,
                }
            }
            None => ApiStatus::Offline,
        };
        self.dirty = true;
    }

    pub(crate) fn show_status(&mut self, text: String, severity: Severity) {
        self.status = Some(StatusMessage {
            text,
            severity,
            visible: true,
        });
        self.dirty = true;
    }

    pub(crate) fn hide_status(&mut self) {
        if let Some(status) = self.status.as_mut() {
            if status.visible {
                status.visible = false;
                self.dirty = true;
            }
        }
    }
}
