use crate::{ContentBlock, NoteType, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoView {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiStatusView {
    pub text: String,
    /// `None` until the startup health check settles.
    pub online: Option<bool>,
}

impl ApiStatusView {
    pub fn class(&self) -> &'static str {
        match self.online {
            Some(true) => "status-badge status-online",
            Some(false) => "status-badge status-offline",
            None => "status-badge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub process_enabled: bool,
    pub file_info: Option<FileInfoView>,
    pub upload_highlight: bool,
    pub loading: bool,
    pub progress: u8,
    pub status: Option<StatusView>,
    pub api_status: ApiStatusView,
    pub note_type: NoteType,
    pub include_questions: bool,
    pub compile_pdf: bool,
    pub use_overleaf: bool,
    pub compile_directly_enabled: bool,
    pub results_visible: bool,
    pub preview: String,
    pub latex_link: Option<String>,
    pub pdf_link: Option<String>,
    pub compile_visible: bool,
    pub tips: Option<Vec<ContentBlock>>,
    pub dirty: bool,
}
