//! Study-notes core: pure controller state machine, view model and UI region abstraction.
mod controller;
mod effect;
mod format;
mod msg;
mod reply;
mod state;
mod tips;
mod ui;
mod update;
mod view_model;

pub use controller::Controller;
pub use effect::{ArtifactKind, Effect};
pub use format::format_file_size;
pub use msg::Msg;
pub use reply::{
    CompileReply, DownloadReply, HealthReply, HealthReport, JobResult, ProcessReply, Tips,
};
pub use state::{
    AppState, JobHandle, NoteType, ProcessingControls, ProcessingRequest, SelectedFile, Severity,
    UnknownNoteType, PROGRESS_RESET_DELAY, STATUS_DISMISS_DELAY,
};
pub use tips::{tips_blocks, OVERLEAF_URL};
pub use ui::{render, BindError, ContentBlock, Placement, Region, UiSurface};
pub use update::update;
pub use view_model::{ApiStatusView, AppViewModel, FileInfoView, StatusView};
