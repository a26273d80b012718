use crate::{ArtifactKind, CompileReply, DownloadReply, HealthReply, NoteType, ProcessReply, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Files chosen through the picker. Only the first is used.
    FilesPicked(Vec<SelectedFile>),
    /// User clicked the upload area.
    UploadAreaClicked,
    /// A drag entered or moved over the upload area.
    DragEntered,
    /// A drag left the upload area without dropping.
    DragLeft,
    /// Files released over the upload area. Only the first is used.
    FilesDropped(Vec<SelectedFile>),
    NoteTypeChanged(NoteType),
    IncludeQuestionsToggled(bool),
    CompileDirectlyToggled(bool),
    UseOverleafToggled(bool),
    /// User clicked the submit control.
    ProcessClicked,
    /// Response headers of a process request arrived.
    ProcessHeadersReceived,
    /// A process request settled.
    ProcessFinished(ProcessReply),
    /// User asked to compile the current job to PDF.
    CompileClicked,
    CompileFinished(CompileReply),
    HealthChecked(HealthReply),
    DownloadClicked(ArtifactKind),
    DownloadFinished {
        kind: ArtifactKind,
        reply: DownloadReply,
    },
    /// A status auto-dismiss timer fired.
    StatusDismissElapsed,
    /// A progress reset timer fired.
    ProgressResetElapsed,
    /// Fallback for placeholder wiring.
    NoOp,
}
