use std::fmt;
use std::time::Duration;

use crate::{JobHandle, ProcessingRequest, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Background health check issued once at startup.
    CheckHealth,
    OpenFilePicker,
    SubmitProcess {
        file: SelectedFile,
        request: ProcessingRequest,
    },
    CompileExisting { handle: JobHandle },
    DownloadArtifact { kind: ArtifactKind, url: String },
    /// Hide the status region after `delay`. Not deduplicated against earlier timers.
    ScheduleStatusDismiss { delay: Duration },
    ScheduleProgressReset { delay: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Latex,
    Pdf,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Latex => write!(f, "LaTeX"),
            ArtifactKind::Pdf => write!(f, "PDF"),
        }
    }
}
