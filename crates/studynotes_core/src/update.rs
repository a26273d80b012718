use crate::state::{PROGRESS_DONE, PROGRESS_HEADERS, PROGRESS_IDLE};
use crate::{
    AppState, CompileReply, DownloadReply, Effect, HealthReply, JobResult, Msg, ProcessReply,
    SelectedFile, Severity, PROGRESS_RESET_DELAY, STATUS_DISMISS_DELAY,
};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Pure update function: applies a message to state and returns any effects.
///
/// Nothing here guards against re-entrancy: a second `ProcessClicked` while a
/// request is in flight issues a second request, and whichever reply lands
/// last wins.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked(files) => select_first(&mut state, files),
        Msg::UploadAreaClicked => vec![Effect::OpenFilePicker],
        Msg::DragEntered => {
            state.set_drag_highlight(true);
            Vec::new()
        }
        Msg::DragLeft => {
            state.set_drag_highlight(false);
            Vec::new()
        }
        Msg::FilesDropped(files) => {
            state.set_drag_highlight(false);
            select_first(&mut state, files)
        }
        Msg::NoteTypeChanged(note_type) => {
            state.controls_mut().note_type = note_type;
            Vec::new()
        }
        Msg::IncludeQuestionsToggled(on) => {
            state.controls_mut().include_questions = on;
            Vec::new()
        }
        Msg::CompileDirectlyToggled(on) => {
            // A disabled control cannot change value.
            if state.controls().compile_directly_available {
                state.controls_mut().compile_pdf = on;
            }
            Vec::new()
        }
        Msg::UseOverleafToggled(on) => {
            state.controls_mut().use_overleaf = on;
            Vec::new()
        }
        Msg::ProcessClicked => {
            let Some(file) = state.selected_file().cloned() else {
                return (state, Vec::new());
            };
            let request = state.processing_request();
            state.begin_processing();
            vec![Effect::SubmitProcess { file, request }]
        }
        Msg::ProcessHeadersReceived => {
            state.set_progress(PROGRESS_HEADERS);
            Vec::new()
        }
        Msg::ProcessFinished(reply) => {
            let mut effects = match reply {
                ProcessReply::Completed(result) => {
                    state.set_progress(PROGRESS_DONE);
                    handle_success(&mut state, result)
                }
                ProcessReply::Rejected { error } => show_status(
                    &mut state,
                    format!("Error: {}", error.as_deref().unwrap_or(UNKNOWN_ERROR)),
                    Severity::Danger,
                ),
                ProcessReply::Transport(reason) => show_status(
                    &mut state,
                    format!("Network error: {reason}"),
                    Severity::Danger,
                ),
            };
            state.end_processing();
            effects.push(Effect::ScheduleProgressReset {
                delay: PROGRESS_RESET_DELAY,
            });
            effects
        }
        Msg::CompileClicked => {
            let Some(handle) = state.job_handle().cloned() else {
                return (state, Vec::new());
            };
            let mut effects = show_status(
                &mut state,
                "Compiling LaTeX to PDF...".to_string(),
                Severity::Info,
            );
            effects.push(Effect::CompileExisting { handle });
            effects
        }
        Msg::CompileFinished(reply) => match reply {
            CompileReply::Compiled { pdf_url } => {
                state.apply_compiled(pdf_url);
                show_status(
                    &mut state,
                    "PDF compiled successfully!".to_string(),
                    Severity::Success,
                )
            }
            CompileReply::Rejected { error } => show_status(
                &mut state,
                format!(
                    "Compilation failed: {}",
                    error.as_deref().unwrap_or(UNKNOWN_ERROR)
                ),
                Severity::Danger,
            ),
            CompileReply::Transport(reason) => show_status(
                &mut state,
                format!("Compilation error: {reason}"),
                Severity::Danger,
            ),
        },
        Msg::HealthChecked(reply) => {
            // Background check: never surfaces a status message.
            match reply {
                HealthReply::Online(report) => state.apply_health(Some(report)),
                HealthReply::Offline => state.apply_health(None),
            }
            Vec::new()
        }
        Msg::DownloadClicked(kind) => match state.artifact_url(kind) {
            Some(url) => vec![Effect::DownloadArtifact {
                kind,
                url: url.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::DownloadFinished { kind, reply } => match reply {
            DownloadReply::Saved(path) => show_status(
                &mut state,
                format!("Saved {kind} to {}", path.display()),
                Severity::Success,
            ),
            DownloadReply::Failed(reason) => show_status(
                &mut state,
                format!("Download failed: {reason}"),
                Severity::Danger,
            ),
        },
        Msg::StatusDismissElapsed => {
            state.hide_status();
            Vec::new()
        }
        Msg::ProgressResetElapsed => {
            state.set_progress(PROGRESS_IDLE);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn select_first(state: &mut AppState, files: Vec<SelectedFile>) -> Vec<Effect> {
    let Some(file) = files.into_iter().next() else {
        return Vec::new();
    };
    state.select_file(file);
    show_status(
        state,
        "File ready for processing".to_string(),
        Severity::Success,
    )
}

fn handle_success(state: &mut AppState, result: JobResult) -> Vec<Effect> {
    state.apply_result(result);
    show_status(
        state,
        "Study notes generated successfully!".to_string(),
        Severity::Success,
    )
}

fn show_status(state: &mut AppState, text: String, severity: Severity) -> Vec<Effect> {
    state.show_status(text, severity);
    vec![Effect::ScheduleStatusDismiss {
        delay: STATUS_DISMISS_DELAY,
    }]
}
