use notes_logging::{notes_debug, notes_info, notes_warn};
use studynotes_core::{
    ArtifactKind, CompileReply, DownloadReply, Effect, HealthReply, HealthReport, JobHandle,
    JobResult, Msg, ProcessReply, ProcessingRequest, SelectedFile, Tips,
};
use studynotes_engine::{
    ApiError, Artifact, CompileResponse, EngineEvent, EngineHandle, HealthResponse,
    ProcessResponse, TimerKind, TipsPayload, UploadForm,
};

/// Hands engine-backed effects to the engine and turns its events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    /// Service requests issued but not yet settled. Timers are not counted.
    pending: usize,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine, pending: 0 }
    }

    /// Starts every effect the engine can run and returns the ones left to the front end.
    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut local = Vec::new();
        for effect in effects {
            match effect {
                Effect::CheckHealth => {
                    notes_debug!("CheckHealth");
                    self.pending += 1;
                    self.engine.check_health();
                }
                Effect::SubmitProcess { file, request } => {
                    notes_info!(
                        "SubmitProcess file={} bytes={} note_type={}",
                        file.name,
                        file.size,
                        request.note_type
                    );
                    self.pending += 1;
                    self.engine.process(upload_form(file, request));
                }
                Effect::CompileExisting { handle } => {
                    notes_info!("CompileExisting handle={}", handle);
                    self.pending += 1;
                    self.engine.compile(handle.tex_filename());
                }
                Effect::DownloadArtifact { kind, url } => {
                    notes_info!("DownloadArtifact kind={} url={}", kind, url);
                    self.pending += 1;
                    self.engine.download(map_artifact(kind), url);
                }
                Effect::ScheduleStatusDismiss { delay } => {
                    self.engine.schedule(TimerKind::StatusDismiss, delay);
                }
                Effect::ScheduleProgressReset { delay } => {
                    self.engine.schedule(TimerKind::ProgressReset, delay);
                }
                Effect::OpenFilePicker => local.push(effect),
            }
        }
        local
    }

    /// Next settled engine event as a message, if one is waiting.
    pub fn next_msg(&mut self) -> Option<Msg> {
        let event = self.engine.try_recv()?;
        if settles_request(&event) {
            self.pending = self.pending.saturating_sub(1);
        }
        Some(map_event(event))
    }

    pub fn pending(&self) -> usize {
        self.pending
    }
}

fn settles_request(event: &EngineEvent) -> bool {
    !matches!(
        event,
        EngineEvent::ProcessHeaders | EngineEvent::TimerElapsed(_)
    )
}

pub(crate) fn upload_form(file: SelectedFile, request: ProcessingRequest) -> UploadForm {
    UploadForm {
        file_name: file.name,
        content: file.content,
        note_type: request.note_type.as_str().to_string(),
        include_questions: request.include_questions,
        compile_pdf: request.compile_pdf,
        use_overleaf: request.use_overleaf,
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthChecked(result) => Msg::HealthChecked(map_health(result)),
        EngineEvent::ProcessHeaders => Msg::ProcessHeadersReceived,
        EngineEvent::ProcessCompleted(result) => Msg::ProcessFinished(map_process(result)),
        EngineEvent::CompileCompleted(result) => Msg::CompileFinished(map_compile(result)),
        EngineEvent::DownloadCompleted { artifact, result } => Msg::DownloadFinished {
            kind: map_artifact_kind(artifact),
            reply: map_download(result),
        },
        EngineEvent::TimerElapsed(TimerKind::StatusDismiss) => Msg::StatusDismissElapsed,
        EngineEvent::TimerElapsed(TimerKind::ProgressReset) => Msg::ProgressResetElapsed,
    }
}

fn map_health(result: Result<HealthResponse, ApiError>) -> HealthReply {
    match result {
        Ok(health) => HealthReply::Online(HealthReport {
            status: health.status,
            latex_available: health.latex_available,
            generator_configured: health.gemini_configured,
        }),
        Err(err) => {
            notes_warn!("Health check failed: {}", err);
            HealthReply::Offline
        }
    }
}

fn map_process(result: Result<ProcessResponse, ApiError>) -> ProcessReply {
    match result {
        Ok(response) => ProcessReply::Completed(JobResult {
            preview: response.preview,
            latex_url: response.latex_url,
            pdf_url: response.pdf_url,
            handle: response.filename.and_then(JobHandle::new),
            tips: response.tips.map(map_tips),
        }),
        Err(err) => {
            notes_warn!("Process request failed: {}", err);
            if err.is_transport() {
                ProcessReply::Transport(err.to_string())
            } else {
                ProcessReply::Rejected {
                    error: err.service_error().map(str::to_string),
                }
            }
        }
    }
}

fn map_compile(result: Result<CompileResponse, ApiError>) -> CompileReply {
    match result {
        Ok(CompileResponse {
            pdf_url: Some(pdf_url),
            ..
        }) => CompileReply::Compiled { pdf_url },
        // Success without a link leaves nothing to show.
        Ok(CompileResponse { error, .. }) => CompileReply::Rejected { error },
        Err(err) => {
            notes_warn!("Compile request failed: {}", err);
            if err.is_transport() {
                CompileReply::Transport(err.to_string())
            } else {
                CompileReply::Rejected {
                    error: err.service_error().map(str::to_string),
                }
            }
        }
    }
}

fn map_download(result: Result<std::path::PathBuf, ApiError>) -> DownloadReply {
    match result {
        Ok(path) => DownloadReply::Saved(path),
        Err(err) => {
            notes_warn!("Download failed: {}", err);
            DownloadReply::Failed(err.to_string())
        }
    }
}

fn map_tips(tips: TipsPayload) -> Tips {
    Tips {
        latex_quality: tips.latex_quality,
        pdf_quality: tips.pdf_quality,
        for_professional_output: tips.for_professional_output,
        overleaf_steps: tips.overleaf_steps,
    }
}

fn map_artifact(kind: ArtifactKind) -> Artifact {
    match kind {
        ArtifactKind::Latex => Artifact::Latex,
        ArtifactKind::Pdf => Artifact::Pdf,
    }
}

fn map_artifact_kind(artifact: Artifact) -> ArtifactKind {
    match artifact {
        Artifact::Latex => ArtifactKind::Latex,
        Artifact::Pdf => ArtifactKind::Pdf,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use studynotes_core::NoteType;

    #[test]
    fn upload_form_carries_request_options() {
        let form = upload_form(
            SelectedFile::new("slides.pdf", b"%PDF".to_vec()),
            ProcessingRequest {
                note_type: NoteType::Outline,
                include_questions: false,
                compile_pdf: true,
                use_overleaf: false,
            },
        );
        assert_eq!(form.file_name, "slides.pdf");
        assert_eq!(&*form.content, b"%PDF");
        assert_eq!(form.note_type, "outline");
        assert!(!form.include_questions);
        assert!(form.compile_pdf);
    }

    #[test]
    fn process_success_becomes_job_result() {
        let msg = map_event(EngineEvent::ProcessCompleted(Ok(ProcessResponse {
            success: true,
            preview: "\\section{A}".to_string(),
            filename: Some("notes_1".to_string()),
            latex_url: Some("/api/download/notes_1.tex".to_string()),
            tips: Some(TipsPayload {
                pdf_quality: Some("Basic".to_string()),
                ..TipsPayload::default()
            }),
            ..ProcessResponse::default()
        })));

        let Msg::ProcessFinished(ProcessReply::Completed(result)) = msg else {
            panic!("unexpected message: {msg:?}");
        };
        assert_eq!(result.handle.as_ref().map(JobHandle::as_str), Some("notes_1"));
        assert_eq!(result.pdf_url, None);
        assert_eq!(
            result.tips.and_then(|tips| tips.pdf_quality).as_deref(),
            Some("Basic")
        );
    }

    #[test]
    fn empty_filename_yields_no_handle() {
        let msg = map_event(EngineEvent::ProcessCompleted(Ok(ProcessResponse {
            success: true,
            filename: Some(String::new()),
            ..ProcessResponse::default()
        })));
        assert!(matches!(
            msg,
            Msg::ProcessFinished(ProcessReply::Completed(JobResult { handle: None, .. }))
        ));
    }

    #[test]
    fn errors_split_into_transport_and_service_tiers() {
        assert_eq!(
            map_event(EngineEvent::ProcessCompleted(Err(ApiError::Service {
                status: 400,
                error: Some("No file provided".to_string()),
            }))),
            Msg::ProcessFinished(ProcessReply::Rejected {
                error: Some("No file provided".to_string())
            })
        );
        assert_eq!(
            map_event(EngineEvent::CompileCompleted(Err(ApiError::Timeout))),
            Msg::CompileFinished(CompileReply::Transport("request timed out".to_string()))
        );
    }

    #[test]
    fn compile_without_link_is_rejected() {
        assert_eq!(
            map_event(EngineEvent::CompileCompleted(Ok(CompileResponse {
                success: true,
                ..CompileResponse::default()
            }))),
            Msg::CompileFinished(CompileReply::Rejected { error: None })
        );
    }

    #[test]
    fn health_failure_is_offline() {
        assert_eq!(
            map_event(EngineEvent::HealthChecked(Err(ApiError::Network(
                "connection refused".to_string()
            )))),
            Msg::HealthChecked(HealthReply::Offline)
        );
    }

    #[test]
    fn download_and_timer_events_map_through() {
        assert_eq!(
            map_event(EngineEvent::DownloadCompleted {
                artifact: Artifact::Pdf,
                result: Ok(PathBuf::from("downloads/notes_1.pdf")),
            }),
            Msg::DownloadFinished {
                kind: ArtifactKind::Pdf,
                reply: DownloadReply::Saved(PathBuf::from("downloads/notes_1.pdf")),
            }
        );
        assert_eq!(
            map_event(EngineEvent::TimerElapsed(TimerKind::ProgressReset)),
            Msg::ProgressResetElapsed
        );
        assert!(!settles_request(&EngineEvent::ProcessHeaders));
        assert!(settles_request(&EngineEvent::HealthChecked(Err(
            ApiError::Timeout
        ))));
    }
}
