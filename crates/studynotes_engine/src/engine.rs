use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use notes_logging::{notes_info, notes_warn};

use crate::client::{ChannelProgressSink, NotesApi};
use crate::{Artifact, EngineEvent, TimerKind, UploadForm};

enum EngineCommand {
    CheckHealth,
    Process(UploadForm),
    Compile { tex_filename: String },
    Download { artifact: Artifact, link: String },
    Timer { kind: TimerKind, delay: Duration },
}

/// Runs service calls and timers on a background tokio runtime.
///
/// Commands are spawned independently: nothing is sequenced or cancelled, so
/// overlapping requests settle in whatever order the network decides.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn NotesApi>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
            notes_info!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn process(&self, form: UploadForm) {
        self.send(EngineCommand::Process(form));
    }

    pub fn compile(&self, tex_filename: impl Into<String>) {
        self.send(EngineCommand::Compile {
            tex_filename: tex_filename.into(),
        });
    }

    pub fn download(&self, artifact: Artifact, link: impl Into<String>) {
        self.send(EngineCommand::Download {
            artifact,
            link: link.into(),
        });
    }

    pub fn schedule(&self, kind: TimerKind, delay: Duration) {
        self.send(EngineCommand::Timer { kind, delay });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            notes_warn!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    api: &dyn NotesApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::CheckHealth => EngineEvent::HealthChecked(api.health().await),
        EngineCommand::Process(form) => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            EngineEvent::ProcessCompleted(api.process(form, &sink).await)
        }
        EngineCommand::Compile { tex_filename } => {
            EngineEvent::CompileCompleted(api.compile(&tex_filename).await)
        }
        EngineCommand::Download { artifact, link } => EngineEvent::DownloadCompleted {
            artifact,
            result: api.download(&link).await,
        },
        EngineCommand::Timer { kind, delay } => {
            tokio::time::sleep(delay).await;
            EngineEvent::TimerElapsed(kind)
        }
    };
    let _ = event_tx.send(event);
}
