//! Study-notes engine: service calls, timers and artifact persistence.
mod client;
mod engine;
mod filename;
mod store;
mod types;

pub use client::{ChannelProgressSink, NotesApi, ProgressSink, ReqwestNotesApi, ServiceSettings};
pub use engine::EngineHandle;
pub use filename::artifact_filename;
pub use store::{ArtifactStore, StoreError};
pub use types::{
    ApiError, Artifact, CompileResponse, EngineEvent, HealthResponse, ProcessResponse, TimerKind,
    TipsPayload, UploadForm,
};
