use std::path::PathBuf;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use notes_logging::{notes_debug, notes_info, notes_warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::filename::artifact_filename;
use crate::store::ArtifactStore;
use crate::types::ErrorBody;
use crate::{ApiError, CompileResponse, EngineEvent, HealthResponse, ProcessResponse, UploadForm};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Origin the service is reached at, e.g. `http://127.0.0.1:5000`.
    pub origin: String,
    pub connect_timeout: Duration,
    /// Note generation is slow, so the default is generous.
    pub request_timeout: Duration,
    pub max_download_bytes: u64,
    pub download_dir: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            max_download_bytes: 64 * 1024 * 1024,
            download_dir: PathBuf::from("downloads"),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The study-notes service as seen by the client.
///
/// Every method settles to `Ok` only when the service reports success;
/// `ApiError::Service` carries an application failure, every other variant a
/// transport failure.
#[async_trait::async_trait]
pub trait NotesApi: Send + Sync {
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    async fn process(
        &self,
        form: UploadForm,
        sink: &dyn ProgressSink,
    ) -> Result<ProcessResponse, ApiError>;

    async fn compile(&self, tex_filename: &str) -> Result<CompileResponse, ApiError>;

    /// Downloads `link` (absolute, or relative to the origin) into the download directory.
    async fn download(&self, link: &str) -> Result<PathBuf, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestNotesApi {
    settings: ServiceSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestNotesApi {
    pub fn new(settings: ServiceSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.origin)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", settings.origin)))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(format!("{path}: {err}")))
    }

    fn compile_url(&self, tex_filename: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("/api/compile/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(tex_filename);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl NotesApi for ReqwestNotesApi {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.endpoint("/api/health")?;
        notes_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Service {
                status: status.as_u16(),
                error: None,
            });
        }
        let body = response.text().await.map_err(map_reqwest_error)?;
        decode(&body)
    }

    async fn process(
        &self,
        form: UploadForm,
        sink: &dyn ProgressSink,
    ) -> Result<ProcessResponse, ApiError> {
        let url = self.endpoint("/api/process")?;
        notes_info!(
            "POST {} file={} bytes={} note_type={}",
            url,
            form.file_name,
            form.content.len(),
            form.note_type
        );
        let part = Part::bytes(form.content.to_vec()).file_name(form.file_name.clone());
        let multipart = Form::new()
            .part("file", part)
            .text("note_type", form.note_type.clone())
            .text("include_questions", form.include_questions.to_string())
            .text("compile_pdf", form.compile_pdf.to_string())
            .text("use_overleaf", form.use_overleaf.to_string());

        let response = self
            .client
            .post(url)
            .multipart(multipart)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        sink.emit(EngineEvent::ProcessHeaders);

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        let parsed: ProcessResponse = decode(&body)?;
        if !status.is_success() || !parsed.success {
            return Err(ApiError::Service {
                status: status.as_u16(),
                error: parsed.error,
            });
        }
        Ok(parsed)
    }

    async fn compile(&self, tex_filename: &str) -> Result<CompileResponse, ApiError> {
        let url = self.compile_url(tex_filename)?;
        notes_info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        let parsed: CompileResponse = decode(&body)?;
        if !status.is_success() || !parsed.success {
            return Err(ApiError::Service {
                status: status.as_u16(),
                error: parsed.error,
            });
        }
        Ok(parsed)
    }

    async fn download(&self, link: &str) -> Result<PathBuf, ApiError> {
        let url = self
            .base
            .join(link)
            .map_err(|err| ApiError::InvalidUrl(format!("{link}: {err}")))?;
        notes_info!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.error);
            return Err(ApiError::Service {
                status: status.as_u16(),
                error,
            });
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let bytes = collect_capped(response.bytes_stream(), max_bytes, map_reqwest_error).await?;
        save(
            self.settings.download_dir.clone(),
            artifact_filename(&url),
            bytes,
        )
        .await
    }
}

/// Reads a body chunk by chunk, failing as soon as it grows past `max_bytes`.
///
/// The declared length is checked up front; this catches bodies sent without one.
async fn collect_capped<S, B, E>(
    mut stream: S,
    max_bytes: u64,
    map_err: fn(E) -> ApiError,
) -> Result<Vec<u8>, ApiError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_err)?;
        let chunk = chunk.as_ref();
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(ApiError::TooLarge {
                max_bytes,
                actual: Some(next_len),
            });
        }
        bytes.extend_from_slice(chunk);
    }
    Ok(bytes)
}

/// Writes off the async workers; a large artifact must not stall the timers.
async fn save(dir: PathBuf, filename: String, bytes: Vec<u8>) -> Result<PathBuf, ApiError> {
    let len = bytes.len();
    let path = tokio::task::spawn_blocking(move || ArtifactStore::new(dir).save(&filename, &bytes))
        .await
        .map_err(|err| ApiError::Persist(err.to_string()))?
        .map_err(|err| ApiError::Persist(err.to_string()))?;
    notes_info!("Saved {} bytes to {:?}", len, path);
    Ok(path)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| {
        notes_warn!("Undecodable response body ({} bytes): {}", body.len(), err);
        ApiError::Decode(err.to_string())
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
