use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{TranscribeError, TranscribeResult};

/// A speech-to-text model name, e.g. `whisper-small`. Configured, not
/// hardcoded.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8090".to_string(),
            model: "whisper-small".to_string(),
            timeout: Duration::from_secs(180),
        }
    }
}

/// One time-aligned transcript segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
}

/// Client for a remote speech-to-text endpoint. Lazily loads the
/// configured model on first use rather than at construction, mirroring
/// the "if the model is not loaded, lazy-load" behavior of the segment
/// transcription step.
pub struct TranscriptionClient {
    http: reqwest::Client,
    config: TranscriptionConfig,
    loaded: OnceCell<()>,
}

impl TranscriptionClient {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            loaded: OnceCell::new(),
        }
    }

    async fn ensure_loaded(&self) -> TranscribeResult<()> {
        self.loaded
            .get_or_try_init(|| async {
                info!(model = %self.config.model, "loading speech-to-text model");
                let resp = self
                    .http
                    .post(format!("{}/load", self.config.endpoint))
                    .json(&serde_json::json!({ "model": self.config.model }))
                    .timeout(Duration::from_secs(60))
                    .send()
                    .await
                    .map_err(|e| TranscribeError::ModelUnavailable(e.to_string()))?;
                if !resp.status().is_success() {
                    return Err(TranscribeError::ModelUnavailable(format!(
                        "load returned status {}",
                        resp.status()
                    )));
                }
                Ok(())
            })
            .await
            .map(|_| ())
    }

    /// Probes whether the speech-to-text endpoint is reachable, for the
    /// "get FFmpeg capabilities" operation's `whisper_available` field.
    /// Does not force a model load — a bare connectivity check.
    pub async fn is_available(&self) -> bool {
        self.http
            .get(format!("{}/health", self.config.endpoint))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    /// Submits one audio window for transcription with a language hint.
    /// Returns time-aligned text.
    pub async fn transcribe(&self, audio_path: &Path, language_hint: &str) -> TranscribeResult<Vec<TranscriptSegment>> {
        self.ensure_loaded().await?;

        let bytes = tokio::fs::read(audio_path).await.map_err(|e| TranscribeError::BadResponse(e.to_string()))?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name("segment.wav");
        let form = reqwest::multipart::Form::new()
            .text("language", language_hint.to_string())
            .text("model", self.config.model.clone())
            .part("audio", part);

        debug!(path = %audio_path.display(), "submitting audio for transcription");

        let response = tokio::time::timeout(
            self.config.timeout,
            self.http.post(format!("{}/transcribe", self.config.endpoint)).multipart(form).send(),
        )
        .await
        .map_err(|_| TranscribeError::Timeout(self.config.timeout))??;

        if !response.status().is_success() {
            return Err(TranscribeError::BadResponse(format!("status {}", response.status())));
        }

        let parsed: TranscribeResponse = response.json().await?;
        if parsed.segments.is_empty() && !parsed.text.is_empty() {
            return Ok(vec![TranscriptSegment { text: parsed.text, start: 0.0, end: 0.0 }]);
        }
        Ok(parsed.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn transcribe_loads_model_once_then_submits() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).and(path("/load")).respond_with(ResponseTemplate::new(200)).mount(&server).await;
        Mock::given(method("POST"))
            .and(path("/transcribe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "hola",
                "segments": [{"text": "hola", "start": 0.0, "end": 1.0}]
            })))
            .mount(&server)
            .await;

        let client = TranscriptionClient::new(TranscriptionConfig {
            endpoint: server.uri(),
            ..Default::default()
        });

        let dir = tempfile::TempDir::new().unwrap();
        let audio_path = dir.path().join("a.wav");
        tokio::fs::write(&audio_path, b"RIFF....").await.unwrap();

        let segments = client.transcribe(&audio_path, "es").await.unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "hola");
    }

    #[tokio::test]
    async fn is_available_reflects_health_endpoint_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).and(path("/health")).respond_with(ResponseTemplate::new(200)).mount(&server).await;

        let client = TranscriptionClient::new(TranscriptionConfig { endpoint: server.uri(), ..Default::default() });
        assert!(client.is_available().await);
    }

    #[tokio::test]
    async fn is_available_is_false_when_endpoint_unreachable() {
        let client = TranscriptionClient::new(TranscriptionConfig { endpoint: "http://127.0.0.1:1".to_string(), ..Default::default() });
        assert!(!client.is_available().await);
    }
}
