//! Phase 3 — remote reasoning: sends transcribed segments to a
//! chat-completions endpoint and maps its lenient JSON reply back to
//! absolute video time. Grounded on `deepseek_analyzer.py::_analyze_with_deepseek`
//! / `_extract_json_from_text`, in the request/response idiom of the
//! teacher's own remote-model client.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::error::{HighlightError, HighlightResult};
use crate::scoring::MappedHighlight;
use crate::timecode::parse_time_to_seconds;
use crate::transcription::TranscribedSegment;

#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawHighlightsEnvelope {
    #[serde(default)]
    highlights: Vec<RawHighlight>,
}

#[derive(Debug, Deserialize)]
struct RawHighlight {
    #[serde(default)]
    segment_index: usize,
    #[serde(default = "default_score")]
    score: f64,
    #[serde(default = "default_reason")]
    reason: String,
    #[serde(default)]
    start_time: Option<Value>,
    #[serde(default)]
    end_time: Option<Value>,
    #[serde(default)]
    duration: Option<Value>,
    #[serde(default)]
    optimal_duration: Option<Value>,
}

fn default_score() -> f64 {
    0.5
}

fn default_reason() -> String {
    "Highlighted moment".to_string()
}

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?").unwrap());

pub struct ReasoningClient {
    http: reqwest::Client,
    config: ReasoningConfig,
}

impl ReasoningClient {
    pub fn new(config: ReasoningConfig) -> Self {
        let http = reqwest::Client::builder().timeout(config.timeout).build().unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    /// Phase 3: prompts the remote model with the transcribed segments,
    /// extracts the JSON it returns (tolerating markdown fences and
    /// surrounding prose), and maps each entry back to absolute time.
    pub async fn analyze(&self, segments: &[TranscribedSegment], config: &AnalyzerConfig) -> HighlightResult<Vec<MappedHighlight>> {
        let prompt = build_prompt(segments);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: 0.3,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HighlightError::RemoteStatus(format!("remote reasoning endpoint returned {status}")));
        }

        let body: ChatResponse = response.json().await?;
        let content = body.choices.first().map(|c| c.message.content.clone()).unwrap_or_default();
        debug!(len = content.len(), "received reasoning response");

        let envelope = extract_highlights(&content)?;
        let video_duration = segments.iter().map(|s| s.end).fold(0.0_f64, f64::max);
        Ok(map_to_absolute_time(envelope.highlights, segments, video_duration, config))
    }
}

fn build_prompt(segments: &[TranscribedSegment]) -> String {
    let mut body = String::new();
    for segment in segments {
        if segment.transcription.trim().is_empty() {
            continue;
        }
        body.push_str(&format!("Segment {} ({:.1}s - {:.1}s):\n{}\n\n", segment.index, segment.start, segment.end, segment.transcription));
    }

    format!(
        "You are analyzing video transcript segments to find the most shareable highlights.\n\n{body}\nRespond with ONLY a JSON object of this exact shape, no commentary:\n{{\"highlights\": [{{\"segment_index\": <int>, \"score\": <0.0-1.0>, \"reason\": <string>, \"start_time\": <seconds or mm:ss, optional>, \"end_time\": <seconds or mm:ss, optional>, \"optimal_duration\": <seconds, optional>}}]}}"
    )
}

fn extract_highlights(content: &str) -> HighlightResult<RawHighlightsEnvelope> {
    let candidate = extract_json_object(content).ok_or_else(|| HighlightError::BadJson("no JSON object found in reasoning response".into()))?;
    serde_json::from_str(&candidate).map_err(|err| HighlightError::BadJson(err.to_string()))
}

fn extract_json_object(text: &str) -> Option<String> {
    if let Some(found) = outermost_braces(text) {
        return Some(found);
    }
    let stripped = FENCE.replace_all(text, "");
    outermost_braces(&stripped)
}

fn outermost_braces(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(text[start..=end].to_string())
}

fn parse_time_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_time_to_seconds(s),
        _ => None,
    }
}

fn map_to_absolute_time(raw: Vec<RawHighlight>, segments: &[TranscribedSegment], video_duration: f64, config: &AnalyzerConfig) -> Vec<MappedHighlight> {
    let mut mapped = Vec::with_capacity(raw.len());

    for highlight in raw {
        let Some(segment) = segments.get(highlight.segment_index) else {
            warn!(segment_index = highlight.segment_index, "reasoning response referenced unknown segment");
            continue;
        };

        let parsed_start = highlight.start_time.as_ref().and_then(parse_time_value);
        let parsed_end = highlight.end_time.as_ref().and_then(parse_time_value);
        let parsed_duration = highlight.duration.as_ref().or(highlight.optimal_duration.as_ref()).and_then(parse_time_value);

        let (mut start, mut end) = match (parsed_start, parsed_end) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                if let Some(d) = parsed_duration {
                    let center = (segment.start + segment.end) / 2.0;
                    (center - d / 2.0, center + d / 2.0)
                } else {
                    (segment.start, segment.end)
                }
            }
        };

        start = start.clamp(0.0, video_duration);
        end = end.clamp(0.0, video_duration);
        if end <= start {
            start = segment.start;
            end = segment.end;
        }

        if end - start < config.absolute_min_duration {
            let deficit = config.absolute_min_duration - (end - start);
            start = (start - deficit / 2.0).max(0.0);
            end = (end + deficit / 2.0).min(video_duration);
        }

        if end - start > config.absolute_max_duration {
            let center = (start + end) / 2.0;
            let half = config.absolute_max_duration / 2.0;
            start = (center - half).max(0.0);
            end = (start + config.absolute_max_duration).min(video_duration);
            start = (end - config.absolute_max_duration).max(0.0);
        }

        mapped.push(MappedHighlight { start, end, score: highlight.score, reason: highlight.reason, transcription: segment.transcription.clone() });
    }

    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_object_wrapped_in_fences() {
        let text = "here you go:\n```json\n{\"highlights\": []}\n```\nhope that helps";
        let extracted = extract_json_object(text).unwrap();
        assert_eq!(extracted.trim(), "{\"highlights\": []}");
    }

    #[test]
    fn extracts_bare_json_object() {
        let text = "{\"highlights\": [{\"segment_index\": 0}]}";
        assert_eq!(extract_json_object(text).unwrap(), text);
    }

    #[test]
    fn maps_segment_bounds_when_no_explicit_time_given() {
        let segments = vec![TranscribedSegment { index: 0, start: 10.0, end: 40.0, transcription: "hola".into() }];
        let raw = vec![RawHighlight {
            segment_index: 0,
            score: 0.7,
            reason: "great moment".into(),
            start_time: None,
            end_time: None,
            duration: None,
            optimal_duration: None,
        }];
        let mapped = map_to_absolute_time(raw, &segments, 100.0, &AnalyzerConfig::default());
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].start, 10.0);
        assert_eq!(mapped[0].end, 40.0);
    }

    #[test]
    fn clamps_above_maximum_duration_recentered_on_midpoint() {
        let segments = vec![TranscribedSegment { index: 0, start: 0.0, end: 600.0, transcription: "hola".into() }];
        let raw = vec![RawHighlight {
            segment_index: 0,
            score: 0.7,
            reason: "long one".into(),
            start_time: Some(Value::from(0.0)),
            end_time: Some(Value::from(600.0)),
            duration: None,
            optimal_duration: None,
        }];
        let config = AnalyzerConfig { absolute_max_duration: 180.0, ..Default::default() };
        let mapped = map_to_absolute_time(raw, &segments, 3600.0, &config);
        let duration = mapped[0].end - mapped[0].start;
        assert!((duration - 180.0).abs() < 1e-9, "expected duration clamped to 180, got {duration}");
        let midpoint = (mapped[0].start + mapped[0].end) / 2.0;
        assert!((midpoint - 300.0).abs() < 1e-9, "expected recentered on original midpoint 300, got {midpoint}");
    }

    #[test]
    fn expands_below_minimum_duration_symmetrically() {
        let segments = vec![TranscribedSegment { index: 0, start: 10.0, end: 40.0, transcription: "hola".into() }];
        let raw = vec![RawHighlight {
            segment_index: 0,
            score: 0.7,
            reason: "brief".into(),
            start_time: Some(Value::from(20.0)),
            end_time: Some(Value::from(21.0)),
            duration: None,
            optimal_duration: None,
        }];
        let config = AnalyzerConfig { absolute_min_duration: 5.0, ..Default::default() };
        let mapped = map_to_absolute_time(raw, &segments, 100.0, &config);
        assert!(mapped[0].end - mapped[0].start >= 5.0 - 1e-9);
    }
}
