//! Text recognition through the Google Cloud Vision `images:annotate` API

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::OcrConfig;
use crate::error::SourceError;

use super::http::{agent, read_json};
use super::{OcrEngine, credential};

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub(crate) const KEY_VAR: &str = "VISION_API_KEY";
const MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

pub(crate) struct VisionOcr {
    endpoint: String,
    api_key: String,
    agent: ureq::Agent,
}

impl VisionOcr {
    pub(crate) fn new(config: &OcrConfig) -> Result<Self, SourceError> {
        Ok(Self {
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key: credential(KEY_VAR)?,
            agent: agent(),
        })
    }
}

fn annotate_request(image_url: &str) -> serde_json::Value {
    json!({
        "requests": [{
            "image": { "source": { "imageUri": image_url } },
            "features": [{ "type": "DOCUMENT_TEXT_DETECTION", "maxResults": MAX_RESULTS }]
        }]
    })
}

fn full_text(response: AnnotateResponse) -> Result<String, SourceError> {
    let first = response
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Ocr("empty annotate response".to_string()))?;

    if let Some(status) = first.error {
        return Err(SourceError::Ocr(format!(
            "{} (code {})",
            status.message, status.code
        )));
    }

    first
        .full_text_annotation
        .map(|a| a.text)
        .ok_or_else(|| SourceError::Ocr("no text detected".to_string()))
}

impl OcrEngine for VisionOcr {
    fn name(&self) -> &'static str {
        "vision"
    }

    fn recognize(&self, image_url: &str) -> Result<String, SourceError> {
        debug!(image_url, "requesting text detection");
        let response = self
            .agent
            .post(&self.endpoint)
            .query("key", &self.api_key)
            .send_json(annotate_request(image_url))?;

        let parsed: AnnotateResponse = read_json(response, "text detection")?;
        let text = full_text(parsed)?;
        debug!(chars = text.chars().count(), "text detected");
        Ok(text)
    }
}
