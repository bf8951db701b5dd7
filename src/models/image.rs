use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a flux-1-dev generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub device_id: String,
    pub prompt: String,
    pub size: String,
    pub n: String,
    pub output_format: String,
}

/// Pulls `data.images[0].url` out of a generation response.
pub fn extract_image_url(body: &Value) -> Option<String> {
    body.pointer("/data/images/0/url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

/// Bytes behind the currently displayed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl LoadedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
