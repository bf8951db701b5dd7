use crate::{
    config::DeepImgConfig,
    deepimg::{request::build_request, ImageBackend},
    error::{KuronekoError, Result},
    logger::timer,
    models::{extract_image_url, LoadedImage},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ImageClient {
    pub fn new(config: &DeepImgConfig) -> Result<Self> {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(http: reqwest::Client, config: &DeepImgConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Posts one generation request and returns the URL of the produced image.
    pub async fn generate(&self, prompt: &str, style: &str, size_key: &str) -> Result<String> {
        let request = build_request(prompt, style, size_key);
        let _timer = timer(&format!("generation {}", request.device_id));

        log::info!(
            "🎨 Generating image: style={} size={} device_id={}",
            style,
            request.size,
            request.device_id
        );
        log::debug!("Prompt: {}", request.prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("DeepImg answered {} for {}", status, request.device_id);
            return Err(KuronekoError::Http {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let url = extract_image_url(&body).ok_or_else(|| {
            log::error!("No image URL in response for {}", request.device_id);
            KuronekoError::MissingImageUrl
        })?;

        log::info!("✅ Image ready: {}", url);
        Ok(url)
    }

    /// Fetches the bytes behind an image URL. Base64 `data:` URLs are decoded in place.
    pub async fn load_image(&self, url: &str) -> Result<LoadedImage> {
        if let Some(data) = url.strip_prefix("data:") {
            return decode_data_url(url, data);
        }

        let _timer = timer("image download");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Image download answered {}", status);
            return Err(KuronekoError::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        log::debug!("Loaded {} bytes from {}", bytes.len(), url);
        Ok(LoadedImage {
            url: url.to_string(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

fn decode_data_url(url: &str, data: &str) -> Result<LoadedImage> {
    let (meta, payload) = data
        .split_once(',')
        .ok_or_else(|| KuronekoError::Serialization("malformed data URL".into()))?;
    let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| KuronekoError::Serialization("data URL is not base64".into()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| KuronekoError::Serialization(e.to_string()))?;

    Ok(LoadedImage {
        url: url.to_string(),
        content_type: (!media_type.is_empty()).then(|| media_type.to_string()),
        bytes,
    })
}

#[async_trait]
impl ImageBackend for ImageClient {
    async fn generate(&self, prompt: &str, style: &str, size_key: &str) -> Result<String> {
        ImageClient::generate(self, prompt, style, size_key).await
    }

    async fn load_image(&self, url: &str) -> Result<LoadedImage> {
        ImageClient::load_image(self, url).await
    }
}
