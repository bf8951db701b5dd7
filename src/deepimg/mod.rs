pub mod image_client;
pub mod request;

use crate::{error::Result, models::LoadedImage};
use async_trait::async_trait;

pub use image_client::ImageClient;
pub use request::{build_request, compose_prompt, device_id};

/// What the UI controller needs from an image generation service.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate(&self, prompt: &str, style: &str, size_key: &str) -> Result<String>;

    async fn load_image(&self, url: &str) -> Result<LoadedImage>;
}
