use crate::error::{KuronekoError, Result};
use crate::logger::LogLevel;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://api-preview.apirouter.ai/api/v1/deepimg/flux-1-dev";
pub const DEFAULT_PRODUCT_NAME: &str = "kuroneko";

#[derive(Debug, Clone)]
pub struct DeepImgConfig {
    pub endpoint: String,
}

impl Default for DeepImgConfig {
    fn default() -> Self {
        DeepImgConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl DeepImgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint = env::var("KURONEKO_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        DeepImgConfig { endpoint }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            Ok(())
        } else {
            Err(KuronekoError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub deepimg: DeepImgConfig,
    pub product_name: String,
    pub download_dir: PathBuf,
    pub log_level: LogLevel,
    pub log_json: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            deepimg: DeepImgConfig::default(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            download_dir: PathBuf::from("."),
            log_level: LogLevel::Info,
            log_json: false,
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let product_name = env::var("KURONEKO_PRODUCT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());
        let download_dir = env::var("KURONEKO_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let log_level = env::var("KURONEKO_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LogLevel::Info);
        let log_json = env::var("KURONEKO_LOG_JSON")
            .ok()
            .map_or(false, |val| val == "true");
        let log_file = env::var("KURONEKO_LOG_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Config {
            deepimg: DeepImgConfig::from_env(),
            product_name,
            download_dir,
            log_level,
            log_json,
            log_file,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.deepimg = self.deepimg.with_endpoint(endpoint);
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }
}
