pub mod config;
pub mod deepimg;
pub mod error;
pub mod logger;
pub mod models;
pub mod ui;

pub use config::{Config, DeepImgConfig};
pub use deepimg::{ImageBackend, ImageClient};
pub use error::{KuronekoError, Result};
pub use models::{GenerationRequest, LoadedImage, SizeKey, Style};
pub use ui::{Phase, SubmitOutcome, UiController};
