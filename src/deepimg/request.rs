use crate::models::{resolve_dimensions, style_label, GenerationRequest};
use rand::Rng;

pub const DEVICE_ID_LEN: usize = 32;
pub const IMAGE_COUNT: &str = "1";
pub const OUTPUT_FORMAT: &str = "png";

/// Fresh per-request client identifier: 32 independent random hex digits.
pub fn device_id() -> String {
    let mut rng = rand::thread_rng();
    (0..DEVICE_ID_LEN)
        .map(|_| {
            let digit = rng.gen_range(0..16u32);
            char::from_digit(digit, 16).unwrap_or('0')
        })
        .collect()
}

/// Appends `-style <label>` to the prompt when the style tag is known.
pub fn compose_prompt(prompt: &str, style: &str) -> String {
    let suffix = style_label(style)
        .map(|label| format!("-style {}", label))
        .unwrap_or_default();
    format!("{} {}", prompt.trim(), suffix).trim().to_string()
}

pub fn build_request(prompt: &str, style: &str, size_key: &str) -> GenerationRequest {
    GenerationRequest {
        device_id: device_id(),
        prompt: compose_prompt(prompt, style),
        size: resolve_dimensions(size_key).to_string(),
        n: IMAGE_COUNT.to_string(),
        output_format: OUTPUT_FORMAT.to_string(),
    }
}
