use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use qrcode::render::svg;
use qrcode::QrCode;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("QR rendering failed: {0}")]
pub struct RenderError(String);

/// Turns payload text into a self-contained image the UI can display.
pub trait QrRenderer: Send + Sync {
    /// Render `payload` and return an image data URL.
    fn render(&self, payload: &str) -> Result<String, RenderError>;
}

/// Renders SVG QR codes as base64 data URLs.
#[derive(Debug, Clone)]
pub struct SvgQrRenderer {
    /// Minimum edge length of the image, in pixels.
    pub min_size: u32,
}

impl Default for SvgQrRenderer {
    fn default() -> Self {
        Self { min_size: 200 }
    }
}

impl QrRenderer for SvgQrRenderer {
    fn render(&self, payload: &str) -> Result<String, RenderError> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| RenderError(e.to_string()))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.min_size, self.min_size)
            .build();
        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}
