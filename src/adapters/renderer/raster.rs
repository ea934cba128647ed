//! CPU raster renderer
//!
//! Paints the card background at `width × scale` by `height × scale` and
//! stacks every embedded image in equal vertical slots. Images that are still
//! external references (an inline fetch failed) are skipped. Text is not
//! rasterized.

use super::traits::{RenderOptions, Renderer};
use crate::domain::{Card, CardexError, ImageFormat, Node, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;

/// JPEG quality used unless configured otherwise
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Renderer backed by the `image` crate
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    jpeg_quality: u8,
}

impl RasterRenderer {
    /// Creates a renderer with the default JPEG quality
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Overrides the JPEG quality (1-100)
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Renderer for RasterRenderer {
    async fn render(&self, card: &Card, options: &RenderOptions) -> Result<Vec<u8>> {
        let scale = options.pixel_scale.max(1);
        let width = card.width.max(1).saturating_mul(scale);
        let height = card.height.max(1).saturating_mul(scale);
        let background = parse_hex_color(&card.background).ok_or_else(|| {
            CardexError::Render(format!(
                "card {} has invalid background colour '{}'",
                card.id, card.background
            ))
        })?;

        let mut layers = Vec::new();
        card.visit_rendered(&options.exclude, &mut |node| {
            if let Node::Image { src, .. } = node {
                match decode_data_uri(src) {
                    Some(bytes) => layers.push(bytes),
                    None => tracing::debug!(card_id = %card.id, src = %src, "Skipping non-embedded image"),
                }
            }
        });

        let format = options.format;
        let quality = self.jpeg_quality;
        let card_id = card.id.clone();

        tracing::trace!(card_id = %card_id, width, height, layers = layers.len(), "Rasterizing card");

        tokio::task::spawn_blocking(move || rasterize(width, height, background, &layers, format, quality))
            .await
            .map_err(|e| CardexError::Render(format!("render task for {card_id} failed: {e}")))?
    }
}

fn rasterize(
    width: u32,
    height: u32,
    background: Rgba<u8>,
    layers: &[Vec<u8>],
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>> {
    let mut canvas = RgbaImage::from_pixel(width, height, background);

    if !layers.is_empty() {
        let slot_height = (height / layers.len() as u32).max(1);
        for (slot, bytes) in layers.iter().enumerate() {
            let decoded = image::load_from_memory(bytes)?;
            let fitted = decoded
                .resize(width, slot_height, FilterType::Triangle)
                .to_rgba8();
            let x = width.saturating_sub(fitted.width()) / 2;
            let y = slot as u32 * slot_height + slot_height.saturating_sub(fitted.height()) / 2;
            imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));
        }
    }

    encode(canvas, format, jpeg_quality)
}

fn encode(canvas: RgbaImage, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Png => {
            DynamicImage::ImageRgba8(canvas)
                .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)?;
        }
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, jpeg_quality).encode_image(&rgb)?;
        }
    }
    Ok(out)
}

/// Decodes the payload of a base64 `data:` URI
pub fn decode_data_uri(src: &str) -> Option<Vec<u8>> {
    let rest = src.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload.trim()).ok()
}

/// Parses `#rgb` or `#rrggbb` into an opaque colour
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().strip_prefix('#')?;
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()?;
    match *digits.as_slice() {
        [r1, r2, g1, g2, b1, b2] => Some(Rgba([
            (r1 << 4) | r2,
            (g1 << 4) | g2,
            (b1 << 4) | b2,
            255,
        ])),
        [r, g, b] => Some(Rgba([r * 17, g * 17, b * 17, 255])),
        _ => None,
    }
}
