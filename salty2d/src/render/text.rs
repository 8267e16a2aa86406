use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use anyhow::{anyhow, Result};

/// Font metrics used for text layout.
pub trait TextMeasure {
    /// Nominal font size in pixels.
    fn size(&self) -> f32;

    /// Horizontal advance of `text` when laid out on a single line.
    fn text_width(&self, text: &str) -> f32;
}

/// Fixed-advance metrics. Every char advances by `size * advance_ratio`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceFont {
    pub size: f32,
    pub advance_ratio: f32,
}

impl MonospaceFont {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            advance_ratio: 0.6,
        }
    }

    pub fn with_advance_ratio(mut self, ratio: f32) -> Self {
        self.advance_ratio = ratio;
        self
    }
}

impl Default for MonospaceFont {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl TextMeasure for MonospaceFont {
    fn size(&self) -> f32 {
        self.size
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.size * self.advance_ratio
    }
}

/// Metrics read from a TTF/OTF font at a fixed pixel size.
#[derive(Clone)]
pub struct GlyphFont {
    font: FontArc,
    scale: PxScale,
}

impl GlyphFont {
    /// Load a font from bytes (TTF/OTF format).
    pub fn from_bytes(bytes: &[u8], size: f32) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes.to_vec())
            .map_err(|e| anyhow!("Failed to load font: {}", e))?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }

    /// Same font at another pixel size.
    pub fn resized(&self, size: f32) -> Self {
        Self {
            font: self.font.clone(),
            scale: PxScale::from(size),
        }
    }
}

impl TextMeasure for GlyphFont {
    fn size(&self) -> f32 {
        self.scale.y
    }

    fn text_width(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut previous = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        width
    }
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont")
            .field("size", &self.scale.y)
            .finish_non_exhaustive()
    }
}
