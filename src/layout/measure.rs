//! Measurement service for glyph metrics

use crate::document::TextStyle;
use crate::Size;

/// The layout pass's view of font metrics.
///
/// Passed explicitly into every layout-touching call; layout never consults
/// ambient font state, which keeps it pure and testable without a
/// rendering surface.
pub trait Measure {
    /// Advance width and line height for one character in a style
    fn measure(&self, ch: char, style: &TextStyle) -> Size;
}

/// Table-driven metrics: per-ASCII-character advances at a reference size,
/// scaled to the requested size, widened for bold, with a fixed letter
/// spacing added to every advance.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Advances for ASCII characters (0-127) at the reference size
    char_widths: Vec<f32>,
    /// Advance for non-ASCII characters at the reference size
    default_width: f32,
    /// Size the width table was sampled at
    reference_size: f32,
    /// Line height as a multiple of the font size
    line_height_factor: f32,
    /// Width multiplier for bold faces
    bold_factor: f32,
    /// Tracking added to every advance, in layout units
    letter_spacing: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        let default_width = 8.41;
        Self {
            char_widths: vec![default_width; 128],
            default_width,
            reference_size: 16.0,
            line_height_factor: 1.2,
            bold_factor: 1.1,
            letter_spacing: 2.0,
        }
    }
}

impl FontMetrics {
    pub fn new(char_widths: Vec<f32>, default_width: f32, reference_size: f32) -> Self {
        Self {
            char_widths,
            default_width,
            reference_size,
            ..Self::default()
        }
    }

    /// Metrics where every character of the default 16-unit style measures
    /// exactly `advance` x `line_height`. Other sizes scale proportionally.
    /// Intended for tests and benches.
    pub fn fixed(advance: f32, line_height: f32) -> Self {
        Self {
            char_widths: vec![advance; 128],
            default_width: advance,
            reference_size: 16.0,
            line_height_factor: line_height / 16.0,
            bold_factor: 1.0,
            letter_spacing: 0.0,
        }
    }

    fn base_width(&self, ch: char) -> f32 {
        if ch.is_ascii() {
            if let Some(w) = self.char_widths.get(ch as usize) {
                return *w;
            }
        }
        self.default_width
    }
}

impl Measure for FontMetrics {
    fn measure(&self, ch: char, style: &TextStyle) -> Size {
        let scale = style.font_size / self.reference_size;
        let mut advance = self.base_width(ch) * scale;
        if style.bold {
            advance *= self.bold_factor;
        }
        Size {
            width: advance + self.letter_spacing,
            height: style.font_size * self.line_height_factor,
        }
    }
}
