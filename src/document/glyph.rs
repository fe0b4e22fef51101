//! Character glyphs: the leaf primitives of the composition tree

use crate::error::NotLaidOut;
use crate::layout::Measure;
use crate::{Point, Rect, Size};

/// Style attributes baked into a glyph at creation.
///
/// Changing the toolbar state never reflows existing glyphs; only glyphs
/// inserted afterwards pick up the new style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Point size of the glyph
    pub font_size: f32,
    /// Bold face flag
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            bold: false,
        }
    }
}

impl TextStyle {
    pub fn new(font_size: f32, bold: bool) -> Self {
        Self { font_size, bold }
    }
}

/// A single measured character.
///
/// The character and style are fixed at construction; the origin and size
/// are populated by the layout pass and stale until it runs.
#[derive(Debug, Clone)]
pub struct CharGlyph {
    ch: char,
    style: TextStyle,
    origin: Point,
    size: Option<Size>,
}

impl CharGlyph {
    /// Create an unmeasured glyph
    pub fn new(ch: char, style: TextStyle) -> Self {
        Self {
            ch,
            style,
            origin: Point::default(),
            size: None,
        }
    }

    /// The character this glyph renders
    pub fn ch(&self) -> char {
        self.ch
    }

    /// The style baked in at construction
    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Measure against the given service and cache the result
    pub(crate) fn measure(&mut self, measurer: &dyn Measure) -> Size {
        let size = measurer.measure(self.ch, &self.style);
        self.size = Some(size);
        size
    }

    /// Set the layout origin without remeasuring
    pub(crate) fn place(&mut self, x: f32, y: f32) {
        self.origin = Point { x, y };
    }

    /// Measure and position in one step, returning the bounding box
    pub fn layout(&mut self, x: f32, y: f32, measurer: &dyn Measure) -> Rect {
        let size = self.measure(measurer);
        self.place(x, y);
        Rect::new(x, y, size.width, size.height)
    }

    /// Origin assigned by the last layout pass
    pub fn position(&self) -> Point {
        self.origin
    }

    /// Measured size, if a layout pass has run
    pub(crate) fn size(&self) -> Option<Size> {
        self.size
    }

    /// Advance width. Valid only after a layout pass.
    pub fn width(&self) -> Result<f32, NotLaidOut> {
        self.size.map(|s| s.width).ok_or(NotLaidOut)
    }

    /// Glyph height. Valid only after a layout pass.
    pub fn height(&self) -> Result<f32, NotLaidOut> {
        self.size.map(|s| s.height).ok_or(NotLaidOut)
    }

    /// Half-width hit policy: the visual midpoint of each glyph, not its
    /// physical edge, is the boundary used for caret placement. A point is
    /// inside this glyph's column when it falls in `(x + w/2, x + w + w/2]`.
    /// Unmeasured glyphs match nothing.
    pub fn contains_col(&self, p: Point) -> bool {
        match self.size {
            Some(size) => {
                let half = size.width / 2.0;
                p.x > self.origin.x + half && p.x <= self.origin.x + size.width + half
            }
            None => false,
        }
    }

    /// True when the point falls left of the glyph midpoint
    pub fn is_before(&self, p: Point) -> bool {
        match self.size {
            Some(size) => p.x < self.origin.x + size.width / 2.0,
            None => false,
        }
    }
}
