//! Rows: ordered lines of glyphs with centering-aware layout

use crate::document::glyph::CharGlyph;
use crate::error::NotLaidOut;
use crate::layout::{LayoutConstraints, Measure};
use crate::{Point, Rect};

/// An ordered line of glyphs.
///
/// Insertion order is visual order. The bounding box is valid only
/// immediately after a layout pass; any structural mutation invalidates it
/// until the next one.
#[derive(Debug, Clone)]
pub struct Row {
    glyphs: Vec<CharGlyph>,
    centered: bool,
    bounds: Option<Rect>,
}

impl Row {
    /// Create an empty row. The centering flag is fixed for its lifetime.
    pub fn new(centered: bool) -> Self {
        Self {
            glyphs: Vec::new(),
            centered,
            bounds: None,
        }
    }

    pub fn is_centered(&self) -> bool {
        self.centered
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at an element index
    pub fn glyph(&self, index: usize) -> Option<&CharGlyph> {
        self.glyphs.get(index)
    }

    pub fn glyphs(&self) -> &[CharGlyph] {
        &self.glyphs
    }

    /// The row's characters in visual order
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch()).collect()
    }

    /// Insert a glyph at a gap index, clamped to the current length
    pub fn insert(&mut self, glyph: CharGlyph, index: usize) {
        let index = index.min(self.glyphs.len());
        self.glyphs.insert(index, glyph);
        self.bounds = None;
    }

    /// Remove the glyph at an index. Out-of-range indices are a no-op:
    /// deletions race layout invalidation and are handled defensively.
    pub fn remove(&mut self, index: usize) {
        if index < self.glyphs.len() {
            self.glyphs.remove(index);
            self.bounds = None;
        }
    }

    /// Move all glyphs from `index` to the end into a new tail, for line
    /// splitting. Ownership transfers; nothing is cloned.
    pub fn split_off(&mut self, index: usize) -> Vec<CharGlyph> {
        let index = index.min(self.glyphs.len());
        self.bounds = None;
        self.glyphs.split_off(index)
    }

    /// Append glyphs to the end of the row, for line joining
    pub fn append(&mut self, glyphs: Vec<CharGlyph>) {
        if glyphs.is_empty() {
            return;
        }
        self.glyphs.extend(glyphs);
        self.bounds = None;
    }

    /// Sum of measured advances, measuring on demand. Independent of the
    /// cached box, so the wrap check sees structural mutations immediately.
    pub fn content_width(&mut self, measurer: &dyn Measure) -> f32 {
        self.glyphs
            .iter_mut()
            .map(|g| g.measure(measurer).width)
            .sum()
    }

    /// Lay out glyphs left-to-right from `x`. A centered row whose content
    /// fits inside the wrap width starts at the midpoint offset instead and
    /// reports a box spanning the full wrap width. Centering is recomputed
    /// on every pass since content and wrap width may have changed.
    pub fn layout(
        &mut self,
        x: f32,
        y: f32,
        constraints: &LayoutConstraints,
        measurer: &dyn Measure,
    ) -> Rect {
        let mut content_width = 0.0;
        let mut max_height = constraints.min_row_height;

        for glyph in &mut self.glyphs {
            let size = glyph.measure(measurer);
            content_width += size.width;
            max_height = max_height.max(size.height);
        }

        let fits_centered = self.centered && content_width < constraints.wrap_width;
        let mut cursor = if fits_centered {
            x + (constraints.wrap_width - content_width) / 2.0
        } else {
            x
        };

        for glyph in &mut self.glyphs {
            glyph.place(cursor, y);
            cursor += glyph.size().map(|s| s.width).unwrap_or(0.0);
        }

        let box_width = if fits_centered {
            constraints.wrap_width
        } else {
            content_width
        };

        let bounds = Rect::new(x, y, box_width, max_height);
        self.bounds = Some(bounds);
        bounds
    }

    /// Bounding box of the last layout pass
    pub fn bounds(&self) -> Result<Rect, NotLaidOut> {
        self.bounds.ok_or(NotLaidOut)
    }

    /// Box width. Valid only after a layout pass.
    pub fn width(&self) -> Result<f32, NotLaidOut> {
        self.bounds.map(|b| b.width).ok_or(NotLaidOut)
    }

    /// Box height. Valid only after a layout pass.
    pub fn height(&self) -> Result<f32, NotLaidOut> {
        self.bounds.map(|b| b.height).ok_or(NotLaidOut)
    }

    /// True when the point's y falls within the row's vertical extent.
    /// Unmeasured rows match nothing.
    pub fn hit_test_row(&self, p: Point) -> bool {
        match self.bounds {
            Some(b) => p.y >= b.y && p.y <= b.y + b.height,
            None => false,
        }
    }
}
