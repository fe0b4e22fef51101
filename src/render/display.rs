//! Display list: render-ready frame output

use crate::document::{Document, Row};
use crate::editing::{Caret, Selection, SelectionSpan};
use crate::{Point, Rect};
use smallvec::SmallVec;

/// One paintable item. Geometry comes from the layout pass that built the
/// frame; items carry no document references.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// A positioned character
    Glyph {
        position: Point,
        ch: char,
        font_size: f32,
        bold: bool,
    },
    /// Selection highlight behind a run of glyphs
    SelectionRect { rect: Rect },
    /// The caret bar, present only on the visible blink phase
    Caret { position: Point, height: f32 },
}

/// A complete frame: selection rectangles first (painted underneath), then
/// glyphs in document order, then the caret.
#[derive(Debug, Clone)]
pub struct DisplayList {
    /// Document version the frame was built from
    pub version: u64,
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Build a frame from post-layout geometry. Glyphs that have never
    /// been measured are skipped rather than painted at a stale origin.
    pub fn build(
        document: &Document,
        caret: &Caret,
        selection: Option<&Selection>,
        caret_visible: bool,
    ) -> Self {
        let mut items = Vec::new();

        if let Some(selection) = selection {
            for rect in selection_rects(document, selection.span()) {
                items.push(DisplayItem::SelectionRect { rect });
            }
        }

        for row in document.rows() {
            for glyph in row.glyphs() {
                if glyph.size().is_none() {
                    continue;
                }
                let style = glyph.style();
                items.push(DisplayItem::Glyph {
                    position: glyph.position(),
                    ch: glyph.ch(),
                    font_size: style.font_size,
                    bold: style.bold,
                });
            }
        }

        if caret_visible {
            if let Some(geometry) = caret.geometry {
                items.push(DisplayItem::Caret {
                    position: Point {
                        x: geometry.x,
                        y: geometry.y,
                    },
                    height: geometry.height,
                });
            }
        }

        Self {
            version: document.version(),
            items,
        }
    }

    /// Items of the frame that are selection rectangles
    pub fn selection_rects(&self) -> impl Iterator<Item = &Rect> {
        self.items.iter().filter_map(|item| match item {
            DisplayItem::SelectionRect { rect } => Some(rect),
            _ => None,
        })
    }

    /// The caret item, when the frame is on the visible blink phase
    pub fn caret(&self) -> Option<(Point, f32)> {
        self.items.iter().find_map(|item| match item {
            DisplayItem::Caret { position, height } => Some((*position, *height)),
            _ => None,
        })
    }
}

/// One highlight rectangle per row in the span: first and last rows are
/// clipped to the span columns, rows in between cover their whole content.
fn selection_rects(document: &Document, span: SelectionSpan) -> SmallVec<[Rect; 2]> {
    let mut rects = SmallVec::new();
    for row_idx in span.start_row..=span.end_row {
        let Some(row) = document.row(row_idx) else {
            continue;
        };
        let Ok(bounds) = row.bounds() else {
            continue;
        };
        let (start, end) = span.col_range(row_idx, row.len());
        if let Some(rect) = run_rect(row, start, end, bounds.y, bounds.height) {
            rects.push(rect);
        }
    }
    rects
}

/// Rectangle covering glyphs `[start, end)` of a laid-out row
fn run_rect(row: &Row, start: usize, end: usize, top: f32, height: f32) -> Option<Rect> {
    if start >= end {
        return None;
    }
    let first = row.glyph(start)?;
    let last = row.glyph(end - 1)?;
    let left = first.position().x;
    let right = last.position().x + last.size()?.width;
    Some(Rect::new(left, top, right - left, height))
}
