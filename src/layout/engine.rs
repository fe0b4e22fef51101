//! The composition engine: edit operations, layout, and hit-testing

use crate::document::{CharGlyph, Document, Row, TextStyle};
use crate::editing::{Caret, CaretGeometry, RowCol, Selection};
use crate::layout::Measure;
use crate::render::DisplayList;
use crate::Point;
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

/// Fixed layout parameters for the document
#[derive(Debug, Clone, Copy)]
pub struct LayoutConstraints {
    /// Maximum row content width before an automatic split
    pub wrap_width: f32,
    /// Top-left corner rows are laid out from
    pub origin: Point,
    /// Height floor for every row, including empty ones
    pub min_row_height: f32,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            wrap_width: 500.0,
            origin: Point { x: 20.0, y: 20.0 },
            min_row_height: 16.0,
        }
    }
}

/// The composition engine.
///
/// Owns the document tree, the caret, and the selection, and is the only
/// mutator of all three: embedders issue commands and read frames, nothing
/// else. Every public operation clamps stale indices on entry and restores
/// the caret invariant (`row < row_count`, `col <= row.len()`) before
/// returning; index drift is recoverable by clamping, never fatal.
pub struct Composition {
    document: Document,
    caret: Caret,
    selection: Option<Selection>,
    constraints: LayoutConstraints,
    caret_visible: bool,
}

impl Default for Composition {
    fn default() -> Self {
        Self::new(LayoutConstraints::default())
    }
}

impl Composition {
    pub fn new(constraints: LayoutConstraints) -> Self {
        Self {
            document: Document::new(),
            caret: Caret::at_start(),
            selection: None,
            constraints,
            caret_visible: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn caret(&self) -> &Caret {
        &self.caret
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn constraints(&self) -> &LayoutConstraints {
        &self.constraints
    }

    /// Insert a character at the caret and advance past it.
    ///
    /// When the row's content width after insertion exceeds the wrap width
    /// the row splits at the insertion column, so the overflowing glyph
    /// starts the next row and no row is left wider than the wrap width.
    /// This is a column wrap, not word wrap: the split point is the caret,
    /// never a computed break opportunity. The new row carries the
    /// `centered` flag passed in.
    pub fn insert(&mut self, ch: char, style: TextStyle, centered: bool, measurer: &dyn Measure) {
        self.clamp_caret();
        self.selection = None;
        let RowCol { row, col } = self.caret.position;

        let overflows = match self.document.row_mut(row) {
            Some(row_ref) => {
                row_ref.insert(CharGlyph::new(ch, style), col);
                row_ref.content_width(measurer) > self.constraints.wrap_width
            }
            None => return,
        };
        trace!(%ch, row, col, overflows, "insert");

        if overflows {
            debug!(row, "content exceeded wrap width, splitting at the insertion column");
            self.new_line(centered);
            let wrapped = self.caret.position;
            self.caret.move_to(RowCol::new(wrapped.row, 1));
        } else {
            self.caret.move_to(RowCol::new(row, col + 1));
        }
        debug_assert!(self.caret_in_bounds());
    }

    /// Feed a batch of committed input-method text through `insert`,
    /// one character at a time. Control characters are dropped.
    pub fn commit_text(
        &mut self,
        text: &str,
        style: TextStyle,
        centered: bool,
        measurer: &dyn Measure,
    ) {
        for grapheme in text.graphemes(true) {
            for ch in grapheme.chars() {
                if ch.is_control() {
                    continue;
                }
                self.insert(ch, style, centered, measurer);
            }
        }
    }

    /// Split the caret row at the caret column. The tail moves into a new
    /// row inserted immediately below, carrying the `centered` flag; the
    /// caret lands at the start of the new row.
    pub fn new_line(&mut self, centered: bool) {
        self.clamp_caret();
        self.selection = None;
        let RowCol { row, col } = self.caret.position;

        let tail = match self.document.row_mut(row) {
            Some(row_ref) => row_ref.split_off(col),
            None => return,
        };
        let mut new_row = Row::new(centered);
        new_row.append(tail);
        self.document.insert_row(row + 1, new_row);
        self.caret.move_to(RowCol::new(row + 1, 0));
        debug_assert!(self.caret_in_bounds());
    }

    /// Backspace. Removes the glyph before the caret, or joins the caret
    /// row into the previous one at a row start. No-op at the document
    /// origin.
    pub fn delete(&mut self) {
        self.clamp_caret();
        self.selection = None;
        let RowCol { row, col } = self.caret.position;

        if col > 0 {
            if let Some(row_ref) = self.document.row_mut(row) {
                row_ref.remove(col - 1);
            }
            self.caret.move_to(RowCol::new(row, col - 1));
        } else if row > 0 {
            let Some(mut removed) = self.document.remove_row(row) else {
                return;
            };
            let glyphs = removed.split_off(0);
            let previous_len = self.document.row(row - 1).map(|r| r.len()).unwrap_or(0);
            if let Some(previous) = self.document.row_mut(row - 1) {
                previous.append(glyphs);
            }
            debug!(row, "joined row into previous");
            self.caret.move_to(RowCol::new(row - 1, previous_len));
        }
        debug_assert!(self.caret_in_bounds());
    }

    /// One step left; crosses to the end of the previous row. No-op at the
    /// document start.
    pub fn move_left(&mut self) {
        self.clamp_caret();
        let RowCol { row, col } = self.caret.position;
        if col > 0 {
            self.caret.move_to(RowCol::new(row, col - 1));
        } else if row > 0 {
            let previous_len = self.document.row(row - 1).map(|r| r.len()).unwrap_or(0);
            self.caret.move_to(RowCol::new(row - 1, previous_len));
        }
    }

    /// One step right; crosses to the start of the next row. No-op at the
    /// document end.
    pub fn move_right(&mut self) {
        self.clamp_caret();
        let RowCol { row, col } = self.caret.position;
        let row_len = self.document.row(row).map(|r| r.len()).unwrap_or(0);
        if col < row_len {
            self.caret.move_to(RowCol::new(row, col + 1));
        } else if row + 1 < self.document.row_count() {
            self.caret.move_to(RowCol::new(row + 1, 0));
        }
    }

    /// Up one row, clamping the column to the target row length. The
    /// column is not remembered across vertical moves beyond this clamp.
    pub fn move_up(&mut self) {
        self.clamp_caret();
        let RowCol { row, col } = self.caret.position;
        if row > 0 {
            let target_len = self.document.row(row - 1).map(|r| r.len()).unwrap_or(0);
            self.caret.move_to(RowCol::new(row - 1, col.min(target_len)));
        }
    }

    /// Down one row, clamping the column to the target row length
    pub fn move_down(&mut self) {
        self.clamp_caret();
        let RowCol { row, col } = self.caret.position;
        if row + 1 < self.document.row_count() {
            let target_len = self.document.row(row + 1).map(|r| r.len()).unwrap_or(0);
            self.caret.move_to(RowCol::new(row + 1, col.min(target_len)));
        }
    }

    /// Resolve a pointer position into a caret position against the last
    /// layout: first row whose vertical extent contains the point, then
    /// columns left-to-right under the half-width policy. A point matching
    /// no row resolves to the last row's last column. O(rows + row length).
    pub fn move_caret(&mut self, x: f32, y: f32) {
        let p = Point { x, y };
        for (row_idx, row) in self.document.rows().iter().enumerate() {
            if !row.hit_test_row(p) {
                continue;
            }
            let col = Self::hit_test_col(row, p);
            trace!(row = row_idx, col, "caret hit-test");
            self.caret.move_to(RowCol::new(row_idx, col));
            return;
        }
        let last = self.document.last_row_index();
        let col = self.document.row(last).map(|r| r.len()).unwrap_or(0);
        self.caret.move_to(RowCol::new(last, col));
    }

    /// Column scan under the half-width policy. The first glyph needs a
    /// leading-half special case: without it the policy would misclassify
    /// clicks left of the very first glyph.
    fn hit_test_col(row: &Row, p: Point) -> usize {
        for (idx, glyph) in row.glyphs().iter().enumerate() {
            if idx == 0 && glyph.is_before(p) {
                return 0;
            }
            if glyph.contains_col(p) {
                return idx + 1;
            }
        }
        row.len()
    }

    /// Lay out every row top to bottom from the document origin, then
    /// derive the caret's pixel position: the right edge of the glyph just
    /// before the caret column, or the row's left origin at column 0.
    pub fn layout(&mut self, measurer: &dyn Measure) {
        self.clamp_caret();
        let x = self.constraints.origin.x;
        let mut y = self.constraints.origin.y;
        let constraints = self.constraints;

        for row in self.document.rows_mut() {
            let bounds = row.layout(x, y, &constraints, measurer);
            y += bounds.height;
        }

        let pos = self.caret.position;
        if let Some(row) = self.document.row(pos.row) {
            let row_top = row.bounds().map(|b| b.y).unwrap_or(constraints.origin.y);
            let geometry = match pos.col.checked_sub(1).and_then(|i| row.glyph(i)) {
                Some(glyph) => {
                    let size = glyph.size().unwrap_or_default();
                    CaretGeometry {
                        x: glyph.position().x + size.width,
                        y: row_top,
                        height: if size.height > 0.0 {
                            size.height
                        } else {
                            constraints.min_row_height
                        },
                    }
                }
                None => CaretGeometry {
                    x,
                    y: row_top,
                    height: constraints.min_row_height,
                },
            };
            self.caret.geometry = Some(geometry);
        }
    }

    /// Produce one frame: toggles the blink flag (blinking is driven by
    /// draw-call frequency, not a clock), runs a full layout, then emits
    /// selection rectangles, glyphs, and (on the visible phase) the caret.
    pub fn draw(&mut self, measurer: &dyn Measure) -> DisplayList {
        self.caret_visible = !self.caret_visible;
        self.layout(measurer);
        DisplayList::build(
            &self.document,
            &self.caret,
            self.selection.as_ref(),
            self.caret_visible,
        )
    }

    /// Anchor a selection at a position (clamped to the document)
    pub fn set_selection_start(&mut self, row: usize, col: usize) {
        let pos = self.clamp_pos(RowCol::new(row, col));
        self.selection = Some(Selection::collapsed(pos));
    }

    /// Extend the selection's active end to a position (clamped). Starts a
    /// collapsed selection when none is anchored.
    pub fn set_selection_end(&mut self, row: usize, col: usize) {
        let pos = self.clamp_pos(RowCol::new(row, col));
        match &mut self.selection {
            Some(selection) => selection.extend_to(pos),
            None => self.selection = Some(Selection::collapsed(pos)),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Extract the selected characters. Anchors are normalized into an
    /// independent (min row, min col)-(max row, max col) span; first and
    /// last rows contribute their in-range columns, rows in between their
    /// entire content. Empty without a selection.
    pub fn selected_text(&self) -> String {
        let Some(selection) = self.selection else {
            return String::new();
        };
        let span = selection.span();
        let mut out = String::new();
        for row_idx in span.start_row..=span.end_row {
            let Some(row) = self.document.row(row_idx) else {
                continue;
            };
            let (start, end) = span.col_range(row_idx, row.len());
            for col in start..end {
                if let Some(glyph) = row.glyph(col) {
                    out.push(glyph.ch());
                }
            }
        }
        out
    }

    /// Full document text
    pub fn text(&self) -> String {
        self.document.text()
    }

    fn clamp_pos(&self, pos: RowCol) -> RowCol {
        let row = pos.row.min(self.document.last_row_index());
        let col = pos
            .col
            .min(self.document.row(row).map(|r| r.len()).unwrap_or(0));
        RowCol::new(row, col)
    }

    fn clamp_caret(&mut self) {
        let clamped = self.clamp_pos(self.caret.position);
        if clamped != self.caret.position {
            self.caret.move_to(clamped);
        }
    }

    fn caret_in_bounds(&self) -> bool {
        let RowCol { row, col } = self.caret.position;
        row < self.document.row_count()
            && col <= self.document.row(row).map(|r| r.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontMetrics;

    fn metrics() -> FontMetrics {
        FontMetrics::fixed(8.0, 16.0)
    }

    fn type_str(comp: &mut Composition, text: &str, measurer: &dyn Measure) {
        for ch in text.chars() {
            comp.insert(ch, TextStyle::default(), false, measurer);
        }
    }

    #[test]
    fn test_insert_advances_caret() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);

        assert_eq!(comp.caret().position, RowCol::new(0, 2));
        assert_eq!(comp.text(), "ab");
    }

    #[test]
    fn test_insert_mid_row() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.move_left();
        comp.insert('c', TextStyle::default(), false, &m);

        assert_eq!(comp.text(), "acb");
        assert_eq!(comp.caret().position, RowCol::new(0, 2));
    }

    #[test]
    fn test_delete_removes_before_caret() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.move_left();
        comp.delete();

        assert_eq!(comp.text(), "b");
        assert_eq!(comp.caret().position, RowCol::new(0, 0));
    }

    #[test]
    fn test_delete_at_origin_is_noop() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "a", &m);
        comp.move_left();
        comp.delete();

        assert_eq!(comp.text(), "a");
        assert_eq!(comp.caret().position, RowCol::new(0, 0));
    }

    #[test]
    fn test_new_line_splits_at_caret() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "hello", &m);
        comp.move_left();
        comp.move_left();
        comp.new_line(false);

        assert_eq!(comp.document().row_count(), 2);
        assert_eq!(comp.document().row(0).unwrap().text(), "hel");
        assert_eq!(comp.document().row(1).unwrap().text(), "lo");
        assert_eq!(comp.caret().position, RowCol::new(1, 0));
    }

    #[test]
    fn test_delete_joins_rows() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.new_line(false);
        type_str(&mut comp, "cd", &m);
        comp.move_left();
        comp.move_left();
        comp.delete();

        assert_eq!(comp.document().row_count(), 1);
        assert_eq!(comp.text(), "abcd");
        assert_eq!(comp.caret().position, RowCol::new(0, 2));
    }

    #[test]
    fn test_wrap_splits_at_insertion_column() {
        let m = FontMetrics::fixed(50.0, 16.0);
        let mut comp = Composition::default();
        for _ in 0..11 {
            comp.insert('x', TextStyle::default(), false, &m);
        }

        assert_eq!(comp.document().row_count(), 2);
        assert_eq!(comp.document().row(0).unwrap().len(), 10);
        assert_eq!(comp.document().row(1).unwrap().len(), 1);
        assert_eq!(comp.caret().position, RowCol::new(1, 1));
    }

    #[test]
    fn test_wrapped_row_carries_centering_flag() {
        let m = FontMetrics::fixed(50.0, 16.0);
        let mut comp = Composition::default();
        for _ in 0..11 {
            comp.insert('x', TextStyle::default(), true, &m);
        }
        assert!(comp.document().row(1).unwrap().is_centered());
    }

    #[test]
    fn test_move_left_right_cross_rows() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.new_line(false);
        type_str(&mut comp, "cd", &m);

        comp.move_left();
        comp.move_left();
        assert_eq!(comp.caret().position, RowCol::new(1, 0));
        comp.move_left();
        assert_eq!(comp.caret().position, RowCol::new(0, 2));

        comp.move_right();
        assert_eq!(comp.caret().position, RowCol::new(1, 0));
        comp.move_right();
        comp.move_right();
        comp.move_right();
        assert_eq!(comp.caret().position, RowCol::new(1, 2));
    }

    #[test]
    fn test_move_up_down_clamp_column() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "a", &m);
        comp.new_line(false);
        type_str(&mut comp, "wide", &m);

        comp.move_up();
        assert_eq!(comp.caret().position, RowCol::new(0, 1));
        comp.move_down();
        assert_eq!(comp.caret().position, RowCol::new(1, 1));
    }

    #[test]
    fn test_structural_edits_clear_selection() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "abc", &m);
        comp.set_selection_start(0, 0);
        comp.set_selection_end(0, 2);
        assert!(comp.has_selection());

        comp.insert('d', TextStyle::default(), false, &m);
        assert!(!comp.has_selection());

        comp.set_selection_start(0, 0);
        comp.delete();
        assert!(!comp.has_selection());

        comp.set_selection_start(0, 0);
        comp.new_line(false);
        assert!(!comp.has_selection());
    }

    #[test]
    fn test_selected_text_multi_row() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.new_line(false);
        type_str(&mut comp, "cd", &m);

        comp.set_selection_start(0, 1);
        comp.set_selection_end(1, 1);
        assert_eq!(comp.selected_text(), "bc");
    }

    #[test]
    fn test_selected_text_without_selection_is_empty() {
        let comp = Composition::default();
        assert_eq!(comp.selected_text(), "");
    }

    #[test]
    fn test_hit_test_places_caret() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "a", &m);
        comp.new_line(false);
        type_str(&mut comp, "abc", &m);
        comp.layout(&m);

        // Second row is left-aligned at x = 20; rows are 16 tall from 20.
        comp.move_caret(21.0, 40.0);
        assert_eq!(comp.caret().position, RowCol::new(1, 0));

        comp.move_caret(29.0, 40.0);
        assert_eq!(comp.caret().position, RowCol::new(1, 1));

        comp.move_caret(45.0, 40.0);
        assert_eq!(comp.caret().position, RowCol::new(1, 3));
    }

    #[test]
    fn test_hit_test_below_all_rows_goes_to_end() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.layout(&m);

        comp.move_caret(0.0, 1000.0);
        assert_eq!(comp.caret().position, RowCol::new(0, 2));
    }

    #[test]
    fn test_layout_sets_caret_geometry() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "a", &m);
        comp.new_line(false);
        type_str(&mut comp, "ab", &m);
        comp.layout(&m);

        let geometry = comp.caret().geometry.unwrap();
        assert_eq!(geometry.x, 36.0);
        assert_eq!(geometry.y, 36.0);
        assert_eq!(geometry.height, 16.0);
    }

    #[test]
    fn test_caret_geometry_at_column_zero_uses_row_origin() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.new_line(false);
        comp.layout(&m);

        let geometry = comp.caret().geometry.unwrap();
        assert_eq!(geometry.x, 20.0);
        assert_eq!(geometry.height, 16.0);
    }

    #[test]
    fn test_commit_text_filters_control_characters() {
        let m = metrics();
        let mut comp = Composition::default();
        comp.commit_text("a\u{8}b", TextStyle::default(), false, &m);
        assert_eq!(comp.text(), "ab");
    }

    #[test]
    fn test_stale_selection_anchor_is_clamped() {
        let m = metrics();
        let mut comp = Composition::default();
        type_str(&mut comp, "ab", &m);
        comp.set_selection_start(5, 9);
        let selection = comp.selection().unwrap();
        assert_eq!(selection.anchor, RowCol::new(0, 2));
    }
}
