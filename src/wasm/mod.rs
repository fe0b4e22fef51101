//! WASM bindings for the composition engine

use crate::document::TextStyle;
use crate::layout::{Composition, FontMetrics, LayoutConstraints};
use crate::render::{DisplayItem, DisplayList};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed wrapper around the engine.
///
/// Owns the toolbar state (font size, bold, centered) and translates raw
/// key, pointer, and committed-text events into engine commands. The
/// frontend drives `renderFrame` from its repaint timer; caret blinking
/// falls out of that cadence.
#[wasm_bindgen]
pub struct WasmComposer {
    composition: Composition,
    metrics: FontMetrics,
    font_size: f32,
    bold: bool,
    centered: bool,
    dragging: bool,
}

#[wasm_bindgen]
impl WasmComposer {
    /// Create a composer with the default wrap width and origin
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            composition: Composition::new(LayoutConstraints::default()),
            metrics: FontMetrics::default(),
            font_size: 14.0,
            bold: false,
            centered: true,
            dragging: false,
        }
    }

    /// Create a composer with a custom wrap width
    #[wasm_bindgen(js_name = withWrapWidth)]
    pub fn with_wrap_width(wrap_width: f32) -> Self {
        let constraints = LayoutConstraints {
            wrap_width,
            ..LayoutConstraints::default()
        };
        let mut composer = Self::new();
        composer.composition = Composition::new(constraints);
        composer
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    #[wasm_bindgen(js_name = setBold)]
    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    #[wasm_bindgen(js_name = setCentered)]
    pub fn set_centered(&mut self, centered: bool) {
        self.centered = centered;
    }

    /// Insert one typed character. Control characters are ignored.
    #[wasm_bindgen(js_name = insertChar)]
    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        self.composition
            .insert(ch, self.style(), self.centered, &self.metrics);
    }

    /// Insert a batch of committed input-method text
    #[wasm_bindgen(js_name = commitText)]
    pub fn commit_text(&mut self, text: &str) {
        self.composition
            .commit_text(text, self.style(), self.centered, &self.metrics);
    }

    /// Dispatch a navigation or editing key by its DOM key name
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) {
        match key {
            "ArrowLeft" => self.composition.move_left(),
            "ArrowRight" => self.composition.move_right(),
            "ArrowUp" => self.composition.move_up(),
            "ArrowDown" => self.composition.move_down(),
            "Backspace" => self.composition.delete(),
            "Enter" => self.composition.new_line(self.centered),
            _ => {}
        }
    }

    /// Primary-button press: place the caret and anchor a selection
    #[wasm_bindgen(js_name = pointerPressed)]
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.composition.clear_selection();
        self.composition.move_caret(x, y);
        let pos = self.composition.caret().position;
        self.composition.set_selection_start(pos.row, pos.col);
    }

    /// Drag: move the caret and extend the selection
    #[wasm_bindgen(js_name = pointerDragged)]
    pub fn pointer_dragged(&mut self, x: f32, y: f32) {
        if !self.dragging {
            return;
        }
        self.composition.move_caret(x, y);
        let pos = self.composition.caret().position;
        self.composition.set_selection_end(pos.row, pos.col);
    }

    /// Release: end the drag, keeping any selection
    #[wasm_bindgen(js_name = pointerReleased)]
    pub fn pointer_released(&mut self) {
        self.dragging = false;
    }

    /// Produce the next frame as JSON
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&mut self) -> String {
        let list = self.composition.draw(&self.metrics);
        let frame = Frame::from_display_list(&list);
        serde_json::to_string(&frame).unwrap_or_else(|_| "{}".to_string())
    }

    /// Full document text
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.composition.text()
    }

    /// Currently selected text (empty without a selection)
    #[wasm_bindgen(js_name = getSelectedText)]
    pub fn get_selected_text(&self) -> String {
        self.composition.selected_text()
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.composition.clear_selection();
    }

    /// Caret position info as JSON
    #[wasm_bindgen(js_name = getCaretInfo)]
    pub fn get_caret_info(&self) -> String {
        let pos = self.composition.caret().position;
        let info = CaretInfo {
            row: pos.row,
            col: pos.col,
            has_selection: self.composition.has_selection(),
        };
        serde_json::to_string(&info).unwrap_or_else(|_| "{}".to_string())
    }

    fn style(&self) -> TextStyle {
        TextStyle::new(self.font_size, self.bold)
    }
}

impl Default for WasmComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable frame for JS
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub version: u64,
    pub glyphs: Vec<GlyphFrame>,
    pub selection: Vec<RectFrame>,
    pub caret: Option<CaretFrame>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphFrame {
    pub x: f32,
    pub y: f32,
    pub ch: char,
    pub font_size: f32,
    pub bold: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaretFrame {
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaretInfo {
    pub row: usize,
    pub col: usize,
    pub has_selection: bool,
}

impl Frame {
    fn from_display_list(list: &DisplayList) -> Self {
        let mut glyphs = Vec::new();
        let mut selection = Vec::new();
        let mut caret = None;

        for item in &list.items {
            match item {
                DisplayItem::Glyph {
                    position,
                    ch,
                    font_size,
                    bold,
                } => {
                    glyphs.push(GlyphFrame {
                        x: position.x,
                        y: position.y,
                        ch: *ch,
                        font_size: *font_size,
                        bold: *bold,
                    });
                }
                DisplayItem::SelectionRect { rect } => {
                    selection.push(RectFrame {
                        x: rect.x,
                        y: rect.y,
                        width: rect.width,
                        height: rect.height,
                    });
                }
                DisplayItem::Caret { position, height } => {
                    caret = Some(CaretFrame {
                        x: position.x,
                        y: position.y,
                        height: *height,
                    });
                }
            }
        }

        Frame {
            version: list.version,
            glyphs,
            selection,
            caret,
        }
    }
}
