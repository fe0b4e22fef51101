//! Render output: display-list frames

mod display;

pub use display::{DisplayItem, DisplayList};
