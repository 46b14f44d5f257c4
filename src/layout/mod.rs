//! Page layout
//!
//! Turns report content into an ordered stream of draw commands and page
//! breaks. Positioning lives here; actual drawing is left to a
//! [`crate::render::CanvasSink`].

pub mod appendix;
pub mod command;
pub mod cursor;
pub mod engine;

pub use appendix::{layout_appendix, section_order, AppendixSection, AppendixTotals};
pub use command::{CanvasOp, Color, DrawCommand, Font, FontFace};
pub use cursor::{LayoutConfig, LayoutCursor, Placement, RowKind};
pub use engine::PageLayoutEngine;
