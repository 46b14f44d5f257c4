//! Plain-text canvas
//!
//! Approximates the page layout in a monospaced grid: text is grouped into
//! lines by baseline (top of page first) and placed at a column derived from
//! its x position. Rules and bands are dropped; images print as a marker.

use std::collections::BTreeMap;
use std::cmp::Reverse;

use super::CanvasSink;
use crate::error::InvoiceResult;
use crate::layout::{CanvasOp, DrawCommand};

/// Points per character column
const POINTS_PER_COLUMN: i32 = 5;

/// Left page margin in points
const LEFT_MARGIN: i32 = 50;

#[derive(Debug, Default)]
pub struct TextCanvas {
    pages: Vec<BTreeMap<Reverse<i32>, Vec<(i32, String)>>>,
}

impl TextCanvas {
    pub fn new() -> Self {
        Self {
            pages: vec![BTreeMap::new()],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn place(&mut self, x: i32, y: i32, text: String) {
        if let Some(page) = self.pages.last_mut() {
            page.entry(Reverse(y)).or_default().push((x, text));
        }
    }

    /// Lay out every page as text
    pub fn finish(self) -> String {
        let mut out = String::new();
        for (index, page) in self.pages.into_iter().enumerate() {
            out.push_str(&format!("----- page {} -----\n", index + 1));
            for (_, mut items) in page {
                items.sort_by_key(|(x, _)| *x);
                out.push_str(&render_line(&items));
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

fn render_line(items: &[(i32, String)]) -> String {
    let mut line = String::new();
    for (x, text) in items {
        let column = ((x - LEFT_MARGIN).max(0) / POINTS_PER_COLUMN) as usize;
        let width = line.chars().count();
        if width < column {
            line.push_str(&" ".repeat(column - width));
        } else if width > 0 {
            line.push(' ');
        }
        line.push_str(text);
    }
    line.trim_end().to_string()
}

impl CanvasSink for TextCanvas {
    fn accept(&mut self, op: &CanvasOp) -> InvoiceResult<()> {
        match op {
            CanvasOp::PageBreak { .. } => self.pages.push(BTreeMap::new()),
            CanvasOp::Draw(DrawCommand::Text { x, y, text, .. }) => {
                self.place(*x, *y, text.clone())
            }
            CanvasOp::Draw(DrawCommand::Image { path, x, y, .. }) => {
                self.place(*x, *y, format!("[image: {}]", path))
            }
            CanvasOp::Draw(DrawCommand::Line { .. }) => {}
        }
        Ok(())
    }
}
