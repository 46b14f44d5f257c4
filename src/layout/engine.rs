//! Page layout engine
//!
//! Couples a [`LayoutCursor`] to an output stream of [`CanvasOp`]s. The engine
//! decides *where* rows go and when pages break; callers only say what to draw
//! at a given baseline.
//!
//! Headers get no keep-with-next treatment: a section or item header can be
//! the last row on a page with its lines continuing on the next one.

use tracing::trace;

use super::command::{CanvasOp, DrawCommand};
use super::cursor::{LayoutConfig, LayoutCursor, Placement, RowKind};

#[derive(Debug)]
pub struct PageLayoutEngine {
    cursor: LayoutCursor,
    ops: Vec<CanvasOp>,
    page_breaks: usize,
}

impl PageLayoutEngine {
    /// Start a fresh page at `first_page`, emitting the break that opens it
    pub fn open(config: LayoutConfig, first_page: usize) -> Self {
        Self {
            cursor: LayoutCursor::new(config, first_page),
            ops: vec![CanvasOp::PageBreak {
                page_index: first_page,
            }],
            page_breaks: 1,
        }
    }

    /// Draw at a fixed position on the current page without moving the cursor
    pub fn draw(&mut self, command: DrawCommand) {
        self.ops.push(CanvasOp::Draw(command));
    }

    /// Lay out one row; `render` receives the row's baseline
    pub fn write_row<F>(&mut self, kind: RowKind, render: F) -> Placement
    where
        F: FnOnce(i32) -> Vec<DrawCommand>,
    {
        let placement = self.cursor.advance(kind.height());
        if placement.page_break {
            trace!(page = placement.page_index, row = ?kind, "Page break");
            self.ops.push(CanvasOp::PageBreak {
                page_index: placement.page_index,
            });
            self.page_breaks += 1;
        }
        self.ops
            .extend(render(placement.y).into_iter().map(CanvasOp::Draw));
        placement
    }

    /// Page-break events emitted so far, including the opening one
    pub fn page_breaks(&self) -> usize {
        self.page_breaks
    }

    pub fn page_index(&self) -> usize {
        self.cursor.page_index()
    }

    pub fn cursor_y(&self) -> i32 {
        self.cursor.y()
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<CanvasOp> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::command::Font;

    fn write_lines(engine: &mut PageLayoutEngine, count: usize) {
        for n in 0..count {
            engine.write_row(RowKind::UncategorizedLine, |y| {
                vec![DrawCommand::text(63, y, format!("row {}", n + 1), Font::regular(11))]
            });
        }
    }

    #[test]
    fn test_forty_rows_produce_two_page_breaks() {
        let mut engine = PageLayoutEngine::open(LayoutConfig::default(), 2);
        write_lines(&mut engine, 40);

        assert_eq!(engine.page_breaks(), 2);
        assert_eq!(engine.page_index(), 3);

        // row 32 is the first thing after the second break
        let ops = engine.ops();
        let second_break = ops
            .iter()
            .enumerate()
            .filter(|(_, op)| op.is_page_break())
            .nth(1)
            .map(|(idx, _)| idx)
            .unwrap();
        assert_eq!(second_break, 32);
        match &ops[second_break + 1] {
            CanvasOp::Draw(cmd) => assert_eq!(cmd.as_text(), Some("row 32")),
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_break_points_are_reproducible() {
        let mut first = PageLayoutEngine::open(LayoutConfig::default(), 0);
        let mut second = PageLayoutEngine::open(LayoutConfig::default(), 0);
        write_lines(&mut first, 100);
        write_lines(&mut second, 100);
        assert_eq!(first.ops(), second.ops());
        // 31 rows per page: breaks before rows 32, 63 and 94
        assert_eq!(first.page_breaks(), 4);
    }

    #[test]
    fn test_fixed_draws_do_not_move_cursor() {
        let mut engine = PageLayoutEngine::open(LayoutConfig::default(), 0);
        engine.draw(DrawCommand::rule(60, 545, 740));
        assert_eq!(engine.cursor_y(), 690);
        assert_eq!(engine.ops().len(), 2);
    }
}
