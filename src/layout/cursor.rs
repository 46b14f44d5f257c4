//! Vertical write cursor
//!
//! A small state machine over `(y, page_index)`. Rows are written top-down:
//! each row moves the cursor down by its height and lands at the new cursor
//! position. When that position would fall below the bottom margin the cursor
//! moves to the next page and the row is placed at the top of it instead.

use serde::Serialize;

/// Default top-of-page offset for appendix rows
pub const DEFAULT_TOP: i32 = 690;

/// Default lowest position a row may occupy
pub const DEFAULT_BOTTOM: i32 = 60;

/// Page geometry for cursor-driven layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutConfig {
    pub top: i32,
    pub bottom: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            bottom: DEFAULT_BOTTOM,
        }
    }
}

/// Row types with fixed heights; content never changes a row's height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    UncategorizedLine,
    SectionHeader,
    ItemHeader,
    VendorLine,
    ExcludedHeader,
    ExcludedLine,
}

impl RowKind {
    pub const fn height(self) -> i32 {
        match self {
            Self::UncategorizedLine => 20,
            Self::SectionHeader => 27,
            Self::ItemHeader => 35,
            Self::VendorLine => 25,
            Self::ExcludedHeader => 37,
            Self::ExcludedLine => 25,
        }
    }
}

/// Where a row ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page_index: usize,
    pub y: i32,
    /// The row started a new page
    pub page_break: bool,
}

#[derive(Debug, Clone)]
pub struct LayoutCursor {
    config: LayoutConfig,
    y: i32,
    page_index: usize,
}

impl LayoutCursor {
    /// Cursor at the top of `page_index`
    pub fn new(config: LayoutConfig, page_index: usize) -> Self {
        Self {
            config,
            y: config.top,
            page_index,
        }
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Consume `height` units and return where the row goes
    pub fn advance(&mut self, height: i32) -> Placement {
        let next = self.y - height;
        if next < self.config.bottom {
            self.page_index += 1;
            self.y = self.config.top - height;
            Placement {
                page_index: self.page_index,
                y: self.y,
                page_break: true,
            }
        } else {
            self.y = next;
            Placement {
                page_index: self.page_index,
                y: self.y,
                page_break: false,
            }
        }
    }
}
