//! Draw commands
//!
//! The document is an ordered stream of [`CanvasOp`]s. Each draw command is
//! self-contained (position, font, colour), so a sink never needs to track
//! drawing state between commands.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFace {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Font {
    pub face: FontFace,
    pub size: u8,
}

impl Font {
    pub const fn regular(size: u8) -> Self {
        Self {
            face: FontFace::Regular,
            size,
        }
    }

    pub const fn bold(size: u8) -> Self {
        Self {
            face: FontFace::Bold,
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

/// A single drawing primitive in page coordinates (origin bottom-left)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawCommand {
    Text {
        x: i32,
        y: i32,
        text: String,
        font: Font,
        color: Color,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        width: u8,
    },
    Image {
        path: String,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

impl DrawCommand {
    /// Black text
    pub fn text(x: i32, y: i32, text: impl Into<String>, font: Font) -> Self {
        Self::Text {
            x,
            y,
            text: text.into(),
            font,
            color: Color::Black,
        }
    }

    /// White text, used on top of header bands
    pub fn inverse_text(x: i32, y: i32, text: impl Into<String>, font: Font) -> Self {
        Self::Text {
            x,
            y,
            text: text.into(),
            font,
            color: Color::White,
        }
    }

    /// One-point horizontal rule
    pub fn rule(x1: i32, x2: i32, y: i32) -> Self {
        Self::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            width: 1,
        }
    }

    /// Thick horizontal band behind a header
    pub fn band(x1: i32, x2: i32, y: i32, width: u8) -> Self {
        Self::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            width,
        }
    }

    pub fn image(path: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::Image {
            path: path.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Text content, if this is a text command
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One element of the ordered output stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CanvasOp {
    Draw(DrawCommand),
    /// Start a new physical page; `page_index` is the page being started
    PageBreak { page_index: usize },
}

impl CanvasOp {
    pub fn is_page_break(&self) -> bool {
        matches!(self, Self::PageBreak { .. })
    }
}
