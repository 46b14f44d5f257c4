//! Rendering sinks
//!
//! A [`CanvasSink`] consumes the ordered [`CanvasOp`] stream of an invoice.
//! The document itself knows nothing about the output technology; each sink
//! decides how draw commands and page breaks become bytes.

pub mod json;
pub mod text;

pub use json::JsonCanvas;
pub use text::TextCanvas;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::InvoiceResult;
use crate::layout::CanvasOp;

/// Ordered consumer of draw commands and page breaks
pub trait CanvasSink {
    fn accept(&mut self, op: &CanvasOp) -> InvoiceResult<()>;
}

/// Feed every op to `sink` in order, stopping at the first failure
pub fn emit_all(sink: &mut dyn CanvasSink, ops: &[CanvasOp]) -> InvoiceResult<()> {
    for op in ops {
        sink.accept(op)?;
    }
    Ok(())
}

/// Supported document encodings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }

    /// Render `ops` into the bytes of a finished document
    pub fn render(self, ops: &[CanvasOp]) -> InvoiceResult<Vec<u8>> {
        match self {
            Self::Text => {
                let mut canvas = TextCanvas::new();
                emit_all(&mut canvas, ops)?;
                Ok(canvas.finish().into_bytes())
            }
            Self::Json => {
                let mut canvas = JsonCanvas::new();
                emit_all(&mut canvas, ops)?;
                canvas.finish()
            }
        }
    }
}
