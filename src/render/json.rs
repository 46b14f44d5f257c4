//! JSON canvas
//!
//! Serializes the op stream as-is so another renderer can replay it.

use serde::Serialize;

use super::CanvasSink;
use crate::error::{InvoiceError, InvoiceResult};
use crate::layout::CanvasOp;

/// Schema version of the serialized stream
pub const STREAM_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct SerializedStream<'a> {
    schema_version: u32,
    pages: usize,
    ops: &'a [CanvasOp],
}

#[derive(Debug, Default)]
pub struct JsonCanvas {
    ops: Vec<CanvasOp>,
}

impl JsonCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> InvoiceResult<Vec<u8>> {
        let stream = SerializedStream {
            schema_version: STREAM_SCHEMA_VERSION,
            pages: 1 + self.ops.iter().filter(|op| op.is_page_break()).count(),
            ops: &self.ops,
        };
        serde_json::to_vec_pretty(&stream)
            .map_err(|e| InvoiceError::Render(format!("Failed to serialize document: {}", e)))
    }
}

impl CanvasSink for JsonCanvas {
    fn accept(&mut self, op: &CanvasOp) -> InvoiceResult<()> {
        self.ops.push(op.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DrawCommand, Font};
    use crate::render::emit_all;

    #[test]
    fn test_stream_shape() {
        let ops = vec![
            CanvasOp::Draw(DrawCommand::text(63, 700, "RollCredits", Font::regular(25))),
            CanvasOp::PageBreak { page_index: 1 },
        ];
        let mut canvas = JsonCanvas::new();
        emit_all(&mut canvas, &ops).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&canvas.finish().unwrap()).unwrap();
        assert_eq!(value["pages"], 2);
        assert_eq!(value["ops"][0]["op"], "draw");
        assert_eq!(value["ops"][0]["kind"], "text");
        assert_eq!(value["ops"][0]["font"]["face"], "regular");
        assert_eq!(value["ops"][1]["op"], "page_break");
        assert_eq!(value["ops"][1]["page_index"], 1);
    }
}
