//! OCR observation contract
//!
//! The OCR engine itself is external. It hands us observations: a best
//! candidate string, a confidence, and a way to locate any sub-range of that
//! string in the engine's coordinate space.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// A single recognized-text observation from an OCR engine
pub trait TextObservation: Send + Sync {
    /// Best candidate string
    fn text(&self) -> &str;

    /// Recognition confidence (0.0 - 1.0)
    fn confidence(&self) -> f32;

    /// Bounding box of a byte range of `text()`, in OCR space
    fn bounding_box(&self, range: Range<usize>) -> Option<Rect>;
}

/// Serializable OCR observation as dumped by a capture harness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedText {
    /// Recognized text
    pub text: String,
    /// Recognition confidence
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    /// Bounds of the whole string
    pub bounds: Rect,
    /// Optional per-character boxes, one per `char` of `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub char_boxes: Vec<Rect>,
}

fn default_confidence() -> f32 {
    1.0
}

impl RecognizedText {
    pub fn new(text: impl Into<String>, confidence: f32, bounds: Rect) -> Self {
        Self {
            text: text.into(),
            confidence,
            bounds,
            char_boxes: Vec::new(),
        }
    }
}

impl TextObservation for RecognizedText {
    fn text(&self) -> &str {
        &self.text
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn bounding_box(&self, range: Range<usize>) -> Option<Rect> {
        if range.start >= range.end
            || range.end > self.text.len()
            || !self.text.is_char_boundary(range.start)
            || !self.text.is_char_boundary(range.end)
        {
            return None;
        }

        // char index span of the byte range
        let first = self.text[..range.start].chars().count();
        let count = self.text[range].chars().count();
        let total = self.text.chars().count();

        if self.char_boxes.len() == total {
            return self.char_boxes[first..first + count]
                .iter()
                .copied()
                .reduce(|acc, r| acc.union(&r));
        }

        // No glyph boxes: interpolate along the baseline
        let step = self.bounds.width / total as f64;
        Some(Rect::new(
            self.bounds.x + step * first as f64,
            self.bounds.y,
            step * count as f64,
            self.bounds.height,
        ))
    }
}
