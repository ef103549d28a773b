//! Frame data structures for OCR output

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::Orientation;
use crate::vision::geometry::AffineTransform;
use crate::vision::ocr::{RecognizedText, TextObservation};

/// One frame's worth of OCR observations
#[derive(Clone)]
pub struct OcrFrame {
    /// Observations in engine order
    pub observations: Vec<Arc<dyn TextObservation>>,
    /// OCR space to display space
    pub transform: AffineTransform,
    /// Timestamp when the frame was captured
    pub timestamp: Instant,
}

impl OcrFrame {
    /// Create a new frame
    pub fn new(observations: Vec<Arc<dyn TextObservation>>, transform: AffineTransform) -> Self {
        Self {
            observations,
            transform,
            timestamp: Instant::now(),
        }
    }

    /// Frame from serializable observations
    pub fn from_recognized(observations: Vec<RecognizedText>, transform: AffineTransform) -> Self {
        let observations = observations
            .into_iter()
            .map(|o| Arc::new(o) as Arc<dyn TextObservation>)
            .collect();
        Self::new(observations, transform)
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl fmt::Debug for OcrFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texts: Vec<&str> = self.observations.iter().map(|o| o.text()).collect();
        f.debug_struct("OcrFrame")
            .field("observations", &texts)
            .field("transform", &self.transform)
            .finish()
    }
}

/// On-disk form of a frame
///
/// Either a bare array of observations or an object that may also name the
/// coordinate orientation of this frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameRecord {
    Tagged {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        orientation: Option<Orientation>,
        observations: Vec<RecognizedText>,
    },
    Bare(Vec<RecognizedText>),
}

impl FrameRecord {
    /// Build a frame, using `fallback` when the record names no orientation
    pub fn into_frame(self, fallback: Orientation) -> OcrFrame {
        let (orientation, observations) = match self {
            FrameRecord::Tagged { orientation, observations } => {
                (orientation.unwrap_or(fallback), observations)
            }
            FrameRecord::Bare(observations) => (fallback, observations),
        };
        OcrFrame::from_recognized(observations, orientation.transform())
    }
}
