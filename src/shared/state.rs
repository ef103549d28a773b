//! Published recognition state

use crate::vision::geometry::Rect;

/// What a session currently shows to its consumer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionState {
    /// Best schedule string so far, empty until the first read
    pub text: String,
    /// Whether the best string has been read often enough
    pub finished: bool,
    /// Session generation, bumped on every restart
    pub generation: u64,
    /// Display-space rectangles of the tokens behind the latest read
    pub highlights: Vec<Rect>,
}

impl RecognitionState {
    /// Fresh state for a new generation
    pub fn for_generation(generation: u64) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }
}

/// Runtime counters that are not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Frames handed to the session
    pub frames_submitted: u64,
    /// Frames dropped because the worker was still busy
    pub frames_dropped: u64,
    /// Results discarded because a restart happened mid-frame
    pub frames_stale: u64,
    /// Frames run through the pipeline
    pub frames_processed: u64,
    /// Pipeline time of the last processed frame
    pub last_processing_ms: u64,
}
