//! Session-level recognition state
//!
//! Owns the stability voter and the state published to consumers. Frame
//! analysis happens elsewhere; this type only folds finished analyses in.

use tracing::{debug, info};

use super::vote::{StabilityVoter, DEFAULT_FINISH_THRESHOLD};
use super::{FrameAnalysis, HoursPipeline};
use crate::capture::frame::OcrFrame;
use crate::shared::RecognitionState;

#[derive(Debug, Clone)]
pub struct HoursRecognizer {
    voter: StabilityVoter,
    state: RecognitionState,
}

impl Default for HoursRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_FINISH_THRESHOLD)
    }
}

impl HoursRecognizer {
    pub fn new(finish_threshold: usize) -> Self {
        Self {
            voter: StabilityVoter::new(finish_threshold),
            state: RecognitionState::default(),
        }
    }

    /// Currently published state
    pub fn state(&self) -> &RecognitionState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn voter(&self) -> &StabilityVoter {
        &self.voter
    }

    /// Clear history and published state, starting a new generation
    pub fn restart(&mut self) -> RecognitionState {
        self.voter.restart();
        self.state = RecognitionState::for_generation(self.state.generation + 1);
        info!("Recognition restarted (generation {})", self.state.generation);
        self.state.clone()
    }

    /// Fold one frame's analysis into the session
    ///
    /// Returns the new published state, or `None` when nothing changed: the
    /// session is already finished or the frame produced no schedule.
    pub fn apply(&mut self, analysis: &FrameAnalysis) -> Option<RecognitionState> {
        if self.state.finished {
            return None;
        }
        let verdict = self.voter.record(&analysis.schedule)?;

        self.state.text = verdict.text;
        self.state.finished = verdict.finished;
        self.state.highlights = analysis.highlights.clone();

        if self.state.finished {
            info!("Recognition finished: {:?} ({} reads)", self.state.text, verdict.count);
        } else {
            debug!("Current best {:?} ({} reads)", self.state.text, verdict.count);
        }
        Some(self.state.clone())
    }

    /// One forced run against a still image
    ///
    /// A single image cannot improve with more votes, so its first non-empty
    /// schedule is the answer.
    pub fn recognize_still(&mut self, pipeline: &HoursPipeline, frame: &OcrFrame) -> String {
        self.restart();
        let analysis = pipeline.process(frame);
        self.apply(&analysis);
        self.state.text.clone()
    }
}
