//! Message types between a live session and its worker thread

use crate::analysis::locale::Locale;
use crate::capture::frame::OcrFrame;

use super::state::RecognitionState;

/// Messages sent to the worker
#[derive(Debug)]
pub enum SessionCommand {
    /// Run one frame, tagged with the generation it was submitted under
    Frame { frame: OcrFrame, generation: u64 },
    /// Switch vocabulary for subsequent frames
    SetLocale(Locale),
    /// Stop the worker
    Shutdown,
}

/// Messages delivered to the consumer thread
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Published text or finished flag changed
    Updated(RecognitionState),
    /// Session state was cleared
    Restarted { generation: u64 },
}
