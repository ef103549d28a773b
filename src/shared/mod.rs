//! Shared state and messaging between a session's worker and its consumer
//!
//! The worker thread computes results; the consumer only ever sees them as
//! messages on a channel.

pub mod state;
pub mod messages;

pub use state::{RecognitionState, RuntimeState};
pub use messages::{SessionCommand, SessionEvent};
