//! Live Recognition Session
//!
//! Runs the per-frame pipeline on a background worker and hands published
//! state to the consumer thread over a channel. Frames are queued one deep:
//! while the worker is busy, newly arriving frames are dropped.

use anyhow::Result;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info};

use crate::analysis::{FrameAnalysis, HoursPipeline, HoursRecognizer, Locale, PipelineConfig};
use crate::capture::frame::OcrFrame;
use crate::config::AppConfig;
use crate::error::Error;
use crate::shared::{RecognitionState, RuntimeState, SessionCommand, SessionEvent};

/// Live recognition session with a background worker
pub struct LiveSession {
    /// Voter and published state, shared with the worker
    recognizer: Arc<Mutex<HoursRecognizer>>,
    /// Runtime counters (not persisted)
    runtime: Arc<RwLock<RuntimeState>>,
    /// Channel to the worker, one slot deep
    to_worker: Sender<SessionCommand>,
    /// Sender half of the event channel, used by `restart`
    event_tx: Sender<SessionEvent>,
    /// Channel to receive published updates
    events: Receiver<SessionEvent>,
    /// Handle to worker thread
    worker_handle: Option<JoinHandle<()>>,
}

impl LiveSession {
    /// Create a session from application settings
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_settings(config.pipeline_config(), config.recognition.finish_threshold)
    }

    /// Create a session and start its worker thread
    pub fn with_settings(pipeline: PipelineConfig, finish_threshold: usize) -> Result<Self> {
        let recognizer = Arc::new(Mutex::new(HoursRecognizer::new(finish_threshold)));
        let runtime = Arc::new(RwLock::new(RuntimeState::default()));
        let (to_worker, worker_rx) = bounded(1);
        let (event_tx, events) = unbounded();

        let worker = Worker {
            pipeline: HoursPipeline::new(pipeline),
            commands: worker_rx,
            recognizer: recognizer.clone(),
            runtime: runtime.clone(),
            events: event_tx.clone(),
        };
        let handle = std::thread::Builder::new()
            .name("hours-recognizer".to_string())
            .spawn(move || worker.run())?;
        info!("Recognition session started");

        Ok(Self {
            recognizer,
            runtime,
            to_worker,
            event_tx,
            events,
            worker_handle: Some(handle),
        })
    }

    /// Offer a frame without waiting
    ///
    /// Returns `Ok(false)` when the worker is still busy and the frame was
    /// dropped.
    pub fn submit_frame(&self, frame: OcrFrame) -> crate::Result<bool> {
        let generation = self.recognizer.lock().generation();
        self.runtime.write().frames_submitted += 1;

        match self.to_worker.try_send(SessionCommand::Frame { frame, generation }) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => {
                self.runtime.write().frames_dropped += 1;
                debug!("Worker busy, frame dropped");
                Ok(false)
            }
            Err(TrySendError::Disconnected(_)) => Err(Error::SessionClosed),
        }
    }

    /// Queue a frame, waiting for the slot to free up
    pub fn submit_frame_blocking(&self, frame: OcrFrame) -> crate::Result<()> {
        let generation = self.recognizer.lock().generation();
        self.runtime.write().frames_submitted += 1;

        self.to_worker
            .send(SessionCommand::Frame { frame, generation })
            .map_err(|_| Error::SessionClosed)
    }

    /// Clear history and published state
    ///
    /// Frames already in flight belong to the old generation and are
    /// discarded when they complete.
    pub fn restart(&self) -> RecognitionState {
        let mut recognizer = self.recognizer.lock();
        let state = recognizer.restart();
        let _ = self.event_tx.send(SessionEvent::Restarted {
            generation: state.generation,
        });
        state
    }

    /// Switch vocabulary for subsequent frames
    pub fn set_locale(&self, locale: Locale) -> crate::Result<()> {
        info!("Switching locale to {}", locale);
        self.to_worker
            .send(SessionCommand::SetLocale(locale))
            .map_err(|_| Error::SessionClosed)
    }

    /// Receiver for published updates, drained on the consumer thread
    pub fn events(&self) -> Receiver<SessionEvent> {
        self.events.clone()
    }

    /// Snapshot of the published state
    pub fn state(&self) -> RecognitionState {
        self.recognizer.lock().state().clone()
    }

    /// Snapshot of runtime counters
    pub fn runtime(&self) -> RuntimeState {
        self.runtime.read().clone()
    }

    /// Check if the worker is still running
    pub fn is_running(&self) -> bool {
        self.worker_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Stop the worker after it drains queued frames
    pub fn shutdown(mut self) -> RuntimeState {
        self.stop_worker();
        self.runtime()
    }

    fn stop_worker(&mut self) {
        if let Some(handle) = self.worker_handle.take() {
            // Signal worker to stop
            let _ = self.to_worker.send(SessionCommand::Shutdown);
            let _ = handle.join();
            info!("Recognition session stopped");
        }
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

/// Outcome of folding a frame result into the recognizer
#[derive(Debug, Clone, PartialEq)]
enum Applied {
    Updated(RecognitionState),
    Unchanged,
    Stale,
}

fn apply_if_current(
    recognizer: &mut HoursRecognizer,
    generation: u64,
    analysis: &FrameAnalysis,
) -> Applied {
    if recognizer.generation() != generation {
        return Applied::Stale;
    }
    match recognizer.apply(analysis) {
        Some(state) => Applied::Updated(state),
        None => Applied::Unchanged,
    }
}

struct Worker {
    pipeline: HoursPipeline,
    commands: Receiver<SessionCommand>,
    recognizer: Arc<Mutex<HoursRecognizer>>,
    runtime: Arc<RwLock<RuntimeState>>,
    events: Sender<SessionEvent>,
}

impl Worker {
    fn run(mut self) {
        info!("Recognition worker starting...");

        for command in self.commands.iter() {
            match command {
                SessionCommand::Frame { frame, generation } => self.handle_frame(&frame, generation),
                SessionCommand::SetLocale(locale) => self.pipeline.set_locale(locale),
                SessionCommand::Shutdown => break,
            }
        }

        info!("Recognition worker exiting...");
    }

    fn handle_frame(&self, frame: &OcrFrame, generation: u64) {
        {
            let recognizer = self.recognizer.lock();
            if recognizer.generation() == generation && recognizer.is_finished() {
                return;
            }
        }

        // no lock held while the pipeline runs
        let analysis = self.pipeline.process(frame);
        {
            let mut runtime = self.runtime.write();
            runtime.frames_processed += 1;
            runtime.last_processing_ms = analysis.processing_time_ms;
        }

        let mut recognizer = self.recognizer.lock();
        match apply_if_current(&mut recognizer, generation, &analysis) {
            Applied::Updated(state) => {
                let _ = self.events.send(SessionEvent::Updated(state));
            }
            Applied::Unchanged => {}
            Applied::Stale => {
                self.runtime.write().frames_stale += 1;
                debug!(
                    "Discarding result from generation {} (now {})",
                    generation,
                    recognizer.generation()
                );
            }
        }
    }
}
