//! Opening Hours OCR - reads opening-hours signs from OCR output
//!
//! Takes the text observations an OCR engine reports for camera frames or
//! still images and turns them into a normalized schedule string such as
//! `Mo-Fr 09:00-17:00, Sa 10:00-14:00`. Live frames are noisy, so results are
//! voted on across frames until one reading is stable.

pub mod analysis;
pub mod app;
pub mod capture;
pub mod config;
pub mod error;
pub mod shared;
pub mod storage;
pub mod vision;

pub use analysis::{FrameAnalysis, HoursPipeline, HoursRecognizer, Locale, PipelineConfig};
pub use app::LiveSession;
pub use capture::frame::OcrFrame;
pub use error::{Error, Result};
pub use shared::{RecognitionState, SessionEvent};
