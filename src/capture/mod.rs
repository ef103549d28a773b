//! Frame Input Layer
//!
//! OCR runs outside this crate. Frames arrive as JSON dumps of its
//! observations: one frame per file for still images, or one frame per line
//! for a recorded live stream.

pub mod frame;

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::vision::geometry::AffineTransform;
use frame::{FrameRecord, OcrFrame};

/// Coordinate convention of the OCR engine's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Already in display space
    #[default]
    Display,
    /// Unit square with a bottom-left origin, as live camera OCR reports it
    Normalized,
    /// Still image captured sideways; axes are swapped
    Rotated,
}

impl Orientation {
    /// Transform from this convention into display space
    pub fn transform(self) -> AffineTransform {
        match self {
            Orientation::Display => AffineTransform::identity(),
            Orientation::Normalized => AffineTransform::flip_vertical(),
            Orientation::Rotated => AffineTransform::transpose(),
        }
    }
}

/// Frame input configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Orientation assumed when a frame does not name one
    pub orientation: Orientation,
    /// Delay between replayed frames
    pub frame_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Display,
            frame_interval_ms: 33,
        }
    }
}

/// Load a single-frame JSON file
pub fn load_frame(path: &Path, orientation: Orientation) -> Result<OcrFrame> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let record: FrameRecord = serde_json::from_str(&content).map_err(|source| Error::Frame {
        path: path.to_path_buf(),
        line: source.line(),
        source,
    })?;
    let frame = record.into_frame(orientation);
    debug!("Loaded {} observations from {:?}", frame.observations.len(), path);
    Ok(frame)
}

/// Load a JSON-lines frame stream, one frame per non-blank line
pub fn load_frames(path: &Path, orientation: Orientation) -> Result<Vec<OcrFrame>> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(io_error)?;
    parse_frames(BufReader::new(file), path, orientation)
}

fn parse_frames(reader: impl BufRead, path: &Path, orientation: Orientation) -> Result<Vec<OcrFrame>> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(&line).map_err(|source| Error::Frame {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        frames.push(record.into_frame(orientation));
    }
    debug!("Loaded {} frames from {:?}", frames.len(), path);
    Ok(frames)
}
