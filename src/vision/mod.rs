//! Vision Layer
//!
//! Geometry and layout of OCR output: the observation contract, word-level
//! fragments mapped into display space, and reading-order line grouping.

pub mod fragments;
pub mod geometry;
pub mod lines;
pub mod ocr;

pub use fragments::{fragments_for_observations, Fragment};
pub use geometry::{AffineTransform, Rect};
pub use lines::{group_lines, Line};
pub use ocr::{RecognizedText, TextObservation};
