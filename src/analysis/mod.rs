//! Analysis Layer
//!
//! Turns one frame of OCR observations into an opening-hours schedule string:
//! words are grouped into lines, lines are tokenized into days, times and
//! dashes, token lines are split into day runs and time runs, runs are pruned
//! and the survivors are assembled. Results are stabilized across frames by
//! [`recognizer::HoursRecognizer`].

pub mod locale;
pub mod recognizer;
pub mod scanner;
pub mod schedule;
pub mod sequences;
pub mod tokenizer;
pub mod tokens;
pub mod vote;

use std::time::Instant;

use tracing::debug;

use crate::capture::frame::OcrFrame;
use crate::vision::fragments::fragments_for_observations;
use crate::vision::geometry::Rect;
use crate::vision::lines::group_lines;

pub use locale::Locale;
pub use recognizer::HoursRecognizer;
pub use sequences::{DayRunPolicy, TokenSequence};
pub use tokens::{Day, Time, Token, TokenKind};
pub use vote::StabilityVoter;

/// Per-frame pipeline settings
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Day and dash vocabulary
    pub locale: Locale,
    /// Reduction applied to day runs
    pub day_run_policy: DayRunPolicy,
    /// Observations below this confidence are ignored (0.0 - 1.0)
    pub min_confidence: f32,
}

/// Result of running the pipeline on one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameAnalysis {
    /// Assembled schedule, empty when nothing usable was read
    pub schedule: String,
    /// Display-space rectangles of the tokens that made it into the schedule
    pub highlights: Vec<Rect>,
    /// Number of text lines found
    pub line_count: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Stateless frame-to-schedule pipeline
#[derive(Debug, Clone, Default)]
pub struct HoursPipeline {
    config: PipelineConfig,
}

impl HoursPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.config.locale = locale;
    }

    /// Run every stage on one frame
    pub fn process(&self, frame: &OcrFrame) -> FrameAnalysis {
        let start = Instant::now();

        let fragments = fragments_for_observations(
            &frame.observations,
            &frame.transform,
            self.config.min_confidence,
        );
        let lines = group_lines(fragments);

        debug!("string lines:");
        for line in &lines {
            let words: Vec<&str> = line.iter().map(|f| f.text.as_str()).collect();
            let confidences: Vec<String> = line.iter().map(|f| f.confidence.to_string()).collect();
            debug!("  {}: {}", words.join(" "), confidences.join(" "));
        }

        let token_lines: Vec<Vec<Token>> = lines
            .iter()
            .map(|line| tokenizer::tokenize(line, self.config.locale))
            .filter(|tokens| !tokens.is_empty())
            .collect();

        debug!("token lines:");
        for tokens in &token_lines {
            let rendered: Vec<String> = tokens.iter().map(Token::to_string).collect();
            let confidences: Vec<String> = tokens.iter().map(|t| t.confidence.to_string()).collect();
            debug!("  {}: {}", rendered.join(" "), confidences.join(" "));
        }

        let runs: Vec<TokenSequence> = token_lines
            .iter()
            .flat_map(|tokens| sequences::segment_line(tokens))
            .filter_map(|run| sequences::prune(run, self.config.day_run_policy))
            .collect();

        let schedule = schedule::assemble(&runs);
        let highlights = runs
            .iter()
            .flat_map(|run| run.tokens.iter().map(|t| t.rect))
            .collect();

        let processing_time = start.elapsed();
        debug!(
            "Frame analysis complete in {:?}: {} lines, {} runs, {:?}",
            processing_time,
            lines.len(),
            runs.len(),
            schedule
        );

        FrameAnalysis {
            schedule,
            highlights,
            line_count: lines.len(),
            processing_time_ms: processing_time.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Orientation;
    use crate::vision::geometry::AffineTransform;
    use crate::vision::ocr::RecognizedText;

    fn observation(text: &str, x: f64, y: f64) -> RecognizedText {
        RecognizedText::new(text, 0.9, Rect::new(x, y, 10.0 * text.chars().count() as f64, 20.0))
    }

    fn frame(observations: Vec<RecognizedText>) -> OcrFrame {
        OcrFrame::from_recognized(observations, AffineTransform::identity())
    }

    #[test]
    fn test_single_line_schedule() {
        let pipeline = HoursPipeline::default();
        let result = pipeline.process(&frame(vec![observation("Mo-Fr 9-17", 0.0, 0.0)]));
        assert_eq!(result.schedule, "Mo-Fr 09:00-17:00");
        assert_eq!(result.line_count, 1);
        // Mo, dash, Fr, 09:00, 17:00
        assert_eq!(result.highlights.len(), 5);
    }

    #[test]
    fn test_multi_line_sign() {
        let pipeline = HoursPipeline::default();
        let result = pipeline.process(&frame(vec![
            observation("Opening hours", 0.0, 0.0),
            observation("10:00 - 14:00", 200.0, 100.0),
            observation("Saturday", 0.0, 100.0),
            observation("Mon - Fri", 0.0, 50.0),
            observation("9:00 AM - 5:30 PM", 200.0, 50.0),
        ]));
        assert_eq!(result.schedule, "Mo-Fr 09:00-17:30, Sa 10:00-14:00");
        assert_eq!(result.line_count, 3);
    }

    #[test]
    fn test_normalized_frame_reads_top_down() {
        // bottom-left origin: the higher y is the upper line
        let observations = vec![
            RecognizedText::new("Sa 10-14", 0.9, Rect::new(0.1, 0.4, 0.3, 0.05)),
            RecognizedText::new("Mo-Fr 8-18", 0.9, Rect::new(0.1, 0.6, 0.3, 0.05)),
        ];
        let frame = OcrFrame::from_recognized(observations, Orientation::Normalized.transform());
        let result = HoursPipeline::default().process(&frame);
        assert_eq!(result.schedule, "Mo-Fr 08:00-18:00, Sa 10:00-14:00");
    }

    #[test]
    fn test_locale_switch() {
        let mut pipeline = HoursPipeline::default();
        assert_eq!(pipeline.locale(), Locale::En);
        let sign = frame(vec![observation("Montag bis Freitag 8 bis 18", 0.0, 0.0)]);
        assert_eq!(pipeline.process(&sign).schedule, "08:00-18:00");

        pipeline.set_locale(Locale::De);
        assert_eq!(pipeline.config().locale, Locale::De);
        assert_eq!(pipeline.config().day_run_policy, DayRunPolicy::Keep);
        assert_eq!(pipeline.process(&sign).schedule, "Mo-Fr 08:00-18:00");
    }

    #[test]
    fn test_low_confidence_observations_ignored() {
        let pipeline = HoursPipeline::new(PipelineConfig {
            min_confidence: 0.95,
            ..Default::default()
        });
        let result = pipeline.process(&frame(vec![observation("Mo 9-17", 0.0, 0.0)]));
        assert!(result.schedule.is_empty());
        assert_eq!(result.line_count, 0);
    }

    #[test]
    fn test_empty_frame() {
        let result = HoursPipeline::default().process(&frame(Vec::new()));
        assert_eq!(result.schedule, "");
        assert!(result.highlights.is_empty());
    }
}
