//! Word-level fragments extracted from OCR observations
//!
//! A single observation can hold text from disconnected parts of the frame,
//! so every space-delimited word becomes its own fragment with its own
//! display-space rectangle.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use super::geometry::{AffineTransform, Rect};
use super::ocr::TextObservation;

type Locator = Arc<dyn Fn(Range<usize>) -> Rect + Send + Sync>;

/// A recognized word with display-space geometry and confidence
#[derive(Clone)]
pub struct Fragment {
    /// Word text (never contains a space)
    pub text: String,
    /// Display-space bounds of the whole word
    pub rect: Rect,
    /// Confidence of the observation the word came from
    pub confidence: f32,
    locator: Locator,
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("text", &self.text)
            .field("rect", &self.rect)
            .field("confidence", &self.confidence)
            .finish()
    }
}

impl Fragment {
    /// Fragment whose characters are assumed to be evenly spaced across `rect`
    pub fn new(text: impl Into<String>, rect: Rect, confidence: f32) -> Self {
        let text = text.into();
        let total = text.chars().count().max(1);
        let owned = text.clone();
        let locator: Locator = Arc::new(move |range: Range<usize>| {
            let first = owned.get(..range.start).map_or(0, |s| s.chars().count());
            let count = owned.get(range).map_or(0, |s| s.chars().count());
            let step = rect.width / total as f64;
            Rect::new(rect.x + step * first as f64, rect.y, step * count as f64, rect.height)
        });
        Self { text, rect, confidence, locator }
    }

    /// Fragment with an explicit sub-range locator (byte ranges of `text`)
    pub fn with_locator(
        text: impl Into<String>,
        rect: Rect,
        confidence: f32,
        locator: impl Fn(Range<usize>) -> Rect + Send + Sync + 'static,
    ) -> Self {
        Self {
            text: text.into(),
            rect,
            confidence,
            locator: Arc::new(locator),
        }
    }

    /// Display-space rectangle of a byte range of this fragment's text
    pub fn rect_of(&self, range: Range<usize>) -> Rect {
        (self.locator)(range)
    }
}

/// Split observations into word fragments mapped into display space
///
/// Observations below `min_confidence` are ignored.
pub fn fragments_for_observations(
    observations: &[Arc<dyn TextObservation>],
    transform: &AffineTransform,
    min_confidence: f32,
) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for observation in observations {
        if observation.confidence() < min_confidence {
            continue;
        }

        let text = observation.text();
        let mut offset = 0;
        for word in text.split(' ') {
            let start = offset;
            offset += word.len() + 1;
            if word.is_empty() {
                continue;
            }

            let Some(bounds) = observation.bounding_box(start..start + word.len()) else {
                debug!("No bounding box for '{}', skipping", word);
                continue;
            };
            let rect = transform.apply_rect(&bounds);

            let source = Arc::clone(observation);
            let transform = *transform;
            fragments.push(Fragment::with_locator(
                word,
                rect,
                observation.confidence(),
                move |range: Range<usize>| {
                    let range = start + range.start..start + range.end;
                    source
                        .bounding_box(range)
                        .map(|r| transform.apply_rect(&r))
                        .unwrap_or(rect)
                },
            ));
        }
    }

    fragments
}
