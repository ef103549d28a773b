//! Stability voting across frames
//!
//! Each non-empty schedule string read from a frame is a vote. The string
//! with the most votes is the current answer, and the session is finished
//! once that answer has been seen `threshold` times.

use std::collections::HashMap;

use tracing::debug;

/// Default number of identical reads needed to finish
pub const DEFAULT_FINISH_THRESHOLD: usize = 5;

/// Occurrence count per schedule string for one session
pub type ResultHistory = HashMap<String, usize>;

/// Outcome of one recorded vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Current best schedule string
    pub text: String,
    /// Votes for `text`
    pub count: usize,
    /// Whether `count` has reached the threshold
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct StabilityVoter {
    history: ResultHistory,
    best: Option<(String, usize)>,
    threshold: usize,
}

impl Default for StabilityVoter {
    fn default() -> Self {
        Self::new(DEFAULT_FINISH_THRESHOLD)
    }
}

impl StabilityVoter {
    pub fn new(threshold: usize) -> Self {
        Self {
            history: ResultHistory::new(),
            best: None,
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn history(&self) -> &ResultHistory {
        &self.history
    }

    /// Count one read; empty strings are not votes
    ///
    /// The current best only changes hands on a strictly greater count, so
    /// among strings tied at the maximum the one that got there first stays.
    pub fn record(&mut self, text: &str) -> Option<Verdict> {
        if text.is_empty() {
            return None;
        }

        let count = {
            let entry = self.history.entry(text.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        let replace = match &self.best {
            None => true,
            Some((best, best_count)) => best == text || count > *best_count,
        };
        if replace {
            if self.best.as_ref().is_some_and(|(best, _)| best != text) {
                debug!("Best result now {:?} ({} votes)", text, count);
            }
            self.best = Some((text.to_string(), count));
        }

        self.verdict()
    }

    /// Current best without voting
    pub fn verdict(&self) -> Option<Verdict> {
        self.best.as_ref().map(|(text, count)| Verdict {
            text: text.clone(),
            count: *count,
            finished: *count >= self.threshold,
        })
    }

    pub fn restart(&mut self) {
        self.history.clear();
        self.best = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finishes_exactly_at_threshold() {
        let mut voter = StabilityVoter::default();
        assert_eq!(voter.threshold(), DEFAULT_FINISH_THRESHOLD);
        for i in 1..5 {
            let verdict = voter.record("Mo 09:00-17:00").unwrap();
            assert_eq!(verdict.count, i);
            assert!(!verdict.finished);
        }
        let verdict = voter.record("Mo 09:00-17:00").unwrap();
        assert_eq!(verdict.count, 5);
        assert!(verdict.finished);
    }

    #[test]
    fn test_majority_wins_through_noise() {
        let mut voter = StabilityVoter::default();
        let reads = [
            "Mo 09:00-17:00",
            "Mo 08:00-17:00",
            "Mo 09:00-17:00",
            "Tu 09:00-17:00",
            "Mo 09:00-17:00",
            "Mo 08:00-17:00",
            "Mo 09:00-17:00",
        ];
        for read in reads {
            let verdict = voter.record(read).unwrap();
            assert!(!verdict.finished);
        }
        let verdict = voter.record("Mo 09:00-17:00").unwrap();
        assert_eq!(verdict.text, "Mo 09:00-17:00");
        assert!(verdict.finished);
    }

    #[test]
    fn test_ties_keep_incumbent() {
        let mut voter = StabilityVoter::default();
        voter.record("A");
        let verdict = voter.record("B").unwrap();
        assert_eq!(verdict.text, "A");

        voter.record("B");
        let verdict = voter.record("A").unwrap();
        // B reached 2 first; A catching up does not displace it
        assert_eq!(verdict.text, "B");
        assert_eq!(verdict.count, 2);
    }

    #[test]
    fn test_empty_reads_are_ignored() {
        let mut voter = StabilityVoter::default();
        assert!(voter.record("").is_none());
        voter.record("Sa 10:00-14:00");
        assert!(voter.record("").is_none());
        assert_eq!(voter.history().len(), 1);
        assert_eq!(voter.verdict().unwrap().count, 1);
    }

    #[test]
    fn test_restart_is_a_fresh_session() {
        let mut voter = StabilityVoter::new(2);
        assert_eq!(voter.threshold(), 2);
        voter.record("Mo 09:00-17:00");
        voter.record("Mo 09:00-17:00");
        assert!(voter.verdict().unwrap().finished);

        voter.restart();
        assert!(voter.history().is_empty());
        assert!(voter.verdict().is_none());

        let verdict = voter.record("Mo 09:00-17:00").unwrap();
        assert_eq!(verdict.count, 1);
        assert!(!verdict.finished);
    }
}
