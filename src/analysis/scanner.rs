//! Backtracking scanner over a sequence of text sources
//!
//! A line is a list of fragments, each its own source. The scanner walks them
//! as one stream with an explicit [`Cursor`]. Every `scan_*` call either
//! consumes input and returns a [`Span`], or leaves the cursor untouched and
//! returns `None`.
//!
//! Sources are separated by an implied space: scanning for `" "` exactly at
//! the start of any source after the first succeeds without consuming input,
//! and reports the rectangle of the previous source's last character.

use std::ops::Range;

use crate::vision::fragments::Fragment;
use crate::vision::geometry::Rect;

/// Text that can map a byte range of itself to a rectangle
pub trait ScanSource {
    fn text(&self) -> &str;
    fn rect_of(&self, range: Range<usize>) -> Rect;
}

impl ScanSource for Fragment {
    fn text(&self) -> &str {
        &self.text
    }

    fn rect_of(&self, range: Range<usize>) -> Rect {
        Fragment::rect_of(self, range)
    }
}

/// Position in the stream: source index and byte offset within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Cursor {
    pub source: usize,
    pub offset: usize,
}

/// A matched piece of input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub rect: Rect,
}

pub struct MultiScanner<'a, S> {
    sources: &'a [S],
    cursor: Cursor,
}

impl<'a, S: ScanSource> MultiScanner<'a, S> {
    pub fn new(sources: &'a [S]) -> Self {
        Self {
            sources,
            cursor: Cursor::default(),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Restore a previously saved position
    pub fn reset(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    pub fn is_at_end(&mut self) -> bool {
        self.settle();
        self.remaining().is_empty()
    }

    /// Step past exhausted sources, stopping on the last one
    fn settle(&mut self) {
        while self.cursor.source + 1 < self.sources.len()
            && self.cursor.offset >= self.sources[self.cursor.source].text().len()
        {
            self.cursor = Cursor {
                source: self.cursor.source + 1,
                offset: 0,
            };
        }
    }

    /// Unconsumed text of the current source
    fn remaining(&self) -> &'a str {
        let sources: &'a [S] = self.sources;
        sources
            .get(self.cursor.source)
            .and_then(|s| s.text().get(self.cursor.offset..))
            .unwrap_or("")
    }

    fn advance(&mut self, len: usize) -> Span<'a> {
        let sources: &'a [S] = self.sources;
        let source = &sources[self.cursor.source];
        let range = self.cursor.offset..self.cursor.offset + len;
        self.cursor.offset += len;
        Span {
            text: &source.text()[range.clone()],
            rect: source.rect_of(range),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> Option<Span<'a>> {
        self.settle();
        let rest = self.remaining();
        let len = rest
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map_or(rest.len(), |(i, _)| i);
        (len > 0).then(|| self.advance(len))
    }

    /// Case-insensitive literal match
    pub fn scan_literal(&mut self, literal: &str) -> Option<Span<'a>> {
        self.settle();

        if literal == " " && self.cursor.source > 0 && self.cursor.offset == 0 {
            let previous = &self.sources[self.cursor.source - 1];
            return Some(Span {
                text: " ",
                rect: last_char_rect(previous),
            });
        }

        let head = self.remaining().get(..literal.len())?;
        head.eq_ignore_ascii_case(literal)
            .then(|| self.advance(literal.len()))
    }

    /// Whole-word literal match: rejected if a letter follows in the same source
    pub fn scan_word(&mut self, word: &str) -> Option<Span<'a>> {
        let start = self.cursor;
        let span = self.scan_literal(word)?;
        if self.remaining().chars().next().is_some_and(char::is_alphabetic) {
            self.reset(start);
            return None;
        }
        Some(span)
    }

    /// First whole-word match among `words`, tried in order
    pub fn scan_any_word(&mut self, words: &[&str]) -> Option<Span<'a>> {
        words.iter().find_map(|w| self.scan_word(w))
    }

    /// Unsigned run of ASCII digits
    pub fn scan_digits(&mut self) -> Option<Span<'a>> {
        self.take_while(|c| c.is_ascii_digit())
    }

    /// Whitespace, continuing across source boundaries
    pub fn scan_whitespace(&mut self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        while let Some(span) = self.take_while(char::is_whitespace) {
            rect = Some(rect.map_or(span.rect, |r| r.union(&span.rect)));
        }
        rect
    }

    /// Everything up to the next whitespace in the current source
    pub fn scan_up_to_whitespace(&mut self) -> Option<Span<'a>> {
        self.take_while(|c| !c.is_whitespace())
    }
}

fn last_char_rect<S: ScanSource>(source: &S) -> Rect {
    let text = source.text();
    match text.char_indices().last() {
        Some((i, c)) => source.rect_of(i..i + c.len_utf8()),
        None => source.rect_of(0..0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(words: &[&str]) -> Vec<Fragment> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| Fragment::new(*w, Rect::new(i as f64 * 100.0, 0.0, 10.0 * w.len() as f64, 10.0), 1.0))
            .collect()
    }

    #[test]
    fn test_literal_is_case_insensitive() {
        let src = sources(&["Mon"]);
        let mut scanner = MultiScanner::new(&src);
        let span = scanner.scan_literal("mo").unwrap();
        assert_eq!(span.text, "Mo");
        assert_eq!(scanner.cursor(), Cursor { source: 0, offset: 2 });
    }

    #[test]
    fn test_word_rejects_prefix_and_restores() {
        let src = sources(&["Montag"]);
        let mut scanner = MultiScanner::new(&src);
        assert!(scanner.scan_word("mo").is_none());
        assert_eq!(scanner.cursor(), Cursor::default());
        assert_eq!(scanner.scan_word("montag").unwrap().text, "Montag");
    }

    #[test]
    fn test_word_allows_punctuation_after() {
        let src = sources(&["Mo-Fr"]);
        let mut scanner = MultiScanner::new(&src);
        assert_eq!(scanner.scan_word("mo").unwrap().text, "Mo");
    }

    #[test]
    fn test_implied_space_between_sources() {
        let src = sources(&["9", "00"]);
        let mut scanner = MultiScanner::new(&src);
        assert_eq!(scanner.scan_digits().unwrap().text, "9");

        let space = scanner.scan_literal(" ").unwrap();
        assert_eq!(space.text, " ");
        // rect of the last character of "9"
        assert_eq!(space.rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(scanner.cursor(), Cursor { source: 1, offset: 0 });

        assert_eq!(scanner.scan_digits().unwrap().text, "00");
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_no_implied_space_inside_first_source() {
        let src = sources(&["9"]);
        let mut scanner = MultiScanner::new(&src);
        assert!(scanner.scan_literal(" ").is_none());
    }

    #[test]
    fn test_whitespace_and_skip() {
        let src = sources(&["  xyz 12"]);
        let mut scanner = MultiScanner::new(&src);
        assert!(scanner.scan_whitespace().is_some());
        assert_eq!(scanner.scan_up_to_whitespace().unwrap().text, "xyz");
        assert!(scanner.scan_digits().is_none());
        scanner.scan_whitespace();
        assert_eq!(scanner.scan_digits().unwrap().text, "12");
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_reset_restores_position() {
        let src = sources(&["10", "30"]);
        let mut scanner = MultiScanner::new(&src);
        let start = scanner.cursor();
        scanner.scan_digits();
        scanner.scan_literal(" ");
        scanner.scan_digits();
        assert!(scanner.is_at_end());
        scanner.reset(start);
        assert_eq!(scanner.scan_digits().unwrap().text, "10");
    }

    #[test]
    fn test_empty_sources() {
        let src: Vec<Fragment> = Vec::new();
        let mut scanner = MultiScanner::new(&src);
        assert!(scanner.is_at_end());
        assert!(scanner.scan_digits().is_none());
        assert!(scanner.scan_literal("-").is_none());
    }
}
