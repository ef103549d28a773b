//! Tokenizer: day names, clock times and range dashes
//!
//! At each position a day is tried first, then a time, then a dash. Anything
//! else is skipped up to the next whitespace, so a noisy line never fails as a
//! whole.
//!
//! Confidence is a rough specificity score. Day and dash matches score their
//! matched length. Times score 8 for `HH:MM AM/PM`, 6 for `HH:MM`, 4 for
//! `H AM/PM` and 1 for a bare hour.

use super::locale::Locale;
use super::scanner::{MultiScanner, ScanSource, Span};
use super::tokens::{Time, Token, TokenKind};

const MINUTE_SEPARATORS: [&str; 3] = [":", ".", " "];

#[derive(Debug, Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Fold a 12-hour clock value into 24-hour form
    fn fold(self, hour: u8) -> u8 {
        match self {
            Meridiem::Am => hour % 12,
            Meridiem::Pm => hour % 12 + 12,
        }
    }
}

/// Tokenize one line of sources
pub fn tokenize<S: ScanSource>(sources: &[S], locale: Locale) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut scanner = MultiScanner::new(sources);

    scanner.scan_whitespace();
    while !scanner.is_at_end() {
        match scan_token(&mut scanner, locale) {
            Some(token) => tokens.push(token),
            None => {
                scanner.scan_up_to_whitespace();
            }
        }
        scanner.scan_whitespace();
    }

    tokens
}

/// Try day, then time, then dash at the current position
pub fn scan_token<S: ScanSource>(scanner: &mut MultiScanner<'_, S>, locale: Locale) -> Option<Token> {
    scan_day(scanner, locale)
        .or_else(|| scan_time(scanner))
        .or_else(|| scan_dash(scanner, locale))
}

pub fn scan_day<S: ScanSource>(scanner: &mut MultiScanner<'_, S>, locale: Locale) -> Option<Token> {
    locale.day_forms().iter().find_map(|(day, forms)| {
        scanner.scan_any_word(forms).map(|span| {
            Token::new(TokenKind::Day(*day), span.rect, span.text.chars().count() as f32)
        })
    })
}

pub fn scan_dash<S: ScanSource>(scanner: &mut MultiScanner<'_, S>, locale: Locale) -> Option<Token> {
    scanner
        .scan_literal("-")
        .or_else(|| scanner.scan_word(locale.through_word()))
        .map(|span| Token::new(TokenKind::Dash, span.rect, span.text.chars().count() as f32))
}

pub fn scan_time<S: ScanSource>(scanner: &mut MultiScanner<'_, S>) -> Option<Token> {
    let start = scanner.cursor();
    let hour_span = scanner.scan_digits()?;
    let hour = match hour_span.text.parse::<u8>() {
        Ok(hour) if hour <= 24 => hour,
        _ => {
            scanner.reset(start);
            return None;
        }
    };

    let after_hour = scanner.cursor();
    if let Some(minute_span) = scan_minute(scanner) {
        let minute = minute_span.text.parse::<u8>().unwrap_or(0);
        let rect = hour_span.rect.union(&minute_span.rect);

        let before_suffix = scanner.cursor();
        scanner.scan_whitespace();
        if let Some((meridiem, suffix)) = scan_meridiem(scanner) {
            let Some(time) = Time::new(meridiem.fold(hour), minute) else {
                scanner.reset(start);
                return None;
            };
            return Some(Token::new(TokenKind::Time(time), rect.union(&suffix.rect), 8.0));
        }
        scanner.reset(before_suffix);

        let Some(time) = Time::new(hour, minute) else {
            scanner.reset(start);
            return None;
        };
        return Some(Token::new(TokenKind::Time(time), rect, 6.0));
    }
    scanner.reset(after_hour);

    scanner.scan_whitespace();
    if let Some((meridiem, suffix)) = scan_meridiem(scanner) {
        let Some(time) = Time::new(meridiem.fold(hour), 0) else {
            scanner.reset(start);
            return None;
        };
        return Some(Token::new(TokenKind::Time(time), hour_span.rect.union(&suffix.rect), 4.0));
    }
    scanner.reset(after_hour);

    let Some(time) = Time::new(hour, 0) else {
        scanner.reset(start);
        return None;
    };
    Some(Token::new(TokenKind::Time(time), hour_span.rect, 1.0))
}

/// Separator followed by exactly two digits forming 00-59
fn scan_minute<'a, S: ScanSource>(scanner: &mut MultiScanner<'a, S>) -> Option<Span<'a>> {
    let start = scanner.cursor();
    let separator = MINUTE_SEPARATORS
        .iter()
        .find_map(|sep| scanner.scan_literal(sep));

    if separator.is_some() {
        if let Some(digits) = scanner.scan_digits() {
            let valid = digits.text.len() == 2
                && digits.text.parse::<u8>().is_ok_and(|m| m < 60);
            if valid {
                return Some(digits);
            }
        }
    }

    scanner.reset(start);
    None
}

fn scan_meridiem<'a, S: ScanSource>(
    scanner: &mut MultiScanner<'a, S>,
) -> Option<(Meridiem, Span<'a>)> {
    if let Some(span) = scanner.scan_literal("AM") {
        return Some((Meridiem::Am, span));
    }
    scanner.scan_literal("PM").map(|span| (Meridiem::Pm, span))
}
