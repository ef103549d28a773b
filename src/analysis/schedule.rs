//! Schedule assembly
//!
//! Walks the pruned runs of a frame in reading order. Days accumulate until
//! times follow; a new day (or the end of the text) after at least one time
//! pair flushes a group like `Mo-Fr 09:00-12:00,14:00-18:00`.

use std::fmt::Write;

use super::sequences::TokenSequence;
use super::tokens::{Day, Time, Token, TokenKind};

/// Render pruned runs as a schedule string
pub fn assemble(sequences: &[TokenSequence]) -> String {
    let mut days: Vec<Day> = Vec::new();
    let mut times: Vec<Time> = Vec::new();
    let mut result = String::new();

    let end = Token::end_of_text();
    let tokens = sequences
        .iter()
        .flat_map(|s| s.tokens.iter())
        .chain(std::iter::once(&end));

    for token in tokens {
        match token.kind {
            TokenKind::Day(_) | TokenKind::EndOfText => {
                if times.len() >= 2 {
                    write_group(&mut result, &days, &times);
                }
                if !times.is_empty() {
                    times.clear();
                    days.clear();
                }
                if let TokenKind::Day(day) = token.kind {
                    days.push(day);
                }
            }
            TokenKind::Time(time) => times.push(time),
            TokenKind::Dash => {}
        }
    }

    match result.strip_suffix(", ") {
        Some(trimmed) => trimmed.to_string(),
        None => result,
    }
}

fn write_group(out: &mut String, days: &[Day], times: &[Time]) {
    match days {
        [] => {}
        [first, last] => {
            let _ = write!(out, "{}-{} ", first, last);
        }
        _ => {
            let list: Vec<&str> = days.iter().map(|d| d.code()).collect();
            out.push_str(&list.join(","));
            out.push(' ');
        }
    }

    for pair in times.chunks_exact(2) {
        let _ = write!(out, "{}-{},", pair[0], pair[1]);
    }
    out.push(' ');
}
