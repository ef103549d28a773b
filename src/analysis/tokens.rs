//! Token types produced by the tokenizer

use std::fmt;

use crate::vision::geometry::Rect;

/// Weekday code as it appears in a schedule string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Day {
    pub const ALL: [Day; 7] = [Day::Mo, Day::Tu, Day::We, Day::Th, Day::Fr, Day::Sa, Day::Su];

    pub fn code(self) -> &'static str {
        match self {
            Day::Mo => "Mo",
            Day::Tu => "Tu",
            Day::We => "We",
            Day::Th => "Th",
            Day::Fr => "Fr",
            Day::Sa => "Sa",
            Day::Su => "Su",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Clock time in 24-hour form
///
/// Hours run 0 through 24 so a closing time of `24:00` survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Time {
    hour: u8,
    minute: u8,
}

impl Time {
    pub const MIDNIGHT: Time = Time { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// What a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Day(Day),
    Time(Time),
    Dash,
    EndOfText,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Day(day) => day.fmt(f),
            TokenKind::Time(time) => time.fmt(f),
            TokenKind::Dash => f.write_str("-"),
            TokenKind::EndOfText => Ok(()),
        }
    }
}

/// A scanned token with its display-space rectangle and confidence
///
/// Equality compares only the kind: two tokens are the same token when they
/// render the same.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub rect: Rect,
    pub confidence: f32,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Token {}

impl Token {
    pub fn new(kind: TokenKind, rect: Rect, confidence: f32) -> Self {
        Self { kind, rect, confidence }
    }

    /// Terminal marker appended by the assembler
    pub fn end_of_text() -> Self {
        Self::new(TokenKind::EndOfText, Rect::default(), 0.0)
    }

    pub fn is_dash(&self) -> bool {
        matches!(self.kind, TokenKind::Dash)
    }

    /// Both a time and exactly `00:00`
    pub fn is_midnight(&self) -> bool {
        self.kind == TokenKind::Time(Time::MIDNIGHT)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}
