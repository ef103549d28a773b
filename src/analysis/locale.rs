//! Locale vocabularies for day names and range words

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tokens::Day;
use crate::error::Error;

/// Recognition language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

/// Surface forms per weekday, full name first
type DayTable = [(Day, &'static [&'static str]); 7];

static ENGLISH_DAYS: DayTable = [
    (Day::Mo, &["monday", "mo", "mon"]),
    (Day::Tu, &["tuesday", "tu", "tue"]),
    (Day::We, &["wednesday", "we", "wed"]),
    (Day::Th, &["thursday", "th", "thu", "thur"]),
    (Day::Fr, &["friday", "fr", "fri"]),
    (Day::Sa, &["saturday", "sa", "sat"]),
    (Day::Su, &["sunday", "su", "sun"]),
];

static GERMAN_DAYS: DayTable = [
    (Day::Mo, &["montag", "mo", "mon"]),
    (Day::Tu, &["dienstag", "di"]),
    (Day::We, &["mittwoch", "mi"]),
    (Day::Th, &["donnerstag", "do", "don"]),
    (Day::Fr, &["freitag", "fr"]),
    (Day::Sa, &["samstag", "sa", "sam"]),
    (Day::Su, &["sonntag", "so", "son"]),
];

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::De];

    /// Language code
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    /// Case-insensitive surface forms for each weekday
    pub fn day_forms(self) -> &'static [(Day, &'static [&'static str])] {
        match self {
            Locale::En => &ENGLISH_DAYS,
            Locale::De => &GERMAN_DAYS,
        }
    }

    /// The word used in place of a dash between range ends
    pub fn through_word(self) -> &'static str {
        match self {
            Locale::En => "to",
            Locale::De => "bis",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownLocale(s.to_string()))
    }
}
