//! Homogeneous run segmentation and pruning
//!
//! A token line is split into runs that hold only days or only times, with
//! bridging dashes kept between same-kind neighbours. Time runs are then
//! reduced to well-formed pairs.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::tokens::{Token, TokenKind};

/// Kind of a homogeneous run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Day,
    Time,
}

/// What to do with day runs holding more than two days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayRunPolicy {
    /// Pass day runs through untouched
    #[default]
    Keep,
    /// Keep only the two most confident days, in reading order
    BestTwo,
}

/// A maximal same-kind run of tokens from one line
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSequence {
    pub kind: RunKind,
    pub tokens: Vec<Token>,
}

impl TokenSequence {
    fn start(kind: RunKind, first: Token) -> Self {
        Self {
            kind,
            tokens: vec![first],
        }
    }
}

/// Split one token line into homogeneous runs
pub fn segment_line(line: &[Token]) -> Vec<TokenSequence> {
    let mut runs: Vec<TokenSequence> = Vec::new();
    let mut pending_dash: Option<Token> = None;

    for token in line {
        let kind = match token.kind {
            TokenKind::Day(_) => RunKind::Day,
            TokenKind::Time(_) => RunKind::Time,
            TokenKind::Dash => {
                // leading dashes have nothing to bridge
                if !runs.is_empty() {
                    pending_dash = Some(*token);
                }
                continue;
            }
            TokenKind::EndOfText => break,
        };

        match runs.last_mut() {
            Some(run) if run.kind == kind => {
                if let Some(dash) = pending_dash.take() {
                    run.tokens.push(dash);
                }
                run.tokens.push(*token);
            }
            _ => {
                pending_dash = None;
                runs.push(TokenSequence::start(kind, *token));
            }
        }
    }

    runs
}

/// Normalize a run; `None` when nothing usable is left
pub fn prune(sequence: TokenSequence, policy: DayRunPolicy) -> Option<TokenSequence> {
    let kind = sequence.kind;
    let tokens = match kind {
        RunKind::Day => prune_days(sequence.tokens, policy),
        RunKind::Time => prune_times(sequence.tokens)?,
    };
    Some(TokenSequence { kind, tokens })
}

pub fn prune_days(tokens: Vec<Token>, policy: DayRunPolicy) -> Vec<Token> {
    match policy {
        DayRunPolicy::Keep => tokens,
        DayRunPolicy::BestTwo => best_two_days(tokens),
    }
}

fn best_two_days(tokens: Vec<Token>) -> Vec<Token> {
    let days: Vec<Token> = tokens.into_iter().filter(|t| !t.is_dash()).collect();
    if days.len() <= 2 {
        return days;
    }

    let mut ranked: Vec<usize> = (0..days.len()).collect();
    // stable: earlier tokens win ties
    ranked.sort_by(|&a, &b| days[b].confidence.total_cmp(&days[a].confidence));
    ranked.truncate(2);
    ranked.sort_unstable();

    ranked.into_iter().map(|i| days[i]).collect()
}

/// Reduce a time run to an even, order-preserving list of paired times
///
/// Returns `None` when no pair survives.
pub fn prune_times(tokens: Vec<Token>) -> Option<Vec<Token>> {
    let mut list = tokens;
    let mut pairs: Vec<(Token, Token)> = Vec::new();

    while let Some(dash) = list.iter().position(Token::is_dash) {
        if dash == 0 {
            // left neighbour already consumed by the previous pair
            list.remove(0);
            continue;
        }
        if dash + 1 >= list.len() {
            list.truncate(dash);
            break;
        }
        if list[dash + 1].is_dash() {
            list.remove(dash);
            continue;
        }

        let mut priors: Vec<Token> = list.drain(..dash - 1).collect();
        pair_sequentially(&mut priors, &mut pairs);

        let bridged: Vec<Token> = list.drain(..3).collect();
        pairs.push((bridged[0], bridged[2]));
    }
    pair_sequentially(&mut list, &mut pairs);

    let before = pairs.len();
    pairs.retain(|(open, close)| !(open.is_midnight() && close.is_midnight()));
    if pairs.len() != before {
        trace!("Dropped {} 00:00-00:00 pairs", before - pairs.len());
    }

    if pairs.is_empty() {
        return None;
    }
    Some(pairs.into_iter().flat_map(|(a, b)| [a, b]).collect())
}

/// Pair adjacent tokens, first dropping the least confident one if the count is odd
fn pair_sequentially(tokens: &mut Vec<Token>, pairs: &mut Vec<(Token, Token)>) {
    if tokens.len() % 2 == 1 {
        drop_weakest(tokens);
    }
    pairs.extend(tokens.chunks_exact(2).map(|pair| (pair[0], pair[1])));
    tokens.clear();
}

fn drop_weakest(tokens: &mut Vec<Token>) {
    let weakest = tokens
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.confidence.total_cmp(&b.confidence))
        .map(|(i, _)| i);
    if let Some(i) = weakest {
        tokens.remove(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokens::{Day, Time};
    use crate::vision::geometry::Rect;

    fn day(d: Day, confidence: f32) -> Token {
        Token::new(TokenKind::Day(d), Rect::default(), confidence)
    }

    fn time(h: u8, m: u8, confidence: f32) -> Token {
        Token::new(TokenKind::Time(Time::new(h, m).unwrap()), Rect::default(), confidence)
    }

    fn dash() -> Token {
        Token::new(TokenKind::Dash, Rect::default(), 1.0)
    }

    fn rendered(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_segment_day_and_time_runs() {
        let line = vec![
            day(Day::Mo, 2.0),
            dash(),
            day(Day::Fr, 2.0),
            time(9, 0, 1.0),
            dash(),
            time(17, 0, 1.0),
        ];
        let runs = segment_line(&line);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].kind, RunKind::Day);
        assert_eq!(rendered(&runs[0].tokens), vec!["Mo", "-", "Fr"]);
        assert_eq!(runs[1].kind, RunKind::Time);
        assert_eq!(rendered(&runs[1].tokens), vec!["09:00", "-", "17:00"]);
    }

    #[test]
    fn test_segment_drops_dash_between_kinds() {
        let line = vec![dash(), day(Day::Sa, 2.0), dash(), time(10, 0, 6.0), dash()];
        let runs = segment_line(&line);
        assert_eq!(runs.len(), 2);
        assert_eq!(rendered(&runs[0].tokens), vec!["Sa"]);
        assert_eq!(rendered(&runs[1].tokens), vec!["10:00"]);
    }

    #[test]
    fn test_segment_only_dashes() {
        assert!(segment_line(&[dash(), dash()]).is_empty());
        assert!(segment_line(&[]).is_empty());
    }

    #[test]
    fn test_segment_alternating_kinds() {
        let line = vec![day(Day::Mo, 2.0), time(9, 0, 1.0), day(Day::Tu, 2.0), time(10, 0, 1.0)];
        let runs = segment_line(&line);
        assert_eq!(runs.len(), 4);
    }

    #[test]
    fn test_prune_keeps_simple_range() {
        let tokens = vec![time(9, 0, 1.0), dash(), time(17, 0, 1.0)];
        let pruned = prune_times(tokens).unwrap();
        assert_eq!(rendered(&pruned), vec!["09:00", "17:00"]);
    }

    #[test]
    fn test_prune_odd_drops_weakest() {
        let tokens = vec![time(9, 0, 6.0), time(3, 0, 1.0), time(17, 0, 6.0)];
        let pruned = prune_times(tokens).unwrap();
        assert_eq!(rendered(&pruned), vec!["09:00", "17:00"]);
    }

    #[test]
    fn test_prune_prefix_before_dash() {
        // 8:00 12:00 7 14:00 - 18:00
        let tokens = vec![
            time(8, 0, 6.0),
            time(12, 0, 6.0),
            time(7, 0, 1.0),
            time(14, 0, 6.0),
            dash(),
            time(18, 0, 6.0),
        ];
        let pruned = prune_times(tokens).unwrap();
        assert_eq!(rendered(&pruned), vec!["08:00", "12:00", "14:00", "18:00"]);
    }

    #[test]
    fn test_prune_two_ranges() {
        let tokens = vec![
            time(9, 0, 6.0),
            dash(),
            time(12, 0, 6.0),
            time(14, 0, 6.0),
            dash(),
            time(18, 0, 6.0),
        ];
        let pruned = prune_times(tokens).unwrap();
        assert_eq!(rendered(&pruned), vec!["09:00", "12:00", "14:00", "18:00"]);
    }

    #[test]
    fn test_prune_chained_dashes() {
        // 9-17-20: the second dash has no free left neighbour
        let tokens = vec![time(9, 0, 1.0), dash(), time(17, 0, 1.0), dash(), time(20, 0, 1.0)];
        let pruned = prune_times(tokens).unwrap();
        assert_eq!(rendered(&pruned), vec!["09:00", "17:00"]);
    }

    #[test]
    fn test_prune_midnight_pair_removed() {
        let tokens = vec![time(0, 0, 6.0), dash(), time(0, 0, 6.0)];
        assert!(prune_times(tokens).is_none());

        let tokens = vec![time(0, 0, 6.0), time(0, 0, 6.0), time(10, 0, 6.0), time(12, 0, 6.0)];
        let pruned = prune_times(tokens).unwrap();
        assert_eq!(rendered(&pruned), vec!["10:00", "12:00"]);
    }

    #[test]
    fn test_prune_single_time_yields_nothing() {
        assert!(prune_times(vec![time(9, 0, 1.0)]).is_none());
    }

    #[test]
    fn test_prune_output_always_even() {
        for n in 0..8 {
            let mut tokens: Vec<Token> = Vec::new();
            for i in 0..n {
                if i % 3 == 2 {
                    tokens.push(dash());
                }
                tokens.push(time(i as u8 + 1, 0, (i % 4) as f32));
            }
            if let Some(pruned) = prune_times(tokens) {
                assert_eq!(pruned.len() % 2, 0, "odd output for n = {}", n);
                assert!(pruned.iter().all(|t| !t.is_dash()));
            }
        }
    }

    #[test]
    fn test_day_runs_pass_through() {
        let run = TokenSequence {
            kind: RunKind::Day,
            tokens: vec![day(Day::Mo, 2.0), day(Day::We, 2.0), day(Day::Fr, 2.0)],
        };
        let pruned = prune(run.clone(), DayRunPolicy::Keep).unwrap();
        assert_eq!(pruned, run);
    }

    #[test]
    fn test_best_two_days() {
        let tokens = vec![day(Day::Mo, 6.0), dash(), day(Day::We, 2.0), day(Day::Fr, 6.0)];
        let kept = prune_days(tokens, DayRunPolicy::BestTwo);
        assert_eq!(rendered(&kept), vec!["Mo", "Fr"]);
    }

    #[test]
    fn test_prune_dispatches_time_runs() {
        let run = TokenSequence {
            kind: RunKind::Time,
            tokens: vec![time(9, 0, 1.0)],
        };
        assert!(prune(run, DayRunPolicy::Keep).is_none());
    }
}
