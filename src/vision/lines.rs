//! Reading-order line grouping
//!
//! OCR engines hand back an unordered soup of fragments. Lines are grown
//! outward from the most confident fragment: left while a fragment's vertical
//! center sits inside the current edge fragment's span, then right the same
//! way. Lines come out top-to-bottom, each left-to-right.

use std::cmp::Ordering;

use super::fragments::Fragment;

/// A left-to-right run of fragments sharing a vertical band
pub type Line = Vec<Fragment>;

/// Group fragments into reading-order lines
pub fn group_lines(fragments: Vec<Fragment>) -> Vec<Line> {
    let mut pool = fragments;
    let mut lines: Vec<Line> = Vec::new();

    while let Some(seed_index) = best_seed(&pool) {
        let seed = pool.swap_remove(seed_index);

        let mut left: Vec<Fragment> = Vec::new();
        let mut edge = seed.clone();
        while let Some(index) = nearest(&pool, &edge, Side::Left) {
            edge = pool.swap_remove(index);
            left.push(edge.clone());
        }

        let mut right: Vec<Fragment> = Vec::new();
        let mut edge = seed.clone();
        while let Some(index) = nearest(&pool, &edge, Side::Right) {
            edge = pool.swap_remove(index);
            right.push(edge.clone());
        }

        let mut line: Line = left.into_iter().rev().collect();
        line.push(seed);
        line.extend(right);
        lines.push(line);
    }

    lines.sort_by(|a, b| {
        let (a, b) = (&a[0], &b[0]);
        a.rect
            .min_y()
            .total_cmp(&b.rect.min_y())
            .then_with(|| a.rect.min_x().total_cmp(&b.rect.min_x()))
            .then_with(|| a.text.cmp(&b.text))
    });

    lines
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Total order used for seed selection, highest confidence first
fn seed_order(a: &Fragment, b: &Fragment) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| position_order(a, b))
}

fn position_order(a: &Fragment, b: &Fragment) -> Ordering {
    a.rect
        .min_y()
        .total_cmp(&b.rect.min_y())
        .then_with(|| a.rect.min_x().total_cmp(&b.rect.min_x()))
        .then_with(|| a.text.cmp(&b.text))
}

fn best_seed(pool: &[Fragment]) -> Option<usize> {
    pool.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| seed_order(a, b))
        .map(|(i, _)| i)
}

/// Closest fragment strictly on `side` of `edge` whose vertical center is
/// inside `edge`'s vertical span
fn nearest(pool: &[Fragment], edge: &Fragment, side: Side) -> Option<usize> {
    let gap = |f: &Fragment| match side {
        Side::Left => edge.rect.min_x() - f.rect.max_x(),
        Side::Right => f.rect.min_x() - edge.rect.max_x(),
    };

    pool.iter()
        .enumerate()
        .filter(|(_, f)| gap(f) >= 0.0 && edge.rect.spans_y(f.rect.mid_y()))
        .min_by(|(_, a), (_, b)| {
            gap(a)
                .total_cmp(&gap(b))
                .then_with(|| {
                    let da = (a.rect.mid_y() - edge.rect.mid_y()).abs();
                    let db = (b.rect.mid_y() - edge.rect.mid_y()).abs();
                    da.total_cmp(&db)
                })
                .then_with(|| position_order(a, b))
        })
        .map(|(i, _)| i)
}
