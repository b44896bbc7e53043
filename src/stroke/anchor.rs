use std::collections::HashSet;

use crate::{
    foundation::core::PixelIndex,
    foundation::error::{StrokeError, StrokeResult},
    raster::grid::Grid,
    segment::components::components_of,
};

/// Where the path search starts and where it must finish.
///
/// The final stroke is `lead` followed by the searched path from `next` to
/// `end`. Every pixel in `lead` is adjacent to its successor, and `end` is
/// adjacent to `lead[0]`, so the stroke closes on itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// Pixels fixed at the head of the stroke: the pinch pixel, plus the
    /// removed neighbor when the split needed two removals.
    pub lead: Vec<PixelIndex>,
    /// First pixel of the searched path.
    pub next: PixelIndex,
    /// Last pixel of the searched path.
    pub end: PixelIndex,
    /// Number of neighbor groups the removal produced.
    pub groups: usize,
}

/// Find a pinch point of `pixels` to anchor the path search.
///
/// Tier one removes a single pixel and looks for its loop neighbors falling
/// into two or more groups. Only when no pixel of the loop splits that way does
/// tier two remove a pixel together with one of its neighbors, keeping the
/// pair that leaves the most groups (first found on ties).
pub fn find_anchor(grid: Grid, pixels: &[PixelIndex]) -> StrokeResult<Anchor> {
    let set: HashSet<PixelIndex> = pixels.iter().copied().collect();
    let loop_neighbors = |p: PixelIndex| -> Vec<PixelIndex> {
        grid.neighbors(p).filter(|n| set.contains(n)).collect()
    };

    for &p in pixels {
        if let Some(anchor) = single_split(grid, p, &loop_neighbors(p)) {
            return Ok(anchor);
        }
    }

    most_groups(
        pixels
            .iter()
            .filter_map(|&p| paired_split(grid, p, &loop_neighbors(p))),
    )
    .ok_or(StrokeError::DegenerateBoundary {
        cell: 0,
        boundary: 0,
    })
}

/// The candidate with strictly the most groups; earlier candidates win ties.
fn most_groups(candidates: impl IntoIterator<Item = Anchor>) -> Option<Anchor> {
    let mut best: Option<Anchor> = None;
    for anchor in candidates {
        if best.as_ref().is_none_or(|b| anchor.groups > b.groups) {
            best = Some(anchor);
        }
    }
    best
}

fn single_split(grid: Grid, p: PixelIndex, around: &[PixelIndex]) -> Option<Anchor> {
    let groups = ranked_groups(grid, around);
    if groups.len() < 2 {
        return None;
    }
    Some(Anchor {
        lead: vec![p],
        next: groups[0][0],
        end: groups[1][0],
        groups: groups.len(),
    })
}

fn paired_split(grid: Grid, p: PixelIndex, around: &[PixelIndex]) -> Option<Anchor> {
    most_groups(around.iter().filter_map(|&q| {
        let rest: Vec<PixelIndex> = around.iter().copied().filter(|&n| n != q).collect();
        let groups = ranked_groups(grid, &rest);
        if groups.len() < 2 {
            return None;
        }

        // `next` must continue from `q`, so pick the largest group touching it.
        let (gi, next) = groups.iter().enumerate().find_map(|(gi, g)| {
            g.iter()
                .copied()
                .find(|&n| grid.are_adjacent(n, q))
                .map(|n| (gi, n))
        })?;
        let (_, end_group) = groups.iter().enumerate().find(|(i, _)| *i != gi)?;

        Some(Anchor {
            lead: vec![p, q],
            next,
            end: end_group[0],
            groups: groups.len(),
        })
    }))
}

/// Groups of `around`, largest first; equal sizes keep discovery order.
fn ranked_groups(grid: Grid, around: &[PixelIndex]) -> Vec<Vec<PixelIndex>> {
    let mut groups = components_of(grid, around);
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    groups
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/anchor.rs"]
mod tests;
