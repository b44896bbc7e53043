use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    foundation::core::PixelIndex,
    foundation::error::{StrokeError, StrokeResult},
    raster::grid::Grid,
    raster::image::RasterImage,
};

/// Shared flag for cooperatively cancelling running searches.
///
/// Clones observe the same flag, so one handle can stop searches running on
/// other threads.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unraised flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search observing this flag to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Return `true` once [`CancelFlag::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits applied to a single path search.
#[derive(Clone, Debug, Default)]
pub struct SearchBudget {
    /// Abort after this many expansion steps. `None` is unbounded.
    pub max_steps: Option<u64>,
    /// Abort once this flag is raised.
    pub cancel: Option<CancelFlag>,
}

impl SearchBudget {
    const CANCEL_POLL_INTERVAL: u64 = 1024;

    /// Checked once per step; the flag is polled on the first step and then
    /// every `CANCEL_POLL_INTERVAL` steps.
    fn exhausted(&self, steps: u64) -> bool {
        if self.max_steps.is_some_and(|m| steps > m) {
            return true;
        }
        steps % Self::CANCEL_POLL_INTERVAL == 1
            && self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

struct Frame {
    pixel: PixelIndex,
    candidates: Vec<PixelIndex>,
    cursor: usize,
}

/// Depth-first search for a path over all of `allowed` from `start` to `end`.
///
/// The returned path starts at `start`, ends at `end`, visits each allowed
/// pixel exactly once, and steps only between 8-neighbors. Candidates are
/// tried in descending order of their boundary degree (ties by index), which
/// keeps the walk hugging the silhouette edge. The traversal is iterative
/// with full backtracking.
pub fn search_path<I: RasterImage + ?Sized>(
    image: &I,
    allowed: &HashSet<PixelIndex>,
    start: PixelIndex,
    end: PixelIndex,
    budget: &SearchBudget,
) -> StrokeResult<Vec<PixelIndex>> {
    let unreachable = StrokeError::UnreachablePath {
        cell: 0,
        boundary: 0,
    };
    if !allowed.contains(&start) || !allowed.contains(&end) {
        return Err(unreachable);
    }
    if start == end {
        return if allowed.len() == 1 {
            Ok(vec![start])
        } else {
            Err(unreachable)
        };
    }

    let grid = image.grid();
    let degree: HashMap<PixelIndex, usize> = allowed
        .iter()
        .map(|&p| (p, image.boundary_degree(p)))
        .collect();

    let mut walk = Walk {
        grid,
        allowed,
        end,
        visited: HashSet::with_capacity(allowed.len()),
    };
    walk.visited.insert(start);

    let mut path = vec![start];
    let mut stack = vec![Frame {
        pixel: start,
        candidates: walk.candidates(start, &degree),
        cursor: 0,
    }];
    let mut steps = 0u64;

    while let Some(frame) = stack.last_mut() {
        steps += 1;
        if budget.exhausted(steps) {
            return Err(StrokeError::SearchAborted {
                cell: 0,
                boundary: 0,
                steps,
            });
        }

        let Some(&c) = frame.candidates.get(frame.cursor) else {
            walk.visited.remove(&frame.pixel);
            path.pop();
            stack.pop();
            continue;
        };
        frame.cursor += 1;
        if walk.visited.contains(&c) {
            continue;
        }

        if c == end {
            if walk.visited.len() + 1 == allowed.len() {
                path.push(c);
                tracing::trace!(steps, len = path.len(), "path search complete");
                return Ok(path);
            }
            continue;
        }

        let prev = frame.pixel;
        walk.visited.insert(c);
        if walk.strands_neighbor(prev, c) {
            walk.visited.remove(&c);
            continue;
        }
        path.push(c);
        stack.push(Frame {
            pixel: c,
            candidates: walk.candidates(c, &degree),
            cursor: 0,
        });
    }

    tracing::trace!(steps, "path search exhausted");
    Err(unreachable)
}

struct Walk<'a> {
    grid: Grid,
    allowed: &'a HashSet<PixelIndex>,
    end: PixelIndex,
    visited: HashSet<PixelIndex>,
}

impl Walk<'_> {
    fn is_open(&self, p: PixelIndex) -> bool {
        self.allowed.contains(&p) && !self.visited.contains(&p)
    }

    fn candidates(&self, p: PixelIndex, degree: &HashMap<PixelIndex, usize>) -> Vec<PixelIndex> {
        let mut out: Vec<PixelIndex> = self.grid.neighbors(p).filter(|&n| self.is_open(n)).collect();
        out.sort_by(|a, b| {
            let da = degree.get(a).copied().unwrap_or(0);
            let db = degree.get(b).copied().unwrap_or(0);
            db.cmp(&da).then(a.cmp(b))
        });
        out
    }

    /// Moving `prev -> head` stranded an open neighbor of `prev`.
    ///
    /// An open pixel other than `end` still needs a way in and a way out
    /// among the open pixels plus `head`; `end` only needs a way in. Only
    /// `prev`'s neighbors lose a connection on this move.
    fn strands_neighbor(&self, prev: PixelIndex, head: PixelIndex) -> bool {
        self.grid
            .neighbors(prev)
            .filter(|&u| self.is_open(u))
            .any(|u| {
                let links = self
                    .grid
                    .neighbors(u)
                    .filter(|&n| n == head || self.is_open(n))
                    .count();
                let need = if u == self.end { 1 } else { 2 };
                links < need
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/search.rs"]
mod tests;
