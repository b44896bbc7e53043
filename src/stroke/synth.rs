use std::collections::HashSet;

use rayon::prelude::*;

use crate::{
    foundation::core::PixelIndex,
    foundation::error::{StrokeError, StrokeResult},
    raster::image::RasterImage,
    segment::boundary::BoundaryLoop,
    stroke::anchor::find_anchor,
    stroke::orient::apply_hint,
    stroke::search::{SearchBudget, search_path},
};

/// Drawing order for one boundary loop.
///
/// A permutation of the loop's pixels in which consecutive pixels are
/// 8-neighbors. Paths produced by [`synthesize_loop`] are also closed: the
/// last pixel neighbors the first.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StrokePath {
    /// Pixels in drawing order.
    pub pixels: Vec<PixelIndex>,
}

impl StrokePath {
    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Return `true` when the path has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
/// Execution controls for [`synthesize_strokes`].
pub struct SynthOpts {
    /// Limits applied to each loop's path search.
    pub budget: SearchBudget,
    /// Process loops on a dedicated rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only).
    pub threads: Option<usize>,
}

/// Synthesize the stroke of a single loop with an unbounded search.
pub fn synthesize_loop<I: RasterImage + ?Sized>(
    image: &I,
    boundary: &BoundaryLoop,
) -> StrokeResult<StrokePath> {
    synthesize_loop_with(image, boundary, &SearchBudget::default())
}

/// Synthesize the stroke of a single loop under `budget`.
///
/// Errors carry cell/loop index 0; [`synthesize_strokes`] re-tags them.
pub fn synthesize_loop_with<I: RasterImage + ?Sized>(
    image: &I,
    boundary: &BoundaryLoop,
    budget: &SearchBudget,
) -> StrokeResult<StrokePath> {
    let grid = image.grid();
    let anchor = find_anchor(grid, &boundary.pixels)?;
    tracing::debug!(
        lead = ?anchor.lead,
        next = anchor.next,
        end = anchor.end,
        groups = anchor.groups,
        "anchored loop"
    );

    let allowed: HashSet<PixelIndex> = boundary
        .pixels
        .iter()
        .copied()
        .filter(|p| !anchor.lead.contains(p))
        .collect();
    let tail = search_path(image, &allowed, anchor.next, anchor.end, budget)?;

    let mut pixels = anchor.lead;
    pixels.extend(tail);
    Ok(StrokePath { pixels })
}

/// Synthesize a stroke for every loop of every cell.
///
/// The result mirrors `boundaries`: one list per cell, one path per loop, in
/// input order regardless of `opts.parallel`. When `hint` is given each path
/// is rotated and oriented by it (see [`apply_hint`]). The first failing loop
/// (in input order) fails the whole call.
#[tracing::instrument(skip_all, fields(cells = boundaries.len(), parallel = opts.parallel))]
pub fn synthesize_strokes<I: RasterImage + Sync + ?Sized>(
    image: &I,
    boundaries: &[Vec<BoundaryLoop>],
    hint: Option<&(dyn RasterImage + Sync)>,
    opts: &SynthOpts,
) -> StrokeResult<Vec<Vec<StrokePath>>> {
    if let Some(h) = hint
        && (h.width(), h.height()) != (image.width(), image.height())
    {
        return Err(StrokeError::invalid_input(format!(
            "hint image is {}x{} but the source is {}x{}",
            h.width(),
            h.height(),
            image.width(),
            image.height()
        )));
    }

    let jobs: Vec<(usize, usize, &BoundaryLoop)> = boundaries
        .iter()
        .enumerate()
        .flat_map(|(ci, loops)| loops.iter().enumerate().map(move |(bi, l)| (ci, bi, l)))
        .collect();

    let run = |&(ci, bi, boundary): &(usize, usize, &BoundaryLoop)| {
        synthesize_one(image, boundary, hint, &opts.budget).map_err(|e| {
            let e = e.at_loop(ci, bi);
            tracing::warn!(cell = ci, boundary = bi, error = %e, "stroke synthesis failed");
            e
        })
    };

    let results: Vec<StrokeResult<StrokePath>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| jobs.par_iter().map(&run).collect())
    } else {
        let mut out = Vec::with_capacity(jobs.len());
        for job in &jobs {
            out.push(Ok(run(job)?));
        }
        out
    };

    let mut strokes: Vec<Vec<StrokePath>> = boundaries
        .iter()
        .map(|loops| Vec::with_capacity(loops.len()))
        .collect();
    for ((ci, _, _), res) in jobs.iter().zip(results) {
        strokes[*ci].push(res?);
    }
    Ok(strokes)
}

fn synthesize_one<I: RasterImage + ?Sized>(
    image: &I,
    boundary: &BoundaryLoop,
    hint: Option<&(dyn RasterImage + Sync)>,
    budget: &SearchBudget,
) -> StrokeResult<StrokePath> {
    let path = synthesize_loop_with(image, boundary, budget)?;
    Ok(match hint {
        Some(h) => apply_hint(path, image.grid(), h),
        None => path,
    })
}

fn build_thread_pool(threads: Option<usize>) -> StrokeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StrokeError::invalid_input(
            "synthesis 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StrokeError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/synth.rs"]
mod tests;
