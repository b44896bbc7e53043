use std::{fs::File, io::BufReader, path::Path};

use crate::{
    cache::store::{CacheStore, Clock, ImageStamp, SilhouetteCache},
    foundation::core::Orientation,
    foundation::error::{StrokeError, StrokeResult},
    raster::image::RasterImage,
    segment::boundary::{BoundaryLoop, extract_boundaries},
    segment::cells::{Cell, segment},
    stroke::group::{HintFallback, StrokeGroup, group_strokes},
    stroke::orient::orientation,
    stroke::search::{CancelFlag, SearchBudget},
    stroke::synth::{StrokePath, SynthOpts, synthesize_strokes},
};

/// Step budget each loop search gets unless configured otherwise.
pub const DEFAULT_MAX_SEARCH_STEPS: u64 = 10_000_000;

/// Options for [`trace_silhouette`], loadable from JSON.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceOpts {
    /// Synthesize loops on a dedicated rayon pool.
    pub parallel: bool,
    /// Worker count for the parallel pool; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Per-loop search step budget, [`DEFAULT_MAX_SEARCH_STEPS`] unless set.
    /// `None` (JSON `null`) is unbounded.
    pub max_search_steps: Option<u64>,
    /// Grouping policy for strokes that miss every opaque hint pixel.
    pub hint_fallback: HintFallback,
}

impl Default for TraceOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            max_search_steps: Some(DEFAULT_MAX_SEARCH_STEPS),
            hint_fallback: HintFallback::default(),
        }
    }
}

impl TraceOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StrokeResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| StrokeError::serde(format!("parse trace options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_json_path(path: impl AsRef<Path>) -> StrokeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StrokeError::invalid_input(format!("open trace options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values that can never run.
    pub fn validate(&self) -> StrokeResult<()> {
        if self.threads == Some(0) {
            return Err(StrokeError::invalid_input("'threads' must be >= 1 when set"));
        }
        if self.max_search_steps == Some(0) {
            return Err(StrokeError::invalid_input(
                "'max_search_steps' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Synthesizer options, optionally observing `cancel`.
    pub fn synth_opts(&self, cancel: Option<CancelFlag>) -> SynthOpts {
        SynthOpts {
            budget: SearchBudget {
                max_steps: self.max_search_steps,
                cancel,
            },
            parallel: self.parallel,
            threads: self.threads,
        }
    }
}

/// Everything derived from one silhouette.
///
/// `boundaries`, `strokes` and `orientations` are parallel to `cells`, and
/// inside each cell parallel to one another.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SilhouetteTrace {
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// Opaque regions.
    pub cells: Vec<Cell>,
    /// Boundary loops per cell.
    pub boundaries: Vec<Vec<BoundaryLoop>>,
    /// One stroke per loop.
    pub strokes: Vec<Vec<StrokePath>>,
    /// Winding of each stroke.
    pub orientations: Vec<Vec<Orientation>>,
    /// Strokes grouped by hint color; empty without a hint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<StrokeGroup>,
}

impl SilhouetteTrace {
    /// Total number of strokes.
    pub fn stroke_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    /// Strokes in cell order, then loop order.
    pub fn flat_strokes(&self) -> impl Iterator<Item = &StrokePath> + '_ {
        self.strokes.iter().flatten()
    }
}

/// Segment, extract, synthesize and orient a silhouette in one call.
pub fn trace_silhouette<I: RasterImage + Sync + ?Sized>(
    image: &I,
    hint: Option<&(dyn RasterImage + Sync)>,
    opts: &TraceOpts,
) -> StrokeResult<SilhouetteTrace> {
    trace_silhouette_with_cancel(image, hint, opts, None)
}

/// [`trace_silhouette`] with a cancellation flag observed by every path search.
#[tracing::instrument(skip_all, fields(w = image.width(), h = image.height(), hint = hint.is_some()))]
pub fn trace_silhouette_with_cancel<I: RasterImage + Sync + ?Sized>(
    image: &I,
    hint: Option<&(dyn RasterImage + Sync)>,
    opts: &TraceOpts,
    cancel: Option<CancelFlag>,
) -> StrokeResult<SilhouetteTrace> {
    opts.validate()?;
    let cells = segment(image);
    let boundaries = extract_boundaries(image, &cells);
    finish_trace(image, cells, boundaries, hint, opts, cancel)
}

/// [`trace_silhouette`] with segmentation results memoized in `cache`.
#[tracing::instrument(skip_all, fields(key = %stamp.key))]
pub fn trace_silhouette_cached<I, S, C>(
    cache: &SilhouetteCache<S, C>,
    stamp: &ImageStamp,
    image: &I,
    hint: Option<&(dyn RasterImage + Sync)>,
    opts: &TraceOpts,
) -> StrokeResult<SilhouetteTrace>
where
    I: RasterImage + Sync + ?Sized,
    S: CacheStore,
    C: Clock,
{
    opts.validate()?;
    let cells = cache.cells(stamp, image)?;
    let boundaries = cache.boundaries(stamp, image, &cells)?;
    finish_trace(image, cells, boundaries, hint, opts, None)
}

fn finish_trace<I: RasterImage + Sync + ?Sized>(
    image: &I,
    cells: Vec<Cell>,
    boundaries: Vec<Vec<BoundaryLoop>>,
    hint: Option<&(dyn RasterImage + Sync)>,
    opts: &TraceOpts,
    cancel: Option<CancelFlag>,
) -> StrokeResult<SilhouetteTrace> {
    let strokes = synthesize_strokes(image, &boundaries, hint, &opts.synth_opts(cancel))?;

    let grid = image.grid();
    let orientations = strokes
        .iter()
        .map(|cell| cell.iter().map(|s| orientation(&s.pixels, grid)).collect())
        .collect();

    let groups = match hint {
        Some(h) => group_strokes(strokes.iter().flatten().cloned().collect(), h, opts.hint_fallback)?,
        None => Vec::new(),
    };

    tracing::debug!(
        cells = cells.len(),
        strokes = strokes.iter().map(Vec::len).sum::<usize>(),
        groups = groups.len(),
        "traced silhouette"
    );
    Ok(SilhouetteTrace {
        width: image.width(),
        height: image.height(),
        cells,
        boundaries,
        strokes,
        orientations,
        groups,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
