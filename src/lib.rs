//! Strokeline turns raster silhouettes into deterministic drawing orders.
//!
//! Given an RGBA image whose alpha channel marks a silhouette, strokeline finds
//! the opaque regions, the borders of each region, and for every border a single
//! pixel path that visits each border pixel once. Those paths drive
//! "pen drawing" reveal animations; a frame distributor spreads them over time.
//!
//! # Pipeline overview
//!
//! 1. **Segment**: `RasterImage -> Vec<Cell>` (8-connected opaque regions)
//! 2. **Extract**: `Cell -> Vec<BoundaryLoop>` (outer edge and hole edges)
//! 3. **Synthesize**: `BoundaryLoop -> StrokePath` (pinch-point anchor plus
//!    an iterative covering search)
//! 4. **Orient**: winding from the shoelace sum, optionally forced by a hint image
//! 5. **Schedule**: [`distribute`] and [`RevealPlan`] map path pixels to frames
//!
//! [`trace_silhouette`] runs steps 1 to 4 in one call.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical input yields identical output, sequential or parallel.
//! - **No recursion**: flood fills and the path search use explicit stacks.
//! - **No IO in the core**: caching is an injected [`SilhouetteCache`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod foundation;
mod pipeline;
mod raster;
mod schedule;
mod segment;
mod stroke;

pub use cache::store::{
    CacheEntry, CacheStats, CacheStore, Clock, FixedClock, ImageStamp, JsonDirStore, MemoryStore,
    SilhouetteCache, SystemClock,
};
pub use foundation::core::{Orientation, PixelBox, PixelIndex, Rgb8};
pub use foundation::error::{StrokeError, StrokeResult};
pub use pipeline::{
    DEFAULT_MAX_SEARCH_STEPS, SilhouetteTrace, TraceOpts, trace_silhouette, trace_silhouette_cached,
    trace_silhouette_with_cancel,
};
pub use raster::grid::{Grid, Neighbors, is_boundary_pair};
pub use raster::image::{RasterImage, decode_rgba, load_rgba};
pub use schedule::distribute::{DistributeOpts, distribute};
pub use schedule::reveal::{ContourAnchor, RevealMode, RevealPlan, contour_anchors, longest_contours};
pub use segment::boundary::{BoundaryLoop, extract_boundaries, is_boundary_pixel};
pub use segment::cells::{Cell, pixel_bbox, segment};
pub use stroke::anchor::{Anchor, find_anchor};
pub use stroke::group::{HintFallback, StrokeGroup, group_strokes};
pub use stroke::orient::{
    apply_hint, orientation, outward_normal, reverse_keep_start, shoelace_sum, tangent,
};
pub use stroke::search::{CancelFlag, SearchBudget, search_path};
pub use stroke::synth::{
    StrokePath, SynthOpts, synthesize_loop, synthesize_loop_with, synthesize_strokes,
};
