use kurbo::{Point, Vec2};

use crate::{
    foundation::core::PixelIndex,
    foundation::error::StrokeResult,
    raster::grid::Grid,
    schedule::distribute::{DistributeOpts, distribute},
    stroke::orient::{outward_normal, tangent},
    stroke::synth::StrokePath,
};

/// How strokes share the frame timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// One pixel per frame, finishing each stroke before starting the next.
    Serial,
    /// All strokes advance together and finish on the same frame.
    #[default]
    Parallel,
}

/// Per-frame pixel reveals for a set of strokes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RevealPlan {
    /// Pixels newly revealed in each frame, in drawing order.
    pub frames: Vec<Vec<PixelIndex>>,
}

impl RevealPlan {
    /// Schedule `strokes` over frames.
    ///
    /// In [`RevealMode::Parallel`] each stroke is spread over `frames` frames
    /// (default: the longest stroke's length) with [`distribute`]. In
    /// [`RevealMode::Serial`] there is one frame per pixel and `frames` is
    /// ignored. Every stroke pixel appears in exactly one frame.
    #[tracing::instrument(skip(strokes), fields(count = strokes.len()))]
    pub fn build(
        strokes: &[StrokePath],
        mode: RevealMode,
        frames: Option<usize>,
    ) -> StrokeResult<Self> {
        let frames = match mode {
            RevealMode::Serial => strokes
                .iter()
                .flat_map(|s| s.pixels.iter().map(|&p| vec![p]))
                .collect(),
            RevealMode::Parallel => {
                let n = frames.unwrap_or_else(|| strokes.iter().map(StrokePath::len).max().unwrap_or(0));
                let mut out = vec![Vec::new(); n];
                for stroke in strokes {
                    let fill = distribute(stroke.len(), n, DistributeOpts::default())?;
                    for (frame, idxs) in out.iter_mut().zip(fill) {
                        frame.extend(idxs.into_iter().map(|i| stroke.pixels[i]));
                    }
                }
                out
            }
        };
        Ok(Self { frames })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Every pixel revealed up to and including `frame`.
    pub fn revealed_through(&self, frame: usize) -> impl Iterator<Item = PixelIndex> + '_ {
        self.frames.iter().take(frame.saturating_add(1)).flatten().copied()
    }
}

/// A point spread evenly along a contour, with its local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourAnchor {
    /// Pixel the anchor sits on.
    pub pixel: PixelIndex,
    /// Index of `pixel` within the contour.
    pub index: usize,
    /// Pixel position in image coordinates.
    pub position: Point,
    /// Unit tangent, when the contour has a defined direction there.
    pub tangent: Option<Vec2>,
    /// Unit outward normal; `None` for open contours.
    pub normal: Option<Vec2>,
}

/// Place `count` anchors evenly around a closed contour.
///
/// Uses a cyclic [`distribute`] with one anchor per pixel at most, so
/// `count` larger than the contour fails as infeasible.
pub fn contour_anchors(path: &StrokePath, grid: Grid, count: usize) -> StrokeResult<Vec<ContourAnchor>> {
    let slots = distribute(
        count,
        path.len(),
        DistributeOpts {
            limit: Some(1),
            cyclic: true,
        },
    )?;
    Ok(slots
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_empty())
        .map(|(index, _)| {
            let pixel = path.pixels[index];
            let (x, y) = grid.coord(pixel);
            ContourAnchor {
                pixel,
                index,
                position: Point::new(f64::from(x), f64::from(y)),
                tangent: tangent(&path.pixels, index, grid),
                normal: outward_normal(&path.pixels, index, grid),
            }
        })
        .collect())
}

/// Each cell's longest stroke, skipping cells without strokes.
///
/// Ties keep the first stroke of that length.
pub fn longest_contours(strokes: &[Vec<StrokePath>]) -> Vec<&StrokePath> {
    strokes
        .iter()
        .filter_map(|cell| {
            cell.iter()
                .reduce(|best, s| if s.len() > best.len() { s } else { best })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/reveal.rs"]
mod tests;
