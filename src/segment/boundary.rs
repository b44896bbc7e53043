use crate::{
    foundation::core::{PixelBox, PixelIndex},
    raster::grid::{Grid, is_boundary_pair},
    raster::image::RasterImage,
    segment::cells::{Cell, pixel_bbox},
    segment::components::components_of,
};

/// One physically distinct border of a cell (outer edge or a hole edge).
///
/// Every member pixel touches an opacity discontinuity; members are connected
/// under plain 8-adjacency.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BoundaryLoop {
    /// Member pixel indices in flood-fill order.
    pub pixels: Vec<PixelIndex>,
}

impl BoundaryLoop {
    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Return `true` when the loop has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounding box of the loop in `grid`.
    pub fn bbox(&self, grid: Grid) -> Option<PixelBox> {
        pixel_bbox(grid, &self.pixels)
    }
}

/// Return `true` when `p` has an in-bounds neighbor across an opacity discontinuity.
pub fn is_boundary_pixel<I: RasterImage + ?Sized>(image: &I, p: PixelIndex) -> bool {
    let a = image.alpha_at(p);
    image
        .grid()
        .neighbors(p)
        .any(|n| is_boundary_pair(a, image.alpha_at(n)))
}

/// Group each cell's boundary pixels into [`BoundaryLoop`]s.
///
/// The outer list is parallel to `cells`. Cells can come from [`segment`]
/// or from a cache; only their pixel lists are consulted.
///
/// [`segment`]: crate::segment()
#[tracing::instrument(skip_all, fields(cells = cells.len()))]
pub fn extract_boundaries<I: RasterImage + ?Sized>(
    image: &I,
    cells: &[Cell],
) -> Vec<Vec<BoundaryLoop>> {
    let grid = image.grid();
    cells
        .iter()
        .enumerate()
        .map(|(ci, cell)| {
            let edge: Vec<PixelIndex> = cell
                .pixels
                .iter()
                .copied()
                .filter(|&p| is_boundary_pixel(image, p))
                .collect();
            let loops: Vec<BoundaryLoop> = components_of(grid, &edge)
                .into_iter()
                .map(|pixels| BoundaryLoop { pixels })
                .collect();
            tracing::debug!(cell = ci, loops = loops.len(), "extracted boundary loops");
            loops
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/segment/boundary.rs"]
mod tests;
