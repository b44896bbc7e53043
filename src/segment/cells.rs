use crate::{
    foundation::core::{PixelBox, PixelIndex},
    raster::grid::{Grid, is_boundary_pair},
    raster::image::RasterImage,
    segment::components::connected_components,
};

/// Maximal 8-connected region of opaque pixels that never crosses an opacity
/// discontinuity.
///
/// Pixels are stored in flood-fill visitation order. Cells partition the opaque
/// pixels of their source image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Cell {
    /// Member pixel indices.
    pub pixels: Vec<PixelIndex>,
}

impl Cell {
    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Return `true` when the cell has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounding box of the cell in `grid`.
    pub fn bbox(&self, grid: Grid) -> Option<PixelBox> {
        pixel_bbox(grid, &self.pixels)
    }
}

/// Label every opaque pixel of `image` into [`Cell`]s.
///
/// Cells are emitted in order of their first pixel in index scan order.
/// An image without opaque pixels yields no cells.
#[tracing::instrument(skip(image), fields(w = image.width(), h = image.height()))]
pub fn segment<I: RasterImage + ?Sized>(image: &I) -> Vec<Cell> {
    let grid = image.grid();
    let comps = connected_components(
        grid,
        0..grid.len(),
        |p| image.is_opaque(p),
        |a, b| !is_boundary_pair(image.alpha_at(a), image.alpha_at(b)),
    );
    tracing::debug!(cells = comps.len(), "segmented opaque cells");
    comps.into_iter().map(|pixels| Cell { pixels }).collect()
}

/// Bounding box of an arbitrary pixel list; `None` when empty.
pub fn pixel_bbox(grid: Grid, pixels: &[PixelIndex]) -> Option<PixelBox> {
    let mut it = pixels.iter().map(|&p| grid.coord(p));
    let (x0, y0) = it.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
    for (x, y) in it {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Some(PixelBox {
        x: min_x,
        y: min_y,
        w: max_x - min_x,
        h: max_y - min_y,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/segment/cells.rs"]
mod tests;
