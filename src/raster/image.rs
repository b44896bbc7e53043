use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::{PixelIndex, Rgb8},
    foundation::error::StrokeResult,
    raster::grid::{Grid, is_boundary_pair},
};

/// Read-only RGBA raster supplied by the image-loading layer.
///
/// Coordinates are always in bounds when called from this crate.
pub trait RasterImage {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Alpha of `(x, y)`.
    fn alpha(&self, x: u32, y: u32) -> u8;

    /// Straight RGB of `(x, y)`.
    fn color(&self, x: u32, y: u32) -> Rgb8;

    /// Index mapping for this raster.
    fn grid(&self) -> Grid {
        Grid::new(self.width(), self.height())
    }

    /// Alpha at a flat index.
    fn alpha_at(&self, i: PixelIndex) -> u8 {
        let (x, y) = self.grid().coord(i);
        self.alpha(x, y)
    }

    /// Color at a flat index.
    fn color_at(&self, i: PixelIndex) -> Rgb8 {
        let (x, y) = self.grid().coord(i);
        self.color(x, y)
    }

    /// Return `true` when the pixel at `i` has non-zero alpha.
    fn is_opaque(&self, i: PixelIndex) -> bool {
        self.alpha_at(i) != 0
    }

    /// Number of neighbors of `i` that form a boundary pair with it.
    fn boundary_degree(&self, i: PixelIndex) -> usize {
        let a = self.alpha_at(i);
        self.grid()
            .neighbors(i)
            .filter(|&n| is_boundary_pair(a, self.alpha_at(n)))
            .count()
    }
}

impl RasterImage for image::RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[3]
    }

    fn color(&self, x: u32, y: u32) -> Rgb8 {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        Rgb8::new(r, g, b)
    }
}

impl<T: RasterImage + ?Sized> RasterImage for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        (**self).alpha(x, y)
    }

    fn color(&self, x: u32, y: u32) -> Rgb8 {
        (**self).color(x, y)
    }
}

/// Decode an image file into straight RGBA8.
pub fn load_rgba(path: &Path) -> StrokeResult<image::RgbaImage> {
    let dyn_img =
        image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(dyn_img.to_rgba8())
}

/// Decode encoded image bytes into straight RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> StrokeResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Build a raster from rows of glyphs, one glyph per pixel.
///
/// `.` transparent, `#` opaque black, `o` half-alpha black, `r`/`g`/`b` opaque
/// primaries.
#[cfg(test)]
pub(crate) fn rgba_from_rows(rows: &[&str]) -> image::RgbaImage {
    let h = rows.len() as u32;
    let w = rows.first().map_or(0, |r| r.chars().count()) as u32;
    let mut img = image::RgbaImage::new(w, h);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let px = match ch {
                '#' => [0, 0, 0, 255],
                'o' => [0, 0, 0, 128],
                'r' => [255, 0, 0, 255],
                'g' => [0, 255, 0, 255],
                'b' => [0, 0, 255, 255],
                _ => [0, 0, 0, 0],
            };
            img.put_pixel(x as u32, y as u32, image::Rgba(px));
        }
    }
    img
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
