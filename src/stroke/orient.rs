use kurbo::Vec2;

use crate::{
    foundation::core::{Orientation, PixelIndex},
    raster::grid::Grid,
    raster::image::RasterImage,
    stroke::synth::StrokePath,
};

/// Twice the signed area of the closed polygon through `path` (shoelace sum).
///
/// Uses image coordinates, so y grows downward.
pub fn shoelace_sum(path: &[PixelIndex], grid: Grid) -> i64 {
    let pts: Vec<(i64, i64)> = path
        .iter()
        .map(|&p| {
            let (x, y) = grid.coord(p);
            (i64::from(x), i64::from(y))
        })
        .collect();
    pts.iter()
        .zip(pts.iter().cycle().skip(1))
        .map(|(&(x0, y0), &(x1, y1))| x0 * y1 - x1 * y0)
        .sum()
}

/// Winding of a closed path.
///
/// Paths shorter than 3 pixels, or whose endpoints are not adjacent, are
/// [`Orientation::None`]. Otherwise a negative [`shoelace_sum`] is clockwise.
pub fn orientation(path: &[PixelIndex], grid: Grid) -> Orientation {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return Orientation::None;
    };
    if path.len() < 3 || !grid.are_adjacent(first, last) {
        return Orientation::None;
    }
    if shoelace_sum(path, grid) < 0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Reverse the cyclic order of `path` while keeping its first pixel first.
pub fn reverse_keep_start(mut path: StrokePath) -> StrokePath {
    if path.pixels.len() > 1 {
        path.pixels[1..].reverse();
    }
    path
}

/// Rotate and orient `path` according to a hint image.
///
/// The first path pixel that is opaque in `hint` becomes the start. A hint
/// alpha of 255 asks for [`Orientation::Clockwise`], anything else for
/// [`Orientation::CounterClockwise`]; a path winding the other way is reversed
/// around its new start. Without an opaque hint pixel the path is returned
/// unchanged, and so is an open path, which has no winding to flip and whose
/// ends do not join.
pub fn apply_hint<H: RasterImage + ?Sized>(mut path: StrokePath, grid: Grid, hint: &H) -> StrokePath {
    let have = orientation(&path.pixels, grid);
    if have == Orientation::None {
        return path;
    }
    let Some(k) = path.pixels.iter().position(|&p| hint.alpha_at(p) != 0) else {
        return path;
    };
    path.pixels.rotate_left(k);

    let want = if hint.alpha_at(path.pixels[0]) == 255 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    };
    if have != want {
        path = reverse_keep_start(path);
    }
    path
}

/// Unit tangent at `path[i]`, averaged over four pixels on each side.
///
/// Neighbors wrap around the path. Returns `None` for an empty path or when
/// the samples cancel out.
pub fn tangent(path: &[PixelIndex], i: usize, grid: Grid) -> Option<Vec2> {
    let n = path.len();
    if n == 0 {
        return None;
    }
    let at = |j: usize| {
        let (x, y) = grid.coord(path[j % n]);
        Vec2::new(f64::from(x), f64::from(y))
    };

    let mut sum = Vec2::ZERO;
    for k in 1..=4 {
        sum += at(i + k) - at(i + n * 4 - k);
    }
    let len = sum.length();
    if len == 0.0 { None } else { Some(sum / len) }
}

/// Unit normal at `path[i]` pointing away from the region the path encloses.
///
/// Needs a closed path; open paths have no defined outside.
pub fn outward_normal(path: &[PixelIndex], i: usize, grid: Grid) -> Option<Vec2> {
    let t = tangent(path, i, grid)?;
    match orientation(path, grid) {
        // Negative shoelace sum: the interior lies to the screen-left of travel.
        Orientation::Clockwise => Some(Vec2::new(-t.y, t.x)),
        Orientation::CounterClockwise => Some(Vec2::new(t.y, -t.x)),
        Orientation::None => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/orient.rs"]
mod tests;
