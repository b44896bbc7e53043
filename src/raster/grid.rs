use crate::foundation::core::PixelIndex;

/// Raster dimensions plus the flat-index <-> coordinate mapping.
///
/// Indices are row-major: `index(x, y) = x + y * width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Grid {
    /// Create a grid of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub fn len(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Return `true` when the grid has no pixels.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Return `true` when `(x, y)` lies inside the grid.
    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Flat index of `(x, y)`.
    pub fn index(self, x: u32, y: u32) -> PixelIndex {
        x as usize + y as usize * self.width as usize
    }

    /// Coordinate of flat index `i`.
    pub fn coord(self, i: PixelIndex) -> (u32, u32) {
        let w = self.width as usize;
        ((i % w) as u32, (i / w) as u32)
    }

    /// In-bounds 8-neighbors of `i`, excluding `i` itself.
    ///
    /// Order is fixed (dx outer, dy inner, both ascending) so every traversal
    /// built on it is deterministic.
    pub fn neighbors(self, i: PixelIndex) -> Neighbors {
        let (x, y) = self.coord(i);
        let mut out = Neighbors {
            items: [0; 8],
            len: 0,
            pos: 0,
        };
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (i64::from(x) + dx, i64::from(y) + dy);
                if self.contains(nx, ny) {
                    out.items[out.len] = self.index(nx as u32, ny as u32);
                    out.len += 1;
                }
            }
        }
        out
    }

    /// Return `true` when `a` and `b` are distinct 8-neighbors.
    pub fn are_adjacent(self, a: PixelIndex, b: PixelIndex) -> bool {
        let (ax, ay) = self.coord(a);
        let (bx, by) = self.coord(b);
        a != b && ax.abs_diff(bx) <= 1 && ay.abs_diff(by) <= 1
    }
}

/// Stack-allocated neighbor list returned by [`Grid::neighbors`].
#[derive(Clone, Debug)]
pub struct Neighbors {
    items: [PixelIndex; 8],
    len: usize,
    pos: usize,
}

impl Iterator for Neighbors {
    type Item = PixelIndex;

    fn next(&mut self) -> Option<PixelIndex> {
        if self.pos >= self.len {
            return None;
        }
        let v = self.items[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.len - self.pos;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Neighbors {}

/// Return `true` when exactly one of two alpha values is zero.
///
/// Such a pair straddles an opacity discontinuity.
pub fn is_boundary_pair(a: u8, b: u8) -> bool {
    u16::from(a) * u16::from(b) == 0 && u16::from(a) + u16::from(b) != 0
}

#[cfg(test)]
#[path = "../../tests/unit/raster/grid.rs"]
mod tests;
