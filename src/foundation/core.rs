/// Flat pixel index `x + y * width` into a raster.
pub type PixelIndex = usize;

/// Straight (non-premultiplied) RGB8 color.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert an HSV triple (`h` in turns, `s`/`v` in `[0, 1]`) to RGB8.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let h = h.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        let to_u8 = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// `count` fully saturated colors with hues evenly spaced around the wheel.
    pub fn hue_palette(count: usize) -> Vec<Self> {
        (0..count)
            .map(|i| Self::from_hsv(i as f64 / count as f64, 1.0, 1.0))
            .collect()
    }
}

/// Winding direction of a closed pixel path.
///
/// Computed from the signed shoelace sum in image coordinates (y grows
/// downward): a negative sum is [`Orientation::Clockwise`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Negative shoelace sum.
    Clockwise,
    /// Non-negative shoelace sum.
    CounterClockwise,
    /// Open or too-short path; no winding is defined.
    None,
}

impl Orientation {
    /// The opposite winding; `None` stays `None`.
    pub fn flipped(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::None => Self::None,
        }
    }
}

/// Axis-aligned pixel bounding box (`w`/`h` are max minus min, as pixel spans).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelBox {
    /// Minimum x.
    pub x: u32,
    /// Minimum y.
    pub y: u32,
    /// `max_x - min_x`.
    pub w: u32,
    /// `max_y - min_y`.
    pub h: u32,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
