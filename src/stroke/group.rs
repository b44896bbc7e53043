use crate::{
    foundation::core::Rgb8,
    foundation::error::{StrokeError, StrokeResult},
    raster::image::RasterImage,
    stroke::synth::StrokePath,
};

/// What to do with strokes that touch no opaque hint pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintFallback {
    /// Collect them into an unkeyed group after all colored groups.
    #[default]
    Trailing,
    /// Collect them into an unkeyed group before all colored groups.
    Leading,
    /// Fail with [`StrokeError::InvalidInput`].
    Reject,
}

/// Strokes sharing one hint color, drawn as a unit.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StrokeGroup {
    /// Hint color of the group; `None` for the fallback group.
    pub color: Option<Rgb8>,
    /// Member strokes, in input order.
    pub strokes: Vec<StrokePath>,
}

/// Order strokes into groups keyed by a color-coded hint image.
///
/// A stroke's key is the RGB of its first pixel that is opaque in `hint`.
/// Colored groups appear in order of first use; strokes keep their relative
/// order inside a group. Keyless strokes are handled per `fallback`.
pub fn group_strokes<H: RasterImage + ?Sized>(
    strokes: Vec<StrokePath>,
    hint: &H,
    fallback: HintFallback,
) -> StrokeResult<Vec<StrokeGroup>> {
    let mut groups: Vec<StrokeGroup> = Vec::new();
    let mut keyless: Vec<StrokePath> = Vec::new();

    for (si, stroke) in strokes.into_iter().enumerate() {
        let key = stroke
            .pixels
            .iter()
            .find(|&&p| hint.alpha_at(p) != 0)
            .map(|&p| hint.color_at(p));
        match key {
            Some(color) => match groups.iter_mut().find(|g| g.color == Some(color)) {
                Some(g) => g.strokes.push(stroke),
                None => groups.push(StrokeGroup {
                    color: Some(color),
                    strokes: vec![stroke],
                }),
            },
            None if fallback == HintFallback::Reject => {
                return Err(StrokeError::invalid_input(format!(
                    "stroke {si} touches no opaque hint pixel"
                )));
            }
            None => keyless.push(stroke),
        }
    }

    if !keyless.is_empty() {
        let rest = StrokeGroup {
            color: None,
            strokes: keyless,
        };
        match fallback {
            HintFallback::Leading => groups.insert(0, rest),
            _ => groups.push(rest),
        }
    }
    Ok(groups)
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/group.rs"]
mod tests;
