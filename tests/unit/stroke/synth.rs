use std::collections::HashSet;

use super::*;
use crate::{
    foundation::core::Orientation,
    raster::grid::Grid,
    raster::image::rgba_from_rows,
    segment::boundary::extract_boundaries,
    segment::cells::segment,
    stroke::orient::orientation,
};

fn assert_covering_stroke(grid: Grid, boundary: &BoundaryLoop, stroke: &StrokePath) {
    assert_eq!(stroke.len(), boundary.len());
    let a: HashSet<_> = boundary.pixels.iter().copied().collect();
    let b: HashSet<_> = stroke.pixels.iter().copied().collect();
    assert_eq!(b.len(), stroke.len(), "stroke repeats a pixel");
    assert_eq!(a, b);
    for w in stroke.pixels.windows(2) {
        assert!(grid.are_adjacent(w[0], w[1]), "{} -> {} not adjacent", w[0], w[1]);
    }
}

fn trace(img: &image::RgbaImage) -> (Vec<Vec<BoundaryLoop>>, Vec<Vec<StrokePath>>) {
    let cells = segment(img);
    let loops = extract_boundaries(img, &cells);
    let strokes = synthesize_strokes(img, &loops, None, &SynthOpts::default()).unwrap();
    (loops, strokes)
}

#[test]
fn unit_ring_gives_one_closed_stroke_of_eight() {
    let img = rgba_from_rows(&[".....", ".###.", ".#.#.", ".###.", "....."]);
    let (loops, strokes) = trace(&img);
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].len(), 1);
    let s = &strokes[0][0];
    assert_eq!(s.len(), 8);
    assert_covering_stroke(img.grid(), &loops[0][0], s);
    assert!(img.grid().are_adjacent(s.pixels[0], *s.pixels.last().unwrap()));
    assert_ne!(orientation(&s.pixels, img.grid()), Orientation::None);
}

#[test]
fn outer_edge_and_hole_each_get_a_stroke() {
    let img = rgba_from_rows(&[
        "...........",
        ".#########.",
        ".#########.",
        ".#########.",
        ".###...###.",
        ".###...###.",
        ".###...###.",
        ".#########.",
        ".#########.",
        ".#########.",
        "...........",
    ]);
    let (loops, strokes) = trace(&img);
    assert_eq!(strokes[0].len(), 2);
    for (l, s) in loops[0].iter().zip(&strokes[0]) {
        assert_covering_stroke(img.grid(), l, s);
    }
}

#[test]
fn two_wide_band_is_covered_via_paired_anchor() {
    let img = rgba_from_rows(&[
        "........",
        ".######.",
        ".######.",
        ".##..##.",
        ".##..##.",
        ".######.",
        ".######.",
        "........",
    ]);
    let (loops, strokes) = trace(&img);
    assert_eq!(loops[0].len(), 1);
    assert_eq!(loops[0][0].len(), 32);
    let s = &strokes[0][0];
    assert_covering_stroke(img.grid(), &loops[0][0], s);
    assert!(img.grid().are_adjacent(s.pixels[0], *s.pixels.last().unwrap()));
}

#[test]
fn large_outline_does_not_overflow_the_stack() {
    let mut img = image::RgbaImage::new(302, 302);
    for y in 1..301 {
        for x in 1..301 {
            img.put_pixel(x, y, image::Rgba([0, 0, 0, 255]));
        }
    }
    let (loops, strokes) = trace(&img);
    assert_eq!(loops[0][0].len(), 1196);
    assert_covering_stroke(img.grid(), &loops[0][0], &strokes[0][0]);
}

#[test]
fn degenerate_loop_reports_its_indices() {
    let img = rgba_from_rows(&["###....", "#.#.##.", "###.##.", "......."]);
    let cells = segment(&img);
    let loops = extract_boundaries(&img, &cells);
    let err = synthesize_strokes(&img, &loops, None, &SynthOpts::default()).unwrap_err();
    assert!(matches!(
        err,
        StrokeError::DegenerateBoundary {
            cell: 1,
            boundary: 0
        }
    ));
}

#[test]
fn parallel_matches_sequential() {
    let img = rgba_from_rows(&[
        "..........",
        ".###..###.",
        ".#.#..#.#.",
        ".###..###.",
        "..........",
        ".####.....",
        ".#..#.....",
        ".####.....",
    ]);
    let cells = segment(&img);
    let loops = extract_boundaries(&img, &cells);
    let seq = synthesize_strokes(&img, &loops, None, &SynthOpts::default()).unwrap();
    let par = synthesize_strokes(
        &img,
        &loops,
        None,
        &SynthOpts {
            parallel: true,
            threads: Some(2),
            ..SynthOpts::default()
        },
    )
    .unwrap();
    assert_eq!(seq, par);
    assert_eq!(seq.len(), 3);
}

#[test]
fn zero_threads_is_rejected() {
    let img = rgba_from_rows(&["###", "#.#", "###"]);
    let opts = SynthOpts {
        parallel: true,
        threads: Some(0),
        ..SynthOpts::default()
    };
    let err = synthesize_strokes(&img, &[], None, &opts).unwrap_err();
    assert!(matches!(err, StrokeError::InvalidInput(_)));
}

#[test]
fn hint_size_mismatch_is_invalid_input() {
    let img = rgba_from_rows(&["###", "#.#", "###"]);
    let hint = image::RgbaImage::new(4, 3);
    let cells = segment(&img);
    let loops = extract_boundaries(&img, &cells);
    let err = synthesize_strokes(&img, &loops, Some(&hint), &SynthOpts::default()).unwrap_err();
    assert!(matches!(err, StrokeError::InvalidInput(_)));
}

#[test]
fn hint_orients_every_stroke() {
    let img = rgba_from_rows(&[".....", ".###.", ".#.#.", ".###.", "....."]);
    let mut hint = image::RgbaImage::new(5, 5);
    hint.put_pixel(3, 3, image::Rgba([0, 0, 0, 255]));
    let cells = segment(&img);
    let loops = extract_boundaries(&img, &cells);
    let strokes = synthesize_strokes(&img, &loops, Some(&hint), &SynthOpts::default()).unwrap();
    let s = &strokes[0][0];
    let g = img.grid();
    assert_eq!(s.pixels[0], g.index(3, 3));
    assert_eq!(orientation(&s.pixels, g), Orientation::Clockwise);
    assert_covering_stroke(g, &loops[0][0], s);
}

#[test]
fn cancelled_search_surfaces_loop_indices() {
    let img = rgba_from_rows(&[".....", ".###.", ".#.#.", ".###.", "....."]);
    let cells = segment(&img);
    let loops = extract_boundaries(&img, &cells);
    let flag = crate::stroke::search::CancelFlag::new();
    flag.cancel();
    let opts = SynthOpts {
        budget: SearchBudget {
            max_steps: None,
            cancel: Some(flag),
        },
        ..SynthOpts::default()
    };
    let err = synthesize_strokes(&img, &loops, None, &opts).unwrap_err();
    assert!(matches!(
        err,
        StrokeError::SearchAborted {
            cell: 0,
            boundary: 0,
            ..
        }
    ));
}
