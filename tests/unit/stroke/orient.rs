use super::*;

fn idx(g: Grid, pts: &[(u32, u32)]) -> Vec<PixelIndex> {
    pts.iter().map(|&(x, y)| g.index(x, y)).collect()
}

/// 5x5 square outline at (1..=5, 1..=5), walked right along the top first.
fn square_ring(g: Grid) -> Vec<PixelIndex> {
    let mut pts = Vec::new();
    for x in 1..=5 {
        pts.push((x, 1));
    }
    for y in 2..=5 {
        pts.push((5, y));
    }
    for x in (1..=4).rev() {
        pts.push((x, 5));
    }
    for y in (2..=4).rev() {
        pts.push((1, y));
    }
    idx(g, &pts)
}

#[test]
fn unit_square_windings() {
    let g = Grid::new(4, 4);
    let cw = idx(g, &[(0, 0), (0, 1), (1, 1), (1, 0)]);
    assert_eq!(shoelace_sum(&cw, g), -2);
    assert_eq!(orientation(&cw, g), Orientation::Clockwise);

    let mut ccw = cw.clone();
    ccw.reverse();
    assert_eq!(orientation(&ccw, g), Orientation::CounterClockwise);
}

#[test]
fn open_or_short_paths_have_no_winding() {
    let g = Grid::new(4, 4);
    assert_eq!(orientation(&[], g), Orientation::None);
    assert_eq!(orientation(&idx(g, &[(0, 0), (1, 0)]), g), Orientation::None);
    let open = idx(g, &[(0, 0), (1, 0), (2, 0), (3, 0)]);
    assert_eq!(orientation(&open, g), Orientation::None);
}

#[test]
fn reverse_keep_start_flips_winding() {
    let g = Grid::new(7, 7);
    let ring = StrokePath {
        pixels: square_ring(g),
    };
    assert_eq!(orientation(&ring.pixels, g), Orientation::CounterClockwise);
    let rev = reverse_keep_start(ring.clone());
    assert_eq!(rev.pixels[0], ring.pixels[0]);
    assert_eq!(rev.pixels[1], *ring.pixels.last().unwrap());
    assert_eq!(orientation(&rev.pixels, g), Orientation::Clockwise);
}

#[test]
fn opaque_hint_rotates_and_forces_clockwise() {
    let g = Grid::new(7, 7);
    let ring = StrokePath {
        pixels: square_ring(g),
    };
    let mut hint = image::RgbaImage::new(7, 7);
    hint.put_pixel(5, 5, image::Rgba([0, 0, 0, 255]));

    let out = apply_hint(ring.clone(), g, &hint);
    assert_eq!(out.pixels[0], g.index(5, 5));
    assert_eq!(out.pixels[1], g.index(5, 4));
    assert_eq!(orientation(&out.pixels, g), Orientation::Clockwise);
    assert_eq!(out.len(), ring.len());
}

#[test]
fn partial_alpha_hint_keeps_counter_clockwise() {
    let g = Grid::new(7, 7);
    let ring = StrokePath {
        pixels: square_ring(g),
    };
    let mut hint = image::RgbaImage::new(7, 7);
    hint.put_pixel(5, 5, image::Rgba([0, 0, 0, 128]));
    // Not on the path: ignored.
    hint.put_pixel(3, 3, image::Rgba([0, 0, 0, 255]));

    let out = apply_hint(ring, g, &hint);
    assert_eq!(out.pixels[0], g.index(5, 5));
    assert_eq!(out.pixels[1], g.index(4, 5));
    assert_eq!(orientation(&out.pixels, g), Orientation::CounterClockwise);
}

#[test]
fn empty_hint_leaves_path_alone() {
    let g = Grid::new(7, 7);
    let ring = StrokePath {
        pixels: square_ring(g),
    };
    let hint = image::RgbaImage::new(7, 7);
    assert_eq!(apply_hint(ring.clone(), g, &hint), ring);
}

#[test]
fn hint_on_open_path_keeps_it_walkable() {
    let g = Grid::new(3, 1);
    let open = StrokePath {
        pixels: vec![0, 1, 2],
    };
    let mut hint = image::RgbaImage::new(3, 1);
    hint.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));
    let out = apply_hint(open.clone(), g, &hint);
    assert_eq!(out, open);
    assert!(out.pixels.windows(2).all(|w| g.are_adjacent(w[0], w[1])));

    // A hint in the middle must not rotate the open ends together.
    let g = Grid::new(4, 1);
    let open = StrokePath {
        pixels: vec![0, 1, 2, 3],
    };
    let mut hint = image::RgbaImage::new(4, 1);
    hint.put_pixel(2, 0, image::Rgba([0, 0, 0, 128]));
    let out = apply_hint(open.clone(), g, &hint);
    assert_eq!(out, open);
    assert!(out.pixels.windows(2).all(|w| g.are_adjacent(w[0], w[1])));
}

#[test]
fn tangent_and_normal_on_top_edge() {
    let g = Grid::new(7, 7);
    let ring = square_ring(g);
    let t = tangent(&ring, 2, g).unwrap();
    assert!((t.x - 1.0).abs() < 1e-9 && t.y.abs() < 1e-9);
    let n = outward_normal(&ring, 2, g).unwrap();
    assert!(n.x.abs() < 1e-9 && (n.y + 1.0).abs() < 1e-9);

    // Same pixel walked the other way still points outward.
    let rev = reverse_keep_start(StrokePath {
        pixels: ring.clone(),
    });
    let j = rev.pixels.iter().position(|&p| p == ring[2]).unwrap();
    let n = outward_normal(&rev.pixels, j, g).unwrap();
    assert!(n.x.abs() < 1e-9 && (n.y + 1.0).abs() < 1e-9);
}

#[test]
fn tangent_of_empty_path_is_none() {
    assert!(tangent(&[], 0, Grid::new(2, 2)).is_none());
    assert!(outward_normal(&[0, 1], 0, Grid::new(2, 2)).is_none());
}
