use super::*;

#[test]
fn rgba_image_exposes_alpha_and_color() {
    let img = rgba_from_rows(&["#.", "or"]);
    assert_eq!(RasterImage::width(&img), 2);
    assert_eq!(RasterImage::height(&img), 2);
    assert_eq!(img.alpha(0, 0), 255);
    assert_eq!(img.alpha(1, 0), 0);
    assert_eq!(img.alpha(0, 1), 128);
    assert_eq!(img.color(1, 1), Rgb8::new(255, 0, 0));
    assert!(img.is_opaque(0));
    assert!(!img.is_opaque(1));
}

#[test]
fn boundary_degree_counts_transparent_neighbors() {
    let img = rgba_from_rows(&["...", ".#.", "..."]);
    assert_eq!(img.boundary_degree(4), 8);
    // A transparent pixel pairs with its one opaque neighbor.
    assert_eq!(img.boundary_degree(0), 1);

    let solid = rgba_from_rows(&["###", "###"]);
    assert_eq!(solid.boundary_degree(1), 0);
}

#[test]
fn decode_png_roundtrip_keeps_straight_alpha() {
    let src = rgba_from_rows(&["#o"]);
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(src.clone())
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let decoded = decode_rgba(&buf).unwrap();
    assert_eq!(decoded, src);
}

#[test]
fn decode_garbage_is_error() {
    assert!(decode_rgba(b"not an image").is_err());
}
