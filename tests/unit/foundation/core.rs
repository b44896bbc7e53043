use super::*;

#[test]
fn hsv_primaries() {
    assert_eq!(Rgb8::from_hsv(0.0, 1.0, 1.0), Rgb8::new(255, 0, 0));
    assert_eq!(Rgb8::from_hsv(1.0 / 3.0, 1.0, 1.0), Rgb8::new(0, 255, 0));
    assert_eq!(Rgb8::from_hsv(2.0 / 3.0, 1.0, 1.0), Rgb8::new(0, 0, 255));
    assert_eq!(Rgb8::from_hsv(0.5, 0.0, 1.0), Rgb8::new(255, 255, 255));
}

#[test]
fn hue_palette_is_distinct() {
    let p = Rgb8::hue_palette(6);
    assert_eq!(p.len(), 6);
    let mut sorted = p.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 6);
    assert!(Rgb8::hue_palette(0).is_empty());
}

#[test]
fn orientation_flip() {
    assert_eq!(Orientation::Clockwise.flipped(), Orientation::CounterClockwise);
    assert_eq!(Orientation::CounterClockwise.flipped(), Orientation::Clockwise);
    assert_eq!(Orientation::None.flipped(), Orientation::None);
}

#[test]
fn orientation_serializes_snake_case() {
    let s = serde_json::to_string(&Orientation::CounterClockwise).unwrap();
    assert_eq!(s, "\"counter_clockwise\"");
}
