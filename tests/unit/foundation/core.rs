use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(FrameRange::from_len(FrameIndex(u64::MAX), 2).is_err());
}

#[test]
fn adjacent_ranges_do_not_overlap() {
    let a = FrameRange::from_len(FrameIndex(0), 30).unwrap();
    let b = FrameRange::from_len(FrameIndex(30), 60).unwrap();
    let c = FrameRange::from_len(FrameIndex(29), 2).unwrap();
    assert!(!a.overlaps(b));
    assert!(a.overlaps(c));
    assert!(b.overlaps(c));
}

#[test]
fn fps_rate_and_validation() {
    let ntsc = Fps::new(30000, 1001).unwrap();
    assert!((ntsc.as_f64() - 29.97).abs() < 1e-3);
    assert_eq!(Fps::whole(30).as_f64(), 30.0);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn hex_colors_parse() {
    assert_eq!(
        Rgba8Premul::from_hex("#EBEBD3").unwrap(),
        Rgba8Premul::opaque(0xEB, 0xEB, 0xD3)
    );
    let half = Rgba8Premul::from_hex("#ff000080").unwrap();
    assert_eq!(half, Rgba8Premul::from_straight_rgba(255, 0, 0, 128));
    assert!(Rgba8Premul::from_hex("EBEBD3").is_err());
    assert!(Rgba8Premul::from_hex("#EBEB").is_err());
    assert!(Rgba8Premul::from_hex("#GGGGGG").is_err());
}

#[test]
fn scale_about_keeps_center_fixed() {
    let c = Point::new(540.0, 960.0);
    let a = scale_about(c, 0.25);
    assert_eq!(a * c, c);
    let p = a * Point::new(640.0, 960.0);
    assert!((p.x - 565.0).abs() < 1e-9);
    assert_eq!(scale_about(c, 1.0), Affine::IDENTITY);
}
