use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn decode_svg_rasterizes_at_requested_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect width="20" height="10" fill="#ff0000"/>
    </svg>"##;
    let db = Arc::new(usvg::fontdb::Database::new());
    let img = decode_svg(svg, db, None, 64).unwrap();
    assert_eq!((img.width, img.height), (64, 32));
    let center = ((16 * 64 + 32) * 4) as usize;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);

    let db = Arc::new(usvg::fontdb::Database::new());
    assert!(decode_svg(b"<svg", db, None, 64).is_err());
}

#[test]
fn svg_detection_is_case_insensitive() {
    assert!(is_svg_path("logo.svg"));
    assert!(is_svg_path("img/Logo.SVG"));
    assert!(!is_svg_path("icon-512.png"));
    assert!(!is_svg_path("svg"));
}
