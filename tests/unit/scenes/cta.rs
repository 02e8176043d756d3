use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::layout::flex::layout;

fn at(local: i64) -> CtaParams {
    params(SceneCtx::new(local, Fps::new(30, 1).unwrap()))
}

#[test]
fn badge_waits_for_frame_thirty() {
    let p = at(15);
    assert_eq!(p.url_scale, 0.0);
    assert_eq!(p.tagline_opacity, 0.0);
    assert!(p.logo_scale > 0.9);
    assert_eq!(at(30).url_scale, 0.0);
    assert!(at(31).url_scale > 0.0);
    assert!((at(89).url_scale - 1.0).abs() < 0.02);
}

#[test]
fn tagline_toggles_without_gate() {
    assert_eq!(at(0).language, Language::English);
    assert_eq!(at(20).language, Language::Spanish);
    assert_eq!(at(40).language, Language::English);
    assert_eq!(at(65).language, Language::Spanish);
}

#[test]
fn badge_wraps_url_with_padding_and_border() {
    let nodes = layout(
        &tree(&at(60)),
        Canvas {
            width: 1080,
            height: 1920,
        },
    );
    assert_eq!(nodes.len(), 4);
    let panel = &nodes[2];
    assert!(matches!(
        panel.kind,
        DrawKind::Panel { fill, radius, border: Some((w, c)) }
            if fill == style::CREAM && radius == 16.0 && w == 4.0 && c == style::NAVY
    ));
    let expected = text_box("picasyfijas.com", 52.0);
    assert!((panel.rect.width() - (expected.width + 72.0)).abs() < 1e-9);
    assert!((panel.rect.height() - (expected.height + 40.0)).abs() < 1e-9);
    assert_eq!(nodes[3].rect, panel.rect);
}
