use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::layout::flex::{DrawKind, layout};

fn at(local: i64) -> LogoParams {
    params(SceneCtx::new(local, Fps::new(30, 1).unwrap()))
}

#[test]
fn logo_pops_and_title_fades() {
    assert_eq!(at(0), LogoParams { logo_scale: 0.0, title_opacity: 0.0 });
    assert_eq!(at(15).title_opacity, 0.0);
    assert!((at(20).title_opacity - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(at(29).title_opacity, 14.0 / 15.0);
    assert_eq!(at(30).title_opacity, 1.0);
    assert!(at(10).logo_scale > 1.0, "pop overshoots around frame 10");
    assert!((at(29).logo_scale - 1.0).abs() < 0.05);
}

#[test]
fn tree_stacks_logo_above_title() {
    let nodes = layout(
        &tree(&at(30)),
        Canvas {
            width: 1080,
            height: 1920,
        },
    );
    assert_eq!(nodes.len(), 2);
    assert!(matches!(nodes[0].kind, DrawKind::Image { radius } if radius == 40.0));
    assert_eq!(nodes[0].rect.size(), Size::new(300.0, 300.0));
    assert_eq!(nodes[0].rect.center().x, 540.0);
    assert_eq!(nodes[1].rect.y0, nodes[0].rect.y1 + 40.0);
    assert!(matches!(&nodes[1].kind, DrawKind::Text { text, .. } if text == "Picas y Fijas"));
}
