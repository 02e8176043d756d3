use super::*;
use crate::composition::model::SceneKind;
use crate::eval::evaluator::EvaluatedScene;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::scenes::{LogoParams, SceneParams};

const BG: Rgba8Premul = Rgba8Premul::opaque(235, 235, 211);
const NAVY: Rgba8Premul = Rgba8Premul::opaque(56, 97, 140);

fn solid_logo(color: [u8; 4], w: u32, h: u32) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(color.repeat((w * h) as usize)),
    }
}

fn store() -> PreparedAssetStore {
    PreparedAssetStore::in_memory(solid_logo([200, 40, 40, 255], 4, 4))
}

fn frame_with(nodes: Vec<DrawNode>) -> EvaluatedFrame {
    EvaluatedFrame {
        frame: FrameIndex(0),
        canvas: Canvas {
            width: 64,
            height: 48,
        },
        background: BG,
        scene: Some(EvaluatedScene {
            id: "test".to_owned(),
            kind: SceneKind::Logo,
            local_frame: 0,
            params: SceneParams::Logo(LogoParams {
                logo_scale: 1.0,
                title_opacity: 1.0,
            }),
            nodes,
        }),
    }
}

fn panel(rect: Rect, fill: Rgba8Premul) -> DrawNode {
    DrawNode {
        rect,
        scale: 1.0,
        opacity: 1.0,
        kind: DrawKind::Panel {
            fill,
            radius: 0.0,
            border: None,
        },
    }
}

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= tol)
}

#[test]
fn empty_frame_is_background() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let out = be.render_frame(&frame_with(vec![]), &store()).unwrap();
    assert_eq!((out.width, out.height), (64, 48));
    assert!(out.premultiplied);
    assert_eq!(out.data.len(), 64 * 48 * 4);
    assert_eq!(out.pixel(0, 0), Some(BG.to_array()));
    assert_eq!(out.pixel(63, 47), Some(BG.to_array()));
    assert_eq!(out.pixel(64, 0), None);
}

#[test]
fn clear_override_replaces_background() {
    let mut be = CpuBackend::new(RenderSettings {
        clear_rgba: Some([0, 0, 0, 0]),
    });
    let out = be.render_frame(&frame_with(vec![]), &store()).unwrap();
    assert!(out.data.iter().all(|&b| b == 0));
}

#[test]
fn panel_fills_its_rect_only() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let f = frame_with(vec![panel(Rect::new(16.0, 8.0, 48.0, 40.0), NAVY)]);
    let out = be.render_frame(&f, &store()).unwrap();
    assert_eq!(out.pixel(32, 24), Some(NAVY.to_array()));
    assert_eq!(out.pixel(4, 24), Some(BG.to_array()));
    assert_eq!(out.pixel(32, 44), Some(BG.to_array()));
}

#[test]
fn border_surrounds_fill() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let mut node = panel(Rect::new(8.0, 8.0, 56.0, 40.0), BG);
    node.kind = DrawKind::Panel {
        fill: Rgba8Premul::opaque(255, 255, 255),
        radius: 4.0,
        border: Some((4.0, NAVY)),
    };
    let out = be.render_frame(&frame_with(vec![node]), &store()).unwrap();
    assert_eq!(out.pixel(32, 9), Some(NAVY.to_array()));
    assert_eq!(out.pixel(32, 24), Some([255, 255, 255, 255]));
}

#[test]
fn scale_shrinks_about_center() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let mut node = panel(Rect::new(16.0, 8.0, 48.0, 40.0), NAVY);
    node.scale = 0.5;
    let out = be.render_frame(&frame_with(vec![node]), &store()).unwrap();
    // Scaled box spans x 24..40, y 16..32.
    assert_eq!(out.pixel(32, 24), Some(NAVY.to_array()));
    assert_eq!(out.pixel(18, 24), Some(BG.to_array()));
    assert_eq!(out.pixel(32, 12), Some(BG.to_array()));
}

#[test]
fn zero_scale_or_opacity_draws_nothing() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let mut hidden = panel(Rect::new(0.0, 0.0, 64.0, 48.0), NAVY);
    hidden.scale = 0.0;
    let mut faded = panel(Rect::new(0.0, 0.0, 64.0, 48.0), NAVY);
    faded.opacity = 0.0;
    let out = be
        .render_frame(&frame_with(vec![hidden, faded]), &store())
        .unwrap();
    assert!(out.data.chunks_exact(4).all(|px| px == BG.to_array()));
}

#[test]
fn half_opacity_blends_with_background() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let mut node = panel(Rect::new(0.0, 0.0, 64.0, 48.0), Rgba8Premul::opaque(0, 0, 0));
    node.opacity = 0.5;
    let out = be.render_frame(&frame_with(vec![node]), &store()).unwrap();
    let px = out.pixel(32, 24).unwrap();
    assert!(close(px, [118, 118, 106, 255], 2), "{px:?}");
}

#[test]
fn image_node_draws_logo_pixels() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let node = DrawNode {
        rect: Rect::new(16.0, 8.0, 48.0, 40.0),
        scale: 1.0,
        opacity: 1.0,
        kind: DrawKind::Image { radius: 4.0 },
    };
    let out = be.render_frame(&frame_with(vec![node]), &store()).unwrap();
    assert!(close(out.pixel(32, 24).unwrap(), [200, 40, 40, 255], 1));
    assert_eq!(out.pixel(2, 2), Some(BG.to_array()));
}

#[test]
fn text_without_font_is_skipped() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let node = DrawNode {
        rect: Rect::new(0.0, 0.0, 64.0, 48.0),
        scale: 1.0,
        opacity: 1.0,
        kind: DrawKind::Text {
            text: "1234".to_owned(),
            role: FontRole::Bold,
            size_px: 20.0,
            color: NAVY,
        },
    };
    let out = be.render_frame(&frame_with(vec![node]), &store()).unwrap();
    assert!(out.data.chunks_exact(4).all(|px| px == BG.to_array()));
}

fn store_with_vendored_fonts() -> PreparedAssetStore {
    let fonts = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts");
    let tmp = std::env::temp_dir().join(format!("picas_video_cpu_fonts_{}", std::process::id()));
    std::fs::create_dir_all(&tmp).unwrap();
    for file in ["DejaVuSansMono.ttf", "DejaVuSansMono-Bold.ttf"] {
        std::fs::copy(fonts.join(file), tmp.join(file)).unwrap();
    }
    image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 40, 40, 255]))
        .save(tmp.join("logo.png"))
        .unwrap();

    let mut comp = crate::composition::video::picas_fijas_video().unwrap();
    comp.assets = crate::composition::model::AssetPaths {
        logo: "logo.png".to_owned(),
        font_regular: Some("DejaVuSansMono.ttf".to_owned()),
        font_bold: Some("DejaVuSansMono-Bold.ttf".to_owned()),
        font_emoji: None,
    };
    let store = PreparedAssetStore::prepare(&comp, &tmp).unwrap();
    std::fs::remove_dir_all(&tmp).ok();
    store
}

fn ink_pixels(out: &FrameRGBA) -> usize {
    out.data
        .chunks_exact(4)
        .filter(|px| *px != BG.to_array())
        .count()
}

#[test]
fn bold_text_draws_more_ink_than_regular() {
    let assets = store_with_vendored_fonts();
    let text_node = |role| DrawNode {
        rect: Rect::new(0.0, 0.0, 64.0, 48.0),
        scale: 1.0,
        opacity: 1.0,
        kind: DrawKind::Text {
            text: "8".to_owned(),
            role,
            size_px: 32.0,
            color: NAVY,
        },
    };

    let mut be = CpuBackend::new(RenderSettings::default());
    let regular = be
        .render_frame(&frame_with(vec![text_node(FontRole::Regular)]), &assets)
        .unwrap();
    let bold = be
        .render_frame(&frame_with(vec![text_node(FontRole::Bold)]), &assets)
        .unwrap();

    let (r, b) = (ink_pixels(&regular), ink_pixels(&bold));
    assert!(r > 0, "regular text drew nothing");
    assert!(b > r, "bold ink {b} should exceed regular ink {r}");
}

#[test]
fn backend_is_reusable_across_sizes() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let a = be.render_frame(&frame_with(vec![]), &store()).unwrap();
    let mut f = frame_with(vec![]);
    f.canvas = Canvas {
        width: 8,
        height: 6,
    };
    let b = be.render_frame(&f, &store()).unwrap();
    assert_eq!(b.data.len(), 8 * 6 * 4);
    let c = be.render_frame(&frame_with(vec![]), &store()).unwrap();
    assert_eq!(a, c);
}

#[test]
fn oversized_canvas_is_rejected() {
    let mut be = CpuBackend::new(RenderSettings::default());
    let mut f = frame_with(vec![]);
    f.canvas.width = 70_000;
    assert!(be.render_frame(&f, &store()).is_err());
}

#[test]
fn pixmap_rejects_wrong_length() {
    assert!(pixmap_from_premul_bytes(&[0; 12], 2, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 16], 2, 2).is_ok());
}
