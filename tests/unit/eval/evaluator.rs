use super::*;
use crate::composition::video::picas_fijas_video;
use crate::scenes::{CtaParams, GuessParams};

#[test]
fn maps_global_frame_to_local_scene_frame() {
    let comp = picas_fijas_video().unwrap();
    for (frame, id, local) in [
        (0, "logo", 0),
        (29, "logo", 29),
        (30, "guess", 0),
        (89, "guess", 59),
        (90, "bull", 0),
        (165, "cow", 15),
        (299, "cta", 89),
    ] {
        let ev = Evaluator::eval_frame(&comp, FrameIndex(frame)).unwrap();
        let scene = ev.scene.unwrap();
        assert_eq!((scene.id.as_str(), scene.local_frame), (id, local), "frame {frame}");
        assert_eq!(scene.params.kind(), scene.kind);
    }
}

#[test]
fn scene_params_follow_local_frame() {
    let comp = picas_fijas_video().unwrap();
    let ev = Evaluator::eval_frame(&comp, FrameIndex(80)).unwrap();
    assert_eq!(
        ev.scene.unwrap().params,
        SceneParams::Guess(GuessParams {
            secret_opacity: 1.0,
            visible_digits: 4,
        })
    );

    let ev = Evaluator::eval_frame(&comp, FrameIndex(225)).unwrap();
    let SceneParams::CallToAction(CtaParams {
        url_scale,
        tagline_opacity,
        ..
    }) = ev.scene.unwrap().params
    else {
        panic!("expected call to action");
    };
    assert_eq!(url_scale, 0.0);
    assert_eq!(tagline_opacity, 0.0);
}

#[test]
fn rejects_out_of_bounds_frames() {
    let comp = picas_fijas_video().unwrap();
    let err = Evaluator::eval_frame(&comp, FrameIndex(300)).unwrap_err();
    assert!(matches!(err, VideoError::Evaluation(_)));
}

#[test]
fn rejects_invalid_composition() {
    let mut comp = picas_fijas_video().unwrap();
    comp.sequences[1].from = FrameIndex(10);
    let err = Evaluator::eval_frame(&comp, FrameIndex(0)).unwrap_err();
    assert!(matches!(err, VideoError::Validation(_)));
}

#[test]
fn gaps_evaluate_to_background_only() {
    let mut comp = picas_fijas_video().unwrap();
    comp.sequences.truncate(1);
    let ev = Evaluator::eval_frame(&comp, FrameIndex(100)).unwrap();
    assert!(ev.scene.is_none());
    assert_eq!(ev.background, comp.background);
}
