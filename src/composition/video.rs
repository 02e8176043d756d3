use crate::{
    composition::dsl::CompositionBuilder,
    composition::model::{AssetPaths, Composition, SceneKind},
    foundation::core::{Canvas, Fps, FrameIndex},
    foundation::error::VideoResult,
    scenes::style,
};

/// Identifier the video is registered under.
pub const COMPOSITION_ID: &str = "PicasFijasVideo";
/// 10 seconds at 30 fps.
pub const DURATION_FRAMES: u64 = 300;
/// Output frame rate.
pub const FPS: Fps = Fps::whole(30);
/// Portrait 1080x1920.
pub const CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

/// The Picas y Fijas rules explainer: five scenes laid end to end.
pub fn picas_fijas_video() -> VideoResult<Composition> {
    CompositionBuilder::new(COMPOSITION_ID, FPS, CANVAS, FrameIndex(DURATION_FRAMES))
        .background(style::CREAM)
        .font_family(style::FONT_FAMILY)
        .assets(AssetPaths::logo_only("icon-512.png"))
        .then("logo", SceneKind::Logo, 30)
        .then("guess", SceneKind::Guess, 60)
        .then("bull", SceneKind::BullExplanation, 60)
        .then("cow", SceneKind::CowExplanation, 60)
        .then("cta", SceneKind::CallToAction, 90)
        .build()
}

#[cfg(test)]
#[path = "../../tests/unit/composition/video.rs"]
mod tests;
