//! Programmatic renderer for the Picas y Fijas rules explainer video.
//!
//! The video is a fixed [`Composition`] of five scenes (logo, guess, bull rule, cow rule, call
//! to action) at 30 fps on a 1080x1920 canvas. Every frame is a pure function of its index:
//!
//! - [`Evaluator::eval_frame`] resolves the active scene, its animated values and a laid-out list
//!   of [`DrawNode`]s
//! - a [`RenderBackend`] (the `vello_cpu` based [`CpuBackend`]) turns that into premultiplied
//!   RGBA8 pixels
//! - [`render_range`] streams frames into a [`FrameSink`]; [`render_to_mp4`] drives the system
//!   `ffmpeg` through [`FfmpegSink`]
//!
//! The animation helpers [`interpolate`], [`interpolate_clamped`] and [`spring`] are usable on
//! their own.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod composition;
mod encode;
mod eval;
mod foundation;
mod layout;
mod render;
mod scenes;

pub use crate::foundation::core::{
    Affine, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Size, Vec2,
    scale_about,
};
pub use crate::foundation::error::{VideoError, VideoResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::interpolate::{
    Extrapolate, InterpolateOpts, interpolate, interpolate_clamped,
};
pub use crate::animation::spring::{SpringConfig, measure_spring, spring};

pub use crate::composition::dsl::CompositionBuilder;
pub use crate::composition::model::{AssetPaths, Composition, SceneKind, Sequence};
pub use crate::composition::video::{
    CANVAS, COMPOSITION_ID, DURATION_FRAMES, FPS, picas_fijas_video,
};

pub use crate::scenes::content::{Bilingual, GUESS, Language, SECRET, language_at};
pub use crate::scenes::{
    CtaParams, ExplanationParams, GuessParams, LogoParams, SceneCtx, SceneParams,
};

pub use crate::layout::flex::{
    Axis, DrawKind, DrawNode, FontRole, LINE_HEIGHT_EM, Leaf, MONO_ADVANCE_EM, Node, Stack,
    layout, text_box,
};

pub use crate::eval::evaluator::{EvaluatedFrame, EvaluatedScene, Evaluator};
pub use crate::eval::fingerprint::{FrameFingerprint, fingerprint_eval};

pub use crate::assets::decode::{PreparedImage, SVG_RASTER_PX, decode_image, decode_svg};
pub use crate::assets::store::{
    FontOrigin, PreparedAssetStore, PreparedFont, TextBrushRgba8, TextLayoutEngine,
    normalize_rel_path,
};

pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{
    RenderStats, RenderThreading, RenderToMp4Opts, render_frame, render_frames,
    render_frames_with_stats, render_range, render_to_mp4,
};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{
    FrameSink, InMemorySink, PngSequenceSink, SinkConfig, ensure_parent_dir, write_png,
};
