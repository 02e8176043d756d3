//! The five scenes as pure functions of the local frame.
//!
//! Every scene splits into `params`, the animated values at a frame, and `tree`, the static
//! layout those values drive. Neither keeps state, so any frame can be produced in any order.

pub(crate) mod content;
pub(crate) mod cta;
pub(crate) mod explanation;
pub(crate) mod guess;
pub(crate) mod logo;
pub(crate) mod style;

use crate::{composition::model::SceneKind, foundation::core::Fps, layout::flex::Node};

pub use cta::CtaParams;
pub use explanation::ExplanationParams;
pub use guess::GuessParams;
pub use logo::LogoParams;

/// Time inputs of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneCtx {
    /// Frame relative to the scene start; negative before it.
    pub local: i64,
    /// Composition frame rate.
    pub fps: Fps,
}

impl SceneCtx {
    /// Context at `local` frames into a scene.
    pub fn new(local: i64, fps: Fps) -> Self {
        Self { local, fps }
    }

    pub(crate) fn frame(self) -> f64 {
        self.local as f64
    }

    /// Frames since `offset`, for animations that start later in the scene.
    pub(crate) fn since(self, offset: i64) -> f64 {
        (self.local - offset) as f64
    }
}

/// Animated values of whichever scene is on screen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "scene", rename_all = "snake_case")]
pub enum SceneParams {
    /// See [`SceneKind::Logo`].
    Logo(LogoParams),
    /// See [`SceneKind::Guess`].
    Guess(GuessParams),
    /// See [`SceneKind::BullExplanation`].
    BullExplanation(ExplanationParams),
    /// See [`SceneKind::CowExplanation`].
    CowExplanation(ExplanationParams),
    /// See [`SceneKind::CallToAction`].
    CallToAction(CtaParams),
}

impl SceneParams {
    /// Compute the animated values of `kind` at `ctx`.
    pub fn at(kind: SceneKind, ctx: SceneCtx) -> Self {
        match kind {
            SceneKind::Logo => Self::Logo(logo::params(ctx)),
            SceneKind::Guess => Self::Guess(guess::params(ctx)),
            SceneKind::BullExplanation => Self::BullExplanation(explanation::params(ctx)),
            SceneKind::CowExplanation => Self::CowExplanation(explanation::params(ctx)),
            SceneKind::CallToAction => Self::CallToAction(cta::params(ctx)),
        }
    }

    /// Scene these values belong to.
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Logo(_) => SceneKind::Logo,
            Self::Guess(_) => SceneKind::Guess,
            Self::BullExplanation(_) => SceneKind::BullExplanation,
            Self::CowExplanation(_) => SceneKind::CowExplanation,
            Self::CallToAction(_) => SceneKind::CallToAction,
        }
    }

    /// Layout tree drawn with these values.
    pub fn tree(&self) -> Node {
        match self {
            Self::Logo(p) => logo::tree(p),
            Self::Guess(p) => guess::tree(p),
            Self::BullExplanation(p) => explanation::tree(&explanation::BULL, p),
            Self::CowExplanation(p) => explanation::tree(&explanation::COW, p),
            Self::CallToAction(p) => cta::tree(p),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/mod.rs"]
mod tests;
