use crate::{
    composition::model::{Composition, SceneKind},
    foundation::core::{Canvas, FrameIndex, Rgba8Premul},
    foundation::error::{VideoError, VideoResult},
    layout::flex::{DrawNode, layout},
    scenes::{SceneCtx, SceneParams},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Everything needed to draw one frame.
pub struct EvaluatedFrame {
    /// Evaluated frame index.
    pub frame: FrameIndex,
    /// Output canvas.
    pub canvas: Canvas,
    /// Background painted under the scene.
    pub background: Rgba8Premul,
    /// Scene on screen, `None` when the frame falls between sequences.
    pub scene: Option<EvaluatedScene>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// The active sequence at a frame.
pub struct EvaluatedScene {
    /// Sequence identifier.
    pub id: String,
    /// Scene renderer.
    pub kind: SceneKind,
    /// Frame relative to the sequence start.
    pub local_frame: u64,
    /// Animated values at `local_frame`.
    pub params: SceneParams,
    /// Laid-out paint operations in painter's order.
    pub nodes: Vec<DrawNode>,
}

/// Stateless evaluator from composition timeline to drawable frame.
pub struct Evaluator;

impl Evaluator {
    #[tracing::instrument(skip(comp))]
    /// Validate `comp` and evaluate one frame.
    pub fn eval_frame(comp: &Composition, frame: FrameIndex) -> VideoResult<EvaluatedFrame> {
        comp.validate()?;
        Self::eval_frame_unchecked(comp, frame)
    }

    /// Evaluate a frame of a composition already known to be valid.
    pub(crate) fn eval_frame_unchecked(
        comp: &Composition,
        frame: FrameIndex,
    ) -> VideoResult<EvaluatedFrame> {
        if frame.0 >= comp.duration.0 {
            return Err(VideoError::evaluation(format!(
                "frame {} is out of bounds (duration {})",
                frame.0, comp.duration.0
            )));
        }

        let scene = comp.sequence_at(frame).map(|seq| {
            let local = frame.0 - seq.from.0;
            let params = SceneParams::at(seq.scene, SceneCtx::new(local as i64, comp.fps));
            let nodes = layout(&params.tree(), comp.canvas);
            EvaluatedScene {
                id: seq.id.clone(),
                kind: seq.scene,
                local_frame: local,
                params,
                nodes,
            }
        });

        Ok(EvaluatedFrame {
            frame,
            canvas: comp.canvas,
            background: comp.background,
            scene,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
