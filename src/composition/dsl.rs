use crate::{
    composition::model::{AssetPaths, Composition, SceneKind, Sequence},
    foundation::core::{Canvas, Fps, FrameIndex, Rgba8Premul},
    foundation::error::VideoResult,
};

/// Builder for [`Composition`](crate::Composition).
pub struct CompositionBuilder {
    id: String,
    fps: Fps,
    canvas: Canvas,
    duration: FrameIndex,
    background: Rgba8Premul,
    font_family: String,
    assets: AssetPaths,
    sequences: Vec<Sequence>,
}

impl CompositionBuilder {
    /// Create a builder for a new composition.
    pub fn new(id: impl Into<String>, fps: Fps, canvas: Canvas, duration: FrameIndex) -> Self {
        Self {
            id: id.into(),
            fps,
            canvas,
            duration,
            background: Rgba8Premul::opaque(255, 255, 255),
            font_family: "monospace".to_owned(),
            assets: AssetPaths::logo_only("logo.png"),
            sequences: Vec::new(),
        }
    }

    /// Set the background color.
    pub fn background(mut self, color: Rgba8Premul) -> Self {
        self.background = color;
        self
    }

    /// Set the font family requested for text.
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set asset file paths.
    pub fn assets(mut self, assets: AssetPaths) -> Self {
        self.assets = assets;
        self
    }

    /// Place a scene at an explicit start frame.
    pub fn sequence(
        mut self,
        id: impl Into<String>,
        scene: SceneKind,
        from: FrameIndex,
        duration_frames: u64,
    ) -> Self {
        self.sequences.push(Sequence {
            id: id.into(),
            scene,
            from,
            duration_frames,
        });
        self
    }

    /// Place a scene right after the last one added.
    pub fn then(self, id: impl Into<String>, scene: SceneKind, duration_frames: u64) -> Self {
        let from = self
            .sequences
            .last()
            .map_or(FrameIndex(0), |s| s.range().end);
        self.sequence(id, scene, from, duration_frames)
    }

    /// Build and validate final [`Composition`](crate::Composition).
    pub fn build(self) -> VideoResult<Composition> {
        let comp = Composition {
            id: self.id,
            fps: self.fps,
            canvas: self.canvas,
            duration: self.duration,
            background: self.background,
            font_family: self.font_family,
            assets: self.assets,
            sequences: self.sequences,
        };
        comp.validate()?;
        Ok(comp)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
