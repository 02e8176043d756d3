use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8Premul},
    foundation::error::{VideoError, VideoResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// The top-level renderable timeline.
///
/// A composition is pure data: it can be built with [`crate::CompositionBuilder`],
/// loaded from JSON, or taken as-is from [`crate::picas_fijas_video`]. Rendering goes
/// through [`crate::render_frame`] / [`crate::render_to_mp4`].
pub struct Composition {
    /// Stable composition identifier.
    pub id: String,
    /// Timeline frame rate.
    pub fps: Fps,
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Total composition duration in frames.
    pub duration: FrameIndex, // total frames
    /// Color painted behind every scene.
    pub background: Rgba8Premul,
    /// Font family requested for all text.
    pub font_family: String,
    /// Files the scenes draw from, relative to the assets root.
    pub assets: AssetPaths,
    /// Scene placements, ordered by start frame.
    pub sequences: Vec<Sequence>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One scene placed on the timeline.
pub struct Sequence {
    /// Identifier, unique within the composition.
    pub id: String,
    /// Which scene renderer drives this placement.
    pub scene: SceneKind,
    /// First global frame of the scene.
    pub from: FrameIndex,
    /// Number of frames the scene stays on screen.
    pub duration_frames: u64,
}

impl Sequence {
    /// Global frames covered by this sequence, `[from, from + duration_frames)`.
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: self.from,
            end: FrameIndex(self.from.0.saturating_add(self.duration_frames)),
        }
    }

    /// Frame relative to the sequence start; negative before it begins.
    pub fn local_frame(&self, frame: FrameIndex) -> i64 {
        frame.0 as i64 - self.from.0 as i64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// The five scenes of the video.
pub enum SceneKind {
    /// Logo pop-in with the game title.
    Logo,
    /// Secret code placeholder and the guess revealed digit by digit.
    Guess,
    /// A digit in the right place.
    BullExplanation,
    /// A digit present in the secret but misplaced.
    CowExplanation,
    /// Closing logo, tagline and URL badge.
    CallToAction,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Asset files relative to the assets root.
pub struct AssetPaths {
    /// Logo image (PNG, JPEG or SVG).
    pub logo: String,
    /// Regular-weight font file; system fonts are used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_regular: Option<String>,
    /// Bold-weight font file; falls back to the regular font.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<String>,
    /// Font providing emoji glyphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_emoji: Option<String>,
}

impl AssetPaths {
    /// Only a logo, fonts resolved from the system.
    pub fn logo_only(logo: impl Into<String>) -> Self {
        Self {
            logo: logo.into(),
            font_regular: None,
            font_bold: None,
            font_emoji: None,
        }
    }

    fn validate(&self) -> VideoResult<()> {
        validate_rel_source(&self.logo, "assets.logo")?;
        for (field, source) in [
            ("assets.font_regular", &self.font_regular),
            ("assets.font_bold", &self.font_bold),
            ("assets.font_emoji", &self.font_emoji),
        ] {
            if let Some(s) = source {
                validate_rel_source(s, field)?;
            }
        }
        Ok(())
    }
}

impl Composition {
    /// Validate timeline invariants and asset paths.
    pub fn validate(&self) -> VideoResult<()> {
        if self.id.trim().is_empty() {
            return Err(VideoError::validation("composition id must be non-empty"));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(VideoError::validation("fps must have num>0 and den>0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(VideoError::validation("canvas width/height must be > 0"));
        }
        if self.duration.0 == 0 {
            return Err(VideoError::validation("duration must be > 0 frames"));
        }
        if self.sequences.is_empty() {
            return Err(VideoError::validation(
                "composition must contain at least one sequence",
            ));
        }
        self.assets.validate()?;

        let mut ids = BTreeSet::new();
        for (i, seq) in self.sequences.iter().enumerate() {
            if seq.id.trim().is_empty() {
                return Err(VideoError::validation("sequence id must be non-empty"));
            }
            if !ids.insert(seq.id.as_str()) {
                return Err(VideoError::validation(format!(
                    "duplicate sequence id '{}'",
                    seq.id
                )));
            }
            if seq.duration_frames == 0 {
                return Err(VideoError::validation(format!(
                    "sequence '{}' must last at least one frame",
                    seq.id
                )));
            }
            if seq.range().end.0 > self.duration.0 {
                return Err(VideoError::validation(format!(
                    "sequence '{}' range exceeds composition duration",
                    seq.id
                )));
            }
            if let Some(p) = i.checked_sub(1).map(|j| &self.sequences[j])
                && seq.from.0 < p.from.0
            {
                return Err(VideoError::validation(format!(
                    "sequence '{}' starts before '{}'; sequences must be ordered by start",
                    seq.id, p.id
                )));
            }
            if let Some(other) = self.sequences[..i]
                .iter()
                .find(|other| other.range().overlaps(seq.range()))
            {
                return Err(VideoError::validation(format!(
                    "sequence '{}' overlaps '{}'",
                    seq.id, other.id
                )));
            }
        }

        Ok(())
    }

    /// The sequence on screen at `frame`, if any.
    pub fn sequence_at(&self, frame: FrameIndex) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.range().contains(frame))
    }

    /// Parse and validate a composition from JSON text.
    pub fn from_json_str(s: &str) -> VideoResult<Self> {
        let comp: Self = serde_json::from_str(s)
            .map_err(VideoError::serde("parse composition JSON"))?;
        comp.validate()?;
        Ok(comp)
    }

    /// Read, parse and validate a composition JSON file.
    pub fn from_path(path: &Path) -> VideoResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read composition '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON form.
    pub fn to_json_pretty(&self) -> VideoResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(VideoError::serde("serialize composition"))
    }
}

fn validate_rel_source(source: &str, field: &str) -> VideoResult<()> {
    if source.trim().is_empty() {
        return Err(VideoError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(VideoError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(VideoError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
