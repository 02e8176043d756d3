use crate::{
    animation::interpolate::interpolate_clamped,
    animation::spring::{SpringConfig, spring},
    foundation::core::{Rgba8Premul, Size},
    layout::flex::{DrawKind, FontRole, LINE_HEIGHT_EM, MONO_ADVANCE_EM, Node},
    scenes::content::{self, Bilingual, Language, language_at},
    scenes::{SceneCtx, style},
};

const TILE: Size = Size::new(80.0, 90.0);
const TILE_TEXT_PX: f64 = 72.0;
const HEADLINE_PX: f64 = 56.0;

/// What distinguishes the bull scene from the cow scene.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExplanationSpec {
    pub(crate) secret_highlight: usize,
    pub(crate) guess_highlight: usize,
    pub(crate) accent: Rgba8Premul,
    pub(crate) emoji: &'static str,
    pub(crate) headline: Bilingual,
    pub(crate) caption: Bilingual,
}

/// Same digit in the same position.
pub(crate) const BULL: ExplanationSpec = ExplanationSpec {
    secret_highlight: 0,
    guess_highlight: 0,
    accent: style::NAVY,
    emoji: content::BULL_EMOJI,
    headline: content::BULL_HEADLINE,
    caption: content::BULL_CAPTION,
};

/// Same digit in another position.
pub(crate) const COW: ExplanationSpec = ExplanationSpec {
    secret_highlight: 3,
    guess_highlight: 1,
    accent: style::CORAL,
    emoji: content::COW_EMOJI,
    headline: content::COW_HEADLINE,
    caption: content::COW_CAPTION,
};

/// Values shared by both rule explanations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExplanationParams {
    /// Whole-scene fade-in over frames 0..15.
    pub content_opacity: f64,
    /// Spring pop of the highlighted tiles from frame 15.
    pub highlight_scale: f64,
    /// Headline and caption fade-in over frames 30..45.
    pub caption_opacity: f64,
    /// Caption language, alternating every 15 frames once past frame 45.
    pub language: Language,
}

pub(crate) fn params(ctx: SceneCtx) -> ExplanationParams {
    ExplanationParams {
        content_opacity: interpolate_clamped(ctx.frame(), [0.0, 15.0], [0.0, 1.0]),
        highlight_scale: spring(ctx.since(15), ctx.fps, SpringConfig::POP),
        caption_opacity: interpolate_clamped(ctx.frame(), [30.0, 45.0], [0.0, 1.0]),
        language: language_at(ctx.local, 15, Some(45)),
    }
}

fn code_row(
    code: &str,
    color: Rgba8Premul,
    highlight: usize,
    spec: &ExplanationSpec,
    scale: f64,
) -> Node {
    let tiles = code
        .chars()
        .enumerate()
        .map(|(i, d)| {
            let text = d.to_string();
            if i == highlight {
                Node::text(text, FontRole::Bold, TILE_TEXT_PX, style::CREAM)
                    .with_size(TILE)
                    .with_backdrop(DrawKind::Panel {
                        fill: spec.accent,
                        radius: 12.0,
                        border: None,
                    })
                    .with_scale(scale)
            } else {
                Node::text(text, FontRole::Bold, TILE_TEXT_PX, color).with_size(TILE)
            }
        })
        .collect();
    Node::row(16.0, tiles)
}

fn labelled(label: &str, row: Node) -> Node {
    Node::column(
        20.0,
        vec![Node::text(label, FontRole::Regular, 32.0, style::INK), row],
    )
}

pub(crate) fn tree(spec: &ExplanationSpec, p: &ExplanationParams) -> Node {
    let secret = code_row(
        content::SECRET,
        style::NAVY,
        spec.secret_highlight,
        spec,
        p.highlight_scale,
    );
    let guess = code_row(
        content::GUESS,
        style::CORAL,
        spec.guess_highlight,
        spec,
        p.highlight_scale,
    );

    // Emoji glyphs are about one em wide; the gap stands in for the separating space.
    let headline = Node::row(
        HEADLINE_PX * MONO_ADVANCE_EM,
        vec![
            Node::text(spec.emoji, FontRole::Emoji, HEADLINE_PX, spec.accent)
                .with_size(Size::new(HEADLINE_PX, HEADLINE_PX * LINE_HEIGHT_EM)),
            Node::text(
                spec.headline.get(p.language),
                FontRole::Bold,
                HEADLINE_PX,
                spec.accent,
            ),
        ],
    );
    let caption = Node::column(
        16.0,
        vec![
            headline,
            Node::text(
                spec.caption.get(p.language),
                FontRole::Regular,
                28.0,
                style::STEEL,
            ),
        ],
    )
    .with_opacity(p.caption_opacity);

    Node::column(
        60.0,
        vec![
            labelled(content::SECRET_LABEL, secret),
            labelled(content::GUESS_LABEL, guess),
            caption,
        ],
    )
    .with_opacity(p.content_opacity)
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/explanation.rs"]
mod tests;
