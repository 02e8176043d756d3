use crate::{
    animation::interpolate::interpolate_clamped,
    animation::spring::{SpringConfig, spring},
    foundation::core::Size,
    layout::flex::{DrawKind, FontRole, Node, text_box},
    scenes::content::{self, Language, language_at},
    scenes::{SceneCtx, style},
};

const URL_PX: f64 = 52.0;
const BADGE_PADDING: Size = Size::new(32.0, 16.0);
const BADGE_BORDER: f64 = 4.0;

/// Call-to-action values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CtaParams {
    /// Spring pop of the logo from frame 0.
    pub logo_scale: f64,
    /// Tagline fade-in over frames 15..30.
    pub tagline_opacity: f64,
    /// Bouncier spring pop of the URL badge from frame 30.
    pub url_scale: f64,
    /// Tagline language, alternating every 20 frames from the start.
    pub language: Language,
}

pub(crate) fn params(ctx: SceneCtx) -> CtaParams {
    CtaParams {
        logo_scale: spring(ctx.frame(), ctx.fps, SpringConfig::POP),
        tagline_opacity: interpolate_clamped(ctx.frame(), [15.0, 30.0], [0.0, 1.0]),
        url_scale: spring(ctx.since(30), ctx.fps, SpringConfig::BADGE),
        language: language_at(ctx.local, 20, None),
    }
}

fn badge(scale: f64) -> Node {
    let text = text_box(content::URL, URL_PX);
    let size = Size::new(
        text.width + 2.0 * (BADGE_PADDING.width + BADGE_BORDER),
        text.height + 2.0 * (BADGE_PADDING.height + BADGE_BORDER),
    );
    Node::text(content::URL, FontRole::Bold, URL_PX, style::NAVY)
        .with_size(size)
        .with_backdrop(DrawKind::Panel {
            fill: style::CREAM,
            radius: 16.0,
            border: Some((BADGE_BORDER, style::NAVY)),
        })
        .with_scale(scale)
}

pub(crate) fn tree(p: &CtaParams) -> Node {
    Node::column(
        60.0,
        vec![
            Node::image(Size::new(200.0, 200.0), 30.0).with_scale(p.logo_scale),
            Node::text(
                content::CTA_TAGLINE.get(p.language),
                FontRole::Bold,
                64.0,
                style::INK,
            )
            .with_opacity(p.tagline_opacity),
            badge(p.url_scale),
        ],
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/cta.rs"]
mod tests;
