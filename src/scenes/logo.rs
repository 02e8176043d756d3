use crate::{
    animation::interpolate::interpolate_clamped,
    animation::spring::{SpringConfig, spring},
    foundation::core::Size,
    layout::flex::{FontRole, Node},
    scenes::{SceneCtx, content, style},
};

/// Logo intro values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogoParams {
    /// Spring pop of the logo from frame 0.
    pub logo_scale: f64,
    /// Title fade-in over frames 15..30.
    pub title_opacity: f64,
}

pub(crate) fn params(ctx: SceneCtx) -> LogoParams {
    LogoParams {
        logo_scale: spring(ctx.frame(), ctx.fps, SpringConfig::POP),
        title_opacity: interpolate_clamped(ctx.frame(), [15.0, 30.0], [0.0, 1.0]),
    }
}

pub(crate) fn tree(p: &LogoParams) -> Node {
    Node::column(
        40.0,
        vec![
            Node::image(Size::new(300.0, 300.0), 40.0).with_scale(p.logo_scale),
            Node::text(content::TITLE, FontRole::Bold, 64.0, style::INK)
                .with_opacity(p.title_opacity),
        ],
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/logo.rs"]
mod tests;
