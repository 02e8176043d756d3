use crate::{
    animation::interpolate::interpolate_clamped,
    foundation::core::{Rgba8Premul, Size},
    layout::flex::{FontRole, LINE_HEIGHT_EM, Node},
    scenes::{SceneCtx, content, style},
};

const DIGIT_PX: f64 = 80.0;

/// Guess reveal values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GuessParams {
    /// Fade-in of the secret placeholder and both labels over frames 0..15.
    pub secret_opacity: f64,
    /// Guess digits shown so far, 0 through 4 across frames 20..50.
    pub visible_digits: u32,
}

pub(crate) fn params(ctx: SceneCtx) -> GuessParams {
    let digits = content::GUESS.chars().count() as f64;
    GuessParams {
        secret_opacity: interpolate_clamped(ctx.frame(), [0.0, 15.0], [0.0, 1.0]),
        visible_digits: interpolate_clamped(ctx.frame(), [20.0, 50.0], [0.0, digits]).floor()
            as u32,
    }
}

fn digit(text: &str, color: Rgba8Premul) -> Node {
    Node::text(text, FontRole::Bold, DIGIT_PX, color)
        .with_size(Size::new(DIGIT_PX, DIGIT_PX * LINE_HEIGHT_EM))
}

pub(crate) fn tree(p: &GuessParams) -> Node {
    let hidden = (0..content::SECRET.chars().count())
        .map(|_| digit(content::HIDDEN_DIGIT, style::NAVY))
        .collect();
    let revealed = content::GUESS
        .chars()
        .enumerate()
        .map(|(i, d)| {
            let shown = (i as u32) < p.visible_digits;
            digit(&d.to_string(), style::CORAL).with_opacity(if shown { 1.0 } else { 0.0 })
        })
        .collect();

    Node::column(
        80.0,
        vec![
            Node::column(
                20.0,
                vec![
                    Node::text(content::SECRET_LABEL, FontRole::Regular, 36.0, style::INK),
                    Node::row(20.0, hidden),
                ],
            )
            .with_opacity(p.secret_opacity),
            Node::column(
                20.0,
                vec![
                    Node::text(content::GUESS_LABEL, FontRole::Regular, 36.0, style::INK)
                        .with_opacity(p.secret_opacity),
                    Node::row(20.0, revealed),
                ],
            ),
        ],
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/guess.rs"]
mod tests;
