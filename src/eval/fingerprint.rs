use crate::{
    eval::evaluator::EvaluatedFrame,
    foundation::math::Fnv1a64,
    layout::flex::{DrawKind, FontRole},
};

/// 128-bit digest of what a frame looks like.
///
/// The frame index, scene id and local frame are left out, so two frames that draw the same
/// nodes share a fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    /// First 64-bit lane.
    pub hi: u64,
    /// Second 64-bit lane.
    pub lo: u64,
}

/// Fingerprint an evaluated frame.
pub fn fingerprint_eval(eval: &EvaluatedFrame) -> FrameFingerprint {
    let mut a = Fnv1a64::new_default();
    let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);

    write_u64_pair(&mut a, &mut b, u64::from(eval.canvas.width));
    write_u64_pair(&mut a, &mut b, u64::from(eval.canvas.height));
    for c in eval.background.to_array() {
        write_u8_pair(&mut a, &mut b, c);
    }

    let nodes = eval.scene.as_ref().map_or(&[][..], |s| &s.nodes[..]);
    write_u64_pair(&mut a, &mut b, nodes.len() as u64);
    for node in nodes {
        for c in [
            node.rect.x0,
            node.rect.y0,
            node.rect.x1,
            node.rect.y1,
            node.scale,
            node.opacity,
        ] {
            write_f64_pair(&mut a, &mut b, c);
        }
        match &node.kind {
            DrawKind::Panel {
                fill,
                radius,
                border,
            } => {
                write_u8_pair(&mut a, &mut b, 0);
                for c in fill.to_array() {
                    write_u8_pair(&mut a, &mut b, c);
                }
                write_f64_pair(&mut a, &mut b, *radius);
                match border {
                    Some((w, color)) => {
                        write_u8_pair(&mut a, &mut b, 1);
                        write_f64_pair(&mut a, &mut b, *w);
                        for c in color.to_array() {
                            write_u8_pair(&mut a, &mut b, c);
                        }
                    }
                    None => write_u8_pair(&mut a, &mut b, 0),
                }
            }
            DrawKind::Image { radius } => {
                write_u8_pair(&mut a, &mut b, 1);
                write_f64_pair(&mut a, &mut b, *radius);
            }
            DrawKind::Text {
                text,
                role,
                size_px,
                color,
            } => {
                write_u8_pair(&mut a, &mut b, 2);
                write_str_pair(&mut a, &mut b, text);
                write_u8_pair(
                    &mut a,
                    &mut b,
                    match role {
                        FontRole::Regular => 0,
                        FontRole::Bold => 1,
                        FontRole::Emoji => 2,
                    },
                );
                write_f64_pair(&mut a, &mut b, *size_px);
                for c in color.to_array() {
                    write_u8_pair(&mut a, &mut b, c);
                }
            }
        }
    }

    FrameFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_f64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: f64) {
    // -0.0 and 0.0 draw the same.
    let v = if v == 0.0 { 0.0 } else { v };
    write_u64_pair(a, b, v.to_bits());
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
