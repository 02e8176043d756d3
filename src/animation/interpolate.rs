use crate::{
    animation::ease::Ease,
    foundation::error::{VideoError, VideoResult},
};

/// Behaviour of [`interpolate`] outside the input range on one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Extrapolate {
    /// Continue the outermost segment linearly.
    #[default]
    Extend,
    /// Hold the boundary output value.
    Clamp,
    /// Return the input unchanged.
    Identity,
}

/// Options for [`interpolate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InterpolateOpts {
    /// Curve applied inside each segment.
    pub easing: Ease,
    /// Extrapolation below the first input breakpoint.
    pub left: Extrapolate,
    /// Extrapolation above the last input breakpoint.
    pub right: Extrapolate,
}

impl InterpolateOpts {
    /// Linear, clamped on both sides.
    pub const CLAMP: Self = Self {
        easing: Ease::Linear,
        left: Extrapolate::Clamp,
        right: Extrapolate::Clamp,
    };

    /// Replace the easing curve.
    pub fn with_easing(mut self, easing: Ease) -> Self {
        self.easing = easing;
        self
    }
}

/// Map `input` from `input_range` onto `output_range` piecewise-linearly.
///
/// Both ranges must have the same length (at least 2), `input_range` must be strictly increasing
/// and every value must be finite. The easing curve shapes the position inside a segment; values
/// reached through [`Extrapolate::Extend`] continue the segment linearly.
pub fn interpolate(
    input: f64,
    input_range: &[f64],
    output_range: &[f64],
    opts: InterpolateOpts,
) -> VideoResult<f64> {
    validate_ranges(input_range, output_range)?;
    if !input.is_finite() {
        return Err(VideoError::animation("interpolate input must be finite"));
    }

    let seg = find_segment(input_range, input);
    Ok(interpolate_segment(
        input,
        [input_range[seg], input_range[seg + 1]],
        [output_range[seg], output_range[seg + 1]],
        opts,
    ))
}

/// Two-point linear interpolation clamped on both sides.
///
/// Inputs at or below `from[0]` yield exactly `to[0]`; inputs at or above `from[1]` yield exactly
/// `to[1]`. A degenerate range (`from[1] <= from[0]`) behaves as a step at `from[0]`.
pub fn interpolate_clamped(input: f64, from: [f64; 2], to: [f64; 2]) -> f64 {
    let [a, b] = from;
    if b <= a {
        return if input < a { to[0] } else { to[1] };
    }
    interpolate_segment(input, from, to, InterpolateOpts::CLAMP)
}

fn interpolate_segment(input: f64, from: [f64; 2], to: [f64; 2], opts: InterpolateOpts) -> f64 {
    let [a, b] = from;
    let [v0, v1] = to;

    let mut x = input;
    if x < a {
        match opts.left {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = a,
            Extrapolate::Extend => {}
        }
    }
    if x > b {
        match opts.right {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = b,
            Extrapolate::Extend => {}
        }
    }

    if v0 == v1 {
        return v0;
    }

    let t = (x - a) / (b - a);
    let t = if (0.0..=1.0).contains(&t) {
        opts.easing.apply(t)
    } else {
        t
    };
    v0 + t * (v1 - v0)
}

fn find_segment(input_range: &[f64], input: f64) -> usize {
    let last_seg = input_range.len() - 2;
    input_range[1..]
        .iter()
        .position(|&bp| bp >= input)
        .unwrap_or(last_seg)
        .min(last_seg)
}

fn validate_ranges(input_range: &[f64], output_range: &[f64]) -> VideoResult<()> {
    if input_range.len() != output_range.len() {
        return Err(VideoError::animation(format!(
            "interpolate ranges must have equal length (input {}, output {})",
            input_range.len(),
            output_range.len()
        )));
    }
    if input_range.len() < 2 {
        return Err(VideoError::animation(
            "interpolate ranges must have at least 2 entries",
        ));
    }
    if input_range
        .iter()
        .chain(output_range)
        .any(|v| !v.is_finite())
    {
        return Err(VideoError::animation(
            "interpolate ranges must contain only finite values",
        ));
    }
    if input_range.windows(2).any(|w| w[1] <= w[0]) {
        return Err(VideoError::animation(
            "interpolate input range must be strictly increasing",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
