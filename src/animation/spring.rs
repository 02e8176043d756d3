use crate::{
    foundation::core::Fps,
    foundation::error::{VideoError, VideoResult},
};

/// Physical parameters of a damped spring animating from 0 to 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    /// Damping coefficient; must be > 0.
    pub damping: f64,
    /// Spring stiffness; must be > 0.
    pub stiffness: f64,
    /// Mass of the simulated body; must be > 0.
    pub mass: f64,
    /// Cap the value at the target instead of overshooting.
    #[serde(default)]
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(10.0, 100.0)
    }
}

impl SpringConfig {
    /// Pop-in used for logos and highlighted digits.
    pub const POP: Self = Self::new(12.0, 100.0);
    /// Softer, bouncier pop used for the URL badge.
    pub const BADGE: Self = Self::new(10.0, 80.0);

    /// Unit-mass spring without overshoot clamping.
    pub const fn new(damping: f64, stiffness: f64) -> Self {
        Self {
            damping,
            stiffness,
            mass: 1.0,
            overshoot_clamping: false,
        }
    }

    /// Enable or disable overshoot clamping.
    pub const fn with_overshoot_clamping(mut self, on: bool) -> Self {
        self.overshoot_clamping = on;
        self
    }

    /// Reject non-finite or non-positive parameters.
    pub fn validate(&self) -> VideoResult<()> {
        for (name, v) in [
            ("damping", self.damping),
            ("stiffness", self.stiffness),
            ("mass", self.mass),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(VideoError::animation(format!(
                    "spring {name} must be finite and > 0 (got {v})"
                )));
            }
        }
        Ok(())
    }

    /// `damping / (2 * sqrt(stiffness * mass))`; below 1 the spring overshoots.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

#[derive(Clone, Copy, Debug)]
struct SpringState {
    current: f64,
    velocity: f64,
    last_ms: f64,
}

impl SpringState {
    const AT_REST: Self = Self {
        current: 0.0,
        velocity: 0.0,
        last_ms: 0.0,
    };
}

// Longest simulated step; slower frame rates advance the spring less per frame.
const MAX_STEP_MS: f64 = 64.0;
const TARGET: f64 = 1.0;

fn advance(state: SpringState, now_ms: f64, config: SpringConfig) -> SpringState {
    let dt_ms = (now_ms - state.last_ms).min(MAX_STEP_MS);
    let t = dt_ms / 1000.0;

    let c = config.damping;
    let m = config.mass;
    let k = config.stiffness;

    let v0 = -state.velocity;
    let x0 = TARGET - state.current;
    let zeta = c / (2.0 * (k * m).sqrt());
    let omega0 = (k / m).sqrt();

    let (current, velocity) = if zeta < 1.0 {
        let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
        let sin1 = (omega1 * t).sin();
        let cos1 = (omega1 * t).cos();
        let envelope = (-zeta * omega0 * t).exp();
        let a = (v0 + zeta * omega0 * x0) / omega1;
        let position = TARGET - envelope * (a * sin1 + x0 * cos1);
        let velocity = zeta * omega0 * envelope * (a * sin1 + x0 * cos1)
            - envelope * (cos1 * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin1);
        (position, velocity)
    } else {
        let envelope = (-omega0 * t).exp();
        let position = TARGET - envelope * (x0 + (v0 + omega0 * x0) * t);
        let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
        (position, velocity)
    };

    SpringState {
        current,
        velocity,
        last_ms: now_ms,
    }
}

fn frame_ms(frame: f64, fps: Fps) -> f64 {
    frame / fps.as_f64() * 1000.0
}

/// Sample a spring rising from 0 towards 1 at `frame`.
///
/// The oscillator is stepped once per whole frame (fractional frames advance by the remainder),
/// so the value at a frame is independent of which frames were sampled before. Negative and
/// non-finite frames sample frame 0, where the value is exactly 0. `config` is expected to pass
/// [`SpringConfig::validate`].
pub fn spring(frame: f64, fps: Fps, config: SpringConfig) -> f64 {
    debug_assert!(config.validate().is_ok(), "invalid spring config");

    let frame = if frame.is_finite() { frame.max(0.0) } else { 0.0 };
    let whole = frame.floor() as u64;
    let rest = frame - frame.floor();

    let mut state = SpringState::AT_REST;
    for f in 0..=whole {
        let at = if f == whole {
            f as f64 + rest
        } else {
            f as f64
        };
        state = advance(state, frame_ms(at, fps), config);
    }

    if config.overshoot_clamping {
        state.current.min(TARGET)
    } else {
        state.current
    }
}

/// Number of frames until the spring settles within `threshold` of its target for good.
///
/// A spring counts as settled at frame `n` when `n` and the following 20 frames all stay within
/// the threshold.
pub fn measure_spring(fps: Fps, config: SpringConfig, threshold: f64) -> VideoResult<u64> {
    const STABLE_FRAMES: u64 = 20;
    const MAX_FRAMES: u64 = 1_000_000;

    config.validate()?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(VideoError::animation(
            "spring settle threshold must be finite and > 0",
        ));
    }

    let mut state = advance(SpringState::AT_REST, 0.0, config);
    let mut settled_since: Option<u64> = None;
    for f in 0..MAX_FRAMES {
        if f > 0 {
            state = advance(state, frame_ms(f as f64, fps), config);
        }
        let value = if config.overshoot_clamping {
            state.current.min(TARGET)
        } else {
            state.current
        };

        if (value - TARGET).abs() < threshold {
            let since = *settled_since.get_or_insert(f);
            if f - since >= STABLE_FRAMES {
                return Ok(since);
            }
        } else {
            settled_since = None;
        }
    }

    Err(VideoError::animation(format!(
        "spring did not settle within {MAX_FRAMES} frames"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
