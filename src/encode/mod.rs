//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are driven by [`crate::render_range`].

pub(crate) mod ffmpeg;
pub(crate) mod sink;
