use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::encode::sink::{FrameSink, SinkConfig, ensure_parent_dir};
use crate::foundation::core::{FrameIndex, Rgba8Premul};
use crate::foundation::error::{VideoError, VideoResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Where and how [`FfmpegSink`] writes the MP4.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Destination `.mp4` file; missing parent directories are created.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`; when `false`, `begin` refuses to start.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Write to `out_path`, replacing any existing file.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// H.264 MP4 sink backed by a system `ffmpeg` process.
///
/// Frames are flattened onto the composition background (the video has no alpha channel) and
/// piped to `ffmpeg` as raw RGBA. Dropping the sink before `end` kills the encoder.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    started: Option<Started>,
}

struct Started {
    width: u32,
    height: u32,
    background: Rgba8Premul,
    last: Option<FrameIndex>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    /// Sink that encodes to `opts.out_path` once `begin` is called.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            started: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> VideoResult<()> {
        if self.encoder.is_some() {
            return Err(VideoError::encode("mp4 sink is already encoding"));
        }
        check_encodable(&cfg)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(VideoError::validation(format!(
                "'{}' already exists and overwriting is disabled",
                self.opts.out_path.display()
            )));
        }
        ensure_parent_dir(&self.opts.out_path)?;

        self.encoder = Some(Encoder::spawn(encoder_args(&cfg, &self.opts))?);
        self.started = Some(Started {
            width: cfg.width,
            height: cfg.height,
            background: cfg.background,
            last: None,
            opaque: vec![0; frame_len(cfg.width, cfg.height)],
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VideoResult<()> {
        let (Some(started), Some(encoder)) = (self.started.as_mut(), self.encoder.as_mut()) else {
            return Err(VideoError::encode("mp4 sink received a frame before begin"));
        };
        if started.last.is_some_and(|last| idx <= last) {
            return Err(VideoError::encode(format!(
                "mp4 frames must arrive in increasing order; got {} after {}",
                idx.0,
                started.last.map_or(0, |l| l.0)
            )));
        }
        if (frame.width, frame.height) != (started.width, started.height)
            || frame.data.len() != started.opaque.len()
        {
            return Err(VideoError::validation(format!(
                "frame {} is {}x{} ({} bytes) but the mp4 is {}x{}",
                idx.0,
                frame.width,
                frame.height,
                frame.data.len(),
                started.width,
                started.height
            )));
        }

        flatten_onto(started.background, &frame.data, &mut started.opaque);
        encoder.write(&started.opaque)?;
        started.last = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> VideoResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| VideoError::encode("mp4 sink ended before begin"))?;
        let frames = self.started.take().and_then(|s| s.last).map_or(0, |l| l.0 + 1);
        encoder.finish()?;
        debug!(out = %self.opts.out_path.display(), frames, "mp4 written");
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            warn!(
                out = %self.opts.out_path.display(),
                "mp4 sink dropped mid-encode; killing ffmpeg"
            );
            encoder.kill();
        }
    }
}

/// Running `ffmpeg` child with its stdin pipe and a thread collecting stderr.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<String>,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> VideoResult<Self> {
        debug!(?args, "spawning ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => VideoError::encode(
                    "mp4 output needs the `ffmpeg` binary on PATH, and none was found",
                ),
                _ => VideoError::encode(format!("could not start ffmpeg: {e}")),
            })?;

        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            child.kill().ok();
            return Err(VideoError::encode("ffmpeg started without piped stdio"));
        };
        // Only read for diagnostics; a failed read leaves whatever was collected.
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).ok();
            String::from_utf8_lossy(&buf).into_owned()
        });

        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> VideoResult<()> {
        self.stdin
            .write_all(bytes)
            .map_err(|e| VideoError::encode(format!("ffmpeg stopped accepting frames: {e}")))
    }

    fn finish(self) -> VideoResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
        } = self;
        // Closing stdin is ffmpeg's end-of-stream.
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| VideoError::encode(format!("lost track of ffmpeg: {e}")))?;
        let log = stderr.join().unwrap_or_default();
        if status.success() {
            return Ok(());
        }
        Err(VideoError::encode(format!(
            "ffmpeg failed ({status}): {}",
            last_lines(&log, 5)
        )))
    }

    fn kill(mut self) {
        self.child.kill().ok();
        self.child.wait().ok();
    }
}

fn frame_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * 4
}

fn check_encodable(cfg: &SinkConfig) -> VideoResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(VideoError::validation(format!(
            "cannot encode at {}/{} fps",
            cfg.fps.num, cfg.fps.den
        )));
    }
    if cfg.width == 0
        || cfg.height == 0
        || !cfg.width.is_multiple_of(2)
        || !cfg.height.is_multiple_of(2)
    {
        return Err(VideoError::validation(format!(
            "cannot encode a {}x{} canvas: yuv420p needs a non-zero even width and height",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Command line for raw RGBA on stdin to an H.264 `yuv420p` MP4 without audio.
fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-y",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    // Size and rate describe the raw input, so they go before `-i`.
    args.push("-video_size".into());
    args.push(format!("{}x{}", cfg.width, cfg.height).into());
    args.push("-framerate".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den).into());
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Composite premultiplied `src` over `background`, writing opaque pixels into `dst`.
pub(crate) fn flatten_onto(background: Rgba8Premul, src: &[u8], dst: &mut [u8]) {
    let bg = background.to_array().map(u16::from);
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let cover = 255 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], cover)).min(255) as u8;
        }
        d[3] = 255;
    }
}

fn last_lines(log: &str, n: usize) -> String {
    let lines: Vec<&str> = log.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join(" | ")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
