use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    assets::store::PreparedAssetStore,
    composition::model::Composition,
    encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts},
    encode::sink::{FrameSink, InMemorySink, SinkConfig},
    eval::evaluator::{EvaluatedFrame, Evaluator},
    eval::fingerprint::{FrameFingerprint, fingerprint_eval},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{VideoError, VideoResult},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    render::cpu::CpuBackend,
};

/// Evaluate and render a single frame.
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels.
pub fn render_frame(
    comp: &Composition,
    frame: FrameIndex,
    backend: &mut dyn RenderBackend,
    assets: &PreparedAssetStore,
) -> VideoResult<FrameRGBA> {
    let eval = Evaluator::eval_frame(comp, frame)?;
    backend.render_frame(&eval, assets)
}

/// Render a range of frames (inclusive start, exclusive end) into memory.
pub fn render_frames(
    comp: &Composition,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    assets: &PreparedAssetStore,
) -> VideoResult<Vec<FrameRGBA>> {
    render_frames_with_stats(comp, range, backend, assets, &RenderThreading::default())
        .map(|(frames, _)| frames)
}

#[derive(Clone, Debug)]
/// Threading and chunking controls for multi-frame rendering.
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Render each distinct frame once per chunk, reusing it for identical frames.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames that were actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused via static-frame elision.
    pub frames_elided: u64,
}

impl RenderStats {
    fn add(&mut self, other: RenderStats) {
        self.frames_total += other.frames_total;
        self.frames_rendered += other.frames_rendered;
        self.frames_elided += other.frames_elided;
    }
}

/// Render a frame range into memory and return both frame data and rendering stats.
pub fn render_frames_with_stats(
    comp: &Composition,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    assets: &PreparedAssetStore,
    threading: &RenderThreading,
) -> VideoResult<(Vec<FrameRGBA>, RenderStats)> {
    let mut sink = InMemorySink::new();
    let stats = render_range(comp, range, backend, assets, threading, &mut sink)?;
    let frames = sink.into_frames().into_iter().map(|(_, f)| f).collect();
    Ok((frames, stats))
}

/// Render `range` and stream every frame, in timeline order, into `sink`.
///
/// The sink sees `begin`, one `push_frame` per frame with strictly increasing indices, then
/// `end`. Parallel rendering keeps this order; only rasterization of a chunk is parallel.
#[tracing::instrument(skip(comp, backend, assets, threading, sink), fields(comp = %comp.id))]
pub fn render_range(
    comp: &Composition,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    assets: &PreparedAssetStore,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> VideoResult<RenderStats> {
    comp.validate()?;
    if range.is_empty() {
        return Err(VideoError::validation("render range must be non-empty"));
    }
    if range.end.0 > comp.duration.0 {
        return Err(VideoError::validation(format!(
            "render range end {} exceeds composition duration {}",
            range.end.0, comp.duration.0
        )));
    }

    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let parallel = if threading.parallel {
        let settings = backend.worker_render_settings().ok_or_else(|| {
            VideoError::evaluation("parallel render requires backend worker settings support")
        })?;
        Some((settings, build_thread_pool(threading.threads)?))
    } else {
        None
    };

    sink.begin(SinkConfig {
        width: comp.canvas.width,
        height: comp.canvas.height,
        fps: comp.fps,
        background: comp.background,
    })?;

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        let evals = eval_chunk(comp, chunk)?;

        let chunk_out = match &parallel {
            Some((settings, pool)) => {
                render_chunk_parallel_cpu(&evals, assets, settings, threading, pool)?
            }
            None => render_chunk_sequential(&evals, backend, assets)?,
        };

        for (offset, &u) in chunk_out.frame_to_unique.iter().enumerate() {
            let frame = chunk_out.unique_frames.get(u).ok_or_else(|| {
                VideoError::evaluation("internal error: unique frame index out of range")
            })?;
            sink.push_frame(FrameIndex(chunk_start + offset as u64), frame)?;
        }

        debug!(
            start = chunk_start,
            end = chunk_end,
            rendered = chunk_out.stats.frames_rendered,
            "chunk rendered"
        );
        stats.add(chunk_out.stats);
        chunk_start = chunk_end;
    }

    sink.end()?;
    info!(
        frames_total = stats.frames_total,
        frames_rendered = stats.frames_rendered,
        frames_elided = stats.frames_elided,
        "render finished"
    );
    Ok(stats)
}

/// Options for [`render_to_mp4`].
#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    /// Frame range to render (start inclusive, end exclusive). `None` renders the whole video.
    pub range: Option<FrameRange>,
    /// Whether to overwrite `out_path` if it already exists.
    pub overwrite: bool,
    /// Render threading/chunking configuration.
    pub threading: RenderThreading,
}

impl Default for RenderToMp4Opts {
    fn default() -> Self {
        Self {
            range: None,
            overwrite: true,
            threading: RenderThreading::default(),
        }
    }
}

/// Render a composition to an MP4 by invoking the system `ffmpeg` binary.
///
/// Frames are flattened onto the composition background. `ffmpeg` must be on `PATH`; it is
/// started before the first frame is rendered.
pub fn render_to_mp4(
    comp: &Composition,
    out_path: impl Into<std::path::PathBuf>,
    opts: RenderToMp4Opts,
    backend: &mut dyn RenderBackend,
    assets: &PreparedAssetStore,
) -> VideoResult<RenderStats> {
    let range = match opts.range {
        Some(range) => range,
        None => FrameRange::new(FrameIndex(0), comp.duration)?,
    };
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: out_path.into(),
        overwrite: opts.overwrite,
    });
    render_range(comp, range, backend, assets, &opts.threading, &mut sink)
}

fn eval_chunk(comp: &Composition, range: FrameRange) -> VideoResult<Vec<EvaluatedFrame>> {
    (range.start.0..range.end.0)
        .map(|f| Evaluator::eval_frame_unchecked(comp, FrameIndex(f)))
        .collect()
}

struct ChunkOut {
    unique_frames: Vec<FrameRGBA>,
    frame_to_unique: Vec<usize>,
    stats: RenderStats,
}

fn render_chunk_sequential(
    evals: &[EvaluatedFrame],
    backend: &mut dyn RenderBackend,
    assets: &PreparedAssetStore,
) -> VideoResult<ChunkOut> {
    let unique_frames = evals
        .iter()
        .map(|eval| backend.render_frame(eval, assets))
        .collect::<VideoResult<Vec<_>>>()?;
    let total = evals.len() as u64;
    Ok(ChunkOut {
        frame_to_unique: (0..unique_frames.len()).collect(),
        unique_frames,
        stats: RenderStats {
            frames_total: total,
            frames_rendered: total,
            frames_elided: 0,
        },
    })
}

fn render_chunk_parallel_cpu(
    evals: &[EvaluatedFrame],
    assets: &PreparedAssetStore,
    settings: &RenderSettings,
    threading: &RenderThreading,
    pool: &rayon::ThreadPool,
) -> VideoResult<ChunkOut> {
    let (unique_indices, frame_to_unique) = if threading.static_frame_elision {
        dedupe_by_fingerprint(evals)
    } else {
        ((0..evals.len()).collect(), (0..evals.len()).collect())
    };

    let rendered = pool.install(|| {
        unique_indices
            .par_iter()
            .map_init(
                || CpuBackend::new(settings.clone()),
                |worker_backend, eval_idx| worker_backend.render_frame(&evals[*eval_idx], assets),
            )
            .collect::<Vec<_>>()
    });
    let unique_frames = rendered.into_iter().collect::<VideoResult<Vec<_>>>()?;

    let total = evals.len() as u64;
    let rendered_count = unique_indices.len() as u64;
    Ok(ChunkOut {
        unique_frames,
        frame_to_unique,
        stats: RenderStats {
            frames_total: total,
            frames_rendered: rendered_count,
            frames_elided: total.saturating_sub(rendered_count),
        },
    })
}

fn dedupe_by_fingerprint(evals: &[EvaluatedFrame]) -> (Vec<usize>, Vec<usize>) {
    let mut unique_indices = Vec::with_capacity(evals.len());
    let mut frame_to_unique = Vec::with_capacity(evals.len());
    let mut first = HashMap::<FrameFingerprint, usize>::new();
    for (idx, eval) in evals.iter().enumerate() {
        let slot = *first.entry(fingerprint_eval(eval)).or_insert_with(|| {
            unique_indices.push(idx);
            unique_indices.len() - 1
        });
        frame_to_unique.push(slot);
    }
    (unique_indices, frame_to_unique)
}

fn build_thread_pool(threads: Option<usize>) -> VideoResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(VideoError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| VideoError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
