use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "picas-video", version, about = "Render the Picas y Fijas explainer video")]
struct Cli {
    /// Composition JSON; defaults to the built-in Picas y Fijas video.
    #[arg(long, global = true)]
    comp: Option<PathBuf>,

    /// Directory holding the logo and optional font files.
    #[arg(long, global = true, default_value = "public")]
    assets: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a frame range as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the evaluated frame (scene, animated values, draw nodes) as JSON.
    Eval(EvalArgs),
    /// Print the composition as JSON.
    Comp,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render over a transparent background instead of the composition background.
    #[arg(long)]
    transparent: bool,

    /// Print diagnostics about font resolution (family, origin, SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    threading: ThreadingArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Refuse to replace an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Print diagnostics about font resolution (family, origin, SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    threading: ThreadingArgs,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive); defaults to the composition duration.
    #[arg(long)]
    end: Option<u64>,
}

#[derive(Args, Debug)]
struct ThreadingArgs {
    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Enable static-frame elision within chunks (parallel mode only).
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

impl RangeArgs {
    fn resolve(&self, comp: &picas_video::Composition) -> anyhow::Result<picas_video::FrameRange> {
        let end = self.end.unwrap_or(comp.duration.0);
        Ok(picas_video::FrameRange::new(
            picas_video::FrameIndex(self.start),
            picas_video::FrameIndex(end),
        )?)
    }
}

impl From<&ThreadingArgs> for picas_video::RenderThreading {
    fn from(args: &ThreadingArgs) -> Self {
        Self {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
            static_frame_elision: args.static_frame_elision,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let comp = load_comp(cli.comp.as_deref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(&comp, &cli.assets, args),
        Command::Frames(args) => cmd_frames(&comp, &cli.assets, args),
        Command::Render(args) => cmd_render(&comp, &cli.assets, args),
        Command::Eval(args) => cmd_eval(&comp, args),
        Command::Comp => {
            println!("{}", comp.to_json_pretty()?);
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,picas_video=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_comp(path: Option<&Path>) -> anyhow::Result<picas_video::Composition> {
    let comp = match path {
        Some(path) => picas_video::Composition::from_path(path)?,
        None => picas_video::picas_fijas_video()?,
    };
    Ok(comp)
}

fn prepare_assets(
    comp: &picas_video::Composition,
    root: &Path,
    dump_fonts: bool,
) -> anyhow::Result<picas_video::PreparedAssetStore> {
    let assets = picas_video::PreparedAssetStore::prepare(comp, root)
        .with_context(|| format!("prepare assets from '{}'", root.display()))?;
    if dump_fonts {
        dump_font_diagnostics(&assets);
    }
    Ok(assets)
}

fn cmd_frame(comp: &picas_video::Composition, root: &Path, args: FrameArgs) -> anyhow::Result<()> {
    let settings = picas_video::RenderSettings {
        clear_rgba: args.transparent.then_some([0, 0, 0, 0]),
    };
    let mut backend = picas_video::create_backend(picas_video::BackendKind::Cpu, &settings)?;
    let assets = prepare_assets(comp, root, args.dump_fonts)?;

    let frame = picas_video::render_frame(
        comp,
        picas_video::FrameIndex(args.frame),
        backend.as_mut(),
        &assets,
    )?;

    picas_video::ensure_parent_dir(&args.out)?;
    picas_video::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(
    comp: &picas_video::Composition,
    root: &Path,
    args: FramesArgs,
) -> anyhow::Result<()> {
    let mut backend = picas_video::create_backend(
        picas_video::BackendKind::Cpu,
        &picas_video::RenderSettings::default(),
    )?;
    let assets = prepare_assets(comp, root, false)?;
    let range = args.range.resolve(comp)?;

    let mut sink = picas_video::PngSequenceSink::new(&args.out_dir);
    let stats = picas_video::render_range(
        comp,
        range,
        backend.as_mut(),
        &assets,
        &(&args.threading).into(),
        &mut sink,
    )?;

    eprintln!(
        "wrote {} frames to {} ({} rendered, {} elided)",
        stats.frames_total,
        args.out_dir.display(),
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_render(
    comp: &picas_video::Composition,
    root: &Path,
    args: RenderArgs,
) -> anyhow::Result<()> {
    let mut backend = picas_video::create_backend(
        picas_video::BackendKind::Cpu,
        &picas_video::RenderSettings::default(),
    )?;
    let assets = prepare_assets(comp, root, args.dump_fonts)?;

    let opts = picas_video::RenderToMp4Opts {
        range: Some(args.range.resolve(comp)?),
        overwrite: !args.no_overwrite,
        threading: (&args.threading).into(),
    };
    let stats = picas_video::render_to_mp4(comp, &args.out, opts, backend.as_mut(), &assets)?;

    eprintln!(
        "wrote {} ({} frames, {} rendered, {} elided)",
        args.out.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_eval(comp: &picas_video::Composition, args: EvalArgs) -> anyhow::Result<()> {
    let eval = picas_video::Evaluator::eval_frame(comp, picas_video::FrameIndex(args.frame))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&eval).context("serialize evaluated frame")?
    );
    Ok(())
}

fn dump_font_diagnostics(assets: &picas_video::PreparedAssetStore) {
    eprintln!("font diagnostics:");
    for (name, role) in [
        ("regular", picas_video::FontRole::Regular),
        ("bold", picas_video::FontRole::Bold),
        ("emoji", picas_video::FontRole::Emoji),
    ] {
        eprintln!("  {name}:");
        match assets.font(role) {
            Some(font) => {
                let origin = match &font.origin {
                    picas_video::FontOrigin::File(path) => format!("file {path}"),
                    picas_video::FontOrigin::System(path) => format!("system {path}"),
                };
                eprintln!("    family:  {}", font.family);
                eprintln!("    origin:  {origin}");
                eprintln!("    sha256:  {}", sha256_hex(&font.bytes));
            }
            None => eprintln!("    (none)"),
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
