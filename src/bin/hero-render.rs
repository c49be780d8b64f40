use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hero-render", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the compiled pipeline for a scene.
    Graph(GraphArgs),
    /// Execute a scene against the recording renderer and print every renderer call.
    Trace(TraceArgs),
    /// Rewrite a scene preset in the normalized layout.
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
struct SceneInput {
    /// Scene preset JSON (legacy or normalized).
    #[arg(long)]
    scene: PathBuf,

    /// Primitive palette JSON. Without it a fallback palette is derived from the scene colors.
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Theme used for the fallback palette.
    #[arg(long, value_enum, default_value_t = ThemeChoice::Light)]
    theme: ThemeChoice,
}

#[derive(Parser, Debug)]
struct GraphArgs {
    #[command(flatten)]
    input: SceneInput,

    /// Also print the pipeline fingerprint.
    #[arg(long)]
    fingerprint: bool,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    #[command(flatten)]
    input: SceneInput,

    /// Preview scale in (0, 1].
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Number of frames to execute; later frames show cache reuse.
    #[arg(long, default_value_t = 1)]
    frames: u32,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Scene preset JSON (legacy or normalized).
    #[arg(long)]
    scene: PathBuf,

    /// Output path for the normalized preset.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Graph(args) => cmd_graph(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Normalize(args) => cmd_normalize(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<hero_render::SceneConfig> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let cfg = hero_render::SceneConfig::from_reader(BufReader::new(f))
        .with_context(|| format!("load scene '{}'", path.display()))?;
    Ok(cfg)
}

fn load_input(
    input: &SceneInput,
) -> anyhow::Result<(hero_render::SceneConfig, hero_render::PrimitivePalette)> {
    let cfg = read_scene_json(&input.scene)?;
    let palette = match &input.palette {
        Some(path) => hero_render::PrimitivePalette::from_path(path)
            .with_context(|| format!("load palette '{}'", path.display()))?,
        None => {
            let theme = match input.theme {
                ThemeChoice::Light => hero_render::Theme::Light,
                ThemeChoice::Dark => hero_render::Theme::Dark,
            };
            hero_render::PrimitivePalette::fallback(&cfg.colors, theme)
        }
    };
    Ok((cfg, palette))
}

fn cmd_graph(args: GraphArgs) -> anyhow::Result<()> {
    let (cfg, palette) = load_input(&args.input)?;
    let pipeline = hero_render::build_pipeline(&cfg, &palette).context("build pipeline")?;
    print!("{}", pipeline.dump());
    if args.fingerprint {
        println!("fingerprint {:016x}", pipeline.fingerprint());
    }
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let (cfg, palette) = load_input(&args.input)?;
    let opts = hero_render::RenderOptions::with_scale(args.scale);
    let renderer = hero_render::RecordingRenderer::new(cfg.viewport);
    let mut session = hero_render::RenderSession::new(renderer);

    for frame in 0..args.frames.max(1) {
        let stats = session
            .render(&cfg, &palette, &opts)
            .with_context(|| format!("render frame {frame}"))?;
        println!(
            "# frame {frame}: nodes={} renders={} cache_hits={} effects={} dual={}",
            stats.nodes_executed,
            stats.renders,
            stats.cache_hits,
            stats.effect_passes,
            stats.dual_passes
        );
        print!("{}", session.renderer().log());
        session.renderer_mut().clear_calls();
    }

    let renderer = session.dispose();
    print!("{}", renderer.log());
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let cfg = read_scene_json(&args.scene)?;
    let json = cfg.to_json_string().context("serialize scene")?;
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json + "\n")
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
