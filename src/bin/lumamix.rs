use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use lumamix::{
    CpuEffectChain, DefaultProducerFactory, Fps, Frame, ParamFamily, Position, Profile,
    StillSource, TransitionConfig, plugin,
};

#[derive(Parser, Debug)]
#[command(name = "lumamix", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one transition frame between two images as a PNG.
    Frame(FrameArgs),
    /// Print the effect parameters derived for one position as JSON.
    Params(ParamsArgs),
}

#[derive(Args, Debug)]
struct TransitionArgs {
    /// Position inside the transition (0-based).
    #[arg(long)]
    position: Position,

    /// Transition length in frames.
    #[arg(long)]
    length: Position,

    /// Wipe softness, a number or keyframe string such as `0=0;-1=0.5`.
    #[arg(long, default_value = "0")]
    softness: String,

    /// Swap which input fades in.
    #[arg(long)]
    reverse: bool,

    /// Invert the pattern mask.
    #[arg(long)]
    invert: bool,
}

impl TransitionArgs {
    fn config(&self, resource: Option<String>) -> anyhow::Result<TransitionConfig> {
        anyhow::ensure!(self.length > 0, "--length must be > 0");
        let mut config = TransitionConfig {
            resource,
            reverse: self.reverse,
            invert: self.invert,
            in_point: 0,
            out_point: self.length - 1,
            ..Default::default()
        };
        config
            .set("softness", &self.softness)
            .context("parse --softness")?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// First (outgoing) image.
    #[arg(long)]
    a: PathBuf,

    /// Second (incoming) image.
    #[arg(long)]
    b: PathBuf,

    /// Pattern image path or generated wipe (`wipe:ltr`, `wipe:ttb`, ...).
    #[arg(long)]
    resource: Option<String>,

    /// Profile frame rate.
    #[arg(long, default_value_t = 25)]
    fps: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    transition: TransitionArgs,
}

#[derive(Args, Debug)]
struct ParamsArgs {
    /// Derive the three-input (pattern) family instead of the cross-fade.
    #[arg(long)]
    pattern: bool,

    #[command(flatten)]
    transition: TransitionArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Params(args) => cmd_params(args),
    }
}

fn read_rgba(path: &Path) -> anyhow::Result<Arc<image::RgbaImage>> {
    let img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    Ok(Arc::new(img.to_rgba8()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = args.transition.config(args.resource.clone())?;
    let a = read_rgba(&args.a)?;
    let b = read_rgba(&args.b)?;

    let fps = Fps::new(args.fps, 1)?;
    let profile = Profile::new(a.width(), a.height(), fps)?;
    let chain = Arc::new(CpuEffectChain::new());
    let ctx = plugin::PluginContext {
        effect_chain: Some(chain.clone()),
        producers: Arc::new(DefaultProducerFactory::new()),
    };
    let transition = plugin::transition_luma_init(
        &profile,
        plugin::ServiceType::Transition,
        plugin::LUMA_TRANSITION_ID,
        args.resource.as_deref(),
        &ctx,
    )
    .context("luma transition is unavailable")?;
    transition.configure(config)?;

    let position = args.transition.position;
    let a_frame = Frame::with_source(position, StillSource::new(a));
    let b_frame = Frame::with_source(position, StillSource::new(b));
    let mut out_frame = transition.process(a_frame, b_frame);

    let out = chain
        .render(&mut out_frame)
        .context("render transition frame")?;
    out.save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    Ok(())
}

fn cmd_params(args: ParamsArgs) -> anyhow::Result<()> {
    let config = args.transition.config(None)?;
    let timing = config.timing(args.transition.position, None);
    let softness = config.softness.sample(timing.position, timing.length);
    let family = if args.pattern {
        ParamFamily::luma_mix(timing.mix, config.reverse, softness, config.invert)
    } else {
        ParamFamily::mix(timing.mix, config.reverse)
    };

    let out = serde_json::json!({
        "position": timing.position,
        "length": timing.length,
        "mix": timing.mix,
        "effect": family.variant(),
        "params": family,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
