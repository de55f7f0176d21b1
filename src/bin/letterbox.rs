use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "letterbox", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch configured sources and normalize everything (requires `yt-dlp`
    /// and `ffmpeg` on PATH for video posts).
    Run(RunArgs),
    /// Normalize an existing folder of media files.
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Options JSON file.
    #[arg(long, default_value = "options.json")]
    config: PathBuf,

    /// Root folder for the downloaded/ and standardized/ trees.
    #[arg(long, default_value = "data")]
    data_root: PathBuf,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Folder of source media files.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Destination folder (created if absent).
    #[arg(long)]
    out_dir: PathBuf,

    /// Target shape.
    #[arg(long, value_enum, default_value_t = MethodChoice::AspectRatio)]
    method: MethodChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodChoice {
    AspectRatio,
    Square,
}

impl MethodChoice {
    fn method(self) -> letterbox::Method {
        match self {
            MethodChoice::AspectRatio => letterbox::Method::AspectRatio,
            MethodChoice::Square => letterbox::Method::Square,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Normalize(args) => cmd_normalize(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let options = letterbox::Options::load(&args.config)
        .with_context(|| format!("load options '{}'", args.config.display()))?;

    for tool in ["yt-dlp", "ffmpeg", "ffprobe"] {
        if !letterbox::tool::is_on_path(tool) {
            eprintln!("warning: {tool} not found on PATH; video assets will fail");
        }
    }

    let pipeline = letterbox::AcquisitionPipeline::new(options)?;
    let summary = pipeline.run(&args.data_root)?;

    eprintln!(
        "normalized {} file(s), {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let policy = args.method.method().policy();
    let summary = letterbox::normalize_folder(&args.in_dir, &args.out_dir, policy)?;

    eprintln!(
        "normalized {} file(s), {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );
    Ok(())
}
