use clap::{Parser, Subcommand};
use pptx_builder::builder::{self, SlideRecord};
use pptx_builder::config::{self, BuilderConfig};
use pptx_builder::imaging::RustBackend;
use pptx_builder::pdf::PdftoppmRasterizer;
use pptx_builder::{PlacementMode, SlideSpec, collect, output};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Inputs plus everything that decides how they become slides.
#[derive(clap::Args, Clone)]
struct SlideArgs {
    /// Images, PDFs, or folders of images, in slide order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Slide size preset (16x9, 4x3, letter, a4, legal, tabloid) or "auto"
    #[arg(long, conflicts_with_all = ["width", "height"])]
    size: Option<String>,

    /// Custom slide width in inches
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Custom slide height in inches
    #[arg(long, requires = "width")]
    height: Option<f64>,

    /// fit = letterbox, fill = crop to cover
    #[arg(long)]
    mode: Option<PlacementMode>,

    /// Resolution PDF pages are rendered at (72-1200)
    #[arg(long)]
    dpi: Option<u32>,

    /// Keep rendered PDF pages here instead of a temporary directory
    #[arg(long)]
    work_dir: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "pptx-builder")]
#[command(about = "Turn PDFs and images into a slide deck, one image per slide")]
#[command(long_about = "\
Turn PDFs and images into a slide deck, one image per slide

Inputs are taken in the order given:

  photo.jpg          one slide
  report.pdf         one slide per page, rendered with pdftoppm
  scans/             one slide per image directly inside, sorted by name

Placement:
  fit    whole image visible, centered, letterboxed
  fill   slide fully covered, overflow cropped from the center

Settings are read from ./pptx-builder.toml when present; flags win.
Run 'pptx-builder gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./pptx-builder.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log per-slide detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a .pptx from the inputs
    Build {
        #[command(flatten)]
        slides: SlideArgs,

        /// Output .pptx path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show the slide layout without writing a presentation
    Plan {
        #[command(flatten)]
        slides: SlideArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List slide size presets
    Sizes,
    /// Print a stock pptx-builder.toml with all options documented
    GenConfig,
}

/// Machine-readable `plan --json` output.
#[derive(Serialize)]
struct PlanReport<'a> {
    slide: SlideSpec,
    mode: PlacementMode,
    slides: &'a [SlideRecord],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build { slides, output } => {
            let config = load_config(cli.config.as_deref(), &slides)?;
            let slide = collect::resolve_slide_size(config.slides.size_choice()?, &slides.inputs)?;
            let work = WorkDir::new(slides.work_dir.as_deref())?;

            let images = collect_images(&config, &slides.inputs, work.path())?;
            let artifact = builder::build_presentation(
                &images,
                &output,
                slide.width_in,
                slide.height_in,
                config.slides.mode,
            )?;
            output::print_build_summary(&artifact);
        }
        Command::Plan { slides, json } => {
            let config = load_config(cli.config.as_deref(), &slides)?;
            let slide = collect::resolve_slide_size(config.slides.size_choice()?, &slides.inputs)?;
            let work = WorkDir::new(slides.work_dir.as_deref())?;

            let images = collect_images(&config, &slides.inputs, work.path())?;
            let mode = config.slides.mode;
            let records = builder::plan_records(&RustBackend::new(), &images, slide, mode)?;
            if json {
                let report = PlanReport {
                    slide,
                    mode,
                    slides: &records,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_inputs(&images);
                println!();
                output::print_plan(&records, slide, mode);
            }
        }
        Command::Sizes => output::print_presets(),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for `plan --json`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,pptx_builder=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file first, then command-line overrides, then validation.
fn load_config(
    explicit: Option<&Path>,
    args: &SlideArgs,
) -> Result<BuilderConfig, config::ConfigError> {
    let mut config = match explicit {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(Path::new("."))?,
    };

    if let Some(size) = &args.size {
        config.slides.size = size.clone();
        config.slides.width = None;
        config.slides.height = None;
    }
    if let (Some(width), Some(height)) = (args.width, args.height) {
        config.slides.width = Some(width);
        config.slides.height = Some(height);
    }
    if let Some(mode) = args.mode {
        config.slides.mode = mode;
    }
    if let Some(dpi) = args.dpi {
        config.pdf.dpi = dpi;
    }

    config.validate()?;
    Ok(config)
}

fn collect_images(
    config: &BuilderConfig,
    inputs: &[PathBuf],
    work_dir: &Path,
) -> Result<Vec<PathBuf>, collect::CollectError> {
    let rasterizer = PdftoppmRasterizer::new(config.pdf.pdftoppm.clone());
    collect::collect_inputs_with(&rasterizer, inputs, config.pdf.dpi, work_dir)
}

/// Where rendered PDF pages live for the duration of one command.
///
/// A scoped directory is removed on drop; a user-supplied one is kept.
enum WorkDir {
    Scoped(TempDir),
    Kept(PathBuf),
}

impl WorkDir {
    fn new(requested: Option<&Path>) -> std::io::Result<Self> {
        match requested {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                debug!(dir = %dir.display(), "using work directory");
                Ok(Self::Kept(dir.to_path_buf()))
            }
            None => Ok(Self::Scoped(
                tempfile::Builder::new().prefix("pptx-builder-").tempdir()?,
            )),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Scoped(dir) => dir.path(),
            Self::Kept(dir) => dir,
        }
    }
}
