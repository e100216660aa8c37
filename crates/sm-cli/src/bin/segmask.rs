use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use segmask::trace::Connectivity;
use segmask::{Color, Dims, SegmentationStack};
use segmask::{
    JobSummary, MaskJobConfig, MaskPolicy, io, load_inputs, run_mask_job, validate_inputs,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "segmask")]
#[command(about = "Restrict a segmentation stack to a traced boundary and vectorize the result")]
struct Cli {
    /// Log debug messages (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mask a label stack with a boundary model.
    #[command(name = "mask")]
    Mask(MaskArgs),
    /// Convert between JSON models and point listings.
    #[command(name = "convert")]
    Convert(ConvertArgs),
}

#[derive(Args, Debug, Clone)]
struct MaskArgs {
    /// Boundary model (`.json`, or a `.txt` point listing).
    boundary: PathBuf,
    /// Directory of label images, one per slice.
    stack: PathBuf,
    /// Output directory.
    #[arg(long, default_value = ".")]
    output: PathBuf,
    /// Job parameters as JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Color for all output objects, `R,G,B` in [0, 1].
    #[arg(long)]
    color: Option<Color>,
    /// Name for all output objects.
    #[arg(long)]
    name: Option<String>,
    /// Drop objects with this many contours or fewer (0 disables).
    #[arg(long)]
    filter_by_n_contours: Option<usize>,
    /// Point-shaving tolerance in pixels (0 disables).
    #[arg(long)]
    shave_tolerance: Option<f32>,
    /// Gaussian sigma for smoothing before tracing (0 disables).
    #[arg(long)]
    smooth_sigma: Option<f32>,
    /// Use 4-connectivity for regions instead of 8.
    #[arg(long)]
    four_connected: bool,
    #[arg(long)]
    merge_all: bool,
    /// Fill missing boundary slices before masking.
    #[arg(long)]
    run_interpolation: bool,
    /// Mesh the output and split it by 3-D connectivity.
    #[arg(long)]
    run_postprocessing: bool,
    /// Largest boundary gap to interpolate across.
    #[arg(long)]
    slices_to_skip_cell: Option<usize>,
    /// Empty slices bridged when meshing the output.
    #[arg(long)]
    slices_to_skip_organelle: Option<usize>,
    /// Mask with each boundary object separately.
    #[arg(long)]
    per_object: bool,
    /// Also write the result as a point listing.
    #[arg(long)]
    point_list: bool,
    /// Also write the post-processing mesh as binary STL.
    #[arg(long)]
    mesh_stl: bool,
}

#[derive(Args, Debug, Clone)]
struct ConvertArgs {
    input: PathBuf,
    output: PathBuf,
    /// Stack size `X,Y,Z`, needed when reading a point listing.
    #[arg(long, value_parser = parse_dims)]
    dims: Option<Dims>,
}

#[derive(Debug, Serialize)]
struct SummaryFile<'a> {
    boundary: &'a Path,
    stack: &'a Path,
    dims: [usize; 3],
    config: &'a MaskJobConfig,
    #[serde(flatten)]
    summary: &'a JobSummary,
    objects_written: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.cmd {
        Command::Mask(args) => run_mask(args),
        Command::Convert(args) => run_convert(args),
    }
}

fn run_mask(args: MaskArgs) -> Result<()> {
    if !args.output.is_dir() {
        bail!("output directory {} does not exist", args.output.display());
    }
    let cfg = build_config(&args)?;

    let (boundary, stack) = load_inputs(&args.boundary, &args.stack).with_context(|| {
        format!(
            "loading {} and {}",
            args.boundary.display(),
            args.stack.display()
        )
    })?;
    validate_inputs(&boundary, &stack).context("checking inputs")?;
    cfg.validate(stack.dims()).context("checking options")?;

    let out = run_mask_job(&boundary, &stack, &cfg)?;

    let stem = args
        .boundary
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("boundary");
    let out_path = |ext: &str| args.output.join(format!("{stem}_masked.{ext}"));

    let model_path = out_path("json");
    io::write_model(&model_path, &out.model)?;
    log::info!("wrote {}", model_path.display());

    if args.point_list {
        let path = out_path("txt");
        io::save_point_list(&path, &out.model)?;
        log::info!("wrote {}", path.display());
    }
    if args.mesh_stl {
        match &out.mesh {
            Some(mesh) => {
                let path = out_path("stl");
                io::write_stl(&path, mesh, "segmask")?;
                log::info!("wrote {}", path.display());
            }
            None => log::warn!("--mesh-stl needs --run-postprocessing, no mesh written"),
        }
    }

    write_summary(&out_path("summary.json"), &args, &stack, &cfg, &out)
}

fn build_config(args: &MaskArgs) -> Result<MaskJobConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => MaskJobConfig::default(),
    };

    if let Some(color) = args.color {
        cfg.assemble.color = Some(color);
    }
    if let Some(name) = &args.name {
        cfg.assemble.name = Some(name.clone());
    }
    if let Some(n) = args.filter_by_n_contours {
        cfg.assemble.filter_contours = n;
    }
    if let Some(t) = args.shave_tolerance {
        cfg.trace.shave_tolerance = t;
    }
    if let Some(s) = args.smooth_sigma {
        cfg.trace.smooth_sigma = s;
    }
    if args.four_connected {
        cfg.trace.connectivity = Connectivity::C4;
    }
    if let Some(k) = args.slices_to_skip_cell {
        cfg.interpolate.max_skip = k;
    }
    if let Some(k) = args.slices_to_skip_organelle {
        cfg.mesh.skip_slices = k;
    }
    cfg.assemble.merge_all |= args.merge_all;
    cfg.run_interpolation |= args.run_interpolation;
    cfg.run_postprocessing |= args.run_postprocessing;
    if args.per_object {
        cfg.mask_policy = MaskPolicy::PerObject;
    }

    for (name, v) in [
        ("shave tolerance", cfg.trace.shave_tolerance),
        ("smoothing sigma", cfg.trace.smooth_sigma),
    ] {
        if !v.is_finite() || v < 0.0 {
            bail!("{name} must be a finite non-negative number, got {v}");
        }
    }
    Ok(cfg)
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let model = io::read_any_model(&args.input, args.dims)?;
    io::write_any_model(&args.output, &model)?;
    log::info!(
        "converted {} object(s) from {} to {}",
        model.num_objects(),
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

fn write_summary(
    path: &Path,
    args: &MaskArgs,
    stack: &SegmentationStack,
    cfg: &MaskJobConfig,
    out: &segmask::MaskJobOutput,
) -> Result<()> {
    let d = stack.dims();
    let summary = SummaryFile {
        boundary: &args.boundary,
        stack: &args.stack,
        dims: [d.x, d.y, d.z],
        config: cfg,
        summary: &out.summary,
        objects_written: out.model.num_objects(),
    };

    let mut file = fs::File::create(path)
        .with_context(|| format!("creating summary {}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, &summary)?;
    writeln!(file)?;
    Ok(())
}

fn parse_dims(s: &str) -> Result<Dims, String> {
    let parts: Vec<usize> = s
        .split(',')
        .map(|p| p.trim().parse::<usize>().map_err(|_| format!("'{p}' is not a size")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Dims::new(*x, *y, *z)),
        _ => Err(format!("expected X,Y,Z, got '{s}'")),
    }
}
