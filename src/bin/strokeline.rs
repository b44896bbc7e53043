use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use strokeline::RasterImage as _;

#[derive(Parser, Debug)]
#[command(name = "strokeline", version)]
struct Cli {
    /// Log pipeline progress at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace a silhouette and write cells, loops and strokes as JSON.
    Trace(TraceArgs),
    /// Write a debug PNG coloring each cell and its boundary loops.
    Cells(CellsArgs),
    /// Render the stroke reveal as numbered PNG frames.
    Reveal(RevealArgs),
    /// Print the bucket assignment of `distribute` as JSON.
    Distribute(DistributeArgs),
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input silhouette image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional hint image choosing stroke starts, directions and groups.
    #[arg(long)]
    hint: Option<PathBuf>,

    /// Trace options JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Synthesize boundary loops in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Step budget for each loop's path search.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_search_steps: Option<u64>,

    /// Memoize cells and boundary loops in this directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CellsArgs {
    /// Input silhouette image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RevealChoice {
    Serial,
    Parallel,
}

#[derive(Parser, Debug)]
struct RevealArgs {
    /// Input silhouette image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional hint image.
    #[arg(long)]
    hint: Option<PathBuf>,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Reveal strokes one after another or all at once.
    #[arg(long, value_enum, default_value_t = RevealChoice::Parallel)]
    mode: RevealChoice,

    /// Frame count for parallel mode (default: longest stroke).
    #[arg(long)]
    frames: Option<usize>,
}

#[derive(Parser, Debug)]
struct DistributeArgs {
    /// Number of items.
    #[arg(long)]
    items: usize,

    /// Number of buckets.
    #[arg(long)]
    buckets: usize,

    /// Maximum items per bucket.
    #[arg(long)]
    limit: Option<usize>,

    /// Treat the items as a cycle.
    #[arg(long)]
    cyclic: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Trace(args) => cmd_trace(args),
        Command::Cells(args) => cmd_cells(args),
        Command::Reveal(args) => cmd_reveal(args),
        Command::Distribute(args) => cmd_distribute(args),
    }
}

fn load_hint(path: Option<&Path>) -> anyhow::Result<Option<image::RgbaImage>> {
    path.map(|p| strokeline::load_rgba(p).with_context(|| format!("load hint '{}'", p.display())))
        .transpose()
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let mut opts = match &args.config {
        Some(p) => strokeline::TraceOpts::from_json_path(p)?,
        None => strokeline::TraceOpts::default(),
    };
    opts.parallel |= args.parallel;
    if args.threads.is_some() {
        opts.threads = args.threads;
    }
    if args.max_search_steps.is_some() {
        opts.max_search_steps = args.max_search_steps;
    }

    let image = strokeline::load_rgba(&args.in_path)?;
    let hint = load_hint(args.hint.as_deref())?;
    let hint_ref = hint.as_ref().map(|h| h as &(dyn strokeline::RasterImage + Sync));

    let trace = match &args.cache_dir {
        Some(dir) => {
            let cache = strokeline::SilhouetteCache::new(strokeline::JsonDirStore::open(dir)?);
            let stamp = strokeline::ImageStamp::from_path(&args.in_path)?;
            let trace = strokeline::trace_silhouette_cached(&cache, &stamp, &image, hint_ref, &opts)?;
            let stats = cache.stats();
            tracing::info!(hits = stats.hits, misses = stats.misses, "cache");
            trace
        }
        None => strokeline::trace_silhouette(&image, hint_ref, &opts)?,
    };

    match &args.out {
        Some(out) => {
            ensure_parent_dir(out)?;
            let f = File::create(out).with_context(|| format!("create '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &trace).context("write trace JSON")?;
            w.flush()?;
            eprintln!(
                "wrote {} ({} cells, {} strokes)",
                out.display(),
                trace.cells.len(),
                trace.stroke_count()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, &trace).context("write trace JSON")?;
            writeln!(w)?;
        }
    }
    Ok(())
}

fn cmd_cells(args: CellsArgs) -> anyhow::Result<()> {
    let image = strokeline::load_rgba(&args.in_path)?;
    let cells = strokeline::segment(&image);
    let loops = strokeline::extract_boundaries(&image, &cells);

    let grid = image.grid();
    let palette = strokeline::Rgb8::hue_palette(cells.len());
    let mut out = image::RgbaImage::new(image.width(), image.height());
    for (cell, color) in cells.iter().zip(&palette) {
        for &p in &cell.pixels {
            let (x, y) = grid.coord(p);
            out.put_pixel(x, y, image::Rgba([color.r / 2, color.g / 2, color.b / 2, 255]));
        }
    }
    for (cell_loops, color) in loops.iter().zip(&palette) {
        for l in cell_loops {
            for &p in &l.pixels {
                let (x, y) = grid.coord(p);
                out.put_pixel(x, y, image::Rgba([color.r, color.g, color.b, 255]));
            }
        }
    }

    ensure_parent_dir(&args.out)?;
    out.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({} cells, {} loops)",
        args.out.display(),
        cells.len(),
        loops.iter().map(Vec::len).sum::<usize>()
    );
    Ok(())
}

fn cmd_reveal(args: RevealArgs) -> anyhow::Result<()> {
    let image = strokeline::load_rgba(&args.in_path)?;
    let hint = load_hint(args.hint.as_deref())?;
    let hint_ref = hint.as_ref().map(|h| h as &(dyn strokeline::RasterImage + Sync));
    let trace = strokeline::trace_silhouette(&image, hint_ref, &strokeline::TraceOpts::default())?;

    let strokes: Vec<strokeline::StrokePath> = trace.flat_strokes().cloned().collect();
    let mode = match args.mode {
        RevealChoice::Serial => strokeline::RevealMode::Serial,
        RevealChoice::Parallel => strokeline::RevealMode::Parallel,
    };
    let plan = strokeline::RevealPlan::build(&strokes, mode, args.frames)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let grid = image.grid();
    let mut canvas = image::RgbaImage::new(image.width(), image.height());
    for (i, frame) in plan.frames.iter().enumerate() {
        for &p in frame {
            let (x, y) = grid.coord(p);
            canvas.put_pixel(x, y, *image.get_pixel(x, y));
        }
        let path = args.out_dir.join(format!("frame_{i:05}.png"));
        canvas
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
    }
    eprintln!("wrote {} frames to {}", plan.len(), args.out_dir.display());
    Ok(())
}

fn cmd_distribute(args: DistributeArgs) -> anyhow::Result<()> {
    let buckets = strokeline::distribute(
        args.items,
        args.buckets,
        strokeline::DistributeOpts {
            limit: args.limit,
            cyclic: args.cyclic,
        },
    )?;
    println!("{}", serde_json::to_string(&buckets)?);
    Ok(())
}
