use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use swatch_composer::{Catalog, ComposeOpts, Composer, FsSource, ResourceHandle};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "swatch-composer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose one preview PNG from a material and a hardware image.
    Compose(ComposeArgs),
    /// Compose a preview for every complete entry of a catalog file.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Directory image references are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Material (fabric) image reference.
    #[arg(long)]
    material: String,

    /// Hardware (closure) image reference.
    #[arg(long)]
    hardware: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Optional compose options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Catalog JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory image references are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory previews are written to, one `<slug>.png` per entry.
    #[arg(long)]
    out_dir: PathBuf,

    /// Optional compose options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Skip entries that already ship a precomputed example image.
    #[arg(long, default_value_t = false)]
    skip_existing_examples: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<ComposeOpts> {
    let opts = match path {
        Some(p) => ComposeOpts::from_path(p)?,
        None => ComposeOpts::default(),
    };
    Ok(opts.with_env_overrides())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.opts.as_deref())?;
    let composer = Composer::new(FsSource::new(&args.root), opts)?;

    let handle = pollster::block_on(composer.create_combined_image(&args.material, &args.hardware))?;
    write_resource(&composer, &handle, &args.out)?;
    composer.release_resource(Some(handle.as_str()));

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = Catalog::from_path(&args.in_path)?;
    let opts = load_opts(args.opts.as_deref())?;
    let composer = Composer::new(FsSource::new(&args.root), opts)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut written = 0usize;
    for req in catalog.preview_requests() {
        if args.skip_existing_examples && req.example_image.is_some() {
            tracing::info!(name = %req.name, "skipping entry with example image");
            continue;
        }
        let handle = pollster::block_on(
            composer.create_combined_image(&req.material_image, &req.hardware_image),
        )
        .with_context(|| format!("compose '{}'", req.name))?;

        let out = args.out_dir.join(format!("{}.png", req.slug));
        let result = write_resource(&composer, &handle, &out);
        composer.release_resource(Some(handle.as_str()));
        result?;
        written += 1;
    }

    eprintln!("wrote {written} previews to {}", args.out_dir.display());
    Ok(())
}

fn write_resource(
    composer: &Composer<FsSource>,
    handle: &ResourceHandle,
    out: &Path,
) -> anyhow::Result<()> {
    let image = composer
        .registry()
        .fetch(handle.as_str())
        .with_context(|| format!("resource '{handle}' is not live"))?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &image.bytes).with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}
