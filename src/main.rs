use anyhow::{Context, Result, bail};
use canvanim::draw::FileImageLoader;
use canvanim::{CairoContext, Config, RecordingContext, RenderContext, SceneFile, Surface};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Surface size used when the scene file does not give one.
const DEFAULT_WIDTH: i32 = 300;
const DEFAULT_HEIGHT: i32 = 150;

#[derive(Parser, Debug)]
#[command(name = "canvanim")]
#[command(version, about = "Render and query 2D scene files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a scene and write it as PNG
    Render {
        /// Scene file (TOML)
        scene: PathBuf,

        /// Output file; `.png` is appended when missing
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Viewport origin, clamped to the scene's scroll region
        #[arg(long, value_name = "X,Y", value_parser = parse_coords::<2>)]
        view: Option<[f64; 2]>,
    },

    /// List the items a point or rectangle selects, in paint order
    Query {
        /// Scene file (TOML)
        scene: PathBuf,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print the JSON schema of the scene format
    Schema,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct QueryArgs {
    /// Items whose hit box contains the point
    #[arg(long, value_name = "X,Y", value_parser = parse_coords::<2>)]
    at: Option<[f64; 2]>,

    /// Items lying entirely inside the rectangle
    #[arg(long, value_name = "X1,Y1,X2,Y2", value_parser = parse_coords::<4>)]
    enclosed: Option<[f64; 4]>,

    /// Items overlapping the rectangle
    #[arg(long, value_name = "X1,Y1,X2,Y2", value_parser = parse_coords::<4>)]
    overlapping: Option<[f64; 4]>,
}

fn parse_coords<const N: usize>(input: &str) -> Result<[f64; N], String> {
    let values = input
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{input}': {e}"))?;
    let count = values.len();
    values
        .try_into()
        .map_err(|_| format!("expected {N} comma-separated numbers, got {count}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            scene,
            output,
            view,
        } => render(&scene, output, view),
        Command::Query { scene, query } => run_query(&scene, &query),
        Command::Schema => {
            let schema = SceneFile::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

/// Loads `path` and builds it on a surface bound to `ctx`.
fn build_surface(path: &Path, scene: &SceneFile, ctx: Box<dyn RenderContext>) -> Result<Surface> {
    let mut surface = Surface::new(ctx, scene.surface_options())
        .with_context(|| format!("Failed to set up surface for {}", path.display()))?;

    let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
    surface.set_image_loader(Arc::new(FileImageLoader::with_base_dir(base_dir)));

    scene.build(&mut surface);
    Ok(surface)
}

fn render(path: &Path, output: Option<PathBuf>, view: Option<[f64; 2]>) -> Result<()> {
    let config = Config::load()?;
    let scene = SceneFile::load(path)?;

    let size = &scene.surface;
    let width = size.width.map_or(DEFAULT_WIDTH, |w| w.ceil() as i32);
    let height = size.height.map_or(DEFAULT_HEIGHT, |h| h.ceil() as i32);
    let ctx = CairoContext::new(width, height)
        .context("Failed to create drawing surface")?;
    let mut surface = build_surface(path, &scene, Box::new(ctx))?;

    let pending = surface.pending_images();
    if pending > 0 {
        log::info!("Waiting for {pending} image(s)");
        surface.wait_for_images(config.image_wait());
    }
    if let Some([x, y]) = view {
        surface.coords_view(x, y);
    }

    let stem = match output {
        Some(path) if has_png_extension(&path) => path.with_extension(""),
        Some(path) => path,
        None => config.output.stem(),
    };
    let name = stem.to_string_lossy();
    let saved = surface
        .save(Some(name.as_ref()))
        .with_context(|| format!("Failed to save {}", stem.display()))?;

    println!("{}", saved.display());
    Ok(())
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn run_query(path: &Path, query: &QueryArgs) -> Result<()> {
    let scene = SceneFile::load(path)?;
    let ctx = RecordingContext::new(DEFAULT_WIDTH as f64, DEFAULT_HEIGHT as f64);
    let surface = build_surface(path, &scene, Box::new(ctx))?;

    let ids = match (query.at, query.enclosed, query.overlapping) {
        (Some([x, y]), _, _) => surface.find_targeted(x, y),
        (_, Some([x1, y1, x2, y2]), _) => surface.find_enclosed(x1, y1, x2, y2),
        (_, _, Some([x1, y1, x2, y2])) => surface.find_overlapping(x1, y1, x2, y2),
        _ => bail!("One of --at, --enclosed or --overlapping is required"),
    };

    for id in ids {
        let (Some(index), Some(item)) = (surface.index(id), surface.item(id)) else {
            continue;
        };
        println!("{index}\t{}\t{}", item.item_type(), item.tags().join(","));
    }
    Ok(())
}
