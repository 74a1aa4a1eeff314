//! Strata CLI
//!
//! Loads a laid-out box scene, builds its layer tree, resolves absolute
//! positions and prints the display list in painting order.
//!
//! - strata scene.json               # Colored display list
//! - strata scene.json --json        # Machine-readable display list
//! - strata scene.json --extent-only # Document extent only

mod scene;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use owo_colors::OwoColorize;
use strata_common::media::{MediaContext, MediaType};
use strata_common::{Point, Rect};
use strata_layer::{DisplayCommand, DisplayList, LayerTreeBuilder, Painter, RenderingContext};

use scene::Scene;

/// Strata: stacking contexts and painting order for a laid-out box tree
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the display list of a scene
    strata demos/stacking.json

    # Scroll the viewport down before painting
    strata demos/stacking.json --scroll-y 400

    # Leave replaced content to the host
    strata demos/stacking.json --interactive

    # Emit JSON instead of colored text
    strata demos/stacking.json --json

    # Only report how far the document extends, with debug logging
    strata demos/stacking.json --extent-only -vv
"#)]
struct Cli {
    /// Path to a JSON scene
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Viewport width (default: the scene's)
    #[arg(long)]
    width: Option<i32>,

    /// Viewport height (default: the scene's)
    #[arg(long)]
    height: Option<i32>,

    /// Scroll the viewport down by this many units
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    scroll_y: i32,

    /// Do not paint replaced content
    #[arg(long)]
    interactive: bool,

    /// Print the display list as JSON
    #[arg(long, conflicts_with = "extent_only")]
    json: bool,

    /// Print only the document extent
    #[arg(long)]
    extent_only: bool,

    /// Media type used to evaluate the scene's media queries
    #[arg(long, value_enum, default_value_t = Media::Screen)]
    media: Media,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Media {
    Screen,
    Print,
}

impl From<Media> for MediaType {
    fn from(media: Media) -> Self {
        match media {
            Media::Screen => Self::Screen,
            Media::Print => Self::Print,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let text = fs::read_to_string(&cli.scene)
        .with_context(|| format!("failed to read scene {}", cli.scene.display()))?;
    let scene = Scene::from_json(&text)
        .with_context(|| format!("failed to parse scene {}", cli.scene.display()))?;

    let viewport = resolve_viewport(&cli, scene.viewport)?;
    let device = MediaContext {
        media: cli.media.into(),
        width: viewport.width,
        height: viewport.height,
    };
    let mut loaded = scene.load(&device).context("failed to load scene")?;
    if loaded.excluded > 0 {
        log::info!("{} boxes excluded by media queries", loaded.excluded);
    }

    let mut layers =
        LayerTreeBuilder::build(&loaded.boxes, loaded.root).context("failed to build layer tree")?;
    let extent = layers
        .max_offset(&mut loaded.boxes)
        .context("failed to resolve positions")?;

    if cli.extent_only {
        println!("{} {}", extent.x, extent.y);
        return Ok(());
    }

    let mut ctx = RenderingContext::new(viewport).with_interactive(cli.interactive);
    Painter::new(&mut layers, &mut loaded.boxes)
        .paint_root(&mut ctx)
        .context("failed to paint")?;
    let display_list = ctx.into_display_list();

    if cli.json {
        let output = serde_json::json!({
            "viewport": viewport,
            "extent": extent,
            "commands": display_list,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(viewport, extent, layers.len());
        print_display_list(&display_list);
    }
    Ok(())
}

/// `-v` enables info, `-vv` debug and `-vvv` trace. `RUST_LOG` still wins.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// The scene viewport with command-line overrides applied.
fn resolve_viewport(cli: &Cli, scene: Rect) -> Result<Rect> {
    let width = cli.width.unwrap_or(scene.width);
    let height = cli.height.unwrap_or(scene.height);
    if width <= 0 || height <= 0 {
        bail!("viewport must have a positive size, got {width}x{height}");
    }
    Ok(Rect::new(scene.x, scene.y.saturating_add(cli.scroll_y), width, height))
}

fn print_summary(viewport: Rect, extent: Point, layers: usize) {
    println!("=== Scene ===");
    println!(
        "{} {}x{} at ({}, {})",
        "viewport".bold(),
        viewport.width,
        viewport.height,
        viewport.x,
        viewport.y
    );
    println!("{} {}x{}", "extent".bold(), extent.x, extent.y);
    println!("{} {layers}", "layers".bold());
}

fn print_display_list(display_list: &DisplayList) {
    println!("\n=== Display List ===");
    if display_list.is_empty() {
        println!("{}", "(nothing visible)".dimmed());
        return;
    }
    for (index, command) in display_list.commands().iter().enumerate() {
        let name = format!("{:<16}", command.name());
        let name = match command {
            DisplayCommand::Background { .. } => name.blue().to_string(),
            DisplayCommand::Border { .. } => name.cyan().to_string(),
            DisplayCommand::InlineContent { .. } => name.green().to_string(),
            DisplayCommand::ListMarker { .. } => name.magenta().to_string(),
            DisplayCommand::ReplacedContent { .. } => name.yellow().to_string(),
        };
        let bounds = command.bounds();
        println!(
            "{index:>4} {name} {} {:<22} {}",
            format!("#{:<4}", command.box_id().0).dimmed(),
            format!(
                "{},{} {}x{}",
                bounds.x, bounds.y, bounds.width, bounds.height
            ),
            detail(command)
        );
    }
}

fn detail(command: &DisplayCommand) -> String {
    match command {
        DisplayCommand::Background { color: Some(c), .. } => {
            format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a)
        }
        DisplayCommand::Border {
            border: Some(border),
            ..
        } => {
            let c = border.color;
            format!("{} rgb({}, {}, {})", border.width, c.r, c.g, c.b)
        }
        DisplayCommand::Background { color: None, .. }
        | DisplayCommand::Border { border: None, .. } => "none".dimmed().to_string(),
        DisplayCommand::InlineContent { runs, .. } => format!("{:?}", runs.concat()),
        DisplayCommand::ListMarker { marker, .. } => format!("{marker:?}"),
        DisplayCommand::ReplacedContent { source, .. } => source.clone(),
    }
}
