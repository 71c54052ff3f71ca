#![deny(unsafe_code)]
//! CLI binary for the pointstep transform-feedback demos.
//!
//! Subcommands:
//! - `run <demo>` — advance a demo N frames headless, optionally write a PNG
//! - `list` — print available demos

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use pointstep_core::{Demo, Recipe};
use pointstep_demos::DemoKind;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "pointstep", about = "Transform-feedback point demo runner")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a demo headless for N frames and optionally write a PNG of the
    /// final positions.
    Run {
        /// Demo name (e.g. "feedback", "rotation").
        #[arg(required_unless_present = "recipe")]
        demo: Option<String>,

        /// Number of frames to advance.
        #[arg(short, long, default_value_t = 120)]
        frames: usize,

        /// PRNG seed for deterministic runs.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Raster width in pixels.
        #[arg(short = 'W', long, default_value_t = 256)]
        width: usize,

        /// Raster height in pixels.
        #[arg(short = 'H', long, default_value_t = 256)]
        height: usize,

        /// Demo parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Snapshot file path; no PNG is written without it.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Load a full recipe file instead of the flags above.
        #[arg(
            long,
            conflicts_with_all = ["demo", "frames", "seed", "width", "height", "params"]
        )]
        recipe: Option<PathBuf>,
    },
    /// List available demos.
    List,
}

fn load_recipe(path: &Path) -> Result<Recipe, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| CliError::Input(format!("invalid recipe JSON: {e}")))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let demos = DemoKind::list_demos();
            if cli.json {
                let mut schemas = serde_json::Map::new();
                for &name in demos {
                    let demo = DemoKind::from_name(name, 0, &serde_json::json!({}))?;
                    schemas.insert(name.to_string(), demo.param_schema());
                }
                let info = serde_json::json!({ "demos": schemas });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Demos:");
                for name in demos {
                    println!("  {name}");
                }
            }
        }
        Command::Run {
            demo,
            frames,
            seed,
            width,
            height,
            params,
            output,
            recipe,
        } => {
            let recipe = match recipe {
                Some(path) => load_recipe(&path)?,
                None => {
                    let params: serde_json::Value = serde_json::from_str(&params)
                        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
                    let demo =
                        demo.ok_or_else(|| CliError::Input("missing demo name".to_string()))?;
                    let mut built = Recipe::new(&demo, width, height, seed);
                    built.params = params;
                    built.frames = frames;
                    built
                }
            };
            recipe.validate().map_err(CliError::from)?;

            log::debug!(
                "running {} for {} frames (seed {})",
                recipe.demo,
                recipe.frames,
                recipe.seed
            );
            let mut demo = DemoKind::from_name(&recipe.demo, recipe.seed, &recipe.params)?;

            (0..recipe.frames).try_for_each(|_| demo.advance())?;

            if let Some(path) = &output {
                pointstep_demos::snapshot::write_png(
                    demo.positions(),
                    recipe.width,
                    recipe.height,
                    demo.clear_color(),
                    path,
                )?;
            }
            log::info!("completed {} frames of {}", recipe.frames, recipe.demo);

            if cli.json {
                let info = serde_json::json!({
                    "demo": recipe.demo,
                    "frames": recipe.frames,
                    "seed": recipe.seed,
                    "points": demo.positions().len(),
                    "params": demo.params(),
                    "output": output.as_ref().map(|p| p.display().to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                match &output {
                    Some(path) => eprintln!(
                        "ran {} ({} frames, seed {}) -> {}",
                        recipe.demo,
                        recipe.frames,
                        recipe.seed,
                        path.display()
                    ),
                    None => eprintln!(
                        "ran {} ({} frames, seed {})",
                        recipe.demo, recipe.frames, recipe.seed
                    ),
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
