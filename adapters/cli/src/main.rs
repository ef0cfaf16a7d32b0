#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that manages Quadcaster projects and opens the editor
//! and play windows.

mod config;
mod project_transfer;
mod session;
mod store;

use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use quadcaster_core::{EditCommand, MapKind, ScaleDirection};
use quadcaster_rendering_macroquad::MacroquadBackend;
use quadcaster_system_editor::GridEditor;
use quadcaster_world::{load_or_init, scale, ProjectRepository};

use crate::{
    config::Settings,
    session::{Session, ViewOptions, DEFAULT_WALL_PROBABILITY},
    store::FileProjectStore,
};

#[derive(Parser)]
#[command(name = "quadcaster", about = "Edit and explore raycast levels")]
struct Cli {
    /// Directory holding the project files
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Settings file (defaults to ./quadcaster.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a project with the default maps
    New { name: String },
    /// List stored projects
    List,
    /// Delete a project
    Delete { name: String },
    /// Open a project in the editor, creating it when missing
    Edit { name: String },
    /// Explore a project in first person
    Play { name: String },
    /// Fill the grid map of a project with random walls
    Generate {
        name: String,
        /// Probability that each cell becomes a wall (0-1)
        #[arg(long, default_value_t = DEFAULT_WALL_PROBABILITY)]
        probability: f64,
        /// Seed for a reproducible layout (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a single-line transfer string for a project
    Export { name: String },
    /// Store a project decoded from a transfer string
    Import { name: String, transfer: String },
    /// Change the resolution of a project map
    Scale {
        name: String,
        direction: ScaleArg,
        /// Map to scale (default: the active map)
        #[arg(long)]
        kind: Option<KindArg>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScaleArg {
    /// Halve the resolution
    Up,
    /// Double the resolution
    Down,
}

impl From<ScaleArg> for ScaleDirection {
    fn from(value: ScaleArg) -> Self {
        match value {
            ScaleArg::Up => Self::Up,
            ScaleArg::Down => Self::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Grid,
    Quadtree,
}

impl From<KindArg> for MapKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Grid => Self::Grid,
            KindArg::Quadtree => Self::Quadtree,
        }
    }
}

/// Entry point for the Quadcaster command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let directory = cli
        .store
        .clone()
        .unwrap_or_else(|| settings.store.directory.clone());
    let mut store = FileProjectStore::new(directory);

    match cli.command {
        Command::New { name } => {
            ensure!(
                store.load(&name)?.is_none(),
                "project '{name}' already exists"
            );
            let project = load_or_init(&mut store, &name)?;
            println!(
                "created '{name}' ({}x{} grid)",
                project.grid_map.width(),
                project.grid_map.height()
            );
        }
        Command::List => {
            for name in store.list()? {
                println!("{name}");
            }
        }
        Command::Delete { name } => {
            if store.delete(&name)? {
                println!("deleted '{name}'");
            } else {
                println!("no project named '{name}'");
            }
        }
        Command::Edit { name } => {
            let project = load_or_init(&mut store, &name)?;
            info!("editing '{name}'");
            Session::edit(&name, store, project, view_options(&settings)).run(backend(&settings))?;
        }
        Command::Play { name } => {
            let project = store.require(&name)?;
            info!("playing '{name}'");
            Session::play(&name, store, project, view_options(&settings)).run(backend(&settings))?;
        }
        Command::Generate {
            name,
            probability,
            seed,
        } => {
            ensure!(
                (0.0..=1.0).contains(&probability),
                "wall probability must lie between 0 and 1, got {probability}"
            );
            let mut project = load_or_init(&mut store, &name)?;
            let seed = seed.unwrap_or_else(rand::random);
            let mut editor = GridEditor::new(project.grid_map);
            let mut events = Vec::new();
            editor.apply(
                EditCommand::GenerateMaze {
                    wall_probability: probability,
                    seed,
                },
                &mut events,
            );
            project.grid_map = editor.map().clone();
            store.save(&name, &project)?;
            println!(
                "generated {} walls in '{name}' (seed {seed})",
                project.grid_map.wall_count()
            );
        }
        Command::Export { name } => {
            let project = store.require(&name)?;
            println!("{}", project_transfer::encode(&project)?);
        }
        Command::Import { name, transfer } => {
            let project = project_transfer::decode(&transfer)
                .context("failed to decode the transfer string")?;
            store.save(&name, &project)?;
            println!(
                "imported '{name}' ({} map active)",
                project.active_map_kind.as_str()
            );
        }
        Command::Scale {
            name,
            direction,
            kind,
        } => {
            let mut project = store.require(&name)?;
            let kind = kind.map_or(project.active_map_kind, MapKind::from);
            let direction = ScaleDirection::from(direction);
            let (scaled, level) = match kind {
                MapKind::Grid => (
                    scale(&mut project.grid_map, direction),
                    project.grid_map.scale_level(),
                ),
                MapKind::Quadtree => (
                    scale(&mut project.quadtree_map, direction),
                    project.quadtree_map.scale_level(),
                ),
            };
            if !scaled {
                bail!(
                    "the {} map of '{name}' is already at its authored resolution",
                    kind.as_str()
                );
            }
            store.save(&name, &project)?;
            println!("scaled the {} map of '{name}' to level {level}", kind.as_str());
        }
    }

    Ok(())
}

fn view_options(settings: &Settings) -> ViewOptions {
    ViewOptions {
        caster: settings.caster,
        movement: settings.movement,
        view_height: settings.window.view_height,
        bricks: settings.window.bricks,
    }
}

fn backend(settings: &Settings) -> MacroquadBackend {
    MacroquadBackend::new()
        .with_vsync(settings.window.vsync)
        .with_window_size(settings.window.width, settings.window.height)
}
