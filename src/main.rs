//! Headless voxel streaming, collision and ray casting demos.
#![forbid(unsafe_code)]

mod app;
mod config;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quarry_geom::Vec3;

use crate::app::App;
use crate::config::QuarryConfig;

#[derive(Parser, Debug)]
#[command(name = "quarry", version, about = "Voxel world streaming and collision demos")]
struct Cli {
    /// TOML config file; `quarry.toml` is used when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk the focal point along +X, streaming chunks and casting down at the ground
    Blocks {
        #[arg(long, default_value_t = 600)]
        frames: u64,
        /// Blocks travelled per frame
        #[arg(long, default_value_t = 0.5)]
        speed: f32,
        /// Override `[stream] radius`
        #[arg(long)]
        radius: Option<u32>,
    },
    /// Sweep one shape through a unit box and report overlap changes
    Gjk {
        /// Use the first box collider of this BMF file as the moving shape
        #[arg(long)]
        bmf: Option<PathBuf>,
        #[arg(long, default_value_t = 81)]
        steps: usize,
    },
    /// Load the world around a point and cast a single ray from it
    Raycast {
        #[arg(long, default_value_t = 8.5)]
        x: f32,
        #[arg(long, default_value_t = 120.5)]
        y: f32,
        #[arg(long, default_value_t = 8.5)]
        z: f32,
        #[arg(long, default_value_t = 0.0)]
        dx: f32,
        #[arg(long, default_value_t = -128.0)]
        dy: f32,
        #[arg(long, default_value_t = 0.0)]
        dz: f32,
        #[arg(long)]
        radius: Option<u32>,
    },
    /// Look up the word type of each word in the dictionary
    Word {
        /// Word list; overrides `[dictionary] path`
        #[arg(long)]
        dict: Option<PathBuf>,
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut cfg = QuarryConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Blocks {
            frames,
            speed,
            radius,
        } => {
            if let Some(r) = radius {
                cfg.stream.radius = r;
            }
            let mut app = App::new(cfg, Vec3::new(0.5, 120.0, 0.5));
            let s = app::run_blocks(&mut app, frames, speed);
            println!(
                "frames={} resident={} created={} recycled={} remeshed={} ground_hits={}",
                s.frames, s.resident, s.created, s.stats.recycled, s.stats.remeshed, s.ground_hits
            );
            app.shutdown();
        }
        Command::Gjk { bmf, steps } => {
            let s = app::run_gjk(bmf.as_deref(), steps, cfg.gjk.max_iterations)?;
            for (step, now) in &s.transitions {
                println!("step {}: {}", step, if *now { "overlap" } else { "separate" });
            }
            println!("steps={} overlapping={} capped={}", s.steps, s.hits, s.exhausted);
        }
        Command::Raycast {
            x,
            y,
            z,
            dx,
            dy,
            dz,
            radius,
        } => {
            if let Some(r) = radius {
                cfg.stream.radius = r;
            }
            let origin = Vec3::new(x, y, z);
            let mut app = App::new(cfg, origin);
            let s = app::run_raycast(&mut app, origin, Vec3::new(dx, dy, dz));
            match s.hit {
                Some(h) => println!(
                    "hit {:?} at {:?} normal {:?} t={:.3}",
                    h.block.kind(),
                    h.pos,
                    h.normal,
                    h.t
                ),
                None => println!("no hit"),
            }
            app.shutdown();
        }
        Command::Word { dict, words } => {
            let path = dict
                .or(cfg.dictionary.path)
                .ok_or("no word list: pass --dict or set [dictionary] path")?;
            let dictionary = quarry_io::load_dictionary(&path)?;
            for w in &words {
                println!("{}: {}", w, dictionary.describe(w));
            }
        }
    }
    Ok(())
}
