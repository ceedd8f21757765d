//! Generate a dungeon and compare the navgrid searches on it.
//!
//! Usage:
//!   cargo run --bin navgrid-demo -- --seed 7
//!   cargo run --bin navgrid-demo -- --anytime
//!
//! Per-search statistics are logged at debug level:
//!   RUST_LOG=debug cargo run --bin navgrid-demo

use std::io;

use clap::Parser;
use log::info;
use navgrid_demos::{HEIGHT, Scene, WIDTH, render, render_plain, run_anytime, run_astar, run_bounded};
use navgrid_gen::DungeonConfig;
use navgrid_paths::AnytimeConfig;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Compare A*, memory-bounded and anytime searches on a random dungeon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map width in tiles
    #[arg(long, default_value_t = WIDTH)]
    width: i32,

    /// Map height in tiles
    #[arg(long, default_value_t = HEIGHT)]
    height: i32,

    /// Map seed (random if not given)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Node limit of the bounded search (defaults to a quarter of the map)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Run the anytime search instead of A* and bounded search
    #[arg(long)]
    anytime: bool,

    /// Initial heuristic inflation of the anytime search
    #[arg(long, default_value_t = 15.0)]
    epsilon: f64,

    /// Print plain ASCII without colours
    #[arg(long)]
    plain: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!("seed {seed}");

    let scene = Scene::generate(
        args.width,
        args.height,
        StdRng::seed_from_u64(seed),
        &DungeonConfig::default(),
    )
    .ok_or("generated map has no walkable tile")?;

    let runs = if args.anytime {
        let config = AnytimeConfig {
            initial_epsilon: args.epsilon,
            ..AnytimeConfig::default()
        };
        vec![run_anytime(&scene, &config)]
    } else {
        let limit = args.limit.unwrap_or(scene.grid.len() / 4).max(1);
        vec![run_astar(&scene), run_bounded(&scene, limit)]
    };

    let mut stdout = io::stdout().lock();
    for r in &runs {
        if args.plain {
            println!("== {} ==", r.label);
            for line in &r.summary {
                println!("  {line}");
            }
            println!("{}\n", render_plain(&scene, r));
        } else {
            render(&mut stdout, &scene, r)?;
        }
    }
    Ok(())
}
