//! Compares the search algorithms over seeded random grids.

use std::time::Duration;

use anstream::println;
use clap::Parser;
use hrsw::Stopwatch;
use human_duration::human_duration;
use log::debug;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use thousands::Separable;

use gridsearch::algorithms::Algorithm;
use gridsearch::config::DfsMembership;
use gridsearch::config::SearchConfig;
use gridsearch::grid::Grid;
use gridsearch::heuristic::HeuristicKind;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = gridsearch::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = 1_000u64)]
    pub num_instances: u64,
    #[arg(long, default_value_t = 32usize)]
    pub rows: usize,
    #[arg(long, default_value_t = 32usize)]
    pub cols: usize,
    #[arg(long, default_value_t = 0.3f64)]
    pub wall_ratio: f64,

    #[arg(long, value_enum, default_value_t)]
    pub dfs_membership: DfsMembership,
    #[arg(long, value_enum, default_value_t)]
    pub heuristic: HeuristicKind,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Default, Debug)]
struct Tally {
    found: u64,
    exhausted: u64,
    visited: usize,
    path_len: usize,
    elapsed: Duration,
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    args.color.write_global();
    if args.rows == 0 || args.cols == 0 || !(0.0..=1.0).contains(&args.wall_ratio) {
        return Err(std::io::Error::other(format!(
            "Bad instance shape {}x{} with wall ratio {}",
            args.rows, args.cols, args.wall_ratio
        )));
    }

    let config = SearchConfig::default()
        .with_dfs_membership(args.dfs_membership)
        .with_heuristic(args.heuristic);
    let mut tallies: Vec<(Algorithm, Tally)> = Algorithm::ALL
        .iter()
        .map(|a| (*a, Tally::default()))
        .collect();

    let mut skipped = 0u64;
    for seed in 0..args.num_instances {
        let mut r = ChaCha8Rng::seed_from_u64(seed);
        let grid = Grid::random(&mut r, args.rows, args.cols, args.wall_ratio);
        let (Some(start), Some(end)) = (
            grid.random_free_position(&mut r),
            grid.random_free_position(&mut r),
        ) else {
            skipped += 1;
            continue;
        };
        debug!("Instance {seed}: {start} -> {end} on {grid:?}");

        for (algorithm, tally) in &mut tallies {
            let mut stopwatch = Stopwatch::new_started();
            let outcome = algorithm.search(&config, &grid, start, end);
            stopwatch.stop();
            tally.elapsed += stopwatch.elapsed();
            match outcome {
                Ok(outcome) => {
                    tally.visited += outcome.visited().len();
                    match outcome.path() {
                        Some(path) => {
                            tally.found += 1;
                            tally.path_len += path.len();
                        }
                        None => tally.exhausted += 1,
                    }
                }
                Err(e) => log::error!("{algorithm} on instance {seed}: {e}"),
            }
        }
    }

    println!(
        "{} instances of {}x{} at {:.0}% walls ({} skipped)",
        args.num_instances.separate_with_commas().yellow(),
        args.rows,
        args.cols,
        args.wall_ratio * 100.0,
        skipped
    );
    for (algorithm, tally) in &tallies {
        let avg_path = if tally.found > 0 {
            tally.path_len as f64 / tally.found as f64
        } else {
            0.0
        };
        println!(
            "{:>4}: found {} exhausted {} visited {} avg path {:.1} in {}",
            algorithm.green(),
            tally.found.separate_with_commas(),
            tally.exhausted.separate_with_commas(),
            tally.visited.separate_with_commas(),
            avg_path,
            human_duration(&tally.elapsed),
        );
    }

    Ok(())
}
