use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use indoc::indoc;
use log::info;
use log::warn;
use owo_colors::OwoColorize;

use gridsearch::algorithms::Algorithm;
use gridsearch::config::DfsMembership;
use gridsearch::config::SearchConfig;
use gridsearch::grid::Grid;
use gridsearch::grid::Position;
use gridsearch::heuristic::HeuristicKind;
use gridsearch::search::SearchOutcome;
use gridsearch::search::VisitedLedger;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Runs grid searches and writes an org-mode report of what they explored.
#[derive(Parser, Debug)]
#[clap(long_version = gridsearch::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short,
        long,
        env = "GRIDSEARCH_OUTPUT",
        default_value = "/tmp/gridsearch.org"
    )]
    pub output: PathBuf,

    /// Grids to search, as comma separated text or png images.
    #[arg()]
    pub grids: Vec<PathBuf>,

    /// Start cell, `row,col`. Defaults to the bottom left corner.
    #[arg(long)]
    pub start: Option<Position>,
    /// End cell, `row,col`. Defaults to the top right corner.
    #[arg(long)]
    pub end: Option<Position>,

    /// Runs every algorithm when absent.
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    #[arg(long, value_enum, default_value_t)]
    pub dfs_membership: DfsMembership,
    #[arg(long, value_enum, default_value_t)]
    pub heuristic: HeuristicKind,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

impl Args {
    fn config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_dfs_membership(self.dfs_membership)
            .with_heuristic(self.heuristic)
    }

    fn algorithms(&self) -> Vec<Algorithm> {
        match self.algorithm {
            Some(a) => vec![a],
            None => Algorithm::ALL.to_vec(),
        }
    }

    /// The requested endpoints, or opposite corners of `grid`.
    fn endpoints(&self, grid: &Grid) -> (Position, Position) {
        let (rows, cols) = grid.dimensions();
        let last_row = rows.saturating_sub(1) as u32;
        let last_col = cols.saturating_sub(1) as u32;
        (
            self.start.unwrap_or(Position::new(last_row, 0)),
            self.end.unwrap_or(Position::new(0, last_col)),
        )
    }
}

fn write_outcome<W: Write>(
    out: &mut W,
    grid: &Grid,
    outcome: &SearchOutcome,
    ledger: &VisitedLedger,
) -> std::io::Result<()> {
    writeln!(out, "- Outcome: {outcome}")?;
    writeln!(out, "- Visited:")?;
    writeln!(out, "#+begin_src ron\n{:?}\n#+end_src", outcome.visited())?;
    if let Some(path) = outcome.path() {
        let mut map = String::new();
        grid.write_with_path(&mut map, path)
            .map_err(std::io::Error::other)?;
        writeln!(out, "- Path:")?;
        writeln!(out, "#+begin_quote\n{map}#+end_quote")?;
    }
    writeln!(out, "- Memory:")?;
    writeln!(out, "#+begin_src text")?;
    ledger.write_memory_stats(&mut *out)?;
    writeln!(out, "#+end_src")?;
    Ok(())
}

fn search_grid<W: Write>(
    out: &mut W,
    args: &Args,
    name: &str,
    grid: &Grid,
) -> std::io::Result<()> {
    let (start, end) = args.endpoints(grid);
    writeln!(out, "** Grid {name} {:?}", grid.dimensions())?;
    writeln!(out, "*** Map")?;
    writeln!(out, "#+begin_quote\n{grid}#+end_quote")?;

    let config = args.config();
    for algorithm in args.algorithms() {
        writeln!(out, "*** {algorithm} {start} -> {end} ({})", algorithm.mode())?;
        match algorithm.search_with_ledger(&config, grid, start, end) {
            Ok((outcome, ledger)) => {
                println!("{:>4} {name}: {}", algorithm.green(), outcome);
                write_outcome(out, grid, &outcome, &ledger)?;
            }
            Err(e) => {
                warn!("{algorithm} on {name} failed: {e}");
                println!("{:>4} {name}: {}", algorithm.red(), e.red());
                writeln!(out, "- Error: {e}")?;
            }
        }
    }

    Ok(())
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    args.color.write_global();
    println!("Logging to {:?}", args.output.yellow());

    let file = File::create(&args.output)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "#+title: Grid search report")?;
    writeln!(out, "* Runs")?;

    let demo = Grid::try_from(indoc! {"
        0,0,0,0,0
        0,0,0,1,0
        1,1,1,0,0
        0,1,0,0,0
        0,0,0,0,0
    "})
    .map_err(std::io::Error::other)?;
    search_grid(&mut out, &args, "demo", &demo)?;

    for p in &args.grids {
        let name = p.display().to_string();
        match Grid::try_from(p.as_path()) {
            Ok(grid) => {
                info!("Loaded {name} as {grid:?}");
                search_grid(&mut out, &args, &name, &grid)?;
            }
            Err(e) => {
                warn!("Skipping {name}: {e}");
                println!("Skipping {name}: {}", e.red());
                writeln!(out, "** Grid {name}\n- Error: {e}")?;
            }
        }
    }

    Ok(())
}
