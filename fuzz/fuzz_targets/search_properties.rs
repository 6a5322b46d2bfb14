#![no_main]

use libfuzzer_sys::fuzz_target;

use gridsearch::algorithms::Algorithm;
use gridsearch::config::SearchConfig;
use gridsearch::grid::Grid;
use gridsearch::grid::Position;
use gridsearch::search::SearchOutcome;

const SIDE: usize = 8;

// Input layout: start row, start col, end row, end col, then one byte per cell.
fuzz_target!(|data: &[u8]| {
    let Some((header, cells)) = data.split_first_chunk::<4>() else {
        return;
    };
    if cells.len() < SIDE * SIDE {
        return;
    }
    let map: Vec<Vec<u8>> = cells[..SIDE * SIDE]
        .chunks(SIDE)
        .map(|row| row.iter().map(|c| c & 1).collect())
        .collect();
    let Ok(grid) = Grid::new(map) else {
        return;
    };
    let side = SIDE as u32;
    let start = Position::new(header[0] as u32 % side, header[1] as u32 % side);
    let end = Position::new(header[2] as u32 % side, header[3] as u32 % side);

    for algorithm in Algorithm::ALL {
        let outcome = algorithm
            .search(&SearchConfig::default(), &grid, start, end)
            .expect("endpoints are in bounds");
        match &outcome {
            SearchOutcome::Blocked(_) => {
                assert!(!grid.is_free(&start) || !grid.is_free(&end));
            }
            SearchOutcome::Exhausted { visited } => {
                assert!(!visited.contains(&end));
            }
            SearchOutcome::Found { visited, path } => {
                assert_eq!(path.first(), Some(&end));
                assert_eq!(path.last(), Some(&start));
                assert_eq!(visited.first(), Some(&start));
                for step in path.windows(2) {
                    assert!(algorithm.mode().adjacent(&step[0], &step[1]));
                }
                for p in path {
                    assert!(grid.is_free(p));
                }
            }
        }
    }
});
