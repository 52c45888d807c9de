use std::env;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use cellpart::{Catalog, SearchContext, Universe};

/// Dimension of the hypercube universe to partition; fixed for a run.
const DIM: u32 = 3;

fn main() -> io::Result<()> {
    let universe = match Universe::hypercube(DIM) {
        Ok(universe) => universe,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };
    let cells = universe.cell_count();

    // the only runtime parameter: the largest first-piece size to try
    let max_first = match env::args().nth(1) {
        None => cells as u32,
        Some(arg) => match arg.parse::<u32>() {
            Ok(n) if n >= 1 && n as usize <= cells => n,
            _ => {
                eprintln!("usage: cellpart [largest-first-piece-size, 1..={}]", cells);
                process::exit(2);
            }
        },
    };

    let run_timer = Instant::now();
    let build_timer = Instant::now();
    let catalog = Catalog::build(&universe, max_first as usize);
    for size in 1..=max_first as usize {
        eprintln!("pieces {}: {}", size, catalog.count(size));
    }
    eprintln!(
        "total pieces: {} ({:.2?})",
        catalog.total(),
        build_timer.elapsed()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut context = SearchContext::new(&universe, &catalog);
    context.set_verbose(true);
    for first in 1..=max_first {
        let pass_timer = Instant::now();
        let found = context.run_pass(first, &mut out)?;
        out.flush()?;
        eprintln!(
            "solutions {}: {}/{} ({:.2?})",
            first,
            found,
            context.stats().solutions,
            pass_timer.elapsed()
        );
    }
    let stats = context.stats();
    eprintln!(
        "{} cells: total {} ({:.2?}, {} placements, {} shape skips, {} prefix skips)",
        cells,
        stats.solutions,
        run_timer.elapsed(),
        stats.placements,
        stats.shape_skips,
        stats.prefix_skips
    );
    Ok(())
}
