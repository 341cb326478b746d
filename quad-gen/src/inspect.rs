use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use quad_core::document;
use quad_core::tree::TreeStats;
use tracing::info;

use crate::cli::InspectArgs;

fn print_stats<W: Write>(stats: &TreeStats, out: &mut W) -> Result<()> {
    writeln!(out, "nodes:    {}", stats.nodes)?;
    writeln!(out, "leaves:   {}", stats.leaves)?;
    writeln!(out, "internal: {}", stats.internal)?;
    writeln!(out, "deepest:  {}", stats.deepest)?;
    for (depth, count) in stats.per_depth.iter().enumerate() {
        writeln!(out, "  depth {depth:>2}: {count}")?;
    }
    Ok(())
}

/// Loads and validates a document, then prints its node counts.
pub fn run_inspect<W: Write>(args: InspectArgs, out: &mut W) -> Result<()> {
    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    let tree = document::read_json(file, args.max_depth)
        .with_context(|| format!("{} is not a valid quadtree document", args.path.display()))?;

    let stats = tree.stats();
    info!(path = %args.path.display(), nodes = stats.nodes, "document is valid");
    print_stats(&stats, out)
}
