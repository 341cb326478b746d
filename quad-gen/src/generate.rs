use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use quad_core::config::parse_target_count;
use quad_core::document::{self, Layout};
use quad_core::generator;
use quad_core::{GeneratorConfig, QuadTree};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::cli::GenerateArgs;

pub const PROMPT: &str = "Enter the number of quads (4-40 million): ";
pub const INVALID_COUNT: &str =
    "Invalid number of quads. Please enter a value between 4 and 40 million.";

/// Prints `PROMPT` and reads one line of input.
fn prompt_count<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String> {
    write!(out, "{PROMPT}")?;
    out.flush()?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read the number of quads")?;
    Ok(line)
}

/// Writes `tree` to `path`. A partially written file is removed on failure.
fn write_document(path: &Path, tree: &QuadTree, layout: Layout) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    if let Err(err) = document::write_json(tree, file, layout) {
        let _ = fs::remove_file(path);
        return Err(err).with_context(|| format!("failed to write {}", path.display()));
    }
    Ok(())
}

/// Runs the generate command and returns the absolute path written.
///
/// The target count comes from `--count` or, failing that, from a prompt
/// on `input`. Nothing is generated or written unless it passes the range
/// check.
pub fn run_generate<R: BufRead, W: Write>(
    args: GenerateArgs,
    input: &mut R,
    out: &mut W,
) -> Result<PathBuf> {
    let raw = match args.count {
        Some(count) => count,
        None => prompt_count(input, out)?,
    };
    let target_count = parse_target_count(&raw).map_err(|err| {
        debug!(%err, "rejected target count");
        anyhow!(INVALID_COUNT)
    })?;

    let config = GeneratorConfig {
        max_depth: args.max_depth,
        target_count,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, ?config, "generating quadtree");

    let mut rng = StdRng::seed_from_u64(seed);
    let (tree, report) = generator::generate(&config, &mut rng);
    if report.saturated {
        info!(
            nodes = report.nodes,
            max_depth = config.max_depth,
            "tree saturated before reaching target"
        );
    }

    let layout = if args.compact {
        Layout::Compact
    } else {
        Layout::Pretty
    };
    write_document(&args.output, &tree, layout)?;

    let written = std::path::absolute(&args.output)
        .with_context(|| format!("failed to resolve {}", args.output.display()))?;
    writeln!(out, "QuadTree JSON exported to {}", written.display())?;
    Ok(written)
}
