use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quad_core::config::DEFAULT_MAX_DEPTH;
use quad_core::types::Depth;

use crate::generate::run_generate;
use crate::inspect::run_inspect;

pub const DEFAULT_OUTPUT: &str = "quadtree.json";

#[derive(Debug, Parser)]
#[command(
    name = "quad-gen",
    about = "Generate a random quadtree and export it as JSON",
    version,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Grow a tree and write it to a file (the default).
    Generate(GenerateArgs),

    /// Validate a quadtree document and print its shape.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Target node count (4 to 40,000,000). Prompted for when omitted.
    #[arg(long, short = 'n', allow_hyphen_values = true)]
    pub count: Option<String>,

    /// Deepest level any node may reach.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: Depth,

    /// Seed for the random source; a random seed is used when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write the document.
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Write JSON without indentation.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Document to read.
    pub path: PathBuf,

    /// Deepest level the document may contain.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: Depth,
}

pub fn run<R: BufRead, W: Write>(cli: Cli, input: &mut R, out: &mut W) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args, input, out).map(|_| ()),
        Some(Commands::Inspect(args)) => run_inspect(args, out),
        None => run_generate(cli.generate, input, out).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_uses_reference_defaults() {
        let cli = Cli::try_parse_from(["quad-gen"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.count, None);
        assert_eq!(cli.generate.max_depth, 20);
        assert_eq!(cli.generate.seed, None);
        assert_eq!(cli.generate.output, PathBuf::from("quadtree.json"));
        assert!(!cli.generate.compact);
    }

    #[test]
    fn top_level_flags_configure_generation() {
        let cli = Cli::try_parse_from([
            "quad-gen",
            "--count",
            "100",
            "--max-depth",
            "5",
            "--seed",
            "9",
            "-o",
            "out.json",
            "--compact",
        ])
        .unwrap();
        assert_eq!(cli.generate.count.as_deref(), Some("100"));
        assert_eq!(cli.generate.max_depth, 5);
        assert_eq!(cli.generate.seed, Some(9));
        assert_eq!(cli.generate.output, PathBuf::from("out.json"));
        assert!(cli.generate.compact);
    }

    #[test]
    fn negative_count_reaches_range_check() {
        let cli = Cli::try_parse_from(["quad-gen", "--count", "-5"]).unwrap();
        assert_eq!(cli.generate.count.as_deref(), Some("-5"));
    }

    #[test]
    fn inspect_subcommand_parses_path() {
        let cli = Cli::try_parse_from(["quad-gen", "inspect", "tree.json", "--max-depth", "3"]).unwrap();
        match cli.command {
            Some(Commands::Inspect(args)) => {
                assert_eq!(args.path, PathBuf::from("tree.json"));
                assert_eq!(args.max_depth, 3);
            }
            other => panic!("expected inspect, got {other:?}"),
        }
    }

    #[test]
    fn generate_subcommand_is_explicit_form() {
        let cli = Cli::try_parse_from(["quad-gen", "generate", "-n", "8"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Generate(GenerateArgs { ref count, .. })) if count.as_deref() == Some("8")
        ));
    }
}
