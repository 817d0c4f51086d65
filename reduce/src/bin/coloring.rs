use anyhow::Result;
use clap::Parser;
use reduce::{cli::OracleArgs, Coloring};

/// Reads `N M K` and M edges from stdin and answers whether the graph can be
/// colored with K colors; on success prints the color of every vertex.
#[derive(Parser)]
#[command(name = "coloring")]
struct Cli {
  #[command(flatten)]
  oracle: OracleArgs,
}

fn main() -> Result<()> {
  env_logger::init();
  let cli = Cli::parse();
  reduce::cli::solve(&cli.oracle, |p| Coloring::new(p.vertices, p.k))
}
