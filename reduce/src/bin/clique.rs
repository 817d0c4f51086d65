use anyhow::Result;
use clap::Parser;
use reduce::{cli::OracleArgs, Clique};

/// Reads `N M K` and M edges from stdin and answers whether the graph has a
/// clique of K vertices.
#[derive(Parser)]
#[command(name = "clique")]
struct Cli {
  #[command(flatten)]
  oracle: OracleArgs,
}

fn main() -> Result<()> {
  env_logger::init();
  let cli = Cli::parse();
  reduce::cli::solve(&cli.oracle, |p| Clique::new(p.vertices, p.k))
}
