use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use lib::graph::render::{render_graph, save_dot};
use sat::OracleConfig;

use crate::{pipeline, Decision, Problem, Reduction};

/// Oracle and output flags shared by the `clique` and `coloring` binaries.
#[derive(Args, Debug, Default)]
pub struct OracleArgs {
  /// TOML file with oracle settings (command, args, cnf_path, sol_path, timeout_secs)
  #[arg(long)]
  pub config: Option<PathBuf>,

  /// External SAT solver; without one the built-in solver is used
  #[arg(long)]
  pub solver: Option<String>,

  /// Argument for the solver, `{cnf}` and `{sol}` expand to the artifact paths
  #[arg(long = "solver-arg", allow_hyphen_values = true)]
  pub solver_args: Vec<String>,

  /// Where the formula is written for the solver
  #[arg(long)]
  pub cnf: Option<PathBuf>,

  /// Where the solver leaves its answer
  #[arg(long)]
  pub sol: Option<PathBuf>,

  /// Seconds to wait for the solver before killing it
  #[arg(long)]
  pub timeout: Option<u64>,

  /// Write the graph with the answer highlighted as Graphviz DOT
  #[arg(long)]
  pub dot: Option<PathBuf>,
}

impl OracleArgs {
  /// Config file first, flags on top.
  pub fn oracle_config(&self) -> Result<OracleConfig> {
    let mut config = match &self.config {
      Some(path) => OracleConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
      None => OracleConfig::default(),
    };
    if let Some(solver) = &self.solver {
      config.command = Some(solver.clone());
    }
    if !self.solver_args.is_empty() {
      config.args = self.solver_args.clone();
    }
    if let Some(cnf) = &self.cnf {
      config.cnf_path = cnf.clone();
    }
    if let Some(sol) = &self.sol {
      config.sol_path = sol.clone();
    }
    if self.timeout.is_some() {
      config.timeout_secs = self.timeout;
    }
    Ok(config)
  }
}

/// Reads the instance from stdin, runs the reduction and prints the answer.
pub fn solve<R, F>(args: &OracleArgs, make: F) -> Result<()>
where
  R: Reduction,
  F: FnOnce(&Problem) -> R,
{
  let problem = Problem::read(io::stdin().lock()).context("reading the instance from stdin")?;
  let g = problem.graph();
  let reduction = make(&problem);

  let config = args.oracle_config()?;
  log::debug!("oracle config {config:?}");
  let oracle = config.oracle();

  let decision = pipeline::run(&reduction, &g, oracle.as_ref())?;
  println!("{decision}");

  if let Some(path) = &args.dot {
    let dot = match &decision {
      Decision::Feasible(answer) => render_graph(&g, problem.vertices, |v| reduction.paint(answer, v)),
      Decision::Infeasible => render_graph(&g, problem.vertices, |_| None),
    };
    save_dot(&dot, path).with_context(|| format!("writing {}", path.display()))?;
  }
  Ok(())
}
