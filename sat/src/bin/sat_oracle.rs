use std::fs;

use anyhow::{Context, Result};
use lib::sat::CNF;
use sat::{Dpll, Oracle};

// sat_oracle [cnf] [sol]: answers one formula through the file protocol
fn main() -> Result<()> {
  env_logger::init();
  let mut args = std::env::args().skip(1);
  let cnf_path = args.next().unwrap_or_else(|| "sat.cnf".to_string());
  let sol_path = args.next().unwrap_or_else(|| "sat.sol".to_string());

  let text = fs::read_to_string(&cnf_path).with_context(|| format!("reading {cnf_path}"))?;
  let cnf = CNF::parse_dimacs(&text).with_context(|| format!("parsing {cnf_path}"))?;
  let outcome = Dpll.ask(&cnf)?;
  log::info!("{cnf_path}: {}", if outcome.is_satisfiable() { "sat" } else { "unsat" });
  fs::write(&sol_path, outcome.to_string()).with_context(|| format!("writing {sol_path}"))?;
  Ok(())
}
