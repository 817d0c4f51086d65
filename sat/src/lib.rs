//! The oracle side of the reductions: something that takes a CNF formula and
//! answers `True` with an assignment or `False`.

use std::{
  fs,
  path::{Path, PathBuf},
};

use lib::sat::{Outcome, ParseError, CNF};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod dpll;
pub mod external;

pub use external::ExternalOracle;

#[derive(Debug, Error)]
pub enum OracleError {
  #[error("{}: {}", .path.display(), .source)]
  File {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("could not launch `{command}`: {source}")]
  Launch {
    command: String,
    source: std::io::Error,
  },
  #[error("`{command}` did not answer within {secs}s")]
  Timeout { command: String, secs: u64 },
  #[error("bad solver answer: {0}")]
  Answer(#[from] ParseError),
  #[error("bad config: {0}")]
  Config(#[from] toml::de::Error),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub trait Oracle {
  fn ask(&self, cnf: &CNF) -> Result<Outcome, OracleError>;
}

/// In-process DPLL, used when no external solver is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dpll;

impl Oracle for Dpll {
  fn ask(&self, cnf: &CNF) -> Result<Outcome, OracleError> {
    log::debug!("dpll on {} vars, {} clauses", cnf.var_count, cnf.clause_count());
    Ok(match dpll::solve(cnf) {
      Some(model) => Outcome::Satisfiable(model),
      None => Outcome::Unsatisfiable,
    })
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
  // no command means the in-process solver
  pub command: Option<String>,
  // `{cnf}` and `{sol}` are replaced by the artifact paths
  pub args: Vec<String>,
  pub cnf_path: PathBuf,
  pub sol_path: PathBuf,
  pub timeout_secs: Option<u64>,
}

impl Default for OracleConfig {
  fn default() -> Self {
    Self {
      command: None,
      args: vec![],
      cnf_path: PathBuf::from("sat.cnf"),
      sol_path: PathBuf::from("sat.sol"),
      timeout_secs: None,
    }
  }
}

impl OracleConfig {
  pub fn parse(text: &str) -> Result<Self, OracleError> {
    Ok(toml::from_str(text)?)
  }

  pub fn load(path: &Path) -> Result<Self, OracleError> {
    let text = fs::read_to_string(path).map_err(|source| OracleError::File {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&text)
  }

  pub fn oracle(&self) -> Box<dyn Oracle> {
    match &self.command {
      Some(_) => Box::new(ExternalOracle::new(self.clone())),
      None => Box::new(Dpll),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_defaults() {
    let config = OracleConfig::parse("").unwrap();
    assert_eq!(config, OracleConfig::default());
    assert_eq!(config.cnf_path, PathBuf::from("sat.cnf"));
    assert_eq!(config.sol_path, PathBuf::from("sat.sol"));
  }

  #[test]
  fn config_from_toml() {
    let config = OracleConfig::parse(
      r#"
command = "minisat"
args = ["{cnf}", "{sol}"]
timeout_secs = 30
"#,
    )
    .unwrap();
    assert_eq!(config.command.as_deref(), Some("minisat"));
    assert_eq!(config.args, vec!["{cnf}", "{sol}"]);
    assert_eq!(config.timeout_secs, Some(30));
    assert_eq!(config.sol_path, PathBuf::from("sat.sol"));
  }

  #[test]
  fn config_rejects_unknown_types() {
    assert!(matches!(OracleConfig::parse("timeout_secs = \"soon\""), Err(OracleError::Config(_))));
  }

  #[test]
  fn dpll_oracle_answers() {
    let mut cnf = CNF::new(2);
    cnf.add_clause(vec![1]);
    cnf.add_clause(vec![-1, -2]);
    assert_eq!(Dpll.ask(&cnf).unwrap(), Outcome::Satisfiable(vec![1, -2]));
    cnf.add_clause(vec![-1]);
    assert_eq!(Dpll.ask(&cnf).unwrap(), Outcome::Unsatisfiable);
  }
}
