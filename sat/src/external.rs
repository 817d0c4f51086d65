use std::{
  fs, io,
  path::Path,
  process::{Child, Command, ExitStatus, Stdio},
  time::{Duration, Instant},
};

use crossbeam::channel::{after, never, select, tick};
use lib::sat::{Outcome, CNF};
use log::{debug, info, warn};

use crate::{Oracle, OracleConfig, OracleError};

const POLL: Duration = Duration::from_millis(10);

/// Talks to a solver process through files: the formula goes to `cnf_path`,
/// the answer is read back from `sol_path` once the process exits.
pub struct ExternalOracle {
  config: OracleConfig,
}

impl ExternalOracle {
  pub fn new(config: OracleConfig) -> Self {
    Self { config }
  }

  fn command(&self) -> &str {
    self.config.command.as_deref().unwrap_or("sat_oracle")
  }

  fn args(&self) -> Vec<String> {
    let cnf = self.config.cnf_path.display().to_string();
    let sol = self.config.sol_path.display().to_string();
    self
      .config
      .args
      .iter()
      .map(|a| a.replace("{cnf}", &cnf).replace("{sol}", &sol))
      .collect()
  }

  fn wait(&self, child: &mut Child) -> Result<ExitStatus, OracleError> {
    let ticker = tick(POLL);
    let deadline = match self.config.timeout_secs {
      Some(secs) => after(Duration::from_secs(secs)),
      None => never::<Instant>(),
    };
    loop {
      select! {
        recv(ticker) -> _ => {
          match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
              warn!("lost track of {}: {e}, killing it", self.command());
              reap(child);
              return Err(e.into());
            }
          }
        },
        recv(deadline) -> _ => {
          let secs = self.config.timeout_secs.unwrap_or_default();
          warn!("{} timed out after {secs}s, killing it", self.command());
          reap(child);
          return Err(OracleError::Timeout {
            command: self.command().to_string(),
            secs,
          });
        },
      }
    }
  }
}

// best effort: the child may already have exited
fn reap(child: &mut Child) {
  if let Err(e) = child.kill() {
    debug!("kill: {e}");
  }
  if let Err(e) = child.wait() {
    debug!("wait: {e}");
  }
}

fn file_error(path: &Path) -> impl FnOnce(io::Error) -> OracleError + '_ {
  move |source| OracleError::File {
    path: path.to_path_buf(),
    source,
  }
}

impl Oracle for ExternalOracle {
  fn ask(&self, cnf: &CNF) -> Result<Outcome, OracleError> {
    let cnf_path = &self.config.cnf_path;
    let sol_path = &self.config.sol_path;

    fs::write(cnf_path, cnf.to_string()).map_err(file_error(cnf_path))?;
    debug!("wrote {} clauses to {}", cnf.clause_count(), cnf_path.display());

    // a stale answer from an earlier run must not be mistaken for this one
    match fs::remove_file(sol_path) {
      Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(file_error(sol_path)(e)),
      _ => {}
    }

    let args = self.args();
    info!("asking {} {}", self.command(), args.join(" "));
    let mut child = Command::new(self.command())
      .args(&args)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .spawn()
      .map_err(|source| OracleError::Launch {
        command: self.command().to_string(),
        source,
      })?;

    let status = self.wait(&mut child)?;
    if !status.success() {
      // several solvers report the verdict through the exit code
      warn!("{} exited with {status}", self.command());
    }

    let text = fs::read_to_string(sol_path).map_err(file_error(sol_path))?;
    Ok(Outcome::parse(&text)?)
  }
}
