use lib::Graph;
use log::{debug, info};
use sat::{Oracle, OracleError};
use thiserror::Error;

use crate::{DecodeError, Decision, Reduction};

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("oracle failed: {0}")]
  Oracle(#[from] OracleError),
  #[error("could not decode the oracle's answer: {0}")]
  Decode(#[from] DecodeError),
}

/// Graph -> CNF -> oracle -> assignment -> graph answer.
pub fn run<R, O>(reduction: &R, g: &Graph, oracle: &O) -> Result<Decision<R::Answer>, PipelineError>
where
  R: Reduction + ?Sized,
  O: Oracle + ?Sized,
{
  let cnf = reduction.encode(g);
  info!(
    "encoded {} vertices into {} variables, {} clauses",
    reduction.var_map().vertices,
    cnf.var_count,
    cnf.clause_count()
  );

  let outcome = oracle.ask(&cnf)?;
  debug!("oracle says {}", if outcome.is_satisfiable() { "sat" } else { "unsat" });

  let decision = reduction.decode(&outcome)?;
  info!("{}", if decision.is_feasible() { "feasible" } else { "infeasible" });
  Ok(decision)
}

#[cfg(test)]
mod tests {
  use lib::sat::{Outcome, CNF};
  use sat::Dpll;

  use super::*;
  use crate::{Clique, Coloring, DecodeErrorKind, Problem};

  struct Canned(Outcome);

  impl Oracle for Canned {
    fn ask(&self, _cnf: &CNF) -> Result<Outcome, OracleError> {
      Ok(self.0.clone())
    }
  }

  #[test]
  fn clique_end_to_end() {
    let p = Problem::parse("5 6 3\n1 2\n2 3\n1 3\n3 4\n4 5\n3 5\n").unwrap();
    let decision = run(&Clique::new(p.vertices, p.k), &p.graph(), &Dpll).unwrap();
    let Decision::Feasible(clique) = &decision else {
      panic!("expected a clique")
    };
    assert!(*clique == vec![1, 2, 3] || *clique == vec![3, 4, 5]);
  }

  #[test]
  fn coloring_end_to_end() {
    let p = Problem::parse("3 3 2\n1 2\n2 3\n1 3\n").unwrap();
    let decision = run(&Coloring::new(p.vertices, p.k), &p.graph(), &Dpll).unwrap();
    assert_eq!(decision.to_string(), "False");
  }

  #[test]
  fn boxed_oracles_work() {
    let p = Problem::parse("2 1 2\n1 2\n").unwrap();
    let oracle: Box<dyn Oracle> = Box::new(Dpll);
    let decision = run(&Coloring::new(p.vertices, p.k), &p.graph(), oracle.as_ref()).unwrap();
    assert!(decision.is_feasible());
  }

  #[test]
  fn broken_answers_are_not_a_no() {
    let g = Graph::from_edges(&[(1, 2)]);
    // vertex 2 left without a color
    let oracle = Canned(Outcome::Satisfiable(vec![1, -2, -3, -4]));
    match run(&Coloring::new(2, 2), &g, &oracle) {
      Err(PipelineError::Decode(e)) => assert_eq!(e.kind(), DecodeErrorKind::InconsistentDecoding),
      other => panic!("unexpected {other:?}"),
    }
  }
}
