//! k-clique and k-coloring as SAT: encode the graph question as CNF, hand it
//! to an oracle and read the graph answer back out of the assignment.

use std::fmt::Display;

use lib::{
  graph::render::Paint,
  sat::{Literal, Outcome, VarMap, CNF},
  Graph, Vertex,
};
use thiserror::Error;

pub mod cli;
pub mod clique;
pub mod coloring;
pub mod pipeline;
pub mod problem;

pub use clique::Clique;
pub use coloring::Coloring;
pub use problem::Problem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
  MalformedAssignment,
  InconsistentDecoding,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
  #[error("assignment has {found} values, expected {expected}")]
  AssignmentLength { expected: usize, found: usize },
  #[error("assignment value {value} is outside 1..={var_count}")]
  UnknownVariable { value: Literal, var_count: usize },
  #[error("assignment value {value} at position {position} names the wrong variable")]
  Misplaced { position: usize, value: Literal },
  #[error("clique slot {0} holds no vertex")]
  EmptySlot(usize),
  #[error("vertex {vertex} fills clique slots {first} and {second}")]
  RepeatedVertex {
    vertex: Vertex,
    first: usize,
    second: usize,
  },
  #[error("vertex {vertex} has colors {first} and {second}")]
  ConflictingColors {
    vertex: Vertex,
    first: usize,
    second: usize,
  },
  #[error("only {colored} of {expected} vertices received a color")]
  Uncolored { colored: usize, expected: usize },
}

impl DecodeError {
  pub fn kind(&self) -> DecodeErrorKind {
    match self {
      DecodeError::AssignmentLength { .. }
      | DecodeError::UnknownVariable { .. }
      | DecodeError::Misplaced { .. } => DecodeErrorKind::MalformedAssignment,
      _ => DecodeErrorKind::InconsistentDecoding,
    }
  }
}

/// Answer to the graph decision problem. An infeasible instance is a valid
/// "no", not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision<T> {
  Infeasible,
  Feasible(T),
}

impl<T> Decision<T> {
  pub fn is_feasible(&self) -> bool {
    matches!(self, Decision::Feasible(_))
  }

  pub fn answer(&self) -> Option<&T> {
    match self {
      Decision::Feasible(a) => Some(a),
      Decision::Infeasible => None,
    }
  }
}

/// Values printed on the line after `True`.
pub trait AnswerLine {
  fn row(&self) -> Vec<usize>;
}

impl<T: AnswerLine> Display for Decision<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Decision::Infeasible => write!(f, "False"),
      Decision::Feasible(answer) => {
        let row: Vec<String> = answer.row().iter().map(|v| v.to_string()).collect();
        write!(f, "True\n{}", row.join(" "))
      }
    }
  }
}

pub trait Reduction {
  type Answer: AnswerLine;

  fn var_map(&self) -> VarMap;

  fn encode(&self, g: &Graph) -> CNF;

  fn decode(&self, outcome: &Outcome) -> Result<Decision<Self::Answer>, DecodeError>;

  // how a vertex is drawn once the answer is known
  fn paint(&self, answer: &Self::Answer, v: Vertex) -> Option<Paint>;
}

/// True variables of a satisfying assignment, `None` when there is none.
/// Fails unless position `p` of the row holds `±p`, for every variable of `map`.
pub(crate) fn true_variables(map: &VarMap, outcome: &Outcome) -> Result<Option<Vec<Literal>>, DecodeError> {
  let values = match outcome {
    Outcome::Unsatisfiable => return Ok(None),
    Outcome::Satisfiable(values) => values,
  };
  if values.len() != map.var_count() {
    return Err(DecodeError::AssignmentLength {
      expected: map.var_count(),
      found: values.len(),
    });
  }
  for (ix, &value) in values.iter().enumerate() {
    let var = value.unsigned_abs();
    if var == 0 || var > map.var_count() as u64 {
      return Err(DecodeError::UnknownVariable {
        value,
        var_count: map.var_count(),
      });
    }
    if var != ix as u64 + 1 {
      return Err(DecodeError::Misplaced { position: ix + 1, value });
    }
  }
  Ok(Some(values.iter().copied().filter(|&x| x > 0).collect()))
}
