use std::fmt::Display;

use thiserror::Error;

use crate::graph::Vertex;

pub type Literal = i64;
pub type Variable = i64;
pub type Clause = Vec<Literal>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("missing `p cnf` header")]
  MissingHeader,
  #[error("bad header `{0}`")]
  BadHeader(String),
  #[error("line {line}: `{token}` is not an integer")]
  BadToken { line: usize, token: String },
  #[error("line {line}: literal {literal} outside 1..={var_count}")]
  UnknownVariable {
    line: usize,
    literal: Literal,
    var_count: usize,
  },
  #[error("header declares {declared} clauses, found {found}")]
  ClauseCount { declared: usize, found: usize },
  #[error("expected `True` or `False`, found `{0}`")]
  BadVerdict(String),
  #[error("missing {0} line")]
  MissingLine(&'static str),
  #[error("declared {declared} values, found {found}")]
  MalformedAssignment { declared: usize, found: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CNF {
  pub var_count: usize,
  // variables are numbered 1, 2, 3...
  // negative signify negated var
  pub clauses: Vec<Clause>,
}

impl CNF {
  pub fn new(vc: usize) -> Self {
    Self {
      var_count: vc,
      clauses: vec![],
    }
  }

  pub fn add_clause(&mut self, clause: Clause) {
    debug_assert!(
      clause.iter().all(|c| *c != 0 && c.unsigned_abs() as usize <= self.var_count),
      "unknown variable in {clause:?}"
    );
    self.clauses.push(clause);
  }

  pub fn clause_count(&self) -> usize {
    self.clauses.len()
  }

  /// Reads the DIMACS text written by `Display`. Clauses may span lines and
  /// `c` comment lines are ignored.
  pub fn parse_dimacs(text: &str) -> Result<Self, ParseError> {
    let mut cnf: Option<(CNF, usize)> = None;
    let mut current = vec![];

    for (ix, line) in text.lines().enumerate() {
      let line_no = ix + 1;
      let line = line.trim();
      if line.is_empty() || line.starts_with('c') || line.starts_with('%') {
        continue;
      }
      if line.starts_with('p') {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 4 || parts[1] != "cnf" {
          return Err(ParseError::BadHeader(line.to_string()));
        }
        let vars = parts[2].parse().map_err(|_| ParseError::BadHeader(line.to_string()))?;
        let clauses = parts[3].parse().map_err(|_| ParseError::BadHeader(line.to_string()))?;
        cnf = Some((CNF::new(vars), clauses));
        continue;
      }
      let (formula, _) = cnf.as_mut().ok_or(ParseError::MissingHeader)?;
      for token in line.split_whitespace() {
        let literal: Literal = token.parse().map_err(|_| ParseError::BadToken {
          line: line_no,
          token: token.to_string(),
        })?;
        if literal == 0 {
          formula.clauses.push(std::mem::take(&mut current));
        } else if literal.unsigned_abs() as usize > formula.var_count {
          return Err(ParseError::UnknownVariable {
            line: line_no,
            literal,
            var_count: formula.var_count,
          });
        } else {
          current.push(literal);
        }
      }
    }

    let (mut formula, declared) = cnf.ok_or(ParseError::MissingHeader)?;
    // a trailing clause without its terminating 0
    if !current.is_empty() {
      formula.clauses.push(current);
    }
    if formula.clauses.len() != declared {
      return Err(ParseError::ClauseCount {
        declared,
        found: formula.clauses.len(),
      });
    }
    Ok(formula)
  }
}

impl Display for CNF {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "p cnf {} {}", self.var_count, self.clauses.len())?;
    for clause in self.clauses.iter() {
      for literal in clause {
        write!(f, "{literal} ")?;
      }
      writeln!(f, "0")?;
    }
    Ok(())
  }
}

/// Numbers the propositions "slot `i` holds vertex `v`" for `i` in `1..=slots`
/// and `v` in `1..=vertices`. Slots are clique positions or colors depending
/// on the reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarMap {
  pub slots: usize,
  pub vertices: usize,
}

impl VarMap {
  pub fn new(slots: usize, vertices: usize) -> Self {
    Self { slots, vertices }
  }

  pub fn var_count(&self) -> usize {
    self.slots * self.vertices
  }

  pub fn var(&self, i: usize, v: Vertex) -> Variable {
    debug_assert!((1..=self.slots).contains(&i) && (1..=self.vertices).contains(&v));
    ((i - 1) + self.slots * (v - 1) + 1) as Variable
  }

  pub fn vertex_of(&self, x: Variable) -> Vertex {
    let x = x as usize;
    if x % self.slots == 0 {
      x / self.slots
    } else {
      x / self.slots + 1
    }
  }

  pub fn slot_of(&self, x: Variable) -> usize {
    (x as usize - 1) % self.slots + 1
  }

  pub fn contains(&self, x: Variable) -> bool {
    x >= 1 && x as usize <= self.var_count()
  }

  /// Inverse of `var`, `None` outside `1..=var_count`.
  pub fn decode(&self, x: Variable) -> Option<(usize, Vertex)> {
    if self.contains(x) {
      Some((self.slot_of(x), self.vertex_of(x)))
    } else {
      None
    }
  }
}

/// What the oracle answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
  Unsatisfiable,
  // one signed value per variable, in variable order
  Satisfiable(Vec<Literal>),
}

impl Outcome {
  pub fn parse(text: &str) -> Result<Self, ParseError> {
    let mut lines = text.lines();
    let verdict = lines.next().ok_or(ParseError::MissingLine("verdict"))?.trim();
    if verdict.eq_ignore_ascii_case("false") {
      return Ok(Outcome::Unsatisfiable);
    }
    if !verdict.eq_ignore_ascii_case("true") {
      return Err(ParseError::BadVerdict(verdict.to_string()));
    }

    let count_line = lines.next().ok_or(ParseError::MissingLine("variable count"))?.trim();
    let declared: usize = count_line.parse().map_err(|_| ParseError::BadToken {
      line: 2,
      token: count_line.to_string(),
    })?;

    let values = match lines.next() {
      Some(line) => line
        .split_whitespace()
        .map(|token| {
          token.parse().map_err(|_| ParseError::BadToken {
            line: 3,
            token: token.to_string(),
          })
        })
        .collect::<Result<Vec<Literal>, _>>()?,
      None if declared == 0 => vec![],
      None => return Err(ParseError::MissingLine("assignment")),
    };

    if values.len() != declared {
      return Err(ParseError::MalformedAssignment {
        declared,
        found: values.len(),
      });
    }
    Ok(Outcome::Satisfiable(values))
  }

  pub fn is_satisfiable(&self) -> bool {
    matches!(self, Outcome::Satisfiable(_))
  }
}

impl Display for Outcome {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Outcome::Unsatisfiable => writeln!(f, "False"),
      Outcome::Satisfiable(values) => {
        writeln!(f, "True")?;
        writeln!(f, "{}", values.len())?;
        let row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        writeln!(f, "{}", row.join(" "))
      }
    }
  }
}
