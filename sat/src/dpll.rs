use std::collections::{BTreeSet, VecDeque};

use lib::sat::{Literal, Variable, CNF};

struct DpllState<'a> {
  cnf: &'a CNF,

  stack: Vec<DpllAction>,

  // indexed by variable, slot 0 unused
  values: Vec<Option<bool>>,
  variable_infos: Vec<VariableInfo>,

  unprocessed_assignments: VecDeque<Literal>,

  // todo: pick the variable occurring in most unresolved clauses instead of the smallest
  unassigned_variables: BTreeSet<Variable>,
}

enum DpllAction {
  // a branching choice that can still be flipped
  Decide(Literal),
  // forced by propagation or by flipping a decision
  Imply(Literal),
}

#[derive(Default)]
struct VariableInfo {
  positive_clauses: Vec<usize>,
  negative_clauses: Vec<usize>,
}

enum ClauseState {
  Satisfied,
  Unit(Literal),
  Open,
  Conflict,
}

impl<'a> DpllState<'a> {
  fn new(cnf: &'a CNF) -> Self {
    let mut variable_infos: Vec<VariableInfo> = (0..=cnf.var_count).map(|_| VariableInfo::default()).collect();
    for (ix, clause) in cnf.clauses.iter().enumerate() {
      for &literal in clause {
        let info = &mut variable_infos[literal.unsigned_abs() as usize];
        if literal > 0 {
          info.positive_clauses.push(ix);
        } else {
          info.negative_clauses.push(ix);
        }
      }
    }
    Self {
      cnf,
      stack: vec![],
      values: vec![None; cnf.var_count + 1],
      variable_infos,
      unprocessed_assignments: VecDeque::new(),
      unassigned_variables: (1..=cnf.var_count as Variable).collect(),
    }
  }

  fn value(&self, literal: Literal) -> Option<bool> {
    self.values[literal.unsigned_abs() as usize].map(|v| v == (literal > 0))
  }

  fn assign(&mut self, action: DpllAction) {
    let literal = match action {
      DpllAction::Decide(l) | DpllAction::Imply(l) => l,
    };
    let var = literal.abs();
    self.values[var as usize] = Some(literal > 0);
    self.unassigned_variables.remove(&var);
    self.unprocessed_assignments.push_back(literal);
    self.stack.push(action);
  }

  fn unassign(&mut self, literal: Literal) {
    let var = literal.abs();
    self.values[var as usize] = None;
    self.unassigned_variables.insert(var);
  }

  fn clause_state(&self, ix: usize) -> ClauseState {
    let mut unassigned = None;
    let mut open = 0;
    for &literal in self.cnf.clauses[ix].iter() {
      match self.value(literal) {
        Some(true) => return ClauseState::Satisfied,
        Some(false) => {}
        None => {
          open += 1;
          unassigned = Some(literal);
        }
      }
    }
    match (open, unassigned) {
      (0, _) => ClauseState::Conflict,
      (1, Some(l)) => ClauseState::Unit(l),
      _ => ClauseState::Open,
    }
  }

  // seeds the queue with unit clauses; false if the formula is trivially unsat
  fn initialise(&mut self) -> bool {
    for ix in 0..self.cnf.clauses.len() {
      match self.clause_state(ix) {
        ClauseState::Conflict => return false,
        ClauseState::Unit(l) => self.assign(DpllAction::Imply(l)),
        _ => {}
      }
    }
    true
  }

  // returns false on conflict
  fn unit_propagate(&mut self) -> bool {
    while let Some(literal) = self.unprocessed_assignments.pop_front() {
      let info = &self.variable_infos[literal.unsigned_abs() as usize];
      // only clauses containing the now false literal can become unit
      let watched = if literal > 0 {
        info.negative_clauses.clone()
      } else {
        info.positive_clauses.clone()
      };
      for ix in watched {
        match self.clause_state(ix) {
          ClauseState::Conflict => return false,
          ClauseState::Unit(l) => self.assign(DpllAction::Imply(l)),
          _ => {}
        }
      }
    }
    true
  }

  // undo up to the most recent decision and flip it; false when none is left
  fn backtrack(&mut self) -> bool {
    self.unprocessed_assignments.clear();
    while let Some(action) = self.stack.pop() {
      match action {
        DpllAction::Imply(l) => self.unassign(l),
        DpllAction::Decide(l) => {
          self.unassign(l);
          self.assign(DpllAction::Imply(-l));
          return true;
        }
      }
    }
    false
  }

  fn model(&self) -> Vec<Literal> {
    (1..=self.cnf.var_count)
      .map(|v| {
        if self.values[v] == Some(true) {
          v as Literal
        } else {
          -(v as Literal)
        }
      })
      .collect()
  }

  fn run(mut self) -> Option<Vec<Literal>> {
    if !self.initialise() {
      return None;
    }
    loop {
      if !self.unit_propagate() {
        if !self.backtrack() {
          return None;
        }
        continue;
      }
      match self.unassigned_variables.first().copied() {
        None => return Some(self.model()),
        Some(var) => self.assign(DpllAction::Decide(-var)),
      }
    }
  }
}

/// Full assignment (one signed value per variable) if `cnf` is satisfiable.
pub fn solve(cnf: &CNF) -> Option<Vec<Literal>> {
  DpllState::new(cnf).run()
}

pub fn satisfies(cnf: &CNF, model: &[Literal]) -> bool {
  cnf.clauses.iter().all(|clause| {
    clause
      .iter()
      .any(|&l| model.get(l.unsigned_abs() as usize - 1).map(|&v| v == l).unwrap_or(false))
  })
}
