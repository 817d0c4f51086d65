use fixedbitset::FixedBitSet;
use lib::{
  graph::render::Paint,
  sat::{Outcome, VarMap, CNF},
  Graph, Vertex,
};

use crate::{true_variables, AnswerLine, DecodeError, Decision, Reduction};

/// Does the graph on vertices `1..=vertices` contain a clique of `size`
/// vertices? Variable `var(i, v)` reads "clique position `i` is vertex `v`".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clique {
  pub vertices: usize,
  pub size: usize,
}

fn pairs(k: usize) -> usize {
  k * k.saturating_sub(1) / 2
}

impl Clique {
  pub fn new(vertices: usize, size: usize) -> Self {
    Self { vertices, size }
  }

  /// Number of clauses `encode` emits for `g`.
  pub fn clause_count(&self, g: &Graph) -> usize {
    let n = self.vertices;
    let non_edges = (1..=n)
      .flat_map(|v| (v + 1..=n).map(move |w| (v, w)))
      .filter(|&(v, w)| !g.has_edge(v, w))
      .count();
    self.size + 2 * non_edges * pairs(self.size) + pairs(self.size) * n
  }
}

impl AnswerLine for Vec<Vertex> {
  fn row(&self) -> Vec<usize> {
    self.clone()
  }
}

impl Reduction for Clique {
  type Answer = Vec<Vertex>;

  fn var_map(&self) -> VarMap {
    VarMap::new(self.size, self.vertices)
  }

  fn encode(&self, g: &Graph) -> CNF {
    let (n, k) = (self.vertices, self.size);
    let map = self.var_map();
    let mut cnf = CNF::new(map.var_count());

    // every position holds some vertex
    for i in 1..=k {
      cnf.add_clause((1..=n).map(|v| map.var(i, v)).collect());
    }

    // two positions cannot hold non adjacent vertices, in either order
    for i in 1..=k {
      for j in i + 1..=k {
        for v in 1..=n {
          for w in v + 1..=n {
            if !g.has_edge(v, w) {
              cnf.add_clause(vec![-map.var(i, v), -map.var(j, w)]);
              cnf.add_clause(vec![-map.var(i, w), -map.var(j, v)]);
            }
          }
        }
      }
    }

    // two positions cannot hold the same vertex
    for i in 1..=k {
      for j in i + 1..=k {
        for v in 1..=n {
          cnf.add_clause(vec![-map.var(i, v), -map.var(j, v)]);
        }
      }
    }

    debug_assert_eq!(cnf.clause_count(), self.clause_count(g));
    cnf
  }

  /// Each position is represented by its first true vertex, so the answer
  /// always has `size` vertices even if the solver sets a position twice.
  fn decode(&self, outcome: &Outcome) -> Result<Decision<Vec<Vertex>>, DecodeError> {
    let map = self.var_map();
    let Some(true_vars) = true_variables(&map, outcome)? else {
      return Ok(Decision::Infeasible);
    };

    let mut holder: Vec<Option<Vertex>> = vec![None; self.size + 1];
    for x in true_vars {
      if let Some((i, v)) = map.decode(x) {
        if holder[i].is_none() {
          holder[i] = Some(v);
        }
      }
    }

    let mut seen = FixedBitSet::with_capacity(self.vertices + 1);
    let mut clique = Vec::with_capacity(self.size);
    for i in 1..=self.size {
      let v = holder[i].ok_or(DecodeError::EmptySlot(i))?;
      if seen.put(v) {
        let first = (1..i).find(|&j| holder[j] == Some(v)).unwrap_or(i);
        return Err(DecodeError::RepeatedVertex {
          vertex: v,
          first,
          second: i,
        });
      }
      clique.push(v);
    }
    clique.sort_unstable();
    Ok(Decision::Feasible(clique))
  }

  fn paint(&self, answer: &Vec<Vertex>, v: Vertex) -> Option<Paint> {
    if answer.contains(&v) {
      Some(Paint::fill("salmon"))
    } else {
      None
    }
  }
}
