use std::collections::BTreeMap;

use lib::{
  graph::render::Paint,
  sat::{Outcome, VarMap, CNF},
  Graph, Vertex,
};

use crate::{true_variables, AnswerLine, DecodeError, Decision, Reduction};

pub type Color = usize;

/// Can vertices `1..=vertices` be given one of `colors` colors (registers)
/// so that adjacent vertices differ? Variable `var(i, v)` reads "vertex `v`
/// has color `i`".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coloring {
  pub vertices: usize,
  pub colors: usize,
}

impl Coloring {
  pub fn new(vertices: usize, colors: usize) -> Self {
    Self { vertices, colors }
  }

  fn edges<'a>(&self, g: &'a Graph) -> impl Iterator<Item = (Vertex, Vertex)> + 'a {
    let n = self.vertices;
    (1..=n)
      .flat_map(move |v| (v + 1..=n).map(move |w| (v, w)))
      .filter(move |&(v, w)| g.has_edge(v, w))
  }

  pub fn clause_count(&self, g: &Graph) -> usize {
    let (n, k) = (self.vertices, self.colors);
    n + n * (k * k.saturating_sub(1) / 2) + k * self.edges(g).count()
  }
}

impl AnswerLine for BTreeMap<Vertex, Color> {
  fn row(&self) -> Vec<usize> {
    self.values().copied().collect()
  }
}

impl Reduction for Coloring {
  type Answer = BTreeMap<Vertex, Color>;

  fn var_map(&self) -> VarMap {
    VarMap::new(self.colors, self.vertices)
  }

  fn encode(&self, g: &Graph) -> CNF {
    let (n, k) = (self.vertices, self.colors);
    let map = self.var_map();
    let mut cnf = CNF::new(map.var_count());

    for v in 1..=n {
      cnf.add_clause((1..=k).map(|i| map.var(i, v)).collect());
    }

    // at most one color per vertex
    for v in 1..=n {
      for i in 1..=k {
        for j in i + 1..=k {
          cnf.add_clause(vec![-map.var(i, v), -map.var(j, v)]);
        }
      }
    }

    let edges: Vec<_> = self.edges(g).collect();
    for i in 1..=k {
      for &(v, w) in edges.iter() {
        cnf.add_clause(vec![-map.var(i, v), -map.var(i, w)]);
      }
    }

    debug_assert_eq!(cnf.clause_count(), self.clause_count(g));
    cnf
  }

  fn decode(&self, outcome: &Outcome) -> Result<Decision<Self::Answer>, DecodeError> {
    let map = self.var_map();
    let Some(true_vars) = true_variables(&map, outcome)? else {
      return Ok(Decision::Infeasible);
    };

    let mut coloring = BTreeMap::new();
    for x in true_vars {
      let Some((color, vertex)) = map.decode(x) else {
        continue;
      };
      if let Some(first) = coloring.insert(vertex, color) {
        if first != color {
          return Err(DecodeError::ConflictingColors {
            vertex,
            first: first.min(color),
            second: first.max(color),
          });
        }
      }
    }

    if coloring.len() != self.vertices {
      return Err(DecodeError::Uncolored {
        colored: coloring.len(),
        expected: self.vertices,
      });
    }
    Ok(Decision::Feasible(coloring))
  }

  fn paint(&self, answer: &Self::Answer, v: Vertex) -> Option<Paint> {
    answer.get(&v).map(|&c| Paint::class(c - 1, format!("r{c}")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::DecodeErrorKind;
  use rand::{rngs::StdRng, Rng, SeedableRng};
  use sat::{Dpll, Oracle};

  fn solve(g: &Graph, n: usize, k: usize) -> Decision<BTreeMap<Vertex, Color>> {
    let reduction = Coloring::new(n, k);
    let outcome = Dpll.ask(&reduction.encode(g)).unwrap();
    reduction.decode(&outcome).unwrap()
  }

  fn complete(n: usize) -> Graph {
    let mut g = Graph::new();
    for v in 1..=n {
      for w in v + 1..=n {
        g.add_edge(v, w);
      }
    }
    g
  }

  fn proper(g: &Graph, coloring: &BTreeMap<Vertex, Color>) -> bool {
    coloring
      .iter()
      .all(|(&v, &c)| coloring.iter().all(|(&w, &d)| v == w || c != d || !g.has_edge(v, w)))
  }

  fn colorable(g: &Graph, n: usize, k: usize) -> bool {
    let total = k.pow(n as u32);
    (0..total).any(|code| {
      let colors: Vec<usize> = (0..n).map(|ix| code / k.pow(ix as u32) % k).collect();
      (1..=n).all(|v| (v + 1..=n).all(|w| !g.has_edge(v, w) || colors[v - 1] != colors[w - 1]))
    })
  }

  // walks 1..=n*k with a counter cycling through the colors
  fn scanned_color(x: i64, n: usize, k: usize) -> usize {
    let mut count = 1;
    for i in 1..=(n * k) as i64 {
      if i == x {
        return count;
      }
      count += 1;
      if count == k + 1 {
        count = 1;
      }
    }
    0
  }

  #[test]
  fn path_clauses() {
    let g = Graph::from_edges(&[(1, 2), (2, 3)]);
    let cnf = Coloring::new(3, 2).encode(&g);
    assert_eq!(
      cnf.clauses,
      vec![
        vec![1, 2],
        vec![3, 4],
        vec![5, 6],
        vec![-1, -2],
        vec![-3, -4],
        vec![-5, -6],
        vec![-1, -3],
        vec![-3, -5],
        vec![-2, -4],
        vec![-4, -6],
      ]
    );
    assert!(cnf.to_string().starts_with("p cnf 6 10\n"));
  }

  #[test]
  fn clause_count_matches_header() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..50 {
      let n = rng.gen_range(0..9);
      let k = rng.gen_range(0..5);
      let mut g = Graph::new();
      for _ in 0..rng.gen_range(0..20) {
        g.add_edge(rng.gen_range(1..=9), rng.gen_range(1..=9));
      }
      let reduction = Coloring::new(n, k);
      let cnf = reduction.encode(&g);
      assert_eq!(cnf.clause_count(), reduction.clause_count(&g));
      assert_eq!(cnf.var_count, n * k);
    }
  }

  #[test]
  fn closed_form_color_matches_scan() {
    for n in 1..7 {
      for k in 1..6 {
        let map = VarMap::new(k, n);
        for x in 1..=(n * k) as i64 {
          assert_eq!(map.slot_of(x), scanned_color(x, n, k), "x = {x}, k = {k}");
        }
      }
    }
  }

  #[test]
  fn triangle_is_not_two_colorable() {
    let g = Graph::from_edges(&[(1, 2), (2, 3), (1, 3)]);
    let decision = solve(&g, 3, 2);
    assert_eq!(decision, Decision::Infeasible);
    assert_eq!(decision.to_string(), "False");
  }

  #[test]
  fn path_is_two_colorable() {
    let g = Graph::from_edges(&[(1, 2), (2, 3)]);
    let Decision::Feasible(coloring) = solve(&g, 3, 2) else {
      panic!("path should be 2-colorable")
    };
    assert_eq!(coloring.len(), 3);
    assert_ne!(coloring[&2], coloring[&1]);
    assert_ne!(coloring[&2], coloring[&3]);
    assert!(coloring.values().all(|&c| (1..=2).contains(&c)));
  }

  #[test]
  fn complete_graph_needs_n_colors() {
    for n in 1..6 {
      let g = complete(n);
      for k in 1..=n + 1 {
        assert_eq!(solve(&g, n, k).is_feasible(), k >= n, "K{n} with {k} colors");
      }
    }
  }

  #[test]
  fn isolated_vertices_still_get_colors() {
    let g = Graph::from_edges(&[(1, 2)]);
    let Decision::Feasible(coloring) = solve(&g, 4, 2) else {
      panic!("expected a coloring")
    };
    assert_eq!(coloring.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(Decision::Feasible(coloring.clone()).to_string().lines().count(), 2);
  }

  #[test]
  fn agrees_with_brute_force() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..60 {
      let n = rng.gen_range(1..7);
      let k = rng.gen_range(1..4);
      let mut g = Graph::new();
      for v in 1..=n {
        for w in v + 1..=n {
          if rng.gen_bool(0.4) {
            g.add_edge(v, w);
          }
        }
      }
      match solve(&g, n, k) {
        Decision::Feasible(coloring) => {
          assert_eq!(coloring.len(), n);
          assert!(proper(&g, &coloring));
        }
        Decision::Infeasible => assert!(!colorable(&g, n, k)),
      }
    }
  }

  #[test]
  fn conflicting_rows_are_errors() {
    let reduction = Coloring::new(2, 2);
    // vertex 1 gets both colors
    let twice = reduction.decode(&Outcome::Satisfiable(vec![1, 2, 3, -4])).unwrap_err();
    assert_eq!(
      twice,
      DecodeError::ConflictingColors {
        vertex: 1,
        first: 1,
        second: 2
      }
    );
    assert_eq!(twice.kind(), DecodeErrorKind::InconsistentDecoding);

    // vertex 2 gets none
    let missing = reduction.decode(&Outcome::Satisfiable(vec![1, -2, -3, -4])).unwrap_err();
    assert_eq!(missing, DecodeError::Uncolored { colored: 1, expected: 2 });

    let stray = reduction.decode(&Outcome::Satisfiable(vec![1, -2, -3, 5])).unwrap_err();
    assert_eq!(stray.kind(), DecodeErrorKind::MalformedAssignment);
  }

  #[test]
  fn unsatisfiable_is_not_an_error() {
    let reduction = Coloring::new(4, 3);
    assert_eq!(reduction.decode(&Outcome::Unsatisfiable), Ok(Decision::Infeasible));
  }
}
