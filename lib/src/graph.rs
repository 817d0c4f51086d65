use std::collections::BTreeMap;

use fixedbitset::FixedBitSet;

pub mod render;

pub type Vertex = usize;

/// Undirected graph keyed by vertex id. Every vertex owns the bitset of its
/// neighbours, so adjacency is a single membership test.
#[derive(Clone, Debug, Default)]
pub struct Graph {
  neighbours: BTreeMap<Vertex, FixedBitSet>,
}

impl Graph {
  pub fn new() -> Self {
    Self {
      neighbours: BTreeMap::new(),
    }
  }

  pub fn from_edges(edges: &[(Vertex, Vertex)]) -> Self {
    let mut g = Self::new();
    for &(u, v) in edges {
      g.add_edge(u, v);
    }
    g
  }

  pub fn add_vertex(&mut self, v: Vertex) {
    self.neighbours.entry(v).or_insert_with(FixedBitSet::new);
  }

  pub fn add_edge(&mut self, u: Vertex, v: Vertex) {
    self.add_vertex(u);
    self.add_vertex(v);
    self.link(u, v);
    self.link(v, u);
  }

  pub fn has_edge(&self, u: Vertex, v: Vertex) -> bool {
    self
      .neighbours
      .get(&u)
      .map(|n| n.contains(v))
      .unwrap_or(false)
  }

  pub fn contains(&self, v: Vertex) -> bool {
    self.neighbours.contains_key(&v)
  }

  pub fn vertex_count(&self) -> usize {
    self.neighbours.len()
  }

  pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
    self.neighbours.keys().copied()
  }

  pub fn neighbours(&self, v: Vertex) -> impl Iterator<Item = Vertex> + '_ {
    self.neighbours.get(&v).into_iter().flat_map(|n| n.ones())
  }

  // unordered pairs, each reported once with u <= v
  pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
    self
      .neighbours
      .iter()
      .flat_map(|(&u, n)| n.ones().filter(move |&v| u <= v).map(move |v| (u, v)))
  }

  pub fn edge_count(&self) -> usize {
    self.edges().count()
  }

  fn link(&mut self, from: Vertex, to: Vertex) {
    if let Some(set) = self.neighbours.get_mut(&from) {
      if set.len() <= to {
        set.grow(to + 1);
      }
      set.insert(to);
    }
  }
}

// bitset capacity depends on insertion history, so compare by membership
impl PartialEq for Graph {
  fn eq(&self, other: &Self) -> bool {
    self.neighbours.len() == other.neighbours.len()
      && self
        .neighbours
        .iter()
        .zip(other.neighbours.iter())
        .all(|((u, a), (v, b))| u == v && a.ones().eq(b.ones()))
  }
}

impl Eq for Graph {}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{rngs::StdRng, Rng, SeedableRng};

  #[test]
  fn edge_is_symmetric() {
    let mut g = Graph::new();
    g.add_edge(1, 2);
    assert!(g.has_edge(1, 2));
    assert!(g.has_edge(2, 1));
    assert!(!g.has_edge(1, 3));
    assert_eq!(g.vertex_count(), 2);
  }

  #[test]
  fn unknown_vertex_has_no_edges() {
    let g = Graph::from_edges(&[(1, 2)]);
    assert!(!g.has_edge(7, 1));
    assert!(!g.has_edge(1, 7));
    assert!(!g.contains(7));
    assert_eq!(g.neighbours(7).count(), 0);
  }

  #[test]
  fn add_vertex_is_idempotent() {
    let mut g = Graph::from_edges(&[(1, 2)]);
    g.add_vertex(1);
    g.add_vertex(5);
    g.add_vertex(5);
    assert!(g.has_edge(1, 2));
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.neighbours(5).count(), 0);
  }

  #[test]
  fn duplicate_edges_are_harmless() {
    let mut g = Graph::new();
    g.add_edge(3, 1);
    g.add_edge(3, 1);
    g.add_edge(1, 3);
    assert_eq!(g.neighbours(1).collect::<Vec<_>>(), vec![3]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![(1, 3)]);
  }

  #[test]
  fn add_edge_commutes() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
      let edges: Vec<(Vertex, Vertex)> = (0..15)
        .map(|_| (rng.gen_range(1..10), rng.gen_range(1..10)))
        .collect();
      let forward = Graph::from_edges(&edges);
      let flipped: Vec<_> = edges.iter().rev().map(|&(u, v)| (v, u)).collect();
      let backward = Graph::from_edges(&flipped);
      assert_eq!(forward, backward);
      for u in 0..11 {
        for v in 0..11 {
          assert_eq!(forward.has_edge(u, v), backward.has_edge(u, v));
          assert_eq!(forward.has_edge(u, v), forward.has_edge(v, u));
        }
      }
    }
  }

  #[test]
  fn edges_are_unordered_pairs() {
    let g = Graph::from_edges(&[(1, 2), (2, 3), (3, 1)]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![(1, 2), (1, 3), (2, 3)]);
    assert_eq!(g.edge_count(), 3);
  }
}
