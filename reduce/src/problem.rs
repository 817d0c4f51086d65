use std::io::Read;

use lib::{Graph, Vertex};
use text_io::try_read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProblemError {
  #[error("could not read problem: {0}")]
  Io(#[from] std::io::Error),
  #[error("bad or missing {what}: {reason}")]
  Token { what: String, reason: String },
  #[error("edge {index} ({u}, {v}) leaves vertices 1..={vertices}")]
  VertexOutOfRange {
    index: usize,
    u: Vertex,
    v: Vertex,
    vertices: usize,
  },
}

/// One instance: `vertices edges k` on the first line, then one `u v` line
/// per edge. `k` is the clique size or the number of colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
  pub vertices: usize,
  pub k: usize,
  pub edges: Vec<(Vertex, Vertex)>,
}

fn token<I: Iterator<Item = u8>>(mut bytes: &mut I, what: impl Into<String>) -> Result<usize, ProblemError> {
  let value: Result<usize, _> = try_read!("{}", bytes);
  value.map_err(|e| ProblemError::Token {
    what: what.into(),
    reason: format!("{e:?}"),
  })
}

impl Problem {
  pub fn read<R: Read>(mut input: R) -> Result<Self, ProblemError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    Self::parse(&text)
  }

  pub fn parse(text: &str) -> Result<Self, ProblemError> {
    // single spaces between tokens, so every read stops on exactly one separator
    let normalised = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut bytes = normalised.bytes();

    let vertices = token(&mut bytes, "vertex count")?;
    let edge_count = token(&mut bytes, "edge count")?;
    let k = token(&mut bytes, "k")?;

    let mut edges = Vec::with_capacity(edge_count);
    for index in 1..=edge_count {
      let u = token(&mut bytes, format!("edge {index}"))?;
      let v = token(&mut bytes, format!("edge {index}"))?;
      if u == 0 || v == 0 || u > vertices || v > vertices {
        return Err(ProblemError::VertexOutOfRange { index, u, v, vertices });
      }
      edges.push((u, v));
    }
    log::debug!("read {vertices} vertices, {edge_count} edges, k = {k}");

    Ok(Self { vertices, k, edges })
  }

  /// Every vertex `1..=vertices` is present, isolated ones included.
  pub fn graph(&self) -> Graph {
    let mut g = Graph::new();
    for v in 1..=self.vertices {
      g.add_vertex(v);
    }
    for &(u, v) in self.edges.iter() {
      g.add_edge(u, v);
    }
    g
  }
}
