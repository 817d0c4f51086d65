use std::{fs::File, io::Write, path::Path};

use graphviz_rust::{
  attributes::NodeAttributes,
  dot_structures::{Attribute, Edge as GEdge, EdgeTy, Graph as DotGraph, Id, Node as GNode, NodeId, Stmt, Vertex as GVertex},
  printer::{DotPrinter, PrinterContext},
};

use super::{Graph, Vertex};

const PALETTE: [&str; 10] = [
  "lightblue", "salmon", "palegreen", "gold", "plum", "orange", "cyan", "pink", "khaki", "lightgrey",
];

/// How a single vertex should be painted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paint {
  pub label: Option<String>,
  pub fill: Option<String>,
}

impl Paint {
  pub fn fill(fill: &str) -> Self {
    Self {
      label: None,
      fill: Some(fill.to_string()),
    }
  }

  // cycles through the palette for color classes beyond its size
  pub fn class(class: usize, label: String) -> Self {
    Self {
      label: Some(label),
      fill: Some(PALETTE[class % PALETTE.len()].to_string()),
    }
  }
}

fn node_id(v: Vertex) -> NodeId {
  NodeId(Id::Plain(format!("{v}")), None)
}

fn quoted(s: &str) -> Id {
  Id::Escaped(format!("\"{s}\""))
}

/// Renders vertices `1..=n` and every edge among them. `paint` decides the
/// label and fill of each vertex; vertices it returns `None` for keep the
/// default look.
pub fn render_graph<F>(g: &Graph, n: usize, paint: F) -> DotGraph
where
  F: Fn(Vertex) -> Option<Paint>,
{
  let mut dot = DotGraph::Graph {
    id: Id::Plain("reduction".to_string()),
    strict: true,
    stmts: vec![],
  };

  for v in 1..=n {
    let mut attributes = vec![];
    match paint(v) {
      Some(p) => {
        let label = p.label.map(|l| format!("\"{v}: {l}\"")).unwrap_or_else(|| format!("\"{v}\""));
        attributes.push(NodeAttributes::label(label));
        if let Some(fill) = p.fill {
          attributes.push(Attribute(Id::Plain("style".to_string()), Id::Plain("filled".to_string())));
          attributes.push(Attribute(Id::Plain("fillcolor".to_string()), quoted(&fill)));
        }
      }
      None => attributes.push(NodeAttributes::label(format!("\"{v}\""))),
    }
    dot.add_stmt(Stmt::Node(GNode::new(node_id(v), attributes)));
  }

  for (u, v) in g.edges().filter(|&(u, v)| u >= 1 && v <= n) {
    let e = GEdge {
      ty: EdgeTy::Pair(GVertex::N(node_id(u)), GVertex::N(node_id(v))),
      attributes: vec![],
    };
    dot.add_stmt(Stmt::Edge(e));
  }
  dot
}

pub fn to_dot(dot: &DotGraph) -> String {
  let mut ctx = PrinterContext::default();
  dot.print(&mut ctx)
}

pub fn save_dot(dot: &DotGraph, path: &Path) -> std::io::Result<()> {
  let mut f = File::create(path)?;
  writeln!(f, "{}", to_dot(dot))?;
  log::debug!("wrote graph to {}", path.display());
  Ok(())
}
