//! Shared pieces of the graph-to-SAT reductions: the graph itself, CNF
//! formulas with their DIMACS text, the variable numbering and the
//! oracle's answer format.

pub mod graph;
pub mod sat;

pub use graph::{Graph, Vertex};
pub use sat::{Clause, Literal, Outcome, ParseError, VarMap, Variable, CNF};
