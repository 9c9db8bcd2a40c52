//! Core BDD engine: node representation, the hash-consed manager and its
//! ITE-derived operations, and a DOT export for inspection.

pub mod bdd_manager;
pub mod bdd_node;
mod graphviz;

pub use bdd_manager::DDManager;
pub use bdd_node::{DDNode, NodeID, VarID};
