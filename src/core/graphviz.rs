//! DOT emitter for a single rooted function.

use rustc_hash::FxHashMap as HashMap;

use crate::core::bdd_manager::DDManager;
use crate::core::bdd_node::{NodeID, VarID};

impl DDManager {
    /// Render the function rooted at `f` as a Graphviz DOT graph. Terminals
    /// get a box shape, internal nodes an ellipse, clustered by variable so
    /// that nodes on the same level line up.
    pub fn graphviz(&self, f: NodeID) -> String {
        let mut nodes = rustc_hash::FxHashSet::default();
        self.find_nodes(f, &mut nodes);

        let mut by_var: HashMap<VarID, Vec<NodeID>> = HashMap::default();
        for &id in &nodes {
            if self.is_constant(id) {
                continue;
            }
            by_var.entry(self.top_var(id)).or_default().push(id);
        }

        let mut graph = String::new();
        graph.push_str("digraph G {\n");
        if nodes.contains(&self.one()) {
            graph.push_str("\"1\" [shape = \"box\"];\n");
        }
        if nodes.contains(&self.zero()) {
            graph.push_str("\"0\" [shape = \"box\"];\n");
        }

        let mut edges = String::new();
        for (var, ids) in by_var {
            graph.push_str(&format!("subgraph cluster_{} {{\nrank=same;\n", var.0));
            for id in ids {
                let label = self.label(var).unwrap_or("");
                graph.push_str(&format!(
                    "\"{}\" [shape = \"ellipse\", label=\"{}\\n{}\"]\n",
                    id.0, label, var.0
                ));
                edges.push_str(&format!(
                    "\"{}\" -> \"{}\" [style = \"dotted\"]\n",
                    id.0,
                    self.low_child(id).0
                ));
                edges.push_str(&format!("\"{}\" -> \"{}\"\n", id.0, self.high_child(id).0));
            }
            graph.push_str("}\n\n");
        }

        graph.push_str(&edges);
        graph.push_str("}\n");
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bdd_manager::DDManager;

    #[test]
    fn graphviz_mentions_every_node_once() {
        let mut man = DDManager::default();
        let a = man.create_var(Some("a"));
        let b = man.create_var(Some("b"));
        let f = man.and2(a, b);

        let dot = man.graphviz(f);
        assert!(dot.starts_with("digraph G {"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("\"1\" [shape = \"box\"];"));
        assert!(dot.contains("\"0\" [shape = \"box\"];"));
    }
}
