//! The BDD manager: node store, unique table, ITE memo table, and every
//! operation derived from ITE.

use std::fmt;

use log::trace;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::core::bdd_node::{DDNode, NodeID, VarID, ONE, ZERO};

/// Container combining the node store, the per-variable unique tables and the
/// ITE memo ("computed") table. This is the sole authority on node identity:
/// two functions that are semantically equal always end up with the same
/// [`NodeID`] (strong canonicity).
#[derive(Clone)]
pub struct DDManager {
    /// Flat node store, indexed directly by `NodeID` -- identifiers are dense
    /// and monotonically assigned, so an array works as the reverse lookup.
    nodes: Vec<DDNode>,
    /// Unique table, one bucket per variable. Since variable identifiers are
    /// assigned in creation order and that order never changes, the bucket a
    /// node lives in is found directly by its `var` field -- no separate
    /// variable-to-level translation table is needed.
    unique_table: HashMap<VarID, HashSet<DDNode>>,
    /// Computed table: caches `ite(i, t, e) = id`. Never evicted.
    ite_cache: HashMap<(NodeID, NodeID, NodeID), NodeID>,
    /// Optional metadata attached at `createVar`; not considered for equality.
    labels: HashMap<VarID, String>,
}

impl fmt::Debug for DDManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DDManager [{} nodes, {} cached ITE results]",
            self.nodes.len(),
            self.ite_cache.len()
        )
    }
}

impl Default for DDManager {
    fn default() -> Self {
        DDManager {
            nodes: vec![ZERO, ONE],
            unique_table: HashMap::default(),
            ite_cache: HashMap::default(),
            labels: HashMap::default(),
        }
    }
}

/// Bring ITE calls of the form
/// `ite(f,f,h) = ite(f,1,h)`, `ite(f,g,f) = ite(f,g,0)`
/// into a canonical form so that semantically identical calls collapse onto
/// the same memo key.
fn normalize_ite_args(f: NodeID, g: NodeID, h: NodeID) -> (NodeID, NodeID, NodeID) {
    if f == g {
        (f, ONE.id, h)
    } else if f == h {
        (f, g, ZERO.id)
    } else {
        (f, g, h)
    }
}

impl DDManager {
    //------------------------------------------------------------------------//
    // Constants & variables

    /// The canonical `False` node. Total, pure, always `NodeID(0)`.
    pub fn zero(&self) -> NodeID {
        ZERO.id
    }

    /// The canonical `True` node. Total, pure, always `NodeID(1)`.
    pub fn one(&self) -> NodeID {
        ONE.id
    }

    fn node(&self, f: NodeID) -> &DDNode {
        self.nodes
            .get(f.0)
            .unwrap_or_else(|| panic!("unknown node id {:?}", f))
    }

    /// Creates a fresh variable and returns its id. `label` is optional
    /// metadata (not required to be unique) used only by the DOT emitter.
    pub fn create_var(&mut self, label: Option<&str>) -> NodeID {
        let id = NodeID(self.nodes.len());
        let var = VarID(id.0);
        let node = DDNode {
            id,
            var,
            high: ONE.id,
            low: ZERO.id,
        };
        self.nodes.push(node);
        self.unique_table.insert(var, HashSet::default());
        if let Some(label) = label {
            self.labels.insert(var, label.to_owned());
        }
        trace!("created variable {:?} ({:?})", var, label);
        id
    }

    /// `true` iff `f` is one of the two terminals.
    pub fn is_constant(&self, f: NodeID) -> bool {
        self.node(f).is_constant()
    }

    /// `true` iff `x` is an internal node whose `topVar` equals `x` itself.
    pub fn is_variable(&self, x: NodeID) -> bool {
        self.node(x).is_variable()
    }

    /// The stored top-variable field of `f`.
    pub fn top_var(&self, f: NodeID) -> VarID {
        self.node(f).var
    }

    /// Number of allocated nodes (including the two terminals).
    pub fn unique_table_size(&self) -> usize {
        self.nodes.len()
    }

    /// Rank used to pick the topmost variable among several nodes: the
    /// variable's own id, or `usize::MAX` for a constant (see §3 "a
    /// constant's top variable is treated as +infinity").
    fn var_rank(&self, f: NodeID) -> usize {
        let node = self.node(f);
        if node.is_constant() {
            usize::MAX
        } else {
            node.var.0
        }
    }

    fn node_get_or_create(&mut self, var: VarID, high: NodeID, low: NodeID) -> NodeID {
        debug_assert_ne!(
            high, low,
            "a reduced node must never have high == low; the caller should have returned high"
        );

        let bucket = self
            .unique_table
            .get(&var)
            .unwrap_or_else(|| panic!("unknown variable {:?}", var));
        let probe = DDNode {
            id: NodeID(0),
            var,
            high,
            low,
        };
        if let Some(existing) = bucket.get(&probe) {
            return existing.id;
        }

        let id = NodeID(self.nodes.len());
        let node = DDNode {
            id,
            var,
            high,
            low,
        };
        self.nodes.push(node);
        self.unique_table.get_mut(&var).unwrap().insert(node);
        trace!("allocated node {:?} = ite-result({:?},{:?},{:?})", id, var, high, low);
        id
    }

    //------------------------------------------------------------------------//
    // ITE -- the core operator. The only operation that allocates nodes.

    /// `ite(i, t, e)` = the node for `(i ∧ t) ∨ (¬i ∧ e)`.
    pub fn ite(&mut self, i: NodeID, t: NodeID, e: NodeID) -> NodeID {
        // Terminal simplifications.
        if i == self.one() {
            return t;
        }
        if i == self.zero() {
            return e;
        }
        if t == self.one() && e == self.zero() {
            return i;
        }
        if t == e {
            return t;
        }

        // Argument-normalizing rewrites, collapsing equivalent calls onto the
        // same memo key. Each reduces to a strictly simpler ITE.
        if i == t && !self.is_constant(t) {
            return self.ite(i, self.one(), e);
        }
        if i == e {
            return self.ite(i, t, self.zero());
        }
        let not_e = self.neg(e);
        if i == not_e {
            return self.ite(i, t, self.one());
        }
        let not_t = self.neg(t);
        if i == not_t {
            return self.ite(i, self.zero(), e);
        }

        let (i, t, e) = normalize_ite_args(i, t, e);
        if let Some(cached) = self.ite_cache.get(&(i, t, e)) {
            return *cached;
        }

        // Shannon expansion on the topmost variable among the three operands.
        let mut top = self.top_var(i);
        let mut top_rank = self.var_rank(i);
        if self.var_rank(t) < top_rank {
            top = self.top_var(t);
            top_rank = self.var_rank(t);
        }
        if self.var_rank(e) < top_rank {
            top = self.top_var(e);
        }

        let (i_hi, t_hi, e_hi) = (
            self.node(i).restrict_at(top, true),
            self.node(t).restrict_at(top, true),
            self.node(e).restrict_at(top, true),
        );
        let (i_lo, t_lo, e_lo) = (
            self.node(i).restrict_at(top, false),
            self.node(t).restrict_at(top, false),
            self.node(e).restrict_at(top, false),
        );

        let high = self.ite(i_hi, t_hi, e_hi);
        let low = self.ite(i_lo, t_lo, e_lo);

        let result = if high == low {
            high
        } else {
            self.node_get_or_create(top, high, low)
        };

        self.ite_cache.insert((i, t, e), result);
        result
    }

    //------------------------------------------------------------------------//
    // Cofactors

    /// `f|_{x=1}`. `x` must itself be a variable node id.
    pub fn co_factor_true(&mut self, f: NodeID, x: NodeID) -> NodeID {
        if self.is_constant(f) || self.is_constant(x) || self.top_var(f).0 > x.0 {
            return f;
        }
        if self.top_var(f).0 == x.0 {
            return self.node(f).high;
        }
        let (hi, lo) = (self.node(f).high, self.node(f).low);
        let high = self.co_factor_true(hi, x);
        let low = self.co_factor_true(lo, x);
        if high == low {
            return high;
        }
        self.ite(NodeID(self.top_var(f).0), high, low)
    }

    /// `f|_{x=0}`. `x` must itself be a variable node id.
    pub fn co_factor_false(&mut self, f: NodeID, x: NodeID) -> NodeID {
        if self.is_constant(f) || self.is_constant(x) || self.top_var(f).0 > x.0 {
            return f;
        }
        if self.top_var(f).0 == x.0 {
            return self.node(f).low;
        }
        let (hi, lo) = (self.node(f).high, self.node(f).low);
        let high = self.co_factor_false(hi, x);
        let low = self.co_factor_false(lo, x);
        if high == low {
            return high;
        }
        self.ite(NodeID(self.top_var(f).0), high, low)
    }

    /// Literal `high` field of `f`, no recursion. Only valid when the caller
    /// already knows `topVar(f)` is the variable being split on.
    pub fn high_child(&self, f: NodeID) -> NodeID {
        self.node(f).high
    }

    /// Literal `low` field of `f`, no recursion. Only valid when the caller
    /// already knows `topVar(f)` is the variable being split on.
    pub fn low_child(&self, f: NodeID) -> NodeID {
        self.node(f).low
    }

    //------------------------------------------------------------------------//
    // Derived connectives -- all one-line reductions to ITE.

    pub fn and2(&mut self, a: NodeID, b: NodeID) -> NodeID {
        let zero = self.zero();
        self.ite(a, b, zero)
    }

    pub fn or2(&mut self, a: NodeID, b: NodeID) -> NodeID {
        let one = self.one();
        self.ite(a, one, b)
    }

    pub fn xor2(&mut self, a: NodeID, b: NodeID) -> NodeID {
        let nb = self.neg(b);
        self.ite(a, nb, b)
    }

    pub fn neg(&mut self, a: NodeID) -> NodeID {
        let (zero, one) = (self.zero(), self.one());
        self.ite(a, zero, one)
    }

    pub fn nand2(&mut self, a: NodeID, b: NodeID) -> NodeID {
        let nb = self.neg(b);
        let one = self.one();
        self.ite(a, nb, one)
    }

    pub fn nor2(&mut self, a: NodeID, b: NodeID) -> NodeID {
        let nb = self.neg(b);
        let zero = self.zero();
        self.ite(a, zero, nb)
    }

    pub fn xnor2(&mut self, a: NodeID, b: NodeID) -> NodeID {
        let nb = self.neg(b);
        self.ite(a, b, nb)
    }

    //------------------------------------------------------------------------//
    // Enumeration

    /// DFS over the DAG rooted at `root`, inserting every visited node id
    /// into `acc`. Idempotent on already-visited nodes.
    pub fn find_nodes(&self, root: NodeID, acc: &mut HashSet<NodeID>) {
        if !acc.insert(root) {
            return;
        }
        let node = self.node(root);
        if !node.is_constant() {
            self.find_nodes(node.high, acc);
            self.find_nodes(node.low, acc);
        }
    }

    /// The set of variables occurring in the function rooted at `root`.
    pub fn find_vars(&self, root: NodeID, acc: &mut HashSet<NodeID>) {
        let mut nodes = HashSet::default();
        self.find_nodes(root, &mut nodes);
        for id in nodes {
            if self.is_variable(id) {
                acc.insert(id);
            }
        }
    }

    /// Optional label a variable was created with, if any.
    pub fn label(&self, var: VarID) -> Option<&str> {
        self.labels.get(&var).map(String::as_str)
    }
}
