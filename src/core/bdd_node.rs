//! Module containing type definitions for the elements of the BDD:
//! Nodes ([DDNode], [NodeID]) and Variables ([VarID])

use std::hash::{Hash, Hasher};

/// Identifier of a node in the shared BDD DAG. Dense, monotonically assigned,
/// never reused. `0` and `1` are reserved for the `False`/`True` terminals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeID(pub usize);

/// Identifier of a decision variable. A variable's `VarID` is always equal to
/// the [`NodeID`] handed back when the variable was created -- there is no
/// separate numbering scheme, see [`DDNode`].
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarID(pub usize);

/// Terminal node "false", always allocated at id 0.
pub const ZERO: DDNode = DDNode {
    id: NodeID(0),
    var: VarID(0),
    low: NodeID(0),
    high: NodeID(0),
};

/// Terminal node "true", always allocated at id 1.
pub const ONE: DDNode = DDNode {
    id: NodeID(1),
    var: VarID(1),
    low: NodeID(1),
    high: NodeID(1),
};

/// Element of a BDD.
/// Note that the Node contains its own ID. Most importantly, the ID is not
/// considered in hashing and equality testing -- the unique table looks nodes
/// up by `(high, low, var)` alone, since that triple is what determines a
/// node's identity before an ID has even been assigned to it.
#[derive(Debug, Copy, Clone)]
pub struct DDNode {
    /// Node ID. Special values: 0 and 1 for terminal nodes
    pub id: NodeID,
    /// Top variable. For a freshly created variable node this equals `id`.
    pub var: VarID,
    pub low: NodeID,
    pub high: NodeID,
}

/// Test equality of two nodes, not considering the ID!
impl PartialEq for DDNode {
    fn eq(&self, that: &Self) -> bool {
        self.var == that.var && self.low == that.low && self.high == that.high
    }
}

impl Eq for DDNode {}

impl DDNode {
    /// Returns `true` iff this node is one of the two terminals.
    pub fn is_constant(&self) -> bool {
        self.id == ZERO.id || self.id == ONE.id
    }

    /// Returns `true` iff this is a raw variable node, i.e. `high = True`,
    /// `low = False` and `var` is this node's own ID.
    pub fn is_variable(&self) -> bool {
        !self.is_constant() && self.var.0 == self.id.0
    }

    /// Single-level restrict: returns the cofactor of this node when `top` is
    /// exactly the variable being split on. Used during the Shannon expansion
    /// inside [`ite`](super::bdd_manager::DDManager::ite), where all three
    /// operands are already aligned on the same splitting variable. Returns
    /// the node unchanged if `top` does not occur in it.
    pub fn restrict_at(&self, top: VarID, val: bool) -> NodeID {
        if self.is_constant() || self.var != top {
            return self.id;
        }
        if val {
            self.high
        } else {
            self.low
        }
    }
}

/// Hash a node, not considering the ID!
impl Hash for DDNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.var.hash(state);
        self.low.hash(state);
        self.high.hash(state);
    }
}
