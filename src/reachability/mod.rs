//! Symbolic reachability analysis on top of [`DDManager`].
//!
//! A [`ReachabilityAnalyzer`] owns a manager and a finite-state-machine shape:
//! `stateSize` present-state bits, a matching set of next-state bits, and an
//! input size. Given transition functions and an initial-state predicate it
//! computes the set of reachable states as a fixed point of the image
//! operator, and answers membership/distance queries against it.

use std::fmt;

use log::{debug, trace};

use crate::core::bdd_manager::DDManager;
use crate::core::bdd_node::NodeID;

/// Errors raised at the reachability API boundary. Mirrors the teacher's
/// convention of small, hand-written `Display`-only error enums.
#[derive(Debug, Eq, PartialEq)]
pub enum ReachabilityError {
    /// `stateSize == 0` at construction.
    ZeroStateSize,
    /// A vector of transition functions, an init vector, or a query vector
    /// did not have the expected length.
    SizeMismatch { expected: usize, got: usize },
    /// A transition function referenced a node id the manager never issued.
    UnknownNode(NodeID),
}

impl fmt::Display for ReachabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReachabilityError::ZeroStateSize => {
                write!(f, "stateSize must be greater than zero")
            }
            ReachabilityError::SizeMismatch { expected, got } => write!(
                f,
                "expected a vector of length {expected}, got length {got}"
            ),
            ReachabilityError::UnknownNode(id) => {
                write!(f, "node {:?} is not known to this manager", id)
            }
        }
    }
}

impl std::error::Error for ReachabilityError {}

/// Symbolic reachability analyzer over a fixed-shape finite state machine.
pub struct ReachabilityAnalyzer {
    manager: DDManager,
    state_size: usize,
    input_size: usize,
    state_vars: Vec<NodeID>,
    next_state_vars: Vec<NodeID>,
    input_vars: Vec<NodeID>,
    transition_functions: Vec<NodeID>,
    init_states: NodeID,
    reachable_states: Option<NodeID>,
}

impl ReachabilityAnalyzer {
    /// Build a fresh analyzer with `state_size` present/next-state bit pairs
    /// and `input_size` input bits. Variables are created in three
    /// contiguous blocks: present-state, then next-state, then input. The
    /// default transition is the identity (`delta_i = s_i`), and the default
    /// initial state is the all-zero vector.
    pub fn new(state_size: usize, input_size: usize) -> Result<Self, ReachabilityError> {
        if state_size == 0 {
            return Err(ReachabilityError::ZeroStateSize);
        }

        let mut manager = DDManager::default();
        let state_vars: Vec<NodeID> = (0..state_size)
            .map(|i| manager.create_var(Some(&format!("s{i}"))))
            .collect();
        let next_state_vars: Vec<NodeID> = (0..state_size)
            .map(|i| manager.create_var(Some(&format!("s{i}'"))))
            .collect();
        let input_vars: Vec<NodeID> = (0..input_size)
            .map(|i| manager.create_var(Some(&format!("x{i}"))))
            .collect();

        let transition_functions = state_vars.clone();
        let init_states = Self::build_assignment_predicate(
            &mut manager,
            &state_vars,
            &vec![false; state_size],
        );

        debug!(
            "constructed reachability analyzer: {state_size} state bits, {input_size} input bits"
        );

        Ok(ReachabilityAnalyzer {
            manager,
            state_size,
            input_size,
            state_vars,
            next_state_vars,
            input_vars,
            transition_functions,
            init_states,
            reachable_states: None,
        })
    }

    /// The present-state variable identifiers, in creation order.
    pub fn get_states(&self) -> &[NodeID] {
        &self.state_vars
    }

    /// The input variable identifiers, in creation order.
    pub fn get_inputs(&self) -> &[NodeID] {
        &self.input_vars
    }

    /// Replace the stored transition functions. Does not eagerly recompute
    /// the reachable set; the next `isReachable`/`stateDistance` call will.
    pub fn set_transition_functions(
        &mut self,
        delta: Vec<NodeID>,
    ) -> Result<(), ReachabilityError> {
        if delta.len() != self.state_size {
            return Err(ReachabilityError::SizeMismatch {
                expected: self.state_size,
                got: delta.len(),
            });
        }
        for &f in &delta {
            if f.0 >= self.manager.unique_table_size() {
                return Err(ReachabilityError::UnknownNode(f));
            }
        }
        self.transition_functions = delta;
        self.reachable_states = None;
        Ok(())
    }

    /// Replace the initial-state predicate with one matching exactly `v`.
    pub fn set_init_state(&mut self, v: Vec<bool>) -> Result<(), ReachabilityError> {
        if v.len() != self.state_size {
            return Err(ReachabilityError::SizeMismatch {
                expected: self.state_size,
                got: v.len(),
            });
        }
        self.init_states = Self::build_assignment_predicate(&mut self.manager, &self.state_vars, &v);
        self.reachable_states = None;
        Ok(())
    }

    /// `⋀ᵢ (vᵢ ? varᵢ : ¬varᵢ)`.
    fn build_assignment_predicate(
        manager: &mut DDManager,
        vars: &[NodeID],
        v: &[bool],
    ) -> NodeID {
        let mut acc = manager.one();
        for (&var, &bit) in vars.iter().zip(v) {
            let literal = if bit { var } else { manager.neg(var) };
            acc = manager.and2(acc, literal);
        }
        acc
    }

    /// `τ(s, s') = ⋀ᵢ (s'ᵢ ↔ δᵢ(s, x))`.
    fn compute_transition_relation(&mut self) -> NodeID {
        let mut tau = self.manager.one();
        for i in 0..self.state_size {
            let biconditional = self
                .manager
                .xnor2(self.next_state_vars[i], self.transition_functions[i]);
            tau = self.manager.and2(tau, biconditional);
        }
        tau
    }

    /// `∃s. ∃x. (C(s) ∧ τ(s,s'))`, then rename `s' → s`.
    fn compute_image(&mut self, current: NodeID, tau: NodeID) -> NodeID {
        let mut temp = self.manager.and2(current, tau);

        for &s in &self.state_vars {
            let hi = self.manager.co_factor_true(temp, s);
            let lo = self.manager.co_factor_false(temp, s);
            temp = self.manager.or2(hi, lo);
        }
        for &x in &self.input_vars {
            let hi = self.manager.co_factor_true(temp, x);
            let lo = self.manager.co_factor_false(temp, x);
            temp = self.manager.or2(hi, lo);
        }

        // Rename s' -> s: conjoin with the identity relation on (s, s') and
        // quantify out s'.
        let mut img = self.manager.xnor2(self.state_vars[0], self.next_state_vars[0]);
        img = self.manager.and2(img, temp);
        for i in 1..self.state_size {
            let eq = self.manager.xnor2(self.state_vars[i], self.next_state_vars[i]);
            temp = self.manager.and2(temp, eq);
            img = self.manager.and2(img, temp);
        }
        for i in (0..self.state_size).rev() {
            let s_next = self.next_state_vars[i];
            let hi = self.manager.co_factor_true(img, s_next);
            let lo = self.manager.co_factor_false(img, s_next);
            img = self.manager.or2(hi, lo);
        }
        img
    }

    /// Fixed-point loop `C_{k+1} = C_k ∨ Img(C_k)`, recomputed from scratch.
    fn fixed_point(&mut self) -> NodeID {
        let tau = self.compute_transition_relation();
        let mut current = self.init_states;
        loop {
            let image = self.compute_image(current, tau);
            let next = self.manager.or2(image, current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Lazily (re)compute and cache the reachable-state set.
    fn ensure_reachable_states(&mut self) -> NodeID {
        if let Some(r) = self.reachable_states {
            return r;
        }
        let r = self.fixed_point();
        self.reachable_states = Some(r);
        trace!("recomputed reachable-state fixed point -> {:?}", r);
        r
    }

    /// Recompute (or reuse) the reachable-state fixed point and return it.
    pub fn compute_reachable_states(&mut self) -> NodeID {
        self.ensure_reachable_states()
    }

    /// Is the state vector `v` a member of the reachable set?
    pub fn is_reachable(&mut self, v: &[bool]) -> Result<bool, ReachabilityError> {
        if v.len() != self.state_size {
            return Err(ReachabilityError::SizeMismatch {
                expected: self.state_size,
                got: v.len(),
            });
        }
        let r = self.ensure_reachable_states();
        Ok(self.evaluate_at(r, v))
    }

    /// Cofactor `f` successively on each state bit per `v`'s polarity,
    /// short-circuiting once the running result is already a terminal.
    fn evaluate_at(&mut self, mut f: NodeID, v: &[bool]) -> bool {
        for (i, &bit) in v.iter().enumerate() {
            if f == self.manager.zero() || f == self.manager.one() {
                break;
            }
            let var = self.state_vars[i];
            f = if bit {
                self.manager.co_factor_true(f, var)
            } else {
                self.manager.co_factor_false(f, var)
            };
        }
        f == self.manager.one()
    }

    /// BFS distance from the initial set to `v`, or `-1` if never reached.
    pub fn state_distance(&mut self, v: &[bool]) -> Result<i64, ReachabilityError> {
        if v.len() != self.state_size {
            return Err(ReachabilityError::SizeMismatch {
                expected: self.state_size,
                got: v.len(),
            });
        }

        let tau = self.compute_transition_relation();
        let mut current = self.init_states;
        let mut distance: i64 = 0;
        loop {
            if self.evaluate_at(current, v) {
                return Ok(distance);
            }
            let image = self.compute_image(current, tau);
            let next = self.manager.or2(image, current);
            if next == current {
                return Ok(-1);
            }
            current = next;
            distance += 1;
        }
    }

    /// Access to the underlying manager, e.g. for `graphviz` export.
    pub fn manager(&self) -> &DDManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut DDManager {
        &mut self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_state_size_is_a_configuration_error() {
        assert_eq!(
            ReachabilityAnalyzer::new(0, 0).unwrap_err(),
            ReachabilityError::ZeroStateSize
        );
    }

    #[test]
    fn default_identity_only_reaches_init() {
        let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
        assert!(an.is_reachable(&[false, false]).unwrap());
        assert!(!an.is_reachable(&[true, false]).unwrap());
        assert!(!an.is_reachable(&[false, true]).unwrap());
        assert!(!an.is_reachable(&[true, true]).unwrap());
    }

    #[test]
    fn inverting_latch() {
        let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
        let s = an.get_states().to_vec();
        let not_s0 = an.manager_mut().neg(s[0]);
        let not_s1 = an.manager_mut().neg(s[1]);
        an.set_transition_functions(vec![not_s0, not_s1]).unwrap();

        assert!(an.is_reachable(&[false, false]).unwrap());
        assert!(an.is_reachable(&[true, true]).unwrap());
        assert!(!an.is_reachable(&[true, false]).unwrap());
        assert!(!an.is_reachable(&[false, true]).unwrap());
    }

    #[test]
    fn shift_register_distances() {
        let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
        let s = an.get_states().to_vec();
        let delta0 = an.manager_mut().neg(s[1]);
        let delta1 = s[0];
        an.set_transition_functions(vec![delta0, delta1]).unwrap();

        assert_eq!(an.state_distance(&[false, false]).unwrap(), 0);
        assert_eq!(an.state_distance(&[true, false]).unwrap(), 1);
        assert_eq!(an.state_distance(&[true, true]).unwrap(), 2);
        assert_eq!(an.state_distance(&[false, true]).unwrap(), 3);

        for v in [[false, false], [true, false], [true, true], [false, true]] {
            assert!(an.is_reachable(&v).unwrap());
        }
    }

    #[test]
    fn with_input_both_states_reachable_regardless_of_init() {
        let mut an = ReachabilityAnalyzer::new(1, 1).unwrap();
        let s = an.get_states().to_vec();
        let x = an.get_inputs().to_vec();
        let not_s0 = an.manager_mut().neg(s[0]);
        let delta0 = an.manager_mut().and2(not_s0, x[0]);
        an.set_transition_functions(vec![delta0]).unwrap();

        an.set_init_state(vec![false]).unwrap();
        assert!(an.is_reachable(&[false]).unwrap());
        assert!(an.is_reachable(&[true]).unwrap());

        an.set_init_state(vec![true]).unwrap();
        assert!(an.is_reachable(&[false]).unwrap());
        assert!(an.is_reachable(&[true]).unwrap());
    }

    #[test]
    fn transition_functions_size_mismatch_is_a_configuration_error() {
        let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
        let s = an.get_states().to_vec();
        let err = an.set_transition_functions(vec![s[0]]).unwrap_err();
        assert_eq!(
            err,
            ReachabilityError::SizeMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn transition_functions_unknown_node_is_a_configuration_error() {
        let mut an = ReachabilityAnalyzer::new(1, 0).unwrap();
        let bogus = NodeID(9999);
        let err = an.set_transition_functions(vec![bogus]).unwrap_err();
        assert_eq!(err, ReachabilityError::UnknownNode(bogus));
    }

    #[test]
    fn query_vector_size_mismatch_is_an_input_shape_error() {
        let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
        assert!(matches!(
            an.is_reachable(&[true]),
            Err(ReachabilityError::SizeMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            an.state_distance(&[true, true, true]),
            Err(ReachabilityError::SizeMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn set_init_state_then_is_reachable_round_trips() {
        let mut an = ReachabilityAnalyzer::new(3, 0).unwrap();
        let v = vec![true, false, true];
        an.set_init_state(v.clone()).unwrap();
        assert!(an.is_reachable(&v).unwrap());
    }

    #[test]
    fn reachable_states_fixed_point_is_stable() {
        let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
        let s = an.get_states().to_vec();
        let not_s0 = an.manager_mut().neg(s[0]);
        let not_s1 = an.manager_mut().neg(s[1]);
        an.set_transition_functions(vec![not_s0, not_s1]).unwrap();

        let r1 = an.compute_reachable_states();
        let r2 = an.compute_reachable_states();
        assert_eq!(r1, r2);
    }
}
