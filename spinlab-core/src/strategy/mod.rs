//! Strategy tree — the caller-authored betting plan.
//!
//! Nodes live in an arena (`Vec<StrategyNode>`) and reference each other by
//! index. The graph is tree-shaped with one legal exception: any child may
//! point back at the root, which is the designated loop terminal. That
//! back-edge is recognized by an identity check against [`Strategy::root`],
//! never by general cycle detection.

pub mod node;

pub use node::{
    MartingaleLimit, NodeId, NodeKind, PostWaitAction, RepeatLimit, SpinPredicate, StrategyNode,
};

use crate::domain::{Chips, WagerError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures surfaced to the authoring layer before a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("strategy has no nodes")]
    EmptyTree,
    #[error("root index {0} is out of range")]
    RootOutOfRange(usize),
    #[error("node {node} references missing child {child}")]
    ChildOutOfRange { node: usize, child: usize },
    #[error("root node must carry an explicit wager list")]
    RootWithoutWagers,
    #[error("node {node} {branch} edge re-enters node {to}; only the root may be re-entered")]
    IllegalBackEdge {
        node: usize,
        branch: &'static str,
        to: usize,
    },
    #[error("node {node} is missing its {branch} child")]
    MissingChild { node: usize, branch: &'static str },
    #[error("node {node} wait must consume at least one spin")]
    ZeroWaitSpins { node: usize },
    #[error("node {node} limit value must be positive")]
    NonPositiveLimit { node: usize },
    #[error("node {node}: {source}")]
    InvalidWager {
        node: usize,
        #[source]
        source: WagerError,
    },
}

/// The full betting plan: node arena, root, and session bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub nodes: Vec<StrategyNode>,
    pub root: NodeId,
    /// Halt once the bankroll falls to this level. 0 means only bankruptcy
    /// stops the run.
    #[serde(default)]
    pub stop_loss: Chips,
    /// Halt once the bankroll reaches this level. 0 disables the target.
    #[serde(default)]
    pub take_profit: Chips,
}

impl Strategy {
    pub fn new(stop_loss: Chips, take_profit: Chips) -> Self {
        Strategy {
            nodes: Vec::new(),
            root: NodeId(0),
            stop_loss,
            take_profit,
        }
    }

    /// Append a node and return its id.
    pub fn add(&mut self, node: StrategyNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&StrategyNode> {
        self.nodes.get(id.0)
    }

    pub fn root_node(&self) -> Option<&StrategyNode> {
        self.node(self.root)
    }

    /// Re-canonicalize every wager's number set. Called after
    /// deserialization so equality and stacking comparisons stay
    /// order-independent.
    pub fn canonicalize(&mut self) {
        for node in &mut self.nodes {
            for wager in &mut node.wagers {
                wager.canonicalize();
            }
        }
    }

    /// Structural validation of the reachable tree.
    ///
    /// Checks, in order: non-empty arena, root in range and carrying
    /// wagers, children in range, the root-only back-edge rule, required
    /// children per node kind (both branches, except `Reset` which needs
    /// none and `Martingale`/`UNTIL_BANKRUPT` whose loss side is implicitly
    /// terminal), positive per-kind parameters, and wager well-formedness.
    ///
    /// The engine itself tolerates absent children (cursor resets to root),
    /// so this is the authoring-layer gate, not a runtime precondition.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.nodes.is_empty() {
            return Err(StrategyError::EmptyTree);
        }
        let root = self
            .root_node()
            .ok_or(StrategyError::RootOutOfRange(self.root.0))?;
        if root.wagers.is_empty() {
            return Err(StrategyError::RootWithoutWagers);
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        visited[self.root.0] = true;

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            self.check_node(id, node)?;

            // Both branches pointing at the same child is one edge, not a
            // diamond.
            let loss_edge = if node.on_loss == node.on_win {
                None
            } else {
                node.on_loss
            };
            for (branch, child) in [("win", node.on_win), ("loss", loss_edge)] {
                let Some(child) = child else { continue };
                if child.0 >= self.nodes.len() {
                    return Err(StrategyError::ChildOutOfRange {
                        node: id.0,
                        child: child.0,
                    });
                }
                if child == self.root {
                    continue; // the one legal back-edge
                }
                if visited[child.0] {
                    return Err(StrategyError::IllegalBackEdge {
                        node: id.0,
                        branch,
                        to: child.0,
                    });
                }
                visited[child.0] = true;
                stack.push(child);
            }
        }
        Ok(())
    }

    fn check_node(&self, id: NodeId, node: &StrategyNode) -> Result<(), StrategyError> {
        for wager in &node.wagers {
            wager
                .validate()
                .map_err(|source| StrategyError::InvalidWager {
                    node: id.0,
                    source,
                })?;
        }

        match &node.kind {
            NodeKind::Reset => return Ok(()), // needs no children
            NodeKind::WaitSpins { spins, .. } => {
                if *spins == 0 {
                    return Err(StrategyError::ZeroWaitSpins { node: id.0 });
                }
            }
            NodeKind::Martingale { limit } => match limit {
                MartingaleLimit::ProfitTarget { target } if *target <= 0 => {
                    return Err(StrategyError::NonPositiveLimit { node: id.0 });
                }
                MartingaleLimit::SpinCount { spins } if *spins == 0 => {
                    return Err(StrategyError::NonPositiveLimit { node: id.0 });
                }
                _ => {}
            },
            NodeKind::RepeatUntil { until } => {
                let positive = match until {
                    RepeatLimit::SpinCount { spins } => *spins > 0,
                    RepeatLimit::WinCount { wins } => *wins > 0,
                    RepeatLimit::ProfitTarget { target } => *target > 0,
                    RepeatLimit::LossLimit { limit } => *limit > 0,
                };
                if !positive {
                    return Err(StrategyError::NonPositiveLimit { node: id.0 });
                }
            }
            _ => {}
        }

        if node.on_win.is_none() {
            return Err(StrategyError::MissingChild {
                node: id.0,
                branch: "win",
            });
        }
        let loss_optional = matches!(
            node.kind,
            NodeKind::Martingale {
                limit: MartingaleLimit::UntilBankrupt
            }
        );
        if node.on_loss.is_none() && !loss_optional {
            return Err(StrategyError::MissingChild {
                node: id.0,
                branch: "loss",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Wager;

    fn self_loop_root() -> Strategy {
        let mut s = Strategy::new(0, 0);
        let root = s.add(
            StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::red(10)]),
        );
        s.nodes[root.0].on_win = Some(root);
        s.nodes[root.0].on_loss = Some(root);
        s.root = root;
        s
    }

    #[test]
    fn root_self_loop_is_legal() {
        assert!(self_loop_root().validate().is_ok());
    }

    #[test]
    fn empty_tree_rejected() {
        assert_eq!(Strategy::new(0, 0).validate(), Err(StrategyError::EmptyTree));
    }

    #[test]
    fn root_without_wagers_rejected() {
        let mut s = Strategy::new(0, 0);
        let root = s.add(StrategyNode::new(NodeKind::StartImmediately));
        s.nodes[root.0].on_win = Some(root);
        s.nodes[root.0].on_loss = Some(root);
        assert_eq!(s.validate(), Err(StrategyError::RootWithoutWagers));
    }

    #[test]
    fn back_edge_to_non_root_rejected() {
        let mut s = Strategy::new(0, 0);
        let root = s.add(
            StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::red(10)]),
        );
        let mid = s.add(StrategyNode::new(NodeKind::Double));
        let tail = s.add(StrategyNode::new(NodeKind::SameBet));
        s.nodes[root.0].on_win = Some(mid);
        s.nodes[root.0].on_loss = Some(mid);
        s.nodes[mid.0].on_win = Some(tail);
        s.nodes[mid.0].on_loss = Some(tail);
        // tail loops back to mid, not root
        s.nodes[tail.0].on_win = Some(mid);
        s.nodes[tail.0].on_loss = Some(root);
        assert!(matches!(
            s.validate(),
            Err(StrategyError::IllegalBackEdge { to: 1, .. })
        ));
    }

    #[test]
    fn missing_child_rejected_except_reset_and_until_bankrupt() {
        let mut s = Strategy::new(0, 0);
        let root = s.add(
            StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::red(10)]),
        );
        s.nodes[root.0].on_win = Some(root);
        assert_eq!(
            s.validate(),
            Err(StrategyError::MissingChild {
                node: 0,
                branch: "loss"
            })
        );

        // Martingale until-bankrupt: loss side implicitly terminal.
        let mut s = Strategy::new(0, 0);
        let root = s.add(
            StrategyNode::new(NodeKind::Martingale {
                limit: MartingaleLimit::UntilBankrupt,
            })
            .with_wagers(vec![Wager::red(10)]),
        );
        s.nodes[root.0].on_win = Some(root);
        assert!(s.validate().is_ok());

        // Reset needs no children at all.
        let mut s = Strategy::new(0, 0);
        let root = s.add(
            StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::red(10)]),
        );
        let reset = s.add(StrategyNode::new(NodeKind::Reset));
        s.nodes[root.0].on_win = Some(reset);
        s.nodes[root.0].on_loss = Some(root);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_parameters_rejected() {
        let mut s = Strategy::new(0, 0);
        let root = s.add(
            StrategyNode::new(NodeKind::WaitSpins {
                spins: 0,
                then: None,
            })
            .with_wagers(vec![Wager::red(10)]),
        );
        s.nodes[root.0].on_win = Some(root);
        s.nodes[root.0].on_loss = Some(root);
        assert_eq!(s.validate(), Err(StrategyError::ZeroWaitSpins { node: 0 }));
    }

    #[test]
    fn invalid_wager_surfaces_node_index() {
        let mut s = Strategy::new(0, 0);
        let root = s.add(
            StrategyNode::new(NodeKind::StartImmediately)
                .with_wagers(vec![Wager::straight(17, -5)]),
        );
        s.nodes[root.0].on_win = Some(root);
        s.nodes[root.0].on_loss = Some(root);
        assert!(matches!(
            s.validate(),
            Err(StrategyError::InvalidWager { node: 0, .. })
        ));
    }

    #[test]
    fn unreachable_nodes_are_not_validated() {
        let mut s = self_loop_root();
        // Orphan node with a bad wager: never reached, never checked.
        s.add(StrategyNode::new(NodeKind::SameBet).with_wagers(vec![Wager::straight(17, -1)]));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn serde_roundtrip_preserves_structure() {
        let s = self_loop_root();
        let json = serde_json::to_string(&s).unwrap();
        let back: Strategy = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
