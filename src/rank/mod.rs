//! Pointer-jumping rank engine
//!
//! Computes every node's depth in O(log height) synchronous rounds. Each
//! node keeps a jump target (`ancestor`) and the distance to it (`rank`);
//! a round replaces both with the target's values added/composed, so jump
//! lengths double every round:
//!
//! ```text
//! rank[v]     ← rank[v] + rank[ancestor[v]]
//! ancestor[v] ← ancestor[ancestor[v]]
//! ```
//!
//! The root is an absorbing identity (rank 0, ancestor = itself), so no
//! round needs a root special case. The round count comes from a
//! [`RoundPolicy`], never from the node count alone: a path of n nodes
//! needs ⌈log₂(n − 1)⌉ rounds, while ⌈log₂ n⌉ − 1 falls one short.

mod ledger;
mod state;

pub use ledger::ConvergenceLedger;
pub use state::{RankCell, RankState};

use crate::profile::{RoundProfile, RoundReport, RoundTracker};
use crate::tree::{NodeId, TreeModel};
use crate::util::ceil_log2;
use crate::PramError;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use tracing::{debug, info_span, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many rounds the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPolicy {
    /// Run until every ancestor pointer has reached the root
    #[default]
    FixedPoint,
    /// Run ⌈log₂ height⌉ rounds, height measured from the tree
    DepthBound,
    /// Run exactly this many rounds
    Fixed(usize),
}

impl RoundPolicy {
    /// The ⌈log₂ n⌉ − 1 node-count bound
    ///
    /// Undershoots for deep trees; kept to reproduce that failure.
    pub fn legacy_node_count(n: usize) -> Self {
        RoundPolicy::Fixed(ceil_log2(n).saturating_sub(1))
    }
}

impl fmt::Display for RoundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPolicy::FixedPoint => write!(f, "fixed-point"),
            RoundPolicy::DepthBound => write!(f, "depth-bound"),
            RoundPolicy::Fixed(k) => write!(f, "fixed:{}", k),
        }
    }
}

impl FromStr for RoundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed-point" => Ok(RoundPolicy::FixedPoint),
            "depth-bound" => Ok(RoundPolicy::DepthBound),
            other => other
                .strip_prefix("fixed:")
                .and_then(|k| k.parse().ok())
                .map(RoundPolicy::Fixed)
                .ok_or_else(|| {
                    format!(
                        "unknown round policy '{}' (expected fixed-point, depth-bound or fixed:<k>)",
                        other
                    )
                }),
        }
    }
}

/// Configuration for the rank engine
#[derive(Debug, Clone, Default)]
pub struct RankConfig {
    /// Round policy
    pub policy: RoundPolicy,

    /// Keep a rank snapshot after every round
    pub record_history: bool,
}

impl RankConfig {
    /// Fixed-point policy, no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Set round policy
    pub fn with_round_policy(mut self, policy: RoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable per-round rank snapshots
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }
}

/// Depth of every node
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ranks {
    depths: Vec<usize>,
}

impl Ranks {
    /// Number of nodes
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Depth of `node`, or `None` if it is out of range
    ///
    /// Indexing with `ranks[node]` panics instead.
    pub fn get(&self, node: NodeId) -> Option<usize> {
        self.depths.get(node.index()).copied()
    }

    /// Depths indexed by node
    pub fn as_slice(&self) -> &[usize] {
        &self.depths
    }

    /// `(node, depth)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.depths
            .iter()
            .enumerate()
            .map(|(i, &d)| (NodeId::from(i), d))
    }

    /// Node id → depth map
    pub fn to_map(&self) -> BTreeMap<usize, usize> {
        self.depths.iter().copied().enumerate().collect()
    }
}

impl Index<NodeId> for Ranks {
    type Output = usize;

    fn index(&self, node: NodeId) -> &Self::Output {
        &self.depths[node.index()]
    }
}

/// Ranks plus the rounds it took to get them
#[derive(Debug, Clone)]
pub struct RankOutcome {
    /// Converged depths
    pub ranks: Ranks,
    /// Round accounting
    pub profile: RoundProfile,
}

/// Round-synchronous pointer-jumping engine over a borrowed tree
///
/// The tree's parent relation is only read, to seed the ancestor buffer;
/// all jumping happens on the engine's own [`RankState`].
#[derive(Debug)]
pub struct RankEngine<'t, V> {
    tree: &'t TreeModel<V>,
    config: RankConfig,
    state: RankState,
    ledger: ConvergenceLedger,
    tracker: RoundTracker,
}

impl<'t, V> RankEngine<'t, V> {
    /// Seed the engine from `tree`
    pub fn new(tree: &'t TreeModel<V>, config: RankConfig) -> Self {
        let root = tree.root().index();
        let state = RankState::initial(&tree.ancestor_seed(), root);
        let ledger = ConvergenceLedger::new(state.cells(), root);
        let tracker = RoundTracker::new(config.record_history);
        Self {
            tree,
            config,
            state,
            ledger,
            tracker,
        }
    }

    /// Committed state
    pub fn state(&self) -> &RankState {
        &self.state
    }

    /// Rounds committed so far
    pub fn rounds(&self) -> usize {
        self.tracker.rounds()
    }

    /// Every ancestor pointer has reached the root
    pub fn is_converged(&self) -> bool {
        self.ledger.all_settled()
    }

    /// Nodes whose ancestor pointer has not reached the root yet
    pub fn unsettled(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ledger.unsettled().map(NodeId::from)
    }

    /// Execute one synchronous round, converged or not
    pub fn step(&mut self) -> RoundReport {
        let changed = self.state.round();
        let settled = self.ledger.observe(self.state.cells());
        let report = RoundReport {
            round: self.tracker.next_round(),
            changed,
            settled,
        };
        debug!(
            round = report.round,
            changed, settled, "round committed"
        );
        let state = &self.state;
        self.tracker.record(report, || state.ranks());
        report
    }

    /// Rounds the configured policy allows
    fn round_budget(&self) -> usize {
        match self.config.policy {
            RoundPolicy::FixedPoint => ceil_log2(self.tree.len()) + 1,
            RoundPolicy::DepthBound => ceil_log2(self.tree.height()),
            RoundPolicy::Fixed(k) => k,
        }
    }

    /// Run rounds per the policy and return converged ranks
    ///
    /// Fails with [`PramError::RoundBudgetExhausted`] if the policy's
    /// rounds end before the fixed point; partial ranks are never returned.
    pub fn run(mut self) -> Result<RankOutcome, PramError> {
        let span = info_span!("rank", n = self.tree.len(), policy = %self.config.policy);
        let _enter = span.enter();

        let budget = self.round_budget();
        let stop_at_fixed_point = self.config.policy == RoundPolicy::FixedPoint;
        while self.rounds() < budget {
            if stop_at_fixed_point && self.is_converged() {
                break;
            }
            self.step();
        }

        if !self.is_converged() {
            let stuck: Vec<NodeId> = self.unsettled().take(8).collect();
            warn!(rounds = self.rounds(), ?stuck, "round budget exhausted");
            return Err(PramError::RoundBudgetExhausted {
                rounds: self.rounds(),
                unsettled: self.tree.len() - self.ledger.settled_count(),
            });
        }

        debug!(rounds = self.rounds(), "pointer jumping converged");
        Ok(RankOutcome {
            ranks: Ranks {
                depths: self.state.ranks(),
            },
            profile: self.tracker.into_profile(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> TreeModel {
        TreeModel::build(6, &[0, 0, 0, 1, 3, 3]).unwrap()
    }

    #[test]
    fn fixture_ranks_follow_parent_relation() {
        let tree = fixture();
        let outcome = RankEngine::new(&tree, RankConfig::new()).run().unwrap();
        assert_eq!(outcome.ranks.as_slice(), &[0, 1, 1, 2, 3, 3]);
        assert_eq!(outcome.profile.rounds, 2);
        assert_eq!(outcome.ranks.get(NodeId::from(5)), Some(3));
        assert_eq!(outcome.ranks.get(NodeId::from(6)), None);
    }

    #[test]
    fn single_node_needs_no_rounds() {
        let tree = TreeModel::build(1, &[0]).unwrap();
        let outcome = RankEngine::new(&tree, RankConfig::new()).run().unwrap();
        assert_eq!(outcome.ranks.to_map(), BTreeMap::from([(0, 0)]));
        assert_eq!(outcome.profile.rounds, 0);
    }

    #[test]
    fn extra_round_after_convergence_is_a_no_op() {
        let tree = fixture();
        let mut engine = RankEngine::new(&tree, RankConfig::new());
        while !engine.is_converged() {
            engine.step();
        }
        let before = engine.state().cells().to_vec();
        let report = engine.step();
        assert_eq!(report.changed, 0);
        assert_eq!(engine.state().cells(), before.as_slice());
    }

    #[test]
    fn depth_bound_matches_fixed_point() {
        let tree = TreeModel::build(9, &[0, 0, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        let bounded = RankEngine::new(
            &tree,
            RankConfig::new().with_round_policy(RoundPolicy::DepthBound),
        )
        .run()
        .unwrap();
        assert_eq!(bounded.profile.rounds, 3);
        assert_eq!(bounded.ranks.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn legacy_bound_undershoots_a_path() {
        let parents: Vec<usize> = (0..8).map(|i: usize| i.saturating_sub(1)).collect();
        let tree = TreeModel::build(8, &parents).unwrap();
        let policy = RoundPolicy::legacy_node_count(tree.len());
        assert_eq!(policy, RoundPolicy::Fixed(2));

        let mut engine = RankEngine::new(&tree, RankConfig::new().with_round_policy(policy));
        engine.step();
        engine.step();
        let stuck: Vec<usize> = engine.unsettled().map(usize::from).collect();
        assert_eq!(stuck, vec![5, 6, 7]);

        let err = RankEngine::new(&tree, RankConfig::new().with_round_policy(policy))
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            PramError::RoundBudgetExhausted { rounds: 2, unsettled: 3 }
        ));
    }

    #[test]
    fn history_records_ranks_per_round() {
        let tree = fixture();
        let outcome = RankEngine::new(&tree, RankConfig::new().with_history(true))
            .run()
            .unwrap();
        assert_eq!(
            outcome.profile.rank_history,
            vec![vec![0, 1, 1, 2, 2, 2], vec![0, 1, 1, 2, 3, 3]]
        );
    }

    #[test]
    fn policy_round_trips_through_strings() {
        for policy in [
            RoundPolicy::FixedPoint,
            RoundPolicy::DepthBound,
            RoundPolicy::Fixed(4),
        ] {
            assert_eq!(policy.to_string().parse::<RoundPolicy>(), Ok(policy));
        }
        assert!("fixed:x".parse::<RoundPolicy>().is_err());
    }
}
