//! # PRAM-Style Tree Primitives
//!
//! This library simulates classical parallel-random-access-machine
//! algorithms over a single rooted tree given as parent pointers.
//!
//! ## Core Algorithms
//!
//! 1. **Discovery order**: compact an Euler tour into preorder with
//!    filter → exclusive scan → scatter
//! 2. **Ranks**: compute every node's depth by pointer jumping in
//!    O(log height) synchronous rounds
//!
//! Every step runs as a round of independent per-index work followed by a
//! barrier. Round state is double buffered, so no index reads a value
//! written in the same round. With the `parallel` feature rounds run on
//! rayon; without it they are emulated sequentially with identical results.
//! Both builds run the same test suite (`cargo test` and
//! `cargo test --no-default-features`), which checks every output against
//! the sequential oracles on [`TreeModel`].
//!
//! ## Usage Example
//!
//! ```
//! use pram_tree::{build_tree, compute_discovery_order, compute_ranks};
//!
//! let tree = build_tree(6, &[0, 0, 0, 1, 3, 3])?;
//! let order = compute_discovery_order(&tree, &[0, 1, 3, 4, 3, 5, 3, 1, 0, 2, 0])?;
//! let ranks = compute_ranks(&tree)?;
//!
//! assert_eq!(order.len(), 6);
//! assert_eq!(ranks.as_slice(), &[0, 1, 1, 2, 3, 3]);
//! # Ok::<(), pram_tree::PramError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules
pub mod tree;    // Parent-pointer tree model
pub mod tour;    // Euler tour filter, scan, scatter
pub mod rank;    // Pointer-jumping rank engine
pub mod profile; // Round accounting
pub mod util;    // Parallel primitives and helpers

// Re-exports for convenience
pub use profile::{RoundProfile, RoundReport};
pub use rank::{RankConfig, RankEngine, RankOutcome, Ranks, RoundPolicy};
pub use tour::{Compactor, DiscoveryOrder, EulerTour};
pub use tree::{NodeId, ParentId, TreeModel};

use thiserror::Error;
use tracing::info_span;

/// Errors raised by tree construction, compaction and ranking
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PramError {
    /// Malformed parent array: out-of-range id, missing or duplicate root,
    /// or a cycle that never reaches the root
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tour length or contents do not match the tree
    #[error("Inconsistent tour: {0}")]
    InconsistentTour(String),

    /// The round policy ran out before pointer jumping converged
    #[error("Round budget exhausted after {rounds} rounds with {unsettled} nodes unsettled")]
    RoundBudgetExhausted {
        /// Rounds executed
        rounds: usize,
        /// Nodes whose ancestor had not reached the root
        unsettled: usize,
    },
}

/// Build a tree of `n` nodes from a self-loop-rooted parent array
pub fn build_tree(n: usize, parent_ids: &[usize]) -> Result<TreeModel, PramError> {
    TreeModel::build(n, parent_ids)
}

/// Preorder discovery order (A) and its inverse (D) from an Euler tour
pub fn compute_discovery_order<V: Sync>(
    tree: &TreeModel<V>,
    tour: &[usize],
) -> Result<DiscoveryOrder, PramError> {
    let tour = EulerTour::new(tree, tour.to_vec())?;
    tour::discovery_order(tree, &tour, &Compactor::new())
}

/// Depth of every node, iterating pointer jumping to its fixed point
pub fn compute_ranks<V>(tree: &TreeModel<V>) -> Result<Ranks, PramError> {
    RankEngine::new(tree, RankConfig::new())
        .run()
        .map(|outcome| outcome.ranks)
}

/// Configuration for a full analysis
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// Rank engine settings
    pub rank: RankConfig,

    /// Compaction window (`None` = whole tour)
    pub window: Option<std::ops::Range<usize>>,
}

impl AnalyzerConfig {
    /// Default configuration: fixed-point ranks, whole-tour compaction
    pub fn new() -> Self {
        Self::default()
    }

    /// Set round policy
    pub fn with_round_policy(mut self, policy: RoundPolicy) -> Self {
        self.rank.policy = policy;
        self
    }

    /// Enable per-round rank snapshots
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.rank.record_history = enabled;
        self
    }

    /// Restrict compaction to a window of tour positions
    pub fn with_window(mut self, window: std::ops::Range<usize>) -> Self {
        self.window = Some(window);
        self
    }
}

/// Result of a full analysis
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Preorder discovery order and inverse index
    pub discovery: DiscoveryOrder,

    /// Depth of every node
    pub ranks: Ranks,

    /// Rank engine round accounting
    pub profile: RoundProfile,
}

/// Runs both pipelines over one tree
///
/// The pipelines share only the tree's read-only parent relation.
#[derive(Debug)]
pub struct TreeAnalyzer {
    config: AnalyzerConfig,
}

impl TreeAnalyzer {
    /// Create analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Validate `tour`, then compute discovery order and ranks
    pub fn analyze<V: Sync>(
        &self,
        tree: &TreeModel<V>,
        tour: &[usize],
    ) -> Result<AnalysisResult, PramError> {
        let span = info_span!("analyze", n = tree.len());
        let _enter = span.enter();

        let tour = EulerTour::new(tree, tour.to_vec())?;
        let compactor = match &self.config.window {
            Some(window) => Compactor::with_window(window.clone()),
            None => Compactor::new(),
        };
        let discovery = tour::discovery_order(tree, &tour, &compactor)?;

        let outcome = RankEngine::new(tree, self.config.rank.clone()).run()?;

        Ok(AnalysisResult {
            discovery,
            ranks: outcome.ranks,
            profile: outcome.profile,
        })
    }
}
