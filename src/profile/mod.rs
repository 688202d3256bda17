//! Round accounting and profiling
//!
//! Tracks how many synchronous rounds the rank engine ran and what each
//! round did, to check the O(log depth) round bound.

mod tracker;

pub use tracker::RoundTracker;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of one committed round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundReport {
    /// Round number, starting at 1
    pub round: usize,
    /// Ancestor pointers that moved in this round
    pub changed: usize,
    /// Nodes whose ancestor is the root after this round
    pub settled: usize,
}

/// Round profile of a rank computation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundProfile {
    /// Rounds executed
    pub rounds: usize,

    /// One report per round
    pub timeline: Vec<RoundReport>,

    /// Rank snapshot after each round (only if history is enabled)
    pub rank_history: Vec<Vec<usize>>,
}

impl RoundProfile {
    /// First round after which every node was settled
    pub fn converged_at(&self, n: usize) -> Option<usize> {
        self.timeline
            .iter()
            .find(|report| report.settled == n)
            .map(|report| report.round)
    }

    /// Total pointer moves over all rounds
    pub fn total_changes(&self) -> usize {
        self.timeline.iter().map(|report| report.changed).sum()
    }

    /// Generate report
    pub fn report(&self) -> String {
        let mut out = format!("Rounds: {}\n", self.rounds);
        for report in &self.timeline {
            out.push_str(&format!(
                "  round {}: {} pointers moved, {} settled\n",
                report.round, report.changed, report.settled
            ));
        }
        out
    }
}
