//! Round tracking for verification

use super::{RoundProfile, RoundReport};

/// Tracks rounds during a rank computation
#[derive(Debug)]
pub struct RoundTracker {
    /// Rounds committed so far
    rounds: usize,

    /// Keep a rank snapshot per round
    history_enabled: bool,

    /// Profile under construction
    profile: RoundProfile,
}

impl RoundTracker {
    /// Create new tracker
    pub fn new(history_enabled: bool) -> Self {
        Self {
            rounds: 0,
            history_enabled,
            profile: RoundProfile::default(),
        }
    }

    /// Number for the next round
    pub fn next_round(&self) -> usize {
        self.rounds + 1
    }

    /// Record a committed round
    pub fn record(&mut self, report: RoundReport, ranks: impl FnOnce() -> Vec<usize>) {
        self.rounds = report.round;
        self.profile.rounds = self.rounds;
        self.profile.timeline.push(report);
        if self.history_enabled {
            self.profile.rank_history.push(ranks());
        }
    }

    /// Rounds committed so far
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Take profile (consumes tracker)
    pub fn into_profile(self) -> RoundProfile {
        self.profile
    }
}
