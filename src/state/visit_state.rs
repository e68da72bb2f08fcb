/// Visit state definitions for tracking crawl progress
///
/// This module defines all possible states a single visit of a URL can be in.
use std::fmt;

/// Represents the current state of one visit in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisitState {
    // ===== Active States =====
    /// URL was discovered and a visit was spawned for it
    Discovered,

    /// The normalized key was claimed by this visit
    Claimed,

    /// Page is currently being fetched
    Fetching,

    /// Page body is being turned into a record
    Extracting,

    // ===== Terminal Success States =====
    /// Record stored; outgoing links handed back for dispatch
    Completed,

    // ===== Terminal Skip States =====
    /// URL failed the scope check or could not be normalized
    Rejected,

    /// Key already claimed elsewhere, or the page budget is exhausted
    Skipped,

    // ===== Terminal Error States =====
    /// Fetch or extraction failed; the key stays claimed
    Failed,
}

impl VisitState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Discovered | Self::Claimed | Self::Fetching | Self::Extracting
        )
    }

    /// Returns true if a visit may move from `self` to `next`
    pub fn can_transition_to(&self, next: VisitState) -> bool {
        use VisitState::*;
        matches!(
            (self, next),
            (Discovered, Rejected | Skipped | Claimed)
                | (Claimed, Fetching | Failed)
                | (Fetching, Extracting | Failed)
                | (Extracting, Completed | Failed)
        )
    }

    /// Short lowercase name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Claimed => "claimed",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Returns all terminal states
    pub fn terminal_states() -> [Self; 4] {
        [Self::Completed, Self::Rejected, Self::Skipped, Self::Failed]
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
