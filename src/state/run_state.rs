/// Run state definitions for a single crawl
///
/// A crawl moves through `Running -> Draining -> Finished`. The reason the
/// crawl stopped admitting work is decided when it leaves `Running` and is
/// carried through the remaining states.
use std::fmt;

/// Why a crawl stopped dispatching new pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The visited count reached the configured page budget
    PageLimitReached,

    /// No queued URLs and no in-flight workers remained
    FrontierExhausted,

    /// The shared cancellation signal was raised
    Cancelled,
}

impl StopReason {
    /// Returns a stable, machine-friendly name for the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageLimitReached => "page_limit_reached",
            Self::FrontierExhausted => "frontier_exhausted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the post-crawl deduplication pass should run
    pub fn allows_post_processing(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Dispatching workers from the frontier
    Running,

    /// No new dispatch; waiting for in-flight workers to finish
    Draining(StopReason),

    /// All workers joined and results persisted
    Finished(StopReason),
}

impl RunState {
    /// The stop reason, once one has been decided
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Running => None,
            Self::Draining(reason) | Self::Finished(reason) => Some(*reason),
        }
    }

    /// Leaves `Running` for `Draining`
    ///
    /// A crawl that is already draining keeps its first stop reason.
    pub fn drain(self, reason: StopReason) -> Self {
        match self {
            Self::Running => Self::Draining(reason),
            other => other,
        }
    }

    /// Moves a draining crawl to `Finished`
    pub fn finish(self) -> Self {
        match self {
            Self::Draining(reason) => Self::Finished(reason),
            other => other,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Draining(reason) => write!(f, "draining ({})", reason),
            Self::Finished(reason) => write!(f, "finished ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let state = RunState::Running;
        assert_eq!(state.stop_reason(), None);

        let state = state.drain(StopReason::PageLimitReached);
        assert_eq!(state, RunState::Draining(StopReason::PageLimitReached));

        let state = state.finish();
        assert_eq!(state, RunState::Finished(StopReason::PageLimitReached));
        assert_eq!(state.stop_reason(), Some(StopReason::PageLimitReached));
    }

    #[test]
    fn test_first_stop_reason_wins() {
        let state = RunState::Running
            .drain(StopReason::PageLimitReached)
            .drain(StopReason::Cancelled);
        assert_eq!(state, RunState::Draining(StopReason::PageLimitReached));
    }

    #[test]
    fn test_finish_requires_draining() {
        assert_eq!(RunState::Running.finish(), RunState::Running);
    }

    #[test]
    fn test_post_processing() {
        assert!(StopReason::PageLimitReached.allows_post_processing());
        assert!(StopReason::FrontierExhausted.allows_post_processing());
        assert!(!StopReason::Cancelled.allows_post_processing());
    }

    #[test]
    fn test_display() {
        assert_eq!(StopReason::FrontierExhausted.to_string(), "frontier_exhausted");
        assert_eq!(RunState::Running.to_string(), "running");
        assert_eq!(
            RunState::Draining(StopReason::Cancelled).to_string(),
            "draining (cancelled)"
        );
        assert_eq!(
            RunState::Finished(StopReason::PageLimitReached).to_string(),
            "finished (page_limit_reached)"
        );
    }
}
