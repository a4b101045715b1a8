use tracing::debug;

/// Linear progress of one deployment run. Each stage's postcondition is
/// the next stage's precondition; the machine never moves backwards and
/// never skips forward past an intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    PrereqChecked,
    Prepared,
    BackedUp,
    Built,
    CutOver,
    HealthVerified,
    Succeeded,
    Aborted,
    RolledBack,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineState::Succeeded | PipelineState::Aborted | PipelineState::RolledBack
        )
    }
}

/// Tracks and logs state transitions for one run.
#[derive(Debug)]
pub struct StateTracker {
    current: PipelineState,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            current: PipelineState::Init,
        }
    }

    pub fn current(&self) -> PipelineState {
        self.current
    }

    pub fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            !self.current.is_terminal(),
            "transition out of terminal state {:?}",
            self.current
        );
        debug!("Pipeline state {:?} -> {:?}", self.current, next);
        self.current = next;
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_end_states_are_terminal() {
        assert!(PipelineState::Succeeded.is_terminal());
        assert!(PipelineState::Aborted.is_terminal());
        assert!(PipelineState::RolledBack.is_terminal());

        for state in [
            PipelineState::Init,
            PipelineState::PrereqChecked,
            PipelineState::Prepared,
            PipelineState::BackedUp,
            PipelineState::Built,
            PipelineState::CutOver,
            PipelineState::HealthVerified,
        ] {
            assert!(!state.is_terminal(), "{:?} should not be terminal", state);
        }
    }

    #[test]
    fn tracker_starts_at_init_and_advances() {
        let mut tracker = StateTracker::new();
        assert_eq!(tracker.current(), PipelineState::Init);

        tracker.advance(PipelineState::PrereqChecked);
        tracker.advance(PipelineState::Prepared);
        assert_eq!(tracker.current(), PipelineState::Prepared);
    }
}
