use serde::Serialize;

/// Lifecycle of an event as seen by its containers.
///
/// `New` is only ever the initial state, every mutation moves the event to
/// the state of the operation that ran. A fresh event does not stay `new`
/// after its first mutation, the latest operation always wins.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    New,
    Moved,
    Transposed,
    Removed,
}

impl LifecycleState {
    pub const fn is_new(self) -> bool {
        matches!(self, Self::New)
    }

    /// State after an operation targeting `next` ran.
    ///
    /// `New` is left on the first mutation instead of being kept until the
    /// event is first flushed, so containers can tell a moved fresh event
    /// from an untouched one.
    pub const fn transition(self, next: Self) -> Self {
        match next {
            // no way back
            Self::New => self,
            next => next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_new_on_first_mutation() {
        let state = LifecycleState::default();
        assert!(state.is_new());
        assert_eq!(
            state.transition(LifecycleState::Moved),
            LifecycleState::Moved
        );
        assert_eq!(
            state.transition(LifecycleState::Removed),
            LifecycleState::Removed
        );
    }

    #[test]
    fn test_moves_freely_afterwards() {
        let state = LifecycleState::Moved
            .transition(LifecycleState::Transposed)
            .transition(LifecycleState::Removed)
            .transition(LifecycleState::Moved);
        assert_eq!(state, LifecycleState::Moved);
    }

    #[test]
    fn test_never_returns_to_new() {
        assert_eq!(
            LifecycleState::Transposed.transition(LifecycleState::New),
            LifecycleState::Transposed
        );
    }
}
