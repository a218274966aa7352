use crate::error::{EqError, Result};

/// Per-statement bookkeeping shared by every grammar rule.
///
/// `depth` counts rule entries since the start of the current statement; it
/// is never decremented on rule exit, so it bounds the total work of one
/// statement as well as its nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallState {
    max: usize,
    depth: usize,
    comma: usize,
}

impl CallState {
    pub fn new(max: usize) -> CallState {
        CallState {
            max,
            depth: 0,
            comma: 0,
        }
    }

    /// Records a rule entry and fails once the limit is passed.
    pub fn guard(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_add(1);

        if self.depth > self.max {
            Err(EqError::RecursionDepthExceeded(self.max))
        } else {
            Ok(())
        }
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn set_comma_count(&mut self, comma: usize) {
        self.comma = comma;
    }

    /// Separators seen by the most recently completed list.
    pub fn comma_count(&self) -> usize {
        self.comma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_trips_past_max() {
        let mut state = CallState::new(3);

        assert_eq!(state.guard(), Ok(()));
        assert_eq!(state.guard(), Ok(()));
        assert_eq!(state.guard(), Ok(()));
        assert_eq!(state.guard(), Err(EqError::RecursionDepthExceeded(3)));
    }

    #[test]
    fn reset_restarts_count() {
        let mut state = CallState::new(2);
        state.guard().unwrap();
        state.guard().unwrap();
        state.reset();

        assert_eq!(state.depth(), 0);
        assert_eq!(state.guard(), Ok(()));
    }

    #[test]
    fn comma_count() {
        let mut state = CallState::new(16);
        assert_eq!(state.comma_count(), 0);

        state.set_comma_count(3);
        assert_eq!(state.comma_count(), 3);
    }
}
