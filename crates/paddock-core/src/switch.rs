//! Model selection state machine

use crate::asset::LoadPlan;
use crate::coordinator::Generation;
use crate::error::SwitchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Nothing requested yet; holds the configured initial index
    Idle(usize),
    Loading(usize),
    Ready(usize),
    Failed(usize),
}

impl SwitchState {
    pub fn index(self) -> usize {
        match self {
            SwitchState::Idle(i)
            | SwitchState::Loading(i)
            | SwitchState::Ready(i)
            | SwitchState::Failed(i) => i,
        }
    }

    pub fn is_loading(self) -> bool {
        matches!(self, SwitchState::Loading(_))
    }
}

/// What a selection request asks of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Tear down and load this catalog entry
    Begin(usize),
    /// Already showing or loading the requested entry
    Unchanged,
}

/// Result of a switch entry point as seen by the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchOutcome {
    Started(LoadPlan),
    Unchanged,
    Rejected(SwitchError),
}

impl SwitchOutcome {
    pub fn plan(&self) -> Option<&LoadPlan> {
        match self {
            SwitchOutcome::Started(plan) => Some(plan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelSwitch {
    catalog_len: usize,
    state: SwitchState,
    /// Index of the last successfully loaded entry
    current: Option<usize>,
    /// Cycle whose completion may move `Loading` forward
    loading_generation: Option<Generation>,
}

impl ModelSwitch {
    pub fn new(catalog_len: usize, initial: usize) -> Self {
        Self {
            catalog_len,
            state: SwitchState::Idle(initial),
            current: None,
            loading_generation: None,
        }
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog_len
    }

    /// Validate a selection. Re-selecting a failed entry retries it, while
    /// re-selecting the entry still on screen after a failure does nothing.
    pub fn request(&self, index: usize) -> Result<Transition, SwitchError> {
        if index >= self.catalog_len {
            return Err(SwitchError::OutOfRange {
                requested: index,
                catalog_len: self.catalog_len,
            });
        }
        match self.state {
            SwitchState::Loading(i) if i == index => Ok(Transition::Unchanged),
            SwitchState::Loading(_) => Ok(Transition::Begin(index)),
            _ if self.current == Some(index) => Ok(Transition::Unchanged),
            _ => Ok(Transition::Begin(index)),
        }
    }

    /// Enter `Loading` for a cycle that was just opened
    pub fn begin(&mut self, index: usize, generation: Generation) {
        self.state = SwitchState::Loading(index);
        self.loading_generation = Some(generation);
    }

    /// Settle the load started for `generation`.
    ///
    /// Returns the loaded index, or `None` when the generation was
    /// superseded and the completion must be ignored.
    pub fn complete(&mut self, generation: Generation, success: bool) -> Option<usize> {
        if self.loading_generation != Some(generation) {
            return None;
        }
        let SwitchState::Loading(index) = self.state else {
            return None;
        };
        self.loading_generation = None;
        if success {
            self.state = SwitchState::Ready(index);
            self.current = Some(index);
        } else {
            self.state = SwitchState::Failed(index);
        }
        Some(index)
    }

    /// Catalog entry after the most recent selection, wrapping
    pub fn next_index(&self) -> usize {
        (self.state.index() + 1) % self.catalog_len.max(1)
    }

    pub fn previous_index(&self) -> usize {
        let len = self.catalog_len.max(1);
        (self.state.index() + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_rejected() {
        let switch = ModelSwitch::new(3, 0);
        assert_eq!(
            switch.request(3),
            Err(SwitchError::OutOfRange {
                requested: 3,
                catalog_len: 3
            })
        );
        assert!(switch.request(usize::MAX).is_err());
        assert_eq!(switch.state(), SwitchState::Idle(0));
    }

    #[test]
    fn test_lifecycle_and_same_index_noop() {
        let mut switch = ModelSwitch::new(3, 0);
        assert_eq!(switch.request(0), Ok(Transition::Begin(0)));
        switch.begin(0, Generation(1));
        assert_eq!(switch.request(0), Ok(Transition::Unchanged));

        assert_eq!(switch.complete(Generation(1), true), Some(0));
        assert_eq!(switch.state(), SwitchState::Ready(0));
        assert_eq!(switch.current(), Some(0));
        assert_eq!(switch.request(0), Ok(Transition::Unchanged));
    }

    #[test]
    fn test_superseded_completion_ignored() {
        let mut switch = ModelSwitch::new(3, 0);
        switch.begin(1, Generation(1));
        switch.begin(2, Generation(2));

        assert_eq!(switch.complete(Generation(1), true), None);
        assert_eq!(switch.state(), SwitchState::Loading(2));
        assert_eq!(switch.current(), None);

        assert_eq!(switch.complete(Generation(2), false), Some(2));
        assert_eq!(switch.state(), SwitchState::Failed(2));
        assert_eq!(switch.request(2), Ok(Transition::Begin(2)));
    }

    #[test]
    fn test_displayed_entry_unchanged_after_failure() {
        let mut switch = ModelSwitch::new(3, 0);
        switch.begin(0, Generation(1));
        switch.complete(Generation(1), true);
        switch.begin(1, Generation(2));
        switch.complete(Generation(2), false);

        assert_eq!(switch.state(), SwitchState::Failed(1));
        assert_eq!(switch.current(), Some(0));
        assert_eq!(switch.request(0), Ok(Transition::Unchanged));
        assert_eq!(switch.request(1), Ok(Transition::Begin(1)));

        // While another entry loads, the displayed one may be re-requested
        switch.begin(2, Generation(3));
        assert_eq!(switch.request(0), Ok(Transition::Begin(0)));
    }

    #[test]
    fn test_wrapping_neighbours() {
        let mut switch = ModelSwitch::new(3, 0);
        assert_eq!(switch.previous_index(), 2);
        assert_eq!(switch.next_index(), 1);
        switch.begin(2, Generation(1));
        assert_eq!(switch.next_index(), 0);
    }
}
