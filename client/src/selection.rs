//! Unsubmitted per-poll choices of one voter session.

use std::collections::HashMap;

use verdict_types::{OptionIndex, PollId};

/// The option a voter has picked on each poll but not yet submitted.
///
/// One choice per poll, last write wins. Entries go away only when a vote
/// on that poll succeeds or the whole form is reset; a refresh never prunes
/// them, so submission re-checks the choice against the current poll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    chosen: HashMap<PollId, OptionIndex>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option_index` as the choice for `poll_id`, replacing any prior one.
    pub fn select(&mut self, poll_id: PollId, option_index: OptionIndex) {
        self.chosen.insert(poll_id, option_index);
    }

    pub fn selection(&self, poll_id: PollId) -> Option<OptionIndex> {
        self.chosen.get(&poll_id).copied()
    }

    pub fn is_selected(&self, poll_id: PollId, option_index: OptionIndex) -> bool {
        self.selection(poll_id) == Some(option_index)
    }

    /// Drop the choice for one poll, returning it.
    pub fn clear(&mut self, poll_id: PollId) -> Option<OptionIndex> {
        self.chosen.remove(&poll_id)
    }

    pub fn clear_all(&mut self) {
        self.chosen.clear();
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut selection = SelectionState::new();
        selection.select(PollId::new(1), 0);
        selection.select(PollId::new(1), 2);
        assert_eq!(selection.selection(PollId::new(1)), Some(2));
        assert!(selection.is_selected(PollId::new(1), 2));
        assert!(!selection.is_selected(PollId::new(1), 0));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn polls_are_independent() {
        let mut selection = SelectionState::new();
        selection.select(PollId::new(1), 0);
        selection.select(PollId::new(2), 1);
        assert_eq!(selection.clear(PollId::new(1)), Some(0));
        assert_eq!(selection.selection(PollId::new(1)), None);
        assert_eq!(selection.selection(PollId::new(2)), Some(1));
    }

    #[test]
    fn clear_all_resets() {
        let mut selection = SelectionState::new();
        selection.select(PollId::new(1), 0);
        selection.select(PollId::new(2), 1);
        selection.clear_all();
        assert!(selection.is_empty());
    }
}
