/// Linear undo history. Recording after an undo drops the redo branch.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    entries: Vec<T>,
    cursor: usize,
    limit: usize,
}

pub const DEFAULT_HISTORY_LIMIT: usize = 256;

impl<T: Clone + PartialEq> Timeline<T> {
    pub fn new(initial: T) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Records `value` as the newest entry. Returns false when it equals the
    /// current entry and nothing was recorded.
    pub fn push(&mut self, value: T) -> bool {
        if *self.current() == value {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(value);
        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_walk_the_history() {
        let mut timeline = Timeline::new(0);
        timeline.push(1);
        timeline.push(2);

        assert_eq!(timeline.undo(), Some(&1));
        assert_eq!(timeline.undo(), Some(&0));
        assert_eq!(timeline.undo(), None);
        assert_eq!(timeline.redo(), Some(&1));
        assert!(timeline.can_redo());
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut timeline = Timeline::new("a");
        timeline.push("b");
        timeline.undo();
        timeline.push("c");

        assert!(!timeline.can_redo());
        assert_eq!(timeline.current(), &"c");
        assert_eq!(timeline.undo(), Some(&"a"));
    }

    #[test]
    fn repeated_value_is_not_recorded() {
        let mut timeline = Timeline::new(7);
        assert!(!timeline.push(7));
        assert!(!timeline.can_undo());
    }

    #[test]
    fn oldest_entries_fall_off_past_the_limit() {
        let mut timeline = Timeline::with_limit(0, 3);
        for value in 1..=5 {
            timeline.push(value);
        }
        assert_eq!(timeline.undo(), Some(&4));
        assert_eq!(timeline.undo(), Some(&3));
        assert_eq!(timeline.undo(), None);
    }
}
