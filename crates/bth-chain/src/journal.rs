//! Typed undo log for multi-step state transitions.
//!
//! A contract that writes local state and then calls a collaborator records
//! an undo command for every local write. If the collaborator fails, the
//! journal is rolled back against the same state, newest write first, and
//! the combined operation leaves no trace.

/// State that can apply its own undo commands.
pub trait Reversible {
    /// A command that reverses one recorded write.
    type Undo;

    /// Apply a single undo command.
    fn revert(&mut self, undo: Self::Undo);
}

/// Undo commands recorded during one unit of work.
#[must_use = "a journal must be committed or rolled back"]
#[derive(Debug)]
pub struct Journal<U> {
    undo: Vec<U>,
}

impl<U> Journal<U> {
    pub fn new() -> Self {
        Self { undo: Vec::new() }
    }

    /// Record the command that reverses a write just performed.
    pub fn record(&mut self, undo: U) {
        self.undo.push(undo);
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    /// Undo every recorded write, newest first. Returns how many were undone.
    pub fn rollback<S>(self, state: &mut S) -> usize
    where
        S: Reversible<Undo = U>,
    {
        let count = self.undo.len();
        for undo in self.undo.into_iter().rev() {
            state.revert(undo);
        }
        count
    }

    /// Keep every write; the journal is discarded.
    pub fn commit(self) {}
}

impl<U> Default for Journal<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Stack {
        items: Vec<u32>,
        log: Vec<u32>,
    }

    enum Undo {
        Pop(u32),
    }

    impl Reversible for Stack {
        type Undo = Undo;

        fn revert(&mut self, undo: Undo) {
            match undo {
                Undo::Pop(expected) => {
                    let popped = self.items.pop();
                    assert_eq!(popped, Some(expected));
                    self.log.push(expected);
                }
            }
        }
    }

    #[test]
    fn rollback_undoes_newest_first() {
        let mut stack = Stack::default();
        let mut journal = Journal::new();
        for n in [1, 2, 3] {
            stack.items.push(n);
            journal.record(Undo::Pop(n));
        }
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.rollback(&mut stack), 3);
        assert!(stack.items.is_empty());
        assert_eq!(stack.log, vec![3, 2, 1]);
    }

    #[test]
    fn commit_keeps_writes() {
        let mut stack = Stack::default();
        let mut journal = Journal::new();
        stack.items.push(7);
        journal.record(Undo::Pop(7));
        journal.commit();
        assert_eq!(stack.items, vec![7]);
    }

    #[test]
    fn empty_rollback_is_noop() {
        let mut stack = Stack::default();
        let journal: Journal<Undo> = Journal::default();
        assert!(journal.is_empty());
        assert_eq!(journal.rollback(&mut stack), 0);
    }
}
