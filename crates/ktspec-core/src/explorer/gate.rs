//! Deferral of work while the project is indexing.

use std::collections::VecDeque;

/// Holds tasks back while indexing is in progress.
///
/// A task submitted while the project is "smart" is handed straight back
/// to the caller. While indexing it is queued exactly once; the queue is
/// drained in submission order when indexing finishes.
#[derive(Debug)]
pub struct DumbModeGate<T> {
    indexing: bool,
    pending: VecDeque<T>,
}

impl<T> DumbModeGate<T> {
    pub fn new() -> Self {
        Self {
            indexing: false,
            pending: VecDeque::new(),
        }
    }

    pub fn is_indexing(&self) -> bool {
        self.indexing
    }

    pub fn begin_indexing(&mut self) {
        self.indexing = true;
    }

    /// Leave indexing mode and take every deferred task, oldest first.
    pub fn finish_indexing(&mut self) -> Vec<T> {
        self.indexing = false;
        self.pending.drain(..).collect()
    }

    /// Returns the task when it may run now, otherwise defers it.
    pub fn run_when_smart(&mut self, task: T) -> Option<T> {
        if self.indexing {
            self.pending.push_back(task);
            None
        } else {
            Some(task)
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for DumbModeGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_immediately_when_smart() {
        let mut gate = DumbModeGate::new();
        assert_eq!(gate.run_when_smart(1), Some(1));
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn test_defers_in_submission_order() {
        let mut gate = DumbModeGate::new();
        gate.begin_indexing();
        assert_eq!(gate.run_when_smart("a"), None);
        assert_eq!(gate.run_when_smart("b"), None);
        assert_eq!(gate.pending(), 2);

        assert_eq!(gate.finish_indexing(), vec!["a", "b"]);
        assert!(!gate.is_indexing());
        assert!(gate.finish_indexing().is_empty());
    }
}
