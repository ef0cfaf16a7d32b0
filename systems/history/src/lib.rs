#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Linear undo/redo over full snapshots of editor state.
//!
//! The history never inspects what it stores. Callers record a clone of their
//! state before every mutation and hand their live state back to [`undo`] and
//! [`redo`], which swap it with the stored snapshot.
//!
//! [`undo`]: EditHistory::undo
//! [`redo`]: EditHistory::redo

use log::trace;

/// Two-stack undo/redo history of owned snapshots.
#[derive(Clone, Debug)]
pub struct EditHistory<T> {
    past: Vec<T>,
    future: Vec<T>,
}

impl<T> Default for EditHistory<T> {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
        }
    }
}

impl<T: Clone> EditHistory<T> {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a snapshot of `current` as the state preceding the next action.
    ///
    /// Any redoable future is discarded.
    pub fn record(&mut self, current: &T) {
        self.past.push(current.clone());
        self.future.clear();
        trace!("history recorded; depth {}", self.past.len());
    }

    /// Restores the most recently recorded snapshot into `current`.
    ///
    /// The replaced state becomes redoable. Returns `false` and leaves
    /// `current` untouched when there is nothing to undo.
    pub fn undo(&mut self, current: &mut T) -> bool {
        Self::swap(&mut self.past, &mut self.future, current)
    }

    /// Re-applies the most recently undone snapshot into `current`.
    ///
    /// Returns `false` and leaves `current` untouched when there is nothing
    /// to redo.
    pub fn redo(&mut self, current: &mut T) -> bool {
        Self::swap(&mut self.future, &mut self.past, current)
    }

    fn swap(from: &mut Vec<T>, to: &mut Vec<T>, current: &mut T) -> bool {
        let Some(snapshot) = from.pop() else {
            return false;
        };
        to.push(std::mem::replace(current, snapshot));
        true
    }

    /// Reports whether [`EditHistory::undo`] would restore anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Reports whether [`EditHistory::redo`] would restore anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undoable snapshots.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of redoable snapshots.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Forgets every snapshot.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
