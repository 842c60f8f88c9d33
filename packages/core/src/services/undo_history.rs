//! Undo History
//!
//! Last-in-first-out stack of reversible user actions. The sync service pushes
//! an entry after each reversible mutation succeeds and pops one when the user
//! asks to undo. Entries are popped before the reversal request goes out, so a
//! failed reversal does not put the entry back.

use crate::models::UndoEntry;
use crate::services::error::{Result, SyncError};
use std::sync::{Mutex, MutexGuard};

/// Session-scoped undo stack
#[derive(Debug, Default)]
pub struct UndoHistory {
    entries: Mutex<Vec<UndoEntry>>,

    /// Maximum entries kept; 0 means unbounded
    capacity: usize,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack that drops its oldest entries beyond `capacity` (0 = unbounded)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UndoEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Append an entry at the tail
    pub fn push(&self, entry: UndoEntry) {
        let mut entries = self.lock();
        entries.push(entry);
        if self.capacity > 0 && entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
            tracing::debug!("undo history full, dropped {} oldest entr(ies)", excess);
        }
    }

    /// The entry the next undo would reverse
    pub fn peek(&self) -> Result<UndoEntry> {
        self.lock().last().cloned().ok_or(SyncError::EmptyUndoStack)
    }

    /// Remove and return the tail entry
    pub fn pop(&self) -> Result<UndoEntry> {
        self.lock().pop().ok_or(SyncError::EmptyUndoStack)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot, oldest first
    pub fn entries(&self) -> Vec<UndoEntry> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextContent;

    #[test]
    fn test_lifo_order_then_empty() {
        let history = UndoHistory::new();
        let pushed: Vec<UndoEntry> = (0..5)
            .map(|i| UndoEntry::delete(format!("N{}", i)))
            .collect();
        for entry in &pushed {
            history.push(entry.clone());
        }

        let popped: Vec<UndoEntry> = (0..5).map(|_| history.pop().unwrap()).collect();
        let mut expected = pushed;
        expected.reverse();

        assert_eq!(popped, expected);
        assert!(history.is_empty());
        assert!(history.pop().unwrap_err().is_empty_undo_stack());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let history = UndoHistory::new();
        history.push(UndoEntry::edit("N1", TextContent::new("Hello", "")));

        assert_eq!(history.peek().unwrap().note_id(), "N1");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_peek_on_empty_fails() {
        let history = UndoHistory::new();
        assert!(matches!(history.peek(), Err(SyncError::EmptyUndoStack)));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let history = UndoHistory::with_capacity(2);
        history.push(UndoEntry::delete("a"));
        history.push(UndoEntry::delete("b"));
        history.push(UndoEntry::delete("c"));

        let ids: Vec<String> = history
            .entries()
            .iter()
            .map(|e| e.note_id().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
