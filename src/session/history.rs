//! Bounded command history with up/down navigation.

use std::collections::VecDeque;

/// Default number of remembered commands.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1996;

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Past commands, oldest first.
///
/// The navigation position is `None` while at the bottom (editing a fresh
/// line) and an index into the entries while browsing.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    capacity: usize,
    position: Option<usize>,
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            position: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Current navigation index, `None` at the bottom.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, entry: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.into());
    }

    /// Return navigation to the bottom.
    pub fn reset_navigation(&mut self) {
        self.position = None;
    }

    /// Step through the history.
    ///
    /// Leaving the bottom upwards first records `current` as the newest
    /// entry unless it is blank or repeats the newest entry. Returns the
    /// entry to show, or `None` when there is nothing to navigate.
    pub fn navigate(&mut self, direction: Direction, current: &str) -> Option<&str> {
        let base = match (self.position, direction) {
            (Some(index), _) => index,
            (None, Direction::Down) => return None,
            (None, Direction::Up) => {
                let fresh = !current.trim().is_empty() && self.last() != Some(current);
                if fresh {
                    self.push(current);
                    self.entries.len() - 1
                } else {
                    self.entries.len()
                }
            }
        };

        if self.entries.is_empty() {
            return None;
        }

        let last = self.entries.len() - 1;
        let next = match direction {
            Direction::Up => base.saturating_sub(1),
            Direction::Down => base + 1,
        }
        .min(last);

        self.position = Some(next);
        self.get(next)
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
