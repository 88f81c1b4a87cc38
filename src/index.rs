//! Frame-ordered and session-keyed indices backing the registries.

use std::collections::{BTreeMap, HashMap};

use crate::ident::{FrameNumber, SessionId};

/// Ordered map from frame number to a bound value.
///
/// Supports exact lookup and a floor query (largest key less than or equal
/// to the query frame), which is what makes retroactive session-id
/// resolution possible: an index built during an earlier dissection pass
/// stays queryable during later passes.
#[derive(Debug)]
pub struct FrameOrderedIndex<T> {
    entries: BTreeMap<FrameNumber, T>,
}

impl<T> Default for FrameOrderedIndex<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> FrameOrderedIndex<T> {
    /// Bind `value` at `frame`, replacing any value already bound there.
    ///
    /// Returns the previous binding when one existed.
    pub fn insert(&mut self, frame: FrameNumber, value: T) -> Option<T> {
        self.entries.insert(frame, value)
    }

    /// Look up the value bound exactly at `frame`.
    #[must_use]
    pub fn get(&self, frame: FrameNumber) -> Option<&T> { self.entries.get(&frame) }

    /// Return the entry with the largest frame number at or before `frame`.
    #[must_use]
    pub fn floor(&self, frame: FrameNumber) -> Option<(FrameNumber, &T)> {
        self.entries
            .range(..=frame)
            .next_back()
            .map(|(bound_at, value)| (*bound_at, value))
    }

    /// Number of bound frames.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// True when nothing has been bound yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Map from session id to a bound value.
#[derive(Debug)]
pub struct SessionIndex<T> {
    entries: HashMap<SessionId, T>,
}

impl<T> Default for SessionIndex<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> SessionIndex<T> {
    /// Bind `value` under `session_id`, replacing any previous binding.
    pub fn insert(&mut self, session_id: SessionId, value: T) -> Option<T> {
        self.entries.insert(session_id, value)
    }

    /// Look up the value bound under `session_id`.
    #[must_use]
    pub fn get(&self, session_id: SessionId) -> Option<&T> { self.entries.get(&session_id) }

    /// True when `session_id` has a binding.
    #[must_use]
    pub fn contains(&self, session_id: SessionId) -> bool {
        self.entries.contains_key(&session_id)
    }
}
