//! # session-memory
//!
//! Bounded per-session conversation window. Each session id maps to an ordered
//! list of [`Turn`]s capped at `2 × window_size` (user+assistant pairs); the
//! oldest turns are evicted first after every append. Sessions are created
//! lazily on first append and removed only by [`WindowMemory::clear`].
//!
//! ## Thread safety
//!
//! Backed by a [`DashMap`], so operations on one session take that session's
//! shard entry exclusively while unrelated sessions proceed without contention.
//! All operations are total: there is no error path.

use assistant_core::Turn;
use dashmap::DashMap;
use tracing::debug;

/// In-memory window store for conversation turns, keyed by session id.
#[derive(Debug)]
pub struct WindowMemory {
    window_size: usize,
    sessions: DashMap<String, Vec<Turn>>,
}

impl WindowMemory {
    /// Creates an empty store retaining up to `window_size` turn pairs per
    /// session.
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            sessions: DashMap::new(),
        }
    }

    /// Configured window size in turn pairs.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns an independent copy of the session's turns, oldest first.
    /// Unknown sessions yield an empty list.
    pub fn load(&self, session_id: &str) -> Vec<Turn> {
        self.sessions
            .get(session_id)
            .map(|turns| turns.clone())
            .unwrap_or_default()
    }

    /// Appends one turn, then trims the front until the window invariant
    /// (`len ≤ 2 × window_size`) holds again.
    pub fn append(&self, session_id: &str, turn: Turn) {
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_default();
        entry.push(turn);
        Self::trim(&mut entry, self.window_size);
    }

    /// Appends a user+assistant pair under one entry lock, so a concurrent
    /// `load` never observes the user half without the assistant half.
    pub fn append_pair(&self, session_id: &str, user: Turn, assistant: Turn) {
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_default();
        entry.push(user);
        entry.push(assistant);
        Self::trim(&mut entry, self.window_size);
        debug!(
            session_id = %session_id,
            turns = entry.len(),
            "appended turn pair"
        );
    }

    /// Removes all turns for the session. No-op when the session is unknown.
    pub fn clear(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Number of turns currently retained for the session.
    pub fn len(&self, session_id: &str) -> usize {
        self.sessions
            .get(session_id)
            .map(|turns| turns.len())
            .unwrap_or(0)
    }

    /// True when the session holds no turns.
    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }

    fn trim(turns: &mut Vec<Turn>, window_size: usize) {
        let max_turns = window_size * 2;
        if turns.len() > max_turns {
            let overflow = turns.len() - max_turns;
            turns.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::Role;

    /// **Test: load on an unknown session returns an empty list.**
    #[test]
    fn load_unknown_session_is_empty() {
        let memory = WindowMemory::new(2);
        assert!(memory.load("missing").is_empty());
    }

    /// **Test: load returns a copy; mutating it does not affect the store.**
    #[test]
    fn load_returns_independent_copy() {
        let memory = WindowMemory::new(2);
        memory.append("s1", Turn::user("a"));

        let mut copy = memory.load("s1");
        copy.push(Turn::assistant("injected"));

        assert_eq!(memory.len("s1"), 1);
    }

    /// **Test: clear removes all turns and is idempotent on unknown sessions.**
    #[test]
    fn clear_is_total_and_idempotent() {
        let memory = WindowMemory::new(2);
        memory.append_pair("s1", Turn::user("q"), Turn::assistant("a"));

        memory.clear("s1");
        assert!(memory.load("s1").is_empty());

        // Unknown session: must not panic or create state.
        memory.clear("never-seen");
        assert!(memory.load("never-seen").is_empty());
    }

    /// **Test: appending the third pair with window_size=2 evicts the first
    /// pair, leaving exactly the last four turns in original order.**
    #[test]
    fn window_evicts_oldest_pairs_fifo() {
        let memory = WindowMemory::new(2);
        for i in 1..=3 {
            memory.append_pair(
                "s1",
                Turn::user(format!("q{i}")),
                Turn::assistant(format!("a{i}")),
            );
        }

        let turns = memory.load("s1");
        assert_eq!(turns.len(), 4);
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["q2", "a2", "q3", "a3"]);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);
    }

    /// **Test: single appends also respect the invariant after every call.**
    #[test]
    fn single_appends_never_exceed_window() {
        let memory = WindowMemory::new(1);
        for i in 0..10 {
            memory.append("s1", Turn::user(format!("m{i}")));
            assert!(memory.len("s1") <= 2);
        }
        let contents: Vec<String> =
            memory.load("s1").into_iter().map(|t| t.content).collect();
        assert_eq!(contents, vec!["m8", "m9"]);
    }

    /// **Test: two sessions never observe each other's turns.**
    #[test]
    fn sessions_are_isolated() {
        let memory = WindowMemory::new(5);
        memory.append_pair("alice", Turn::user("qa"), Turn::assistant("aa"));
        memory.append_pair("bob", Turn::user("qb"), Turn::assistant("ab"));

        let alice: Vec<String> = memory.load("alice").into_iter().map(|t| t.content).collect();
        let bob: Vec<String> = memory.load("bob").into_iter().map(|t| t.content).collect();
        assert_eq!(alice, vec!["qa", "aa"]);
        assert_eq!(bob, vec!["qb", "ab"]);

        memory.clear("alice");
        assert_eq!(memory.len("bob"), 2);
    }
}
