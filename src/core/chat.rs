//! Per-thread chat unread tracking.
//!
//! The badge a party sees is the stored counter, not a recomputed
//! unread-message count, so the counter is written in the same step as
//! each appended message to avoid drift.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatParty {
    Student,
    Admin,
}

impl ChatParty {
    pub fn other(self) -> Self {
        match self {
            Self::Student => Self::Admin,
            Self::Admin => Self::Student,
        }
    }
}

/// Unread state for one thread: a read flag and counter per party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadUnreadState {
    pub thread_id: String,
    is_read_by_student: bool,
    is_read_by_admin: bool,
    unread_student: u32,
    unread_admin: u32,
}

impl ThreadUnreadState {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            is_read_by_student: true,
            is_read_by_admin: true,
            unread_student: 0,
            unread_admin: 0,
        }
    }

    /// Record a message appended by `sender`: the other party's counter
    /// goes up and their read flag drops, in one step.
    pub fn message_appended(&mut self, sender: ChatParty) {
        match sender.other() {
            ChatParty::Student => {
                self.unread_student += 1;
                self.is_read_by_student = false;
            }
            ChatParty::Admin => {
                self.unread_admin += 1;
                self.is_read_by_admin = false;
            }
        }
    }

    /// The viewing party opened the thread: their counter resets to
    /// zero regardless of how far it had climbed.
    pub fn opened_by(&mut self, viewer: ChatParty) {
        match viewer {
            ChatParty::Student => {
                self.unread_student = 0;
                self.is_read_by_student = true;
            }
            ChatParty::Admin => {
                self.unread_admin = 0;
                self.is_read_by_admin = true;
            }
        }
    }

    /// Badge value for a party.
    pub fn unread_count(&self, party: ChatParty) -> u32 {
        match party {
            ChatParty::Student => self.unread_student,
            ChatParty::Admin => self.unread_admin,
        }
    }

    pub fn is_read_by(&self, party: ChatParty) -> bool {
        match party {
            ChatParty::Student => self.is_read_by_student,
            ChatParty::Admin => self.is_read_by_admin,
        }
    }
}

/// Tracks unread state across all open chat threads.
pub struct ChatUnreadTracker {
    threads: HashMap<String, ThreadUnreadState>,
}

impl ChatUnreadTracker {
    pub fn new() -> Self {
        Self {
            threads: HashMap::new(),
        }
    }

    fn thread_mut(&mut self, thread_id: &str) -> &mut ThreadUnreadState {
        self.threads
            .entry(thread_id.to_string())
            .or_insert_with(|| ThreadUnreadState::new(thread_id))
    }

    pub fn message_appended(&mut self, thread_id: &str, sender: ChatParty) {
        self.thread_mut(thread_id).message_appended(sender);
    }

    pub fn opened_by(&mut self, thread_id: &str, viewer: ChatParty) {
        self.thread_mut(thread_id).opened_by(viewer);
    }

    pub fn unread_count(&self, thread_id: &str, party: ChatParty) -> u32 {
        self.threads
            .get(thread_id)
            .map(|t| t.unread_count(party))
            .unwrap_or(0)
    }
}

impl Default for ChatUnreadTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_appends_leave_counter_at_n() {
        let mut thread = ThreadUnreadState::new("t1");
        for _ in 0..7 {
            thread.message_appended(ChatParty::Admin);
        }
        assert_eq!(thread.unread_count(ChatParty::Student), 7);
        assert!(!thread.is_read_by(ChatParty::Student));
        // The sender's own badge is untouched.
        assert_eq!(thread.unread_count(ChatParty::Admin), 0);
    }

    #[test]
    fn test_open_resets_regardless_of_count() {
        let mut thread = ThreadUnreadState::new("t1");
        for _ in 0..42 {
            thread.message_appended(ChatParty::Admin);
        }
        thread.opened_by(ChatParty::Student);
        assert_eq!(thread.unread_count(ChatParty::Student), 0);
        assert!(thread.is_read_by(ChatParty::Student));
    }

    #[test]
    fn test_counters_are_per_party() {
        let mut thread = ThreadUnreadState::new("t1");
        thread.message_appended(ChatParty::Student);
        thread.message_appended(ChatParty::Student);
        thread.message_appended(ChatParty::Admin);

        assert_eq!(thread.unread_count(ChatParty::Admin), 2);
        assert_eq!(thread.unread_count(ChatParty::Student), 1);

        thread.opened_by(ChatParty::Admin);
        assert_eq!(thread.unread_count(ChatParty::Admin), 0);
        assert_eq!(thread.unread_count(ChatParty::Student), 1);
    }

    #[test]
    fn test_tracker_isolates_threads() {
        let mut tracker = ChatUnreadTracker::new();
        tracker.message_appended("t1", ChatParty::Admin);
        tracker.message_appended("t2", ChatParty::Admin);
        tracker.message_appended("t2", ChatParty::Admin);

        assert_eq!(tracker.unread_count("t1", ChatParty::Student), 1);
        assert_eq!(tracker.unread_count("t2", ChatParty::Student), 2);

        tracker.opened_by("t2", ChatParty::Student);
        assert_eq!(tracker.unread_count("t1", ChatParty::Student), 1);
        assert_eq!(tracker.unread_count("t2", ChatParty::Student), 0);
    }

    #[test]
    fn test_unknown_thread_has_zero_badge() {
        let tracker = ChatUnreadTracker::new();
        assert_eq!(tracker.unread_count("nope", ChatParty::Student), 0);
    }
}
