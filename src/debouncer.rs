//! Search debounce control
//!
//! Typed text is only searched once the user stops typing for a full
//! quiescence window, and never twice in a row for the same settled text.
//!
//! The debouncer itself does not own a timer. Every input hands out a
//! ticket; whoever schedules the timer calls [`SearchDebouncer::settle`] with
//! that ticket when the window elapses. Only the ticket of the latest input
//! can settle, so a keystroke inside the window implicitly restarts it.

use crate::config::DEFAULT_DEBOUNCE;
use std::time::Duration;

/// Outcome of a debounce timer firing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Settled on a new value that should be searched
    Ready(String),
    /// A later input superseded this timer
    Stale,
    /// Same as the previously settled value
    Duplicate,
    /// Settled on empty or whitespace-only text
    Blank,
}

/// Search debounce controller for rate-limiting search requests
#[derive(Debug)]
pub struct SearchDebouncer {
    /// Debounce delay duration (default: 1s)
    pub debounce_delay: Duration,

    /// Latest input, waiting for its window to elapse
    pending_search_query: Option<String>,

    /// Ticket of the latest input
    ticket: u64,

    /// Last value that settled and was handed out for searching
    last_settled_query: Option<String>,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            debounce_delay: delay,
            pending_search_query: None,
            ticket: 0,
            last_settled_query: None,
        }
    }

    /// Record new input and return the ticket its timer must present.
    pub fn set_pending_search(&mut self, query: String) -> u64 {
        self.ticket += 1;
        self.pending_search_query = Some(query);
        self.ticket
    }

    pub fn clear_pending_search(&mut self) {
        self.pending_search_query = None;
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending_search_query.is_some()
    }

    pub fn last_settled(&self) -> Option<&str> {
        self.last_settled_query.as_deref()
    }

    /// Resolve the timer for `ticket`.
    pub fn settle(&mut self, ticket: u64) -> Settlement {
        if ticket != self.ticket {
            return Settlement::Stale;
        }
        let Some(query) = self.pending_search_query.take() else {
            return Settlement::Stale;
        };

        if query.trim().is_empty() {
            return Settlement::Blank;
        }
        if self.last_settled_query.as_deref() == Some(query.as_str()) {
            return Settlement::Duplicate;
        }

        self.last_settled_query = Some(query.clone());
        Settlement::Ready(query)
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_debouncer_creation() {
        let debouncer = SearchDebouncer::new();
        assert_eq!(debouncer.debounce_delay, Duration::from_secs(1));
        assert!(!debouncer.has_pending_search());
        assert!(debouncer.last_settled().is_none());
    }

    #[test]
    fn test_latest_ticket_settles() {
        let mut debouncer = SearchDebouncer::new();
        let first = debouncer.set_pending_search("c".to_string());
        let second = debouncer.set_pending_search("ca".to_string());
        let third = debouncer.set_pending_search("cat".to_string());

        assert_eq!(debouncer.settle(first), Settlement::Stale);
        assert_eq!(debouncer.settle(second), Settlement::Stale);
        assert_eq!(debouncer.settle(third), Settlement::Ready("cat".to_string()));
        assert!(!debouncer.has_pending_search());

        // A ticket settles at most once
        assert_eq!(debouncer.settle(third), Settlement::Stale);
    }

    #[test]
    fn test_consecutive_duplicate_is_suppressed() {
        let mut debouncer = SearchDebouncer::new();
        let ticket = debouncer.set_pending_search("cat".to_string());
        assert_eq!(debouncer.settle(ticket), Settlement::Ready("cat".to_string()));

        let ticket = debouncer.set_pending_search("cat".to_string());
        assert_eq!(debouncer.settle(ticket), Settlement::Duplicate);

        let ticket = debouncer.set_pending_search("dog".to_string());
        assert_eq!(debouncer.settle(ticket), Settlement::Ready("dog".to_string()));

        // Non-consecutive repeats are searched again
        let ticket = debouncer.set_pending_search("cat".to_string());
        assert_eq!(debouncer.settle(ticket), Settlement::Ready("cat".to_string()));
    }

    #[test]
    fn test_blank_does_not_touch_dedupe_memory() {
        let mut debouncer = SearchDebouncer::new();
        let ticket = debouncer.set_pending_search("cat".to_string());
        debouncer.settle(ticket);

        let ticket = debouncer.set_pending_search("   ".to_string());
        assert_eq!(debouncer.settle(ticket), Settlement::Blank);
        assert_eq!(debouncer.last_settled(), Some("cat"));

        let ticket = debouncer.set_pending_search("cat".to_string());
        assert_eq!(debouncer.settle(ticket), Settlement::Duplicate);
    }

    #[test]
    fn test_clear_pending_search() {
        let mut debouncer = SearchDebouncer::new();
        let ticket = debouncer.set_pending_search("test".to_string());
        debouncer.clear_pending_search();

        assert!(!debouncer.has_pending_search());
        assert_eq!(debouncer.settle(ticket), Settlement::Stale);
    }
}
