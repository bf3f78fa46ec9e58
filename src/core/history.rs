//! Transition history tracking.
//!
//! Every installation of a new current state is recorded by the context so
//! callers can inspect the path a run took after the fact. A history may be
//! capped, in which case the oldest records are dropped first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single state installation.
///
/// `from` is `None` when the machine was done before the install (for
/// example when a detached context is started), `to` is `None` when the
/// terminal marker was installed. `executed` tells whether `from` actually
/// ran before it was replaced.
///
/// # Example
///
/// ```rust
/// use stepwise::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: Some("Pending".to_string()),
///     to: Some("Running".to_string()),
///     executed: true,
///     timestamp: Utc::now(),
/// };
/// assert!(!record.is_terminal());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the outgoing state
    pub from: Option<String>,
    /// Name of the installed state
    pub to: Option<String>,
    /// Whether the outgoing state ran while it was current
    #[serde(default)]
    pub executed: bool,
    /// When the installation happened
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// True if this record installed the terminal marker.
    pub fn is_terminal(&self) -> bool {
        self.to.is_none()
    }
}

/// Ordered history of state installations.
///
/// # Example
///
/// ```rust
/// use stepwise::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(TransitionRecord {
///         from: Some("Start".to_string()),
///         to: Some("Middle".to_string()),
///         executed: true,
///         timestamp: Utc::now(),
///     })
///     .record(TransitionRecord {
///         from: Some("Middle".to_string()),
///         to: None,
///         executed: true,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.get_path(), vec!["Start", "Middle"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    dropped: usize,
}

impl StateHistory {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
            dropped: 0,
        }
    }

    /// Create an empty history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Record a transition, returning the extended history.
    ///
    /// When the history is capped the oldest records are dropped to make room.
    pub fn record(mut self, transition: TransitionRecord) -> Self {
        self.transitions.push(transition);
        if let Some(limit) = self.limit {
            let excess = self.transitions.len().saturating_sub(limit);
            if excess > 0 {
                self.transitions.drain(..excess);
                self.dropped += excess;
            }
        }
        self
    }

    /// An empty history with the same cap.
    pub fn cleared(&self) -> Self {
        Self {
            limit: self.limit,
            ..Self::new()
        }
    }

    /// Names of the states that ran and were then replaced, in order.
    ///
    /// States installed but replaced without running (for example by
    /// [`Context::run_from`](crate::Context::run_from)) are not part of the
    /// path. Only retained records contribute.
    pub fn get_path(&self) -> Vec<&str> {
        self.transitions
            .iter()
            .filter(|t| t.executed)
            .filter_map(|t| t.from.as_deref())
            .collect()
    }

    /// Time between the first and the last retained transition.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of records dropped because of the cap.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: Option<&str>, to: Option<&str>) -> TransitionRecord {
        TransitionRecord {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            executed: from.is_some(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.limit(), None);
    }

    #[test]
    fn record_appends_in_order() {
        let history = StateHistory::new()
            .record(record(Some("A"), Some("B")))
            .record(record(Some("B"), Some("C")));

        assert_eq!(history.len(), 2);
        assert_eq!(history.transitions()[1].from.as_deref(), Some("B"));
    }

    #[test]
    fn get_path_skips_terminal_marker() {
        let history = StateHistory::new()
            .record(record(Some("A"), Some("B")))
            .record(record(Some("B"), None));

        assert_eq!(history.get_path(), vec!["A", "B"]);
        assert!(history.transitions()[1].is_terminal());
    }

    #[test]
    fn get_path_from_detached_start() {
        let history = StateHistory::new()
            .record(record(None, Some("A")))
            .record(record(Some("A"), None));

        assert_eq!(history.get_path(), vec!["A"]);
    }

    #[test]
    fn get_path_skips_states_that_never_ran() {
        let skipped = TransitionRecord {
            executed: false,
            ..record(Some("A"), Some("B"))
        };
        let history = StateHistory::new()
            .record(skipped)
            .record(record(Some("B"), None));

        assert_eq!(history.get_path(), vec!["B"]);
    }

    #[test]
    fn capped_history_drops_oldest_records() {
        let mut history = StateHistory::with_limit(3);
        for name in ["A", "B", "C", "D", "E"] {
            history = history.record(record(Some(name), Some(name)));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.dropped(), 2);
        assert_eq!(history.get_path(), vec!["C", "D", "E"]);
    }

    #[test]
    fn cleared_keeps_cap() {
        let history = StateHistory::with_limit(2)
            .record(record(Some("A"), Some("B")))
            .record(record(Some("B"), Some("C")))
            .record(record(Some("C"), None));

        let cleared = history.cleared();

        assert!(cleared.is_empty());
        assert_eq!(cleared.limit(), Some(2));
        assert_eq!(cleared.dropped(), 0);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(record(Some("A"), Some("B")));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history = history.record(record(Some("B"), None));

        let duration = history.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(record(Some("A"), Some("B")));
        assert_eq!(history.duration(), Some(std::time::Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::with_limit(8)
            .record(record(Some("A"), Some("B")))
            .record(record(Some("B"), None));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
