//! Per-client search session state.

use hollow_core::SearchResult;
use schemars::JsonSchema;
use serde::Serialize;

/// Where a client is in the search → select → view interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Searching,
    Listed,
    Selecting,
    Resolving,
    Cached,
    Failed,
    Viewing,
    NotFound,
}

/// Ticket for one in-flight search; only the newest ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryToken(u64);

/// The currently displayed result list plus interaction phase.
///
/// A newer search supersedes an older one: results arriving for a stale
/// token are dropped instead of replacing the list.
#[derive(Debug, Default)]
pub struct SearchSession {
    results: Vec<SearchResult>,
    latest: u64,
    phase: SessionPhase,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    fn transition(&mut self, to: SessionPhase) {
        tracing::debug!(from = ?self.phase, to = ?to, "session phase");
        self.phase = to;
    }

    /// Start a search and get the token its results must present.
    pub fn begin_search(&mut self) -> QueryToken {
        self.latest += 1;
        self.transition(SessionPhase::Searching);
        QueryToken(self.latest)
    }

    /// Publish results for `token`, replacing the list.
    ///
    /// Returns false (and changes nothing) if a newer search has started.
    pub fn complete_search(&mut self, token: QueryToken, results: Vec<SearchResult>) -> bool {
        if token.0 != self.latest {
            tracing::debug!(token = token.0, latest = self.latest, "dropping superseded search results");
            return false;
        }
        self.results = results;
        self.transition(SessionPhase::Listed);
        true
    }

    /// Pick a result from the current list for resolution.
    pub fn select(&mut self, index: usize) -> Option<SearchResult> {
        let selected = self.results.get(index).cloned()?;
        self.transition(SessionPhase::Selecting);
        Some(selected)
    }

    pub fn begin_resolve(&mut self) {
        self.transition(SessionPhase::Resolving);
    }

    /// Record the outcome of a resolution. A failure drops back to the list
    /// so the user can select again.
    pub fn finish_resolve(&mut self, cached: bool) {
        if cached {
            self.transition(SessionPhase::Cached);
        } else {
            self.transition(SessionPhase::Failed);
            self.transition(SessionPhase::Listed);
        }
    }

    pub fn record_view(&mut self, found: bool) {
        self.transition(if found { SessionPhase::Viewing } else { SessionPhase::NotFound });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::result;

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = SearchSession::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_results_replace_previous_list() {
        let mut session = SearchSession::new();

        let token = session.begin_search();
        assert_eq!(session.phase(), SessionPhase::Searching);
        assert!(session.complete_search(token, vec![result("A1"), result("A2")]));
        assert_eq!(session.phase(), SessionPhase::Listed);

        let token = session.begin_search();
        assert!(session.complete_search(token, vec![result("B1")]));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].product_id, "B1");
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut session = SearchSession::new();

        let slow = session.begin_search();
        let fast = session.begin_search();
        assert!(session.complete_search(fast, vec![result("NEW")]));
        assert!(!session.complete_search(slow, vec![result("OLD")]));

        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].product_id, "NEW");
    }

    #[test]
    fn test_resolution_phases() {
        let mut session = SearchSession::new();
        let token = session.begin_search();
        session.complete_search(token, vec![result("A1")]);

        assert!(session.select(5).is_none());
        assert_eq!(session.phase(), SessionPhase::Listed);

        let selected = session.select(0).unwrap();
        assert_eq!(selected.product_id, "A1");
        assert_eq!(session.phase(), SessionPhase::Selecting);

        session.begin_resolve();
        assert_eq!(session.phase(), SessionPhase::Resolving);
        session.finish_resolve(false);
        assert_eq!(session.phase(), SessionPhase::Listed);

        session.select(0).unwrap();
        session.begin_resolve();
        session.finish_resolve(true);
        assert_eq!(session.phase(), SessionPhase::Cached);

        session.record_view(true);
        assert_eq!(session.phase(), SessionPhase::Viewing);
        session.record_view(false);
        assert_eq!(session.phase(), SessionPhase::NotFound);
    }
}
