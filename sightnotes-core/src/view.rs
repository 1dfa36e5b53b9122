//! Which of the three views is on screen, and which async results may land.
//!
//! The coordinator does no I/O. Transitions that need data return an
//! [`Effect`] carrying a fresh [`RequestId`]; the caller performs the request
//! through a [`crate::store::SessionStore`] and feeds the result back with
//! [`ViewCoordinator::apply_sessions`] or [`ViewCoordinator::apply_detail`].
//! A result is applied only if the view it was requested for is still the
//! current one, so a slow response can never leak into a different view.
//!
//! The live feed is not managed here. It keeps polling in every view.

use thiserror::Error;

use crate::types::{SessionDetail, SessionSummary};

/// Tags one list or load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Loading state of the selected session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded(SessionDetail),
    /// The load failed; shown as an absent detail.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Live,
    SessionList,
    SessionDetail { filename: String, request: RequestId, detail: DetailState },
}

/// Discriminant of [`View`], used in errors and status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Live,
    SessionList,
    SessionDetail,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListSessions(RequestId),
    LoadSession { request: RequestId, filename: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot navigate from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: ViewKind,
    pub to: ViewKind,
}

#[derive(Debug)]
pub struct ViewCoordinator {
    view: View,
    sessions: Vec<SessionSummary>,
    list_request: Option<RequestId>,
    next_request: u64,
}

impl Default for ViewCoordinator {
    fn default() -> Self {
        Self { view: View::Live, sessions: Vec::new(), list_request: None, next_request: 0 }
    }
}

impl ViewCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn kind(&self) -> ViewKind {
        match self.view {
            View::Live => ViewKind::Live,
            View::SessionList => ViewKind::SessionList,
            View::SessionDetail { .. } => ViewKind::SessionDetail,
        }
    }

    /// Session list from the most recent applied listing.
    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    /// True while a listing request is outstanding.
    pub fn sessions_loading(&self) -> bool {
        self.list_request.is_some()
    }

    /// The loaded detail, if the detail view is showing one.
    pub fn detail(&self) -> Option<&SessionDetail> {
        match &self.view {
            View::SessionDetail { detail: DetailState::Loaded(d), .. } => Some(d),
            _ => None,
        }
    }

    /// Opens the session browser.
    ///
    /// From `Live` this starts a fresh listing. From `SessionDetail` it is the
    /// same as [`back`](Self::back) and keeps the list already on screen.
    pub fn show_sessions(&mut self) -> Result<Option<Effect>, TransitionError> {
        match self.kind() {
            ViewKind::Live => {
                let request = self.issue();
                self.view = View::SessionList;
                self.sessions.clear();
                self.list_request = Some(request);
                Ok(Some(Effect::ListSessions(request)))
            }
            ViewKind::SessionDetail => self.back().map(|()| None),
            from => Err(TransitionError { from, to: ViewKind::SessionList }),
        }
    }

    /// Opens one session from the list. The detail starts out loading.
    pub fn select_session(&mut self, filename: &str) -> Result<Effect, TransitionError> {
        if self.kind() != ViewKind::SessionList {
            return Err(TransitionError { from: self.kind(), to: ViewKind::SessionDetail });
        }
        let request = self.issue();
        self.view = View::SessionDetail {
            filename: filename.to_owned(),
            request,
            detail: DetailState::Loading,
        };
        Ok(Effect::LoadSession { request, filename: filename.to_owned() })
    }

    /// Leaves the detail view for the list, discarding the detail.
    pub fn back(&mut self) -> Result<(), TransitionError> {
        if self.kind() != ViewKind::SessionDetail {
            return Err(TransitionError { from: self.kind(), to: ViewKind::SessionList });
        }
        self.view = View::SessionList;
        Ok(())
    }

    /// Returns to the live feed from either session view.
    pub fn show_live(&mut self) -> Result<(), TransitionError> {
        if self.kind() == ViewKind::Live {
            return Err(TransitionError { from: ViewKind::Live, to: ViewKind::Live });
        }
        self.view = View::Live;
        self.list_request = None;
        Ok(())
    }

    /// Applies a listing result. Ignored (returns false) unless the list view
    /// is current and `request` is its outstanding request.
    pub fn apply_sessions(&mut self, request: RequestId, sessions: Vec<SessionSummary>) -> bool {
        let addressed = self.kind() == ViewKind::SessionList && self.list_request == Some(request);
        if !addressed {
            tracing::debug!(?request, "ignoring session list for a view that moved on");
            return false;
        }
        self.sessions = sessions;
        self.list_request = None;
        true
    }

    /// Applies a load result. Ignored (returns false) unless the detail view
    /// for `request` is still current and waiting.
    pub fn apply_detail(&mut self, request: RequestId, loaded: Option<SessionDetail>) -> bool {
        match &mut self.view {
            View::SessionDetail { request: current, detail, .. }
                if *current == request && *detail == DetailState::Loading =>
            {
                *detail = match loaded {
                    Some(d) => DetailState::Loaded(d),
                    None => DetailState::Missing,
                };
                true
            }
            _ => {
                tracing::debug!(?request, "ignoring session detail for a view that moved on");
                false
            }
        }
    }

    fn issue(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> SessionSummary {
        SessionSummary { filename: name.to_owned(), size_bytes: 10 }
    }

    fn detail(name: &str) -> SessionDetail {
        SessionDetail { filename: name.to_owned(), count: 0, snapshots: Vec::new() }
    }

    fn list_request(effect: Option<Effect>) -> RequestId {
        match effect {
            Some(Effect::ListSessions(r)) => r,
            other => panic!("expected ListSessions, got {other:?}"),
        }
    }

    fn load_request(effect: Effect) -> RequestId {
        match effect {
            Effect::LoadSession { request, .. } => request,
            other => panic!("expected LoadSession, got {other:?}"),
        }
    }

    #[test]
    fn starts_live() {
        assert_eq!(ViewCoordinator::new().kind(), ViewKind::Live);
    }

    #[test]
    fn back_from_detail_discards_it_and_reselect_reloads() {
        let mut vc = ViewCoordinator::new();
        let list = list_request(vc.show_sessions().unwrap());
        assert!(vc.apply_sessions(list, vec![summary("a.md")]));

        let first = vc.select_session("a.md").unwrap();
        assert_eq!(vc.detail(), None);
        let req = load_request(first.clone());
        assert!(vc.apply_detail(req, Some(detail("a.md"))));
        assert_eq!(vc.detail(), Some(&detail("a.md")));

        vc.back().unwrap();
        assert_eq!(vc.kind(), ViewKind::SessionList);
        assert_eq!(vc.detail(), None);
        assert_eq!(vc.sessions().len(), 1);

        let again = vc.select_session("a.md").unwrap();
        assert_ne!(again, first);
        assert!(matches!(again, Effect::LoadSession { ref filename, .. } if filename == "a.md"));
    }

    #[test]
    fn invalid_transitions_change_nothing() {
        let mut vc = ViewCoordinator::new();
        assert!(vc.back().is_err());
        assert!(vc.show_live().is_err());
        assert_eq!(
            vc.select_session("x.md"),
            Err(TransitionError { from: ViewKind::Live, to: ViewKind::SessionDetail })
        );
        vc.show_sessions().unwrap();
        assert!(vc.show_sessions().is_err());
        assert!(vc.back().is_err());
        assert_eq!(vc.kind(), ViewKind::SessionList);
    }

    #[test]
    fn show_sessions_from_detail_goes_back() {
        let mut vc = ViewCoordinator::new();
        vc.show_sessions().unwrap();
        vc.select_session("a.md").unwrap();
        assert_eq!(vc.show_sessions(), Ok(None));
        assert_eq!(vc.kind(), ViewKind::SessionList);
    }

    #[test]
    fn listing_that_resolves_after_leaving_is_ignored() {
        let mut vc = ViewCoordinator::new();
        let stale = list_request(vc.show_sessions().unwrap());
        vc.show_live().unwrap();
        assert!(!vc.apply_sessions(stale, vec![summary("a.md")]));

        let fresh = list_request(vc.show_sessions().unwrap());
        assert!(!vc.apply_sessions(stale, vec![summary("old.md")]));
        assert!(vc.sessions_loading());
        assert!(vc.apply_sessions(fresh, vec![summary("b.md")]));
        assert_eq!(vc.sessions(), &[summary("b.md")]);
        assert!(!vc.sessions_loading());
    }

    #[test]
    fn detail_for_a_previous_selection_is_ignored() {
        let mut vc = ViewCoordinator::new();
        vc.show_sessions().unwrap();
        let old = load_request(vc.select_session("a.md").unwrap());
        vc.back().unwrap();
        let new = load_request(vc.select_session("b.md").unwrap());

        assert!(!vc.apply_detail(old, Some(detail("a.md"))));
        assert!(vc.apply_detail(new, None));
        assert!(matches!(vc.view(), View::SessionDetail { detail: DetailState::Missing, .. }));
        assert!(!vc.apply_detail(new, Some(detail("b.md"))));
    }

    #[test]
    fn detail_is_dropped_when_going_live() {
        let mut vc = ViewCoordinator::new();
        vc.show_sessions().unwrap();
        let req = load_request(vc.select_session("a.md").unwrap());
        vc.show_live().unwrap();
        assert!(!vc.apply_detail(req, Some(detail("a.md"))));
        assert_eq!(vc.kind(), ViewKind::Live);
    }
}
