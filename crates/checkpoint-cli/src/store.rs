//! Client state and the events that replace it.
//!
//! `reduce` is the only way state changes. Each event overwrites exactly one
//! field; `None` fields have not been fetched yet.

use crate::types::{Model, ModelVersion, PromoteRequest, RequestDetails, UserInfo};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct State {
    pub models: Option<Vec<Model>>,
    pub versions: Option<Vec<ModelVersion>>,
    pub stages: Option<Vec<String>>,
    pub requests: Option<Vec<PromoteRequest>>,
    pub request_details: Option<RequestDetails>,
    pub user_info: Option<UserInfo>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    GotModels(Vec<Model>),
    GotVersions(Vec<ModelVersion>),
    GotStages(Vec<String>),
    GotRequests(Vec<PromoteRequest>),
    GotRequestDetails(RequestDetails),
    ClearRequestDetails,
    SubmitError(String),
    ClearSubmitError,
    GotUserInfo(UserInfo),
    Unauthorized,
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GotModels(_) => "got_models",
            Self::GotVersions(_) => "got_versions",
            Self::GotStages(_) => "got_stages",
            Self::GotRequests(_) => "got_requests",
            Self::GotRequestDetails(_) => "got_request_details",
            Self::ClearRequestDetails => "clear_request_details",
            Self::SubmitError(_) => "submit_error",
            Self::ClearSubmitError => "clear_submit_error",
            Self::GotUserInfo(_) => "got_user_info",
            Self::Unauthorized => "unauthorized",
        }
    }
}

pub fn reduce(state: State, event: Event) -> State {
    match event {
        Event::GotModels(models) => State { models: Some(models), ..state },
        Event::GotVersions(versions) => State { versions: Some(versions), ..state },
        Event::GotStages(stages) => State { stages: Some(stages), ..state },
        Event::GotRequests(requests) => State { requests: Some(requests), ..state },
        Event::GotRequestDetails(details) => State { request_details: Some(details), ..state },
        Event::ClearRequestDetails => State { request_details: None, ..state },
        Event::SubmitError(error) => State { error: Some(error), ..state },
        Event::ClearSubmitError => State { error: None, ..state },
        Event::GotUserInfo(info) => State { user_info: Some(info), ..state },
        Event::Unauthorized => State { user_info: None, ..state },
    }
}

/// Owns the state for one command run. The owning task is the only mutator.
#[derive(Debug, Default)]
pub struct Store { state: State }

impl Store {
    pub fn new() -> Self { Self::default() }
    pub fn state(&self) -> &State { &self.state }

    pub fn dispatch(&mut self, event: Event) {
        debug!(event = "store.dispatch", kind = event.kind());
        self.state = reduce(std::mem::take(&mut self.state), event);
    }

    pub fn dispatch_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for e in events { self.dispatch(e); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{fixtures::open_request, VersionDetails};

    fn details(id: i64) -> RequestDetails {
        RequestDetails { promote_request_id: id, challenger_version_details: VersionDetails { id: "4".into(), stage: "staging".into(), ..Default::default() }, champion_version_details: None }
    }

    #[test]
    fn got_events_replace_one_field() {
        let s = reduce(State::default(), Event::GotStages(vec!["staging".into()]));
        assert_eq!(s, State { stages: Some(vec!["staging".into()]), ..Default::default() });
        let s = reduce(s, Event::GotStages(vec![]));
        assert_eq!(s.stages, Some(vec![]));
        let s = reduce(s, Event::GotRequests(vec![open_request(1, "m")]));
        assert_eq!(s.stages, Some(vec![]));
        assert_eq!(s.requests.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn clear_details_is_distinct_from_got_details() {
        let s = reduce(State::default(), Event::GotRequestDetails(details(3)));
        assert_eq!(s.request_details.as_ref().map(|d| d.promote_request_id), Some(3));
        let s = reduce(s, Event::ClearRequestDetails);
        assert!(s.request_details.is_none());
        assert_ne!(Event::ClearRequestDetails.kind(), Event::GotRequestDetails(details(3)).kind());
    }

    #[test]
    fn error_set_and_cleared() {
        let mut store = Store::new();
        store.dispatch(Event::SubmitError("boom".into()));
        assert_eq!(store.state().error.as_deref(), Some("boom"));
        store.dispatch(Event::ClearSubmitError);
        assert!(store.state().error.is_none());
    }

    #[test]
    fn unauthorized_drops_user_info() {
        let mut store = Store::new();
        store.dispatch_all([Event::GotUserInfo(UserInfo { user: "ana".into(), email: "ana@example.com".into() }), Event::GotModels(vec![])]);
        assert!(store.state().user_info.is_some());
        store.dispatch(Event::Unauthorized);
        assert!(store.state().user_info.is_none());
        assert_eq!(store.state().models, Some(vec![]));
    }
}
