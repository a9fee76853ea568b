//! Intents that talk to the registry.
//!
//! Actions never touch the store. They return the events to reduce and, for
//! writes, where to navigate next. Read failures are logged and produce no
//! event, so whatever the state held before stays on screen.

use crate::gateway::{Gateway, GatewayError};
use crate::routes::Route;
use crate::store::Event;
use crate::types::{CreatePromoteRequest, CreateReview};
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub navigation: Option<Route>,
}

impl Outcome {
    fn event(e: Event) -> Self { Self { events: vec![e], navigation: None } }
    fn navigate(route: Route) -> Self { Self { events: Vec::new(), navigation: Some(route) } }
}

fn read_event<T>(op: &'static str, res: Result<T, GatewayError>, to_event: impl FnOnce(T) -> Event) -> Option<Event> {
    match res {
        Ok(v) => Some(to_event(v)),
        Err(e) => { warn!(event = "action.read_failed", op, error = %e); None }
    }
}

pub async fn fetch_models(gw: &Gateway) -> Option<Event> { read_event("list_models", gw.list_models().await, Event::GotModels) }

pub async fn fetch_versions(gw: &Gateway, model: &str) -> Option<Event> { read_event("list_versions", gw.list_versions(model).await, Event::GotVersions) }

pub async fn fetch_stages(gw: &Gateway) -> Option<Event> { read_event("list_stages", gw.list_stages().await, Event::GotStages) }

pub async fn fetch_requests(gw: &Gateway) -> Option<Event> { read_event("list_requests", gw.list_requests().await, Event::GotRequests) }

pub async fn fetch_request_details(gw: &Gateway, id: i64) -> Option<Event> {
    read_event("request_details", gw.request_details(id).await, Event::GotRequestDetails)
}

/// On 401 the caller is sent to the sign-in route.
pub async fn fetch_user_info(gw: &Gateway) -> Outcome {
    match gw.user_info().await {
        Ok(info) => Outcome::event(Event::GotUserInfo(info)),
        Err(GatewayError::Unauthorized) => {
            info!(event = "action.unauthorized");
            Outcome { events: vec![Event::Unauthorized], navigation: Some(Route::SignIn) }
        }
        Err(e) => { warn!(event = "action.read_failed", op = "user_info", error = %e); Outcome::default() }
    }
}

pub async fn submit_request(gw: &Gateway, request: &CreatePromoteRequest) -> Outcome {
    match gw.create_request(request).await {
        Ok(created) => {
            info!(event = "action.request_created", id = created.id, model = %created.model_name);
            Outcome::navigate(Route::RequestDetail { id: created.id })
        }
        Err(e) => write_failed("create_request", e),
    }
}

pub async fn submit_review(gw: &Gateway, id: i64, review: &CreateReview) -> Outcome {
    match gw.submit_review(id, review).await {
        Ok(()) => {
            info!(event = "action.review_submitted", id, status = ?review.status);
            Outcome::navigate(Route::RequestList)
        }
        Err(e) => write_failed("submit_review", e),
    }
}

fn write_failed(op: &'static str, e: GatewayError) -> Outcome {
    match e.submit_message() {
        Some(msg) => { warn!(event = "action.write_rejected", op, error = %e); Outcome::event(Event::SubmitError(msg)) }
        None => { warn!(event = "action.write_failed", op, error = %e); Outcome::default() }
    }
}
