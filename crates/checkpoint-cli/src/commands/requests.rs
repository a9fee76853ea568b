use anyhow::Result;
use tracing::{info, warn};
use crate::actions;
use crate::errors::{CliError, CliErrorKind};
use crate::store::{Event, Store};
use crate::types::{ReviewStatus, KNOWN_STAGES};
use crate::views::{self, DetailView, RequestFilter, RequestFormInput};
use super::{navigate, print_json, Ctx, NewRequestArgs, OutputFormat, ReviewAction};

pub async fn list(ctx: &Ctx, store: &mut Store, filter: &RequestFilter) -> Result<()> {
    if let Some(e) = actions::fetch_requests(&ctx.gateway).await { store.dispatch(e); }
    let requests = store.state().requests.as_deref().unwrap_or_default();
    let shown = filter.apply(requests);
    info!(event="requests.list", total=requests.len(), shown=shown.len());
    match ctx.format {
        OutputFormat::Json => print_json(&shown),
        OutputFormat::Text => {
            print!("{}", views::render_request_table(&shown));
            let options = views::model_options(requests);
            if !options.is_empty() { println!("Models: {}", options.join(", ")); }
            Ok(())
        }
    }
}

/// Mounts the detail view, renders it, then unmounts (clearing details).
pub async fn show(ctx: &Ctx, store: &mut Store, id: i64) -> Result<()> {
    let (requests, details) = tokio::join!(actions::fetch_requests(&ctx.gateway), actions::fetch_request_details(&ctx.gateway, id));
    store.dispatch_all(requests.into_iter().chain(details));
    let view = DetailView::from_state(id, store.state());
    let res = match ctx.format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Text => { print!("{}", view.render()); Ok(()) }
    };
    store.dispatch(Event::ClearRequestDetails);
    res
}

async fn mount_form(ctx: &Ctx, store: &mut Store, model: Option<&str>) {
    store.dispatch(Event::ClearSubmitError);
    let versions = async { match model { Some(m) => actions::fetch_versions(&ctx.gateway, m).await, None => None } };
    let (models, stages, versions) = tokio::join!(actions::fetch_models(&ctx.gateway), actions::fetch_stages(&ctx.gateway), versions);
    store.dispatch_all([models, stages, versions].into_iter().flatten());
}

/// An empty (optionally prefilled) form: shows the choices it would offer.
pub async fn form(ctx: &Ctx, store: &mut Store, model: Option<String>, version: Option<String>, target: Option<String>) -> Result<()> {
    mount_form(ctx, store, model.as_deref()).await;
    let st = store.state();
    if ctx.format == OutputFormat::Json {
        #[derive(serde::Serialize)]
        struct Form<'a> { model: Option<String>, version: Option<String>, target: Option<String>, models: Option<Vec<&'a str>>, versions: Option<Vec<&'a str>>, stages: Option<&'a [String]> }
        return print_json(&Form {
            model, version, target,
            models: st.models.as_ref().map(|ms| ms.iter().map(|m| m.name.as_str()).collect()),
            versions: st.versions.as_ref().map(|vs| vs.iter().map(|v| v.id.as_str()).collect()),
            stages: st.stages.as_deref(),
        });
    }
    println!("New Promote Request\n");
    print!("{}", views::render_names("Models", st.models.as_ref().map(|ms| ms.iter().map(|m| m.name.as_str()))));
    if model.is_some() { print!("{}", views::render_names("Versions", st.versions.as_ref().map(|vs| vs.iter().map(|v| v.id.as_str())))); }
    match st.stages.as_deref() {
        Some(stages) => print!("{}", views::render_names("Stages", Some(stages))),
        None => println!("Stages: unavailable (registry stages are {})", KNOWN_STAGES.join(", ")),
    }
    let arg = |flag: &str, v: &Option<String>| format!("--{flag} {}", v.as_deref().unwrap_or("<...>"));
    println!("\ncheckpoint requests new --title <...> {} {} {}", arg("model", &model), arg("version", &version), arg("target", &target));
    Ok(())
}

pub async fn create(ctx: &Ctx, store: &mut Store, args: NewRequestArgs) -> Result<()> {
    mount_form(ctx, store, Some(args.model.as_str())).await;
    let input = RequestFormInput { title: args.title, description: args.description, model: args.model, version: args.version, target: args.target };
    let dto = views::request_form(store.state(), &input).map_err(CliError::from)?;
    let out = actions::submit_request(&ctx.gateway, &dto).await;
    store.dispatch_all(out.events);
    follow(ctx, store, out.navigation).await
}

pub async fn review(ctx: &Ctx, store: &mut Store, id: i64, action: ReviewAction, comment: Option<String>) -> Result<()> {
    store.dispatch(Event::ClearSubmitError);
    if let Some(e) = actions::fetch_requests(&ctx.gateway).await { store.dispatch(e); }
    let status = match action { ReviewAction::Approve => ReviewStatus::Approved, ReviewAction::Close => ReviewStatus::Closed };
    let dto = views::review_form(store.state(), id, status, comment).map_err(CliError::from)?;
    let out = actions::submit_review(&ctx.gateway, id, &dto).await;
    store.dispatch_all(out.events);
    follow(ctx, store, out.navigation).await
}

/// After a write: navigate if the action asked to, otherwise surface the alert.
async fn follow(ctx: &Ctx, store: &mut Store, navigation: Option<crate::routes::Route>) -> Result<()> {
    if let Some(route) = navigation { return navigate(ctx, store, route).await; }
    if let Some(err) = store.state().error.clone() {
        return Err(CliError::new(CliErrorKind::Runtime(err)).into());
    }
    warn!(event="requests.write_unconfirmed");
    Err(CliError::new(CliErrorKind::Network("registry did not confirm the change".into())).into())
}
