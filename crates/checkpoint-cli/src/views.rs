//! Rendering of store state, plus the request-list filter and the two forms.

use crate::diff::{changed_names, diff_metrics, diff_params, DiffRow, MetricDiff, ParamDiff};
use crate::store::State;
use crate::types::{CreatePromoteRequest, CreateReview, PromoteRequest, RequestDetails, RequestStatus, ReviewStatus, StatusBucket, VersionDetails};
use serde::Serialize;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Clone, Default)]
pub struct RequestFilter { pub models: Vec<String>, pub statuses: Vec<StatusBucket> }

impl RequestFilter {
    /// An empty facet lets everything through.
    pub fn matches(&self, r: &PromoteRequest) -> bool {
        let model_ok = self.models.is_empty() || self.models.iter().any(|m| *m == r.model_name);
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&r.status_bucket());
        model_ok && status_ok
    }

    pub fn apply<'a>(&self, requests: &'a [PromoteRequest]) -> Vec<&'a PromoteRequest> {
        requests.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct model names in first-seen order, for the model facet.
pub fn model_options(requests: &[PromoteRequest]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in requests { if !out.contains(&r.model_name) { out.push(r.model_name.clone()); } }
    out
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")] id: i64,
    #[tabled(rename = "Title")] title: String,
    #[tabled(rename = "Model")] model: String,
    #[tabled(rename = "Version")] version: String,
    #[tabled(rename = "Author")] author: String,
    #[tabled(rename = "Target Stage")] target: String,
    #[tabled(rename = "Status")] status: String,
}

pub fn render_request_table(requests: &[&PromoteRequest]) -> String {
    if requests.is_empty() { return "No promote requests.\n".to_string(); }
    let rows = requests.iter().map(|r| RequestRow {
        id: r.id,
        title: r.title.clone(),
        model: r.model_name.clone(),
        version: r.model_version.clone(),
        author: r.author_username.clone(),
        target: r.target_stage.clone(),
        status: r.status.to_string(),
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("{table}\n")
}

pub fn render_names<I: IntoIterator<Item = S>, S: AsRef<str>>(title: &str, names: Option<I>) -> String {
    let Some(names) = names else { return format!("{title}: unavailable\n") };
    let mut out = String::new();
    for n in names { let _ = writeln!(out, "{}", n.as_ref()); }
    if out.is_empty() { format!("No {}.\n", title.to_lowercase()) } else { out }
}

pub fn render_alert(msg: &str) -> String { format!("[!] {msg}\n") }

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageStyle { Success, Warning, Default }

pub fn stage_style(stage: &str) -> StageStyle {
    match stage.to_lowercase().as_str() { "production" => StageStyle::Success, "staging" => StageStyle::Warning, _ => StageStyle::Default }
}

fn stage_tag(stage: &str) -> String {
    match stage_style(stage) { StageStyle::Success => format!("[{stage} ✓]"), StageStyle::Warning => format!("[{stage} !]"), StageStyle::Default => format!("[{stage}]") }
}

pub fn format_epoch(secs: f64) -> String {
    let millis = (secs * 1000.0).floor() as i64;
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis).map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()).unwrap_or_else(|| secs.to_string())
}

/// Everything the detail screen shows, computed once from state.
#[derive(Serialize, Debug, Clone)]
pub struct DetailView {
    pub id: i64,
    pub request: Option<PromoteRequest>,
    pub challenger: Option<VersionDetails>,
    pub champion: Option<VersionDetails>,
    pub metrics: Vec<MetricDiff>,
    pub parameters: Vec<ParamDiff>,
    pub changed_metrics: Vec<String>,
    pub changed_parameters: Vec<String>,
    pub error: Option<String>,
}

impl DetailView {
    pub fn from_state(id: i64, state: &State) -> Self {
        let request = state.requests.as_ref().and_then(|rs| rs.iter().find(|r| r.id == id)).cloned();
        let details: Option<&RequestDetails> = state.request_details.as_ref().filter(|d| d.promote_request_id == id);
        let challenger = details.map(|d| &d.challenger_version_details);
        let champion = details.and_then(|d| d.champion_version_details.as_ref());
        let metrics = diff_metrics(challenger.map(|v| &v.metrics), champion.map(|v| &v.metrics));
        let parameters = diff_params(challenger.map(|v| &v.parameters), champion.map(|v| &v.parameters));
        Self {
            id,
            changed_metrics: changed_names(&metrics, champion.is_some()),
            changed_parameters: changed_names(&parameters, champion.is_some()),
            request,
            challenger: challenger.cloned(),
            champion: champion.cloned(),
            metrics,
            parameters,
            error: state.error.clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let title = self.request.as_ref().map(|r| r.title.as_str()).unwrap_or("");
        let _ = writeln!(out, "#{}: {title}\n", self.id);
        let challenger = self.challenger.as_ref().map(|v| format!("Version {} {}", v.id, stage_tag(&v.stage))).unwrap_or_else(|| "Version ?".into());
        let champion = match (&self.champion, &self.request) {
            (Some(v), _) => format!("Version {} {}", v.id, stage_tag(&v.stage)),
            (None, Some(r)) => format!("No model in this stage. {}", stage_tag(&r.target_stage)),
            (None, None) => "No model in this stage.".into(),
        };
        let _ = writeln!(out, "{challenger}  --> is replacing -->  {champion}\n");

        if let Some(r) = &self.request {
            let _ = writeln!(out, "Description:");
            match r.description.as_deref() {
                Some(d) if !d.is_empty() => { let _ = writeln!(out, "{d}"); }
                _ => { let _ = writeln!(out, "No description provided."); }
            }
            let _ = writeln!(out, "\nModel:   {}\nAuthor:  {}\nCreated: {}\n", r.model_name, r.author_username, format_epoch(r.created_at_epoch));
        }

        let _ = writeln!(out, "Metrics:");
        out.push_str(&diff_table(&self.metrics, &self.changed_metrics));
        let _ = writeln!(out, "\nParameters:");
        out.push_str(&diff_table(&self.parameters, &self.changed_parameters));

        let _ = writeln!(out, "\nReview:");
        out.push_str(&self.render_review());
        if let Some(e) = &self.error { out.push_str(&render_alert(e)); }
        out
    }

    fn render_review(&self) -> String {
        let Some(r) = &self.request else { return String::new() };
        if r.is_open() {
            return format!("[Open] awaiting review: checkpoint requests review {} --action approve|close\n", r.id);
        }
        let mut out = format!("[{}] By {}", if r.status == RequestStatus::Approved { "Approved" } else { "Closed" }, r.reviewer_username.as_deref().unwrap_or("unknown"));
        if let Some(at) = r.closed_at_epoch { let _ = write!(out, " on {}", format_epoch(at)); }
        out.push_str(".\n");
        match r.review_comment.as_deref() {
            Some(c) if !c.is_empty() => { let _ = writeln!(out, "{c}"); }
            _ => { let _ = writeln!(out, "No comment provided."); }
        }
        out
    }
}

trait DiffColumns: DiffRow {
    const HAS_CHANGE: bool = false;
    fn change(&self) -> Option<&str> { None }
}
impl DiffColumns for MetricDiff {
    const HAS_CHANGE: bool = true;
    fn change(&self) -> Option<&str> { self.change.as_deref() }
}
impl DiffColumns for ParamDiff {}

fn diff_table<R: DiffColumns>(rows: &[R], changed: &[String]) -> String {
    if rows.is_empty() { return "No data.\n".to_string(); }
    let mut builder = tabled::builder::Builder::default();
    let mut header = vec!["", "Name", "Challenger", "Champion"];
    if R::HAS_CHANGE { header.push("Change"); }
    builder.push_record(header);
    for r in rows {
        let mark = if changed.iter().any(|n| n == r.name()) { "*" } else { "" };
        let mut rec = vec![mark.to_string(), r.name().to_string(), r.challenger().unwrap_or("").to_string(), r.champion().unwrap_or("").to_string()];
        if R::HAS_CHANGE { rec.push(r.change().unwrap_or("").to_string()); }
        builder.push_record(rec);
    }
    let mut table = builder.build();
    table.with(Style::modern());
    format!("{table}\n")
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("`{0}` is required")]
    Missing(&'static str),
    #[error("{0} list is not available yet")]
    Unavailable(&'static str),
    #[error("{field} `{value}` is not one of the offered choices")]
    NotOffered { field: &'static str, value: String },
    #[error("promote request #{0} not found")]
    UnknownRequest(i64),
    #[error("promote request #{id} is already {status}")]
    AlreadyReviewed { id: i64, status: String },
}

#[derive(Debug, Clone, Default)]
pub struct RequestFormInput {
    pub title: String,
    pub description: Option<String>,
    pub model: String,
    pub version: String,
    pub target: String,
}

fn required(field: &'static str, v: &str) -> Result<String, FormError> {
    let v = v.trim();
    if v.is_empty() { Err(FormError::Missing(field)) } else { Ok(v.to_string()) }
}

fn offered<'a>(field: &'static str, value: &str, choices: Option<impl Iterator<Item = &'a str>>, list: &'static str) -> Result<(), FormError> {
    let mut choices = choices.ok_or(FormError::Unavailable(list))?;
    if choices.any(|c| c == value) { Ok(()) } else { Err(FormError::NotOffered { field, value: value.to_string() }) }
}

/// Builds the create DTO. Model, version and stage must come from the lists
/// currently in state.
pub fn request_form(state: &State, input: &RequestFormInput) -> Result<CreatePromoteRequest, FormError> {
    let title = required("title", &input.title)?;
    let model = required("model", &input.model)?;
    let version = required("version", &input.version)?;
    let target = required("target", &input.target)?;
    offered("model", &model, state.models.as_ref().map(|ms| ms.iter().map(|m| m.name.as_str())), "model")?;
    offered("version", &version, state.versions.as_ref().map(|vs| vs.iter().filter(|v| v.model_name == model).map(|v| v.id.as_str())), "version")?;
    offered("target", &target, state.stages.as_ref().map(|ss| ss.iter().map(String::as_str)), "stage")?;
    let description = input.description.as_ref().map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    Ok(CreatePromoteRequest { title, description, model_name: model, version_id: version, target_stage: target })
}

/// Reviews are only offered while the request is open.
pub fn review_form(state: &State, id: i64, status: ReviewStatus, comment: Option<String>) -> Result<CreateReview, FormError> {
    let r = state.requests.as_ref().and_then(|rs| rs.iter().find(|r| r.id == id)).ok_or(FormError::UnknownRequest(id))?;
    if !r.is_open() { return Err(FormError::AlreadyReviewed { id, status: r.status.to_string() }); }
    Ok(CreateReview { status, review_comment: comment.unwrap_or_default() })
}
