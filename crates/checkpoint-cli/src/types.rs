use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stages the registry knows about, in the order the request form offers them.
pub const KNOWN_STAGES: [&str; 4] = ["production", "staging", "archived", "none"];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus { Open, Closed, Approved }

impl RequestStatus {
    pub fn as_str(self) -> &'static str { match self { Self::Open => "open", Self::Closed => "closed", Self::Approved => "approved" } }
    pub fn is_terminal(self) -> bool { !matches!(self, Self::Open) }
    /// Bucket used by the request list status facet.
    pub fn bucket(self) -> StatusBucket { match self { Self::Open => StatusBucket::Open, Self::Closed | Self::Approved => StatusBucket::Closed } }
}

impl fmt::Display for RequestStatus { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) } }

#[derive(clap::ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBucket { Open, Closed }

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(match self { Self::Open => "Open", Self::Closed => "Closed" }) }
}

/// Terminal status a review moves a request into.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus { Closed, Approved }

impl From<ReviewStatus> for RequestStatus {
    fn from(s: ReviewStatus) -> Self { match s { ReviewStatus::Closed => Self::Closed, ReviewStatus::Approved => Self::Approved } }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PromoteRequest {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model_name: String,
    pub model_version: String,
    pub target_stage: String,
    #[serde(default)]
    pub current_stage: String,
    pub author_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
    pub status: RequestStatus,
    /// Seconds since the epoch; the registry may send a fractional value.
    #[serde(default)]
    pub created_at_epoch: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at_epoch: Option<f64>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InvariantError {
    #[error("request #{id} is open but carries review field `{field}`")]
    ReviewOnOpen { id: i64, field: &'static str },
    #[error("request #{id} is {status} but is missing review field `{field}`")]
    MissingReview { id: i64, status: RequestStatus, field: &'static str },
}

impl PromoteRequest {
    pub fn is_open(&self) -> bool { self.status == RequestStatus::Open }
    pub fn is_terminal(&self) -> bool { self.status.is_terminal() }
    pub fn status_bucket(&self) -> StatusBucket { self.status.bucket() }

    /// Review fields are present exactly when the request has left `open`.
    pub fn check_review_invariant(&self) -> Result<(), InvariantError> {
        let fields = [
            ("reviewer_username", self.reviewer_username.is_some()),
            ("review_comment", self.review_comment.is_some()),
            ("closed_at_epoch", self.closed_at_epoch.is_some()),
        ];
        for (field, present) in fields {
            match (self.is_open(), present) {
                (true, true) => return Err(InvariantError::ReviewOnOpen { id: self.id, field }),
                (false, false) => return Err(InvariantError::MissingReview { id: self.id, status: self.status, field }),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Parameter value as logged by the registry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Opaque(serde_json::Value),
}

impl ParamValue {
    /// Generic string form used by the parameter diff; `None` for null.
    pub fn display_value(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(format_number(n)),
            Self::Text(s) => Some(s.clone()),
            Self::Opaque(v) if v.is_null() => None,
            Self::Opaque(v) => Some(v.to_string()),
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() { return i.to_string(); }
    if let Some(u) = n.as_u64() { return u.to_string(); }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct VersionDetails {
    pub id: String,
    pub stage: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
    /// A `null` metric was logged without a value and counts as absent.
    #[serde(default)]
    pub metrics: BTreeMap<String, Option<f64>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestDetails {
    pub promote_request_id: i64,
    pub challenger_version_details: VersionDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion_version_details: Option<VersionDetails>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatePromoteRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model_name: String,
    pub version_id: String,
    pub target_stage: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateReview {
    pub status: ReviewStatus,
    pub review_comment: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Model { pub name: String }

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ModelVersion { pub model_name: String, pub id: String }

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserInfo { pub user: String, pub email: String }
