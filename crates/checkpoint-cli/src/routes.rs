use serde::Serialize;
use std::fmt;

pub const APP_PREFIX: &str = "/checkpoint";
pub const SIGN_IN_PATH: &str = "/oauth2/sign_in";

/// Client-side routes. Actions return these as navigation intents; the
/// command layer decides what "navigating" means for a terminal.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    RequestList,
    NewRequest { model: Option<String>, version: Option<String>, target: Option<String> },
    RequestDetail { id: i64 },
    SignIn,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("unknown route: {0}")]
    Unknown(String),
    #[error("invalid request id `{0}`")]
    InvalidId(String),
}

impl Route {
    pub fn new_request() -> Self { Self::NewRequest { model: None, version: None, target: None } }

    pub fn path(&self) -> String {
        match self {
            Self::RequestList => format!("{APP_PREFIX}/requests"),
            Self::RequestDetail { id } => format!("{APP_PREFIX}/requests/{id}"),
            Self::SignIn => SIGN_IN_PATH.to_string(),
            Self::NewRequest { model, version, target } => {
                let query: Vec<String> = [("model", model), ("version", version), ("target", target)]
                    .into_iter()
                    .filter_map(|(k, v)| v.as_ref().map(|v| format!("{k}={}", urlencoding::encode(v))))
                    .collect();
                if query.is_empty() { format!("{APP_PREFIX}/requests/new") } else { format!("{APP_PREFIX}/requests/new?{}", query.join("&")) }
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let path = path.trim_end_matches('/');
        if path == SIGN_IN_PATH { return Ok(Self::SignIn); }
        let rest = path.strip_prefix(APP_PREFIX).ok_or_else(|| RouteError::Unknown(raw.to_string()))?;
        match rest {
            "" | "/requests" => Ok(Self::RequestList),
            "/requests/new" => {
                let mut route = Self::new_request();
                if let Self::NewRequest { model, version, target } = &mut route {
                    for pair in query.split('&').filter(|p| !p.is_empty()) {
                        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                        let v = urlencoding::decode(&v.replace('+', " ")).map(|v| v.into_owned()).unwrap_or_else(|_| v.to_string());
                        let v = (!v.is_empty()).then_some(v);
                        match k { "model" => *model = v, "version" => *version = v, "target" => *target = v, _ => {} }
                    }
                }
                Ok(route)
            }
            other => {
                let id = other.strip_prefix("/requests/").ok_or_else(|| RouteError::Unknown(raw.to_string()))?;
                id.parse::<i64>().map(|id| Self::RequestDetail { id }).map_err(|_| RouteError::InvalidId(id.to_string()))
            }
        }
    }
}

impl fmt::Display for Route { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.path()) } }
