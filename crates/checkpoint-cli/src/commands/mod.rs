use clap::{Parser, Subcommand, Args};
use anyhow::Result;
use serde::{Serialize, Deserialize};
use crate::errors::{CliError, CliErrorKind};
use crate::gateway::Gateway;
use crate::routes::Route;
use crate::store::Store;
use crate::types::StatusBucket;
use crate::views::RequestFilter;

pub mod requests;
pub mod lists;
pub mod whoami;
pub mod open;
pub mod completions;

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum LogFormat { Auto, Text, Json }

#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat { Text, Json }

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewAction { Approve, Close }

#[derive(Parser, Debug)]
#[command(name = "checkpoint", version, about = "Checkpoint: review and approve model promote requests")]
pub struct Cli {
    /// Log level: trace|debug|info|warn|error
    #[arg(long, default_value = "info")]
    pub log_level: String,
    /// Log format: auto|text|json
    #[arg(long, default_value = "auto")]
    pub log_format: LogFormat,
    /// Registry base URL (overrides config and CHECKPOINT_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with promote requests
    #[command(subcommand)]
    Requests(RequestsCommand),
    /// List registered models
    Models { #[arg(long)] format: Option<OutputFormat> },
    /// List versions of a model
    Versions { model: String, #[arg(long)] format: Option<OutputFormat> },
    /// List stages a version can be promoted to
    Stages { #[arg(long)] format: Option<OutputFormat> },
    /// Show the signed-in user
    Whoami { #[arg(long)] format: Option<OutputFormat> },
    /// Open a Checkpoint route, e.g. /checkpoint/requests/42
    Open { path: String, #[arg(long)] format: Option<OutputFormat> },
    /// Generate shell completions (hidden)
    #[command(hide = true)]
    Completions { #[arg(long, default_value = "bash")] shell: String },
}

#[derive(Subcommand, Debug)]
pub enum RequestsCommand {
    /// List promote requests
    List {
        /// Only requests for these models (repeatable)
        #[arg(long = "model")] models: Vec<String>,
        /// Only requests in these status buckets (repeatable)
        #[arg(long = "status", value_enum)] statuses: Vec<StatusBucket>,
        #[arg(long)] format: Option<OutputFormat>,
    },
    /// Open a new promote request
    New(NewRequestArgs),
    /// Show a request with its challenger/champion diff
    Show { id: i64, #[arg(long)] format: Option<OutputFormat> },
    /// Approve or close an open request
    Review {
        id: i64,
        #[arg(long, value_enum)] action: ReviewAction,
        #[arg(long)] comment: Option<String>,
        #[arg(long)] format: Option<OutputFormat>,
    },
}

#[derive(Args, Debug)]
pub struct NewRequestArgs {
    #[arg(long)] pub title: String,
    #[arg(long)] pub description: Option<String>,
    #[arg(long)] pub model: String,
    #[arg(long)] pub version: String,
    /// Target stage
    #[arg(long)] pub target: String,
    #[arg(long)] pub format: Option<OutputFormat>,
}

/// What every command needs: where the registry is and how to print.
#[derive(Debug, Clone)]
pub struct Ctx { pub gateway: Gateway, pub format: OutputFormat }

impl Ctx {
    pub fn with_format(&self, format: Option<OutputFormat>) -> Self { Self { gateway: self.gateway.clone(), format: format.unwrap_or(self.format) } }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Mounts the view behind `route`. Terminal commands cannot follow the
/// sign-in redirect, so it becomes an auth error carrying the URL.
pub async fn navigate(ctx: &Ctx, store: &mut Store, route: Route) -> Result<()> {
    tracing::debug!(event = "navigate", path = %route);
    match route {
        Route::RequestList => requests::list(ctx, store, &RequestFilter::default()).await,
        Route::RequestDetail { id } => requests::show(ctx, store, id).await,
        Route::NewRequest { model, version, target } => requests::form(ctx, store, model, version, target).await,
        Route::SignIn => Err(CliError::new(CliErrorKind::Auth(format!("{}{}", ctx.gateway.base(), route.path()))).into()),
    }
}
