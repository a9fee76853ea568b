use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use crate::commands::LogFormat;

/// Overrides `--log-level` with full `EnvFilter` directives.
pub const LOG_ENV: &str = "CHECKPOINT_LOG";

/// `--log-level` applies to our own targets; reqwest/hyper stay at warn.
pub fn default_directives(level: &str) -> String {
    format!("warn,checkpoint_cli={level},checkpoint={level}")
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

pub fn init_logging(level: &str, format: &LogFormat) -> Result<()> {
    // stderr only: stdout carries tables and JSON
    let base = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter(level));
    match format {
        LogFormat::Json => registry.with(base.json()).try_init()?,
        LogFormat::Auto | LogFormat::Text => registry.with(base.compact()).try_init()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scopes_to_checkpoint_targets() {
        assert_eq!(default_directives("debug"), "warn,checkpoint_cli=debug,checkpoint=debug");
        let f = EnvFilter::new(default_directives("trace"));
        assert!(f.to_string().contains("checkpoint_cli=trace"));
    }
}
