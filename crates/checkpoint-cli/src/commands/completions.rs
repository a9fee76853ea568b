use anyhow::Result;
use clap_complete::{generate, shells::{Bash, Zsh, Fish}};
use clap::CommandFactory;
use std::io;
use super::Cli;
use crate::errors::{CliError, CliErrorKind};
use tracing::info;

pub fn handle(shell: &str) -> Result<()> {
    let mut cmd = Cli::command();
    match shell {
        "bash" => generate(Bash, &mut cmd, "checkpoint", &mut io::stdout()),
        "zsh" => generate(Zsh, &mut cmd, "checkpoint", &mut io::stdout()),
        "fish" => generate(Fish, &mut cmd, "checkpoint", &mut io::stdout()),
        _ => return Err(CliError::new(CliErrorKind::Usage(format!("unsupported shell: {shell}"))).into()),
    }
    info!(event="completions.generated", shell=%shell);
    Ok(())
}
