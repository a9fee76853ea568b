use anyhow::Result;
use clap::Parser;
use checkpoint_cli::commands::{self, Cli, Commands, Ctx, RequestsCommand};
use checkpoint_cli::config::EffectiveConfig;
use checkpoint_cli::errors::CliError;
use checkpoint_cli::gateway::Gateway;
use checkpoint_cli::logging::init_logging;
use checkpoint_cli::store::Store;
use checkpoint_cli::views::RequestFilter;
use tracing::{info_span, info, Instrument};
use std::process;
use std::time::Instant;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format)?;
    let cfg = match EffectiveConfig::load() {
        Ok(c) => c.with_api_base(cli.api_base.clone()),
        Err(e) => { eprintln!("error: {e:#}"); let code = classify_exit_code(&e); info!(took_ms=%start.elapsed().as_millis(), event="cli.finished", exit_code=code); process::exit(code); }
    };
    let exit_code = match dispatch(cli, cfg).await { Ok(()) => 0, Err(e) => classify_exit_code(&e) };
    info!(took_ms=%start.elapsed().as_millis(), event="cli.finished", exit_code=exit_code);
    if exit_code != 0 { process::exit(exit_code); }
    Ok(())
}

async fn dispatch(cli: Cli, cfg: EffectiveConfig) -> Result<()> {
    let start = Instant::now();
    let base = Ctx { gateway: Gateway::new(cfg.api_base.clone()), format: cfg.default_format };
    let mut store = Store::new();
    let result = match cli.command {
        Commands::Requests(RequestsCommand::List { models, statuses, format }) => {
            let filter = RequestFilter { models, statuses };
            commands::requests::list(&base.with_format(format), &mut store, &filter).instrument(info_span!("cmd.requests.list")).await
        }
        Commands::Requests(RequestsCommand::New(args)) => {
            let ctx = base.with_format(args.format);
            commands::requests::create(&ctx, &mut store, args).instrument(info_span!("cmd.requests.new")).await
        }
        Commands::Requests(RequestsCommand::Show { id, format }) => commands::requests::show(&base.with_format(format), &mut store, id).instrument(info_span!("cmd.requests.show", id)).await,
        Commands::Requests(RequestsCommand::Review { id, action, comment, format }) => commands::requests::review(&base.with_format(format), &mut store, id, action, comment).instrument(info_span!("cmd.requests.review", id)).await,
        Commands::Models { format } => commands::lists::models(&base.with_format(format), &mut store).instrument(info_span!("cmd.models")).await,
        Commands::Versions { model, format } => commands::lists::versions(&base.with_format(format), &mut store, &model).instrument(info_span!("cmd.versions")).await,
        Commands::Stages { format } => commands::lists::stages(&base.with_format(format), &mut store).instrument(info_span!("cmd.stages")).await,
        Commands::Whoami { format } => commands::whoami::handle(&base.with_format(format), &mut store).instrument(info_span!("cmd.whoami")).await,
        Commands::Open { path, format } => commands::open::handle(&base.with_format(format), &mut store, &path).instrument(info_span!("cmd.open")).await,
        Commands::Completions { shell } => { let _span = info_span!("cmd.completions").entered(); commands::completions::handle(&shell) }
    };
    let took = start.elapsed().as_millis();
    match &result { Ok(_) => info!(event="cmd.finished", took_ms=%took), Err(e) => { eprintln!("error: {e}"); info!(event="cmd.failed", took_ms=%took); } }
    result
}

fn classify_exit_code(e: &anyhow::Error) -> i32 {
    use std::error::Error;
    let mut cur: &dyn Error = e.as_ref();
    loop {
        if let Some(cli) = cur.downcast_ref::<CliError>() { tracing::debug!(?cli, code=cli.kind.code(), "classified_cli_error"); return cli.kind.code(); }
        if let Some(ioe) = cur.downcast_ref::<std::io::Error>() { eprintln!("io error: {ioe}"); return 30; }
        if let Some(src) = cur.source() { cur = src; } else { break; }
    }
    eprintln!("runtime error: {e}");
    20
}
