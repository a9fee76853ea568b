use anyhow::Result;
use crate::actions;
use crate::store::Store;
use crate::views;
use super::{print_json, Ctx, OutputFormat};

pub async fn models(ctx: &Ctx, store: &mut Store) -> Result<()> {
    if let Some(e) = actions::fetch_models(&ctx.gateway).await { store.dispatch(e); }
    let models = store.state().models.as_ref();
    match ctx.format {
        OutputFormat::Json => print_json(&models),
        OutputFormat::Text => { print!("{}", views::render_names("Models", models.map(|ms| ms.iter().map(|m| m.name.as_str())))); Ok(()) }
    }
}

pub async fn versions(ctx: &Ctx, store: &mut Store, model: &str) -> Result<()> {
    if let Some(e) = actions::fetch_versions(&ctx.gateway, model).await { store.dispatch(e); }
    let versions = store.state().versions.as_ref();
    match ctx.format {
        OutputFormat::Json => print_json(&versions),
        OutputFormat::Text => { print!("{}", views::render_names("Versions", versions.map(|vs| vs.iter().map(|v| v.id.as_str())))); Ok(()) }
    }
}

pub async fn stages(ctx: &Ctx, store: &mut Store) -> Result<()> {
    if let Some(e) = actions::fetch_stages(&ctx.gateway).await { store.dispatch(e); }
    let stages = store.state().stages.as_ref();
    match ctx.format {
        OutputFormat::Json => print_json(&stages),
        OutputFormat::Text => { print!("{}", views::render_names("Stages", stages)); Ok(()) }
    }
}
