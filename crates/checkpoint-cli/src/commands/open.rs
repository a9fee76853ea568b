use anyhow::Result;
use crate::errors::CliError;
use crate::routes::Route;
use crate::store::Store;
use super::{navigate, Ctx};

pub async fn handle(ctx: &Ctx, store: &mut Store, path: &str) -> Result<()> {
    let route = Route::parse(path).map_err(CliError::from)?;
    navigate(ctx, store, route).await
}
