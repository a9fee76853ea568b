use anyhow::Result;
use crate::actions;
use crate::store::Store;
use super::{navigate, print_json, Ctx, OutputFormat};

pub async fn handle(ctx: &Ctx, store: &mut Store) -> Result<()> {
    let out = actions::fetch_user_info(&ctx.gateway).await;
    store.dispatch_all(out.events);
    if let Some(route) = out.navigation { return navigate(ctx, store, route).await; }
    let info = store.state().user_info.as_ref();
    match ctx.format {
        OutputFormat::Json => print_json(&info),
        OutputFormat::Text => {
            match info { Some(u) => println!("{} <{}>", u.user, u.email), None => println!("unknown") }
            Ok(())
        }
    }
}
