mod config;
mod context;
mod event;
mod handler;
mod helper;
mod logging;
mod persistent_state;
mod plugin;
mod storefront;

use crate::persistent_state::UserRecords;
use serenity::{all::GatewayIntents, Client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = crate::config::Config::load().await?;
    let token = cfg.general.discord_token.clone();
    let pstate = crate::persistent_state::PersistentState::load().await?;
    log_internal!(
        "Loaded state; {} user(s) banned",
        pstate.banned_users().len()
    );
    let storefront = crate::storefront::StorefrontClient::new(
        cfg.storefront.account_secret.clone(),
        cfg.storefront.timeout(),
    )?;
    log_internal!(
        "Loaded configuration; storefront timeout is {}s",
        cfg.storefront.timeout_seconds
    );
    let handler = handler::Handler::new(cfg, pstate, storefront);

    // Slash commands only need guild information; message content is never read.
    let intents = GatewayIntents::GUILDS;

    Client::builder(&token, intents)
        .event_handler(handler)
        .await?
        .start()
        .await
        .map_err(Into::into)
}
