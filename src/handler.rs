use crate::{
    config::Config, context::Context, event::Event, persistent_state::PersistentState,
    storefront::StorefrontClient,
};
use serenity::all::{Interaction, Ready};
use tokio::sync::RwLock;

/// Discord event handler
pub struct Handler {
    cfg: RwLock<Config>,
    pstate: RwLock<PersistentState>,
    storefront: StorefrontClient,
}

impl<'a> Handler {
    pub fn new(cfg: Config, pstate: PersistentState, storefront: StorefrontClient) -> Self {
        Self {
            cfg: RwLock::new(cfg),
            pstate: RwLock::new(pstate),
            storefront,
        }
    }

    fn ctx(&'a self, discord_ctx: &'a serenity::all::Context) -> Context<'a> {
        Context {
            cfg: &self.cfg,
            pstate: &self.pstate,
            storefront: &self.storefront,
            http: &discord_ctx.http,
            cache_http: discord_ctx,
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        Event::Ready(ready).handle(self.ctx(&discord_ctx)).await;
    }

    async fn interaction_create(&self, discord_ctx: serenity::all::Context, interaction: Interaction) {
        // Buttons, autocomplete and the like are not used by any plugin.
        let Interaction::Command(command) = interaction else {
            return;
        };

        Event::Command(command)
            .handle(self.ctx(&discord_ctx))
            .await;
    }
}
