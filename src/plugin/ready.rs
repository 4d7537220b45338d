use crate::{event::*, log_internal, plugin::*};
use anyhow::Result;
use serenity::all::Command;

/// Registers the slash commands once the connection to Discord is ready.
pub struct PluginReady;

#[serenity::async_trait]
impl Plugin for PluginReady {
    fn name(&self) -> &'static str {
        "ready"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        Vec::new()
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Ready(_) = event else {
            return Ok(EventHandled::No);
        };

        log_internal!("Registering slash commands... ");
        let registered = Command::set_global_commands(ctx.http, all_commands()).await?;
        log_internal!(
            "Registering slash commands... done ({} registered)",
            registered.len()
        );

        Ok(EventHandled::Yes)
    }
}
