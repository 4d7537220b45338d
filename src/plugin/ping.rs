use crate::{event::*, helper::CommandHelper, plugin::*};
use anyhow::Result;
use serenity::all::EditInteractionResponse;
use std::time::Instant;

pub struct PluginPing;

#[serenity::async_trait]
impl Plugin for PluginPing {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        vec![CreateCommand::new(self.name()).description("test if bot is responding!")]
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Some(command) = event.is_command(self.name()) else {
            return Ok(EventHandled::No);
        };

        // Round trip of the first reply stands in for latency.
        let start = Instant::now();
        command.reply_text(ctx, "Pong!", false).await?;
        let millis = start.elapsed().as_millis();

        command
            .edit_response(
                ctx.cache_http,
                EditInteractionResponse::new().content(format!("Pong! ||{}ms||", millis)),
            )
            .await?;
        Ok(EventHandled::Yes)
    }
}
