//! Serenity's callbacks are translated into a single Event enum so plugins can look at whatever
//! they care about.

use crate::{context::Context, log_error};
use serenity::all::{
    CommandInteraction, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, Ready,
};

/// A Discord event
pub enum Event {
    Ready(Ready),
    Command(CommandInteraction),
}

impl Event {
    // When an event occurs, iterate over all the plugins to see if any can/should handle it.
    pub async fn handle(self, ctx: Context<'_>) {
        for plugin in crate::plugin::plugins() {
            match plugin.handle(&ctx, &self).await {
                Ok(EventHandled::Yes) => return,
                Ok(EventHandled::No) => continue,
                Err(err) => {
                    log_error!("Error in plugin {}: {}", plugin.name(), err);
                    self.report_error(&ctx, &err).await;
                    return;
                }
            }
        }
    }

    /// Let the user who ran a command know it blew up.
    async fn report_error(&self, ctx: &Context<'_>, err: &anyhow::Error) {
        let Event::Command(command) = self else {
            return;
        };

        let text = format!("<@{}>, An error occurred: `{}`", command.user.id, err);
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(&text)
                .ephemeral(true),
        );

        // The plugin may already have responded (or deferred), in which case only a followup
        // gets through.
        if command.create_response(ctx.cache_http, response).await.is_ok() {
            return;
        }
        let followup = CreateInteractionResponseFollowup::new()
            .content(text)
            .ephemeral(true);
        if let Err(e) = command.create_followup(ctx.cache_http, followup).await {
            log_error!("Could not report error to user: {}", e);
        }
    }

    /// The command interaction, if this is an invocation of the slash command `name`.
    pub fn is_command(&self, name: &str) -> Option<&CommandInteraction> {
        match self {
            Event::Command(command) if command.data.name == name => Some(command),
            _ => None,
        }
    }
}

pub enum EventHandled {
    Yes,
    No,
}
