//! Miscellaneous convenience methods

use crate::context::Context;
use anyhow::Result;
use serenity::all::{
    Colour, CommandInteraction, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, ResolvedOption, ResolvedValue, User,
};

#[serenity::async_trait]
pub trait CommandHelper {
    /// Name and options of the subcommand that was invoked, if any.
    fn subcommand(&self) -> Option<(&str, Vec<ResolvedOption<'_>>)>;
    async fn is_from_owner(&self, ctx: &Context<'_>) -> bool;
    async fn reply(&self, ctx: &Context<'_>, message: CreateInteractionResponseMessage) -> Result<()>;
    async fn reply_text(&self, ctx: &Context<'_>, text: &str, ephemeral: bool) -> Result<()>;
}

#[serenity::async_trait]
impl CommandHelper for CommandInteraction {
    fn subcommand(&self) -> Option<(&str, Vec<ResolvedOption<'_>>)> {
        self.data
            .options()
            .into_iter()
            .find_map(|option| match option.value {
                ResolvedValue::SubCommand(options) => Some((option.name, options)),
                _ => None,
            })
    }

    async fn is_from_owner(&self, ctx: &Context<'_>) -> bool {
        let cfg = ctx.cfg.read().await;
        cfg.general.bot_owners.contains(&self.user.name)
    }

    async fn reply(&self, ctx: &Context<'_>, message: CreateInteractionResponseMessage) -> Result<()> {
        self.create_response(ctx.cache_http, CreateInteractionResponse::Message(message))
            .await?;
        Ok(())
    }

    async fn reply_text(&self, ctx: &Context<'_>, text: &str, ephemeral: bool) -> Result<()> {
        self.reply(
            ctx,
            CreateInteractionResponseMessage::new()
                .content(text)
                .ephemeral(ephemeral),
        )
        .await
    }
}

pub fn string_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::String(value) if option.name == name => Some(value),
        _ => None,
    })
}

pub fn bool_option(options: &[ResolvedOption<'_>], name: &str) -> Option<bool> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Boolean(value) if option.name == name => Some(value),
        _ => None,
    })
}

pub fn user_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a User> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::User(user, _) if option.name == name => Some(user),
        _ => None,
    })
}

pub fn error_embed(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title("Error")
        .description(description)
        .colour(Colour::RED)
}

pub fn success_embed(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title("Success")
        .description(description)
        .colour(Colour::BLUE)
}
