use crate::{
    event::*,
    helper::{bool_option, user_option, CommandHelper},
    log_internal,
    logging::PrintColor,
    persistent_state::UserRecords,
    plugin::*,
};
use anyhow::{anyhow, Result};
use serenity::all::{CommandOptionType, CreateCommandOption};

/// Blocks or unblocks a user from every command.  Bot owners only.
pub struct PluginToggleBan;

#[serenity::async_trait]
impl Plugin for PluginToggleBan {
    fn name(&self) -> &'static str {
        "toggle-ban"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        vec![CreateCommand::new(self.name())
            .description("Block/Unblock a user from using commands.")
            .add_option(
                CreateCommandOption::new(CommandOptionType::User, "member", "User to (un)ban")
                    .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::Boolean,
                "private",
                "Only show the answer to you",
            ))]
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Some(command) = event.is_command(self.name()) else {
            return Ok(EventHandled::No);
        };

        if !command.is_from_owner(ctx).await {
            command
                .reply_text(ctx, "Only bot owners can ban users.", true)
                .await?;
            return Ok(EventHandled::Yes);
        }

        let (member, private) = {
            let options = command.data.options();
            let member = user_option(&options, "member")
                .cloned()
                .ok_or(anyhow!("`/{}` invoked without a member", self.name()))?;
            (member, bool_option(&options, "private").unwrap_or(false))
        };

        let owners_include_member = ctx
            .cfg
            .read()
            .await
            .general
            .bot_owners
            .contains(&member.name);
        if owners_include_member {
            command
                .reply_text(ctx, "You cannot ban a bot owner.", private)
                .await?;
            return Ok(EventHandled::Yes);
        }

        let banned = {
            let mut pstate = ctx.pstate.write().await;
            let banned = pstate.toggle_ban(member.id);
            pstate.save().await?;
            banned
        };

        let reply = if banned {
            log_internal!("{} was banned", member.color());
            format!("{} has been banned from the bot.", member.name)
        } else {
            log_internal!("{} was unbanned", member.color());
            format!("{} has been unbanned.", member.name)
        };
        command.reply_text(ctx, &reply, private).await?;

        Ok(EventHandled::Yes)
    }
}
