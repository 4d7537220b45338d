use crate::{event::*, plugin::*};
use anyhow::Result;
use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter, CreateInteractionResponseFollowup, UserId};
use std::time::Instant;

/// Discord rejects embed field values longer than this.
const FIELD_LIMIT: usize = 1024;
const CREDITS: &str = "- [serenity](https://github.com/serenity-rs/serenity)\n\
                       - [PlayStation Store](https://store.playstation.com/)\n\
                       - [PSPrices](https://psprices.com/)";

pub struct PluginBotInfos;

struct GuildSummary {
    name: String,
    member_count: u64,
    owner_id: UserId,
}

/// One bullet per guild, dropping whole entries once the field would get too long.
fn guild_lines(guilds: &[GuildSummary]) -> String {
    let mut lines = String::new();
    for guild in guilds {
        let line = format!(
            "- {} ({} members)\nOwned by: <@{}>",
            guild.name, guild.member_count, guild.owner_id
        );
        let needed = if lines.is_empty() { line.len() } else { line.len() + 1 };
        if lines.len() + needed > FIELD_LIMIT {
            break;
        }
        if !lines.is_empty() {
            lines.push('\n');
        }
        lines.push_str(&line);
    }

    if lines.is_empty() {
        "None".to_owned()
    } else {
        lines
    }
}

#[serenity::async_trait]
impl Plugin for PluginBotInfos {
    fn name(&self) -> &'static str {
        "bot-infos"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        vec![CreateCommand::new(self.name()).description("Gives utilitary informations about the bot.")]
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Some(command) = event.is_command(self.name()) else {
            return Ok(EventHandled::No);
        };

        let start = Instant::now();
        command.defer(ctx.cache_http).await?;
        let millis = start.elapsed().as_millis();

        // Cache references must not live across an await.
        let guilds: Vec<GuildSummary> = {
            let cache = &ctx.cache_http.cache;
            cache
                .guilds()
                .into_iter()
                .filter_map(|id| cache.guild(id))
                .map(|guild| GuildSummary {
                    name: guild.name.clone(),
                    member_count: guild.member_count,
                    owner_id: guild.owner_id,
                })
                .collect()
        };

        let embed = CreateEmbed::new()
            .title("Bot infos")
            .description("Useful information about the bot.")
            .colour(Colour::BLUE)
            .field("Ping", format!("{}ms", millis), false)
            .field("Servers", guild_lines(&guilds), false)
            .field("Credits", CREDITS, false)
            .footer(CreateEmbedFooter::new("Hosted by the bot owners."));

        command
            .create_followup(
                ctx.cache_http,
                CreateInteractionResponseFollowup::new().embed(embed),
            )
            .await?;
        Ok(EventHandled::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild(name: &str, member_count: u64) -> GuildSummary {
        GuildSummary {
            name: name.to_owned(),
            member_count,
            owner_id: UserId::new(42),
        }
    }

    #[test]
    fn lists_guilds_with_owner() {
        let lines = guild_lines(&[guild("Store fans", 12), guild("Avatars", 3)]);
        assert_eq!(
            lines,
            "- Store fans (12 members)\nOwned by: <@42>\n- Avatars (3 members)\nOwned by: <@42>"
        );
        assert_eq!(guild_lines(&[]), "None");
    }

    #[test]
    fn long_guild_list_fits_in_a_field() {
        let guilds: Vec<GuildSummary> = (0..100).map(|i| guild(&format!("guild {}", i), i)).collect();
        let lines = guild_lines(&guilds);
        assert!(lines.len() <= FIELD_LIMIT);
        assert!(lines.starts_with("- guild 0 "));
        assert!(lines.ends_with("<@42>"));
    }

    #[test]
    fn registers_bot_infos() {
        let registered = serde_json::to_value(&PluginBotInfos.commands()[0]).unwrap();
        assert_eq!(registered["name"], "bot-infos");
    }
}
