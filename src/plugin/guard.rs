use crate::{
    config::General,
    event::*,
    helper::CommandHelper,
    log_error, log_internal,
    logging::PrintColor,
    persistent_state::{KeyValueStore, PersistentState, UserRecords},
    plugin::*,
};
use anyhow::Result;
use serenity::all::{ChannelId, UserId};
use tokio::sync::RwLock;

const BANNED: &str = "You are currently banned, you have not access to the bot";
const WRONG_CHANNEL: &str = "Incorrect channel.";

/// Screens every command before the plugin that answers it sees it, and counts usage.
pub struct PluginGuard;

#[derive(Debug, PartialEq, Eq)]
enum Admission {
    Allowed,
    Banned,
    WrongChannel,
}

fn admission(
    general: &General,
    records: &impl KeyValueStore,
    user_id: UserId,
    channel_id: ChannelId,
) -> Admission {
    if records.is_banned(user_id) {
        Admission::Banned
    } else if !general.channel_allowed(channel_id) {
        Admission::WrongChannel
    } else {
        Admission::Allowed
    }
}

/// Count one more command for `user_id` and persist it.  A failed save is logged and the count
/// stays in memory until the next successful save.
async fn count_usage(pstate: &RwLock<PersistentState>, user_id: UserId) -> u64 {
    let count = pstate.write().await.record_usage(user_id);

    if let Err(e) = pstate.read().await.save().await {
        log_error!("Could not save usage count: {}", e);
    }
    count
}

#[serenity::async_trait]
impl Plugin for PluginGuard {
    fn name(&self) -> &'static str {
        "guard"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        Vec::new()
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Command(command) = event else {
            return Ok(EventHandled::No);
        };

        let verdict = {
            let cfg = ctx.cfg.read().await;
            let pstate = ctx.pstate.read().await;
            admission(&cfg.general, &*pstate, command.user.id, command.channel_id)
        };

        match verdict {
            Admission::Allowed => {
                let count = count_usage(ctx.pstate, command.user.id).await;
                log_internal!("{} has run {} command(s)", command.user.color(), count);
                Ok(EventHandled::No)
            }
            Admission::Banned => {
                log_internal!("Refused banned user {}", command.user.color());
                command.reply_text(ctx, BANNED, true).await?;
                Ok(EventHandled::Yes)
            }
            Admission::WrongChannel => {
                command.reply_text(ctx, WRONG_CHANNEL, true).await?;
                Ok(EventHandled::Yes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn general(allowed_channels: &str) -> General {
        Config::from_toml_str(&format!(
            "[general]\ndiscord_token = \"t\"\nbot_owners = []\nallowed_channels = {}\n\
             [storefront]\naccount_secret = \"s\"\n",
            allowed_channels
        ))
        .unwrap()
        .general
    }

    #[tokio::test]
    async fn bans_win_over_channels() {
        let dir = tempfile::tempdir().unwrap();
        let mut records = PersistentState::load_from(dir.path().join("state.json"))
            .await
            .unwrap();
        let user = UserId::new(5);
        let here = ChannelId::new(10);
        let elsewhere = ChannelId::new(11);

        let open = general("[]");
        let restricted = general("[10]");

        assert_eq!(admission(&open, &records, user, elsewhere), Admission::Allowed);
        assert_eq!(admission(&restricted, &records, user, here), Admission::Allowed);
        assert_eq!(
            admission(&restricted, &records, user, elsewhere),
            Admission::WrongChannel
        );

        records.toggle_ban(user);
        assert_eq!(admission(&open, &records, user, here), Admission::Banned);
        assert_eq!(admission(&restricted, &records, user, elsewhere), Admission::Banned);
        assert_eq!(
            admission(&open, &records, UserId::new(6), here),
            Admission::Allowed
        );
    }

    #[tokio::test]
    async fn usage_is_counted_when_saving_fails() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("state");
        let pstate = RwLock::new(
            PersistentState::load_from(parent.join("state.json"))
                .await
                .unwrap(),
        );
        // The state directory can no longer be created.
        tokio::fs::write(&parent, b"").await.unwrap();
        let user = UserId::new(5);

        assert_eq!(count_usage(&pstate, user).await, 1);
        assert_eq!(count_usage(&pstate, user).await, 2);
        assert_eq!(pstate.read().await.usage_count(user), 2);
    }

    #[tokio::test]
    async fn usage_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let pstate = RwLock::new(PersistentState::load_from(path.clone()).await.unwrap());

        count_usage(&pstate, UserId::new(7)).await;

        let reloaded = PersistentState::load_from(path).await.unwrap();
        assert_eq!(reloaded.usage_count(UserId::new(7)), 1);
    }
}
