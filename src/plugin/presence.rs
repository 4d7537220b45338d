use crate::{
    config::{Activity, ActivityKind},
    event::*,
    log_internal,
    plugin::*,
};
use anyhow::Result;
use serenity::all::ActivityData;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set once the rotation task runs, so a reconnect does not start a second one.
static ROTATING: AtomicBool = AtomicBool::new(false);

/// Shows the configured activities under the bot's name, one after the other.
pub struct PluginPresence;

fn activity_data(activity: &Activity) -> ActivityData {
    let name = activity.name.clone();
    match activity.kind {
        ActivityKind::Playing => ActivityData::playing(name),
        ActivityKind::Listening => ActivityData::listening(name),
        ActivityKind::Watching => ActivityData::watching(name),
        ActivityKind::Competing => ActivityData::competing(name),
    }
}

/// Activities in the order they are shown after the first one, forever.
fn rotation(activities: Vec<Activity>) -> impl Iterator<Item = Activity> {
    activities.into_iter().cycle().skip(1)
}

#[serenity::async_trait]
impl Plugin for PluginPresence {
    fn name(&self) -> &'static str {
        "presence"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        Vec::new()
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Ready(_) = event else {
            return Ok(EventHandled::No);
        };

        let (activities, delay) = {
            let cfg = ctx.cfg.read().await;
            (cfg.presence.activities.clone(), cfg.presence.delay())
        };

        let Some(first) = activities.first() else {
            return Ok(EventHandled::No);
        };
        ctx.cache_http.set_activity(Some(activity_data(first)));

        if activities.len() > 1 && !ROTATING.swap(true, Ordering::SeqCst) {
            log_internal!(
                "Rotating {} activities every {}s",
                activities.len(),
                delay.as_secs()
            );
            let discord = ctx.cache_http.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(delay);
                // The first tick completes immediately and the first activity is already shown.
                interval.tick().await;
                for activity in rotation(activities) {
                    interval.tick().await;
                    discord.set_activity(Some(activity_data(&activity)));
                }
            });
        }

        // The ready plugin still has to register commands.
        Ok(EventHandled::No)
    }
}
