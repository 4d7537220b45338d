use crate::{context::Context, event::EventHandled};
use anyhow::Result;
use serenity::all::CreateCommand;

mod avatar;
mod bot_infos;
mod debug;
mod guard;
mod ping;
mod presence;
mod ready;
mod toggle_ban;

#[serenity::async_trait]
pub trait Plugin: Sync + Send {
    /// Plugin name.  Used for debug
    fn name(&self) -> &'static str;
    /// Slash commands this plugin answers.  Registered with Discord once connected.
    fn commands(&self) -> Vec<CreateCommand>;
    /// Potentially handle event.  Returns:
    /// - Ok(EventHandled::Yes) if the event has been handled and no other plugin should attempt to
    /// handle it
    /// - Ok(EventHandled::No) if another plugin should attempt to handle the event
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context<'_>, event: &crate::event::Event) -> Result<EventHandled>;
}

/// Ordered list of available plugins
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        // Core bot operations
        Box::new(debug::PluginDebug),
        // Needs to see Ready before the ready plugin consumes it.
        Box::new(presence::PluginPresence),
        Box::new(ready::PluginReady),
        // Keep before anything that answers commands.
        Box::new(guard::PluginGuard),
        // Commands
        Box::new(ping::PluginPing),
        Box::new(bot_infos::PluginBotInfos),
        Box::new(avatar::PluginAvatar),
        Box::new(toggle_ban::PluginToggleBan),
    ]
}

/// Every slash command of every plugin.
pub fn all_commands() -> Vec<CreateCommand> {
    plugins()
        .iter()
        .flat_map(|plugin| plugin.commands())
        .collect()
}
