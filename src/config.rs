use anyhow::{anyhow, Result};
use serenity::all::ChannelId;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/psnbot/config.toml";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_PRESENCE_DELAY_MINUTES: u64 = 5;

/// Bot configuration
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub general: General,
    pub storefront: Storefront,
    #[serde(default)]
    pub presence: Presence,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct General {
    pub discord_token: String,
    /// Global user names allowed to run owner-only commands
    pub bot_owners: Vec<String>,
    /// Commands are only accepted in these channels.  Empty means everywhere.
    #[serde(default)]
    pub allowed_channels: Vec<u64>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Storefront {
    /// Sent to the store as the `userinfo` cookie
    pub account_secret: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Status shown under the bot's name, rotated every `delay_minutes`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Presence {
    #[serde(default = "default_activities")]
    pub activities: Vec<Activity>,
    #[serde(default = "default_presence_delay_minutes")]
    pub delay_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Playing,
    Listening,
    Watching,
    Competing,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            activities: default_activities(),
            delay_minutes: DEFAULT_PRESENCE_DELAY_MINUTES,
        }
    }
}

fn default_activities() -> Vec<Activity> {
    vec![Activity {
        kind: ActivityKind::Watching,
        name: "Your Ps Account".to_owned(),
    }]
}

fn default_presence_delay_minutes() -> u64 {
    DEFAULT_PRESENCE_DELAY_MINUTES
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?).await
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            anyhow!(
                "Could not open configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Self::from_toml_str(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        if config.storefront.timeout_seconds == 0 {
            return Err(anyhow!("storefront.timeout_seconds must be at least 1"));
        }
        if config.presence.delay_minutes == 0 {
            return Err(anyhow!("presence.delay_minutes must be at least 1"));
        }
        Ok(config)
    }
}

impl Storefront {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Presence {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_minutes * 60)
    }
}

impl General {
    pub fn channel_allowed(&self, channel_id: ChannelId) -> bool {
        self.allowed_channels.is_empty() || self.allowed_channels.contains(&channel_id.get())
    }
}
