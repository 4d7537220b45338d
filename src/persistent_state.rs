use anyhow::{anyhow, Result};
use serde_json::Value;
use serenity::all::UserId;
use std::{collections::BTreeMap, path::PathBuf};

const PSTATE_PATH_REL_HOME: &str = ".config/psnbot/state.json";

const BANS: &str = "bans";
const USAGE: &str = "usage";

/// Minimal key-value interface over named tables.  Callers only go through this, so the backing
/// storage can change without touching them.
pub trait KeyValueStore {
    fn get(&self, table: &str, key: &str) -> Option<&Value>;
    fn set(&mut self, table: &str, key: &str, value: Value);
    fn remove(&mut self, table: &str, key: &str) -> Option<Value>;
    fn list<'a>(&'a self, table: &str) -> Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;
}

/// State which persists across sessions, kept in a single JSON file
pub struct PersistentState {
    path: PathBuf,
    tables: BTreeMap<String, BTreeMap<String, Value>>,
}

impl PersistentState {
    fn state_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(PSTATE_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(Self::state_path()?).await
    }

    /// Load state from `path`.  A missing file is an empty state; it is created on first save.
    pub async fn load_from(path: PathBuf) -> Result<Self> {
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    tables: BTreeMap::new(),
                })
            }
            Err(e) => {
                return Err(anyhow!(
                    "Could not read state at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ))
            }
        };

        let tables = serde_json::from_slice(&contents).map_err(|e| {
            anyhow!(
                "Could not parse state at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Ok(Self { path, tables })
    }

    pub async fn save(&self) -> Result<()> {
        let path = &self.path;
        let pstate_str = serde_json::to_string_pretty(&self.tables)
            .map_err(|e| anyhow!("Could not serialize state: {}", e))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow!(
                    "Could not create directory `{}`: {}",
                    parent.to_string_lossy(),
                    e
                )
            })?;
        }

        // Create a temporary file in the same directory.
        let tmp_path = path.with_extension("json.new");

        tokio::fs::write(&tmp_path, pstate_str).await.map_err(|e| {
            anyhow!(
                "Could not write state to temporary file `{}`: {}",
                tmp_path.to_string_lossy(),
                e
            )
        })?;

        // Atomically rename the temporary file over the target file.
        tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
            anyhow!(
                "Could not rename temporary file `{}` to `{}`: {}",
                tmp_path.to_string_lossy(),
                path.to_string_lossy(),
                e
            )
        })?;

        Ok(())
    }
}

impl KeyValueStore for PersistentState {
    fn get(&self, table: &str, key: &str) -> Option<&Value> {
        self.tables.get(table)?.get(key)
    }

    fn set(&mut self, table: &str, key: &str, value: Value) {
        self.tables
            .entry(table.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
    }

    fn remove(&mut self, table: &str, key: &str) -> Option<Value> {
        let entries = self.tables.get_mut(table)?;
        let removed = entries.remove(key);
        if entries.is_empty() {
            self.tables.remove(table);
        }
        removed
    }

    fn list<'a>(&'a self, table: &str) -> Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a> {
        match self.tables.get(table) {
            Some(entries) => Box::new(entries.iter().map(|(k, v)| (k.as_str(), v))),
            None => Box::new(std::iter::empty()),
        }
    }
}

/// Per-user bookkeeping on top of any [`KeyValueStore`].
pub trait UserRecords {
    fn is_banned(&self, user_id: UserId) -> bool;
    /// Flip the user's ban.  Returns whether the user is banned afterwards.
    fn toggle_ban(&mut self, user_id: UserId) -> bool;
    fn banned_users(&self) -> Vec<UserId>;
    fn usage_count(&self, user_id: UserId) -> u64;
    /// Count one more command from the user.  Returns the new total.
    fn record_usage(&mut self, user_id: UserId) -> u64;
}

impl<S: KeyValueStore> UserRecords for S {
    fn is_banned(&self, user_id: UserId) -> bool {
        self.get(BANS, &user_id.to_string()).is_some()
    }

    fn toggle_ban(&mut self, user_id: UserId) -> bool {
        let key = user_id.to_string();
        if self.remove(BANS, &key).is_some() {
            false
        } else {
            self.set(BANS, &key, Value::Bool(true));
            true
        }
    }

    fn banned_users(&self) -> Vec<UserId> {
        self.list(BANS)
            .filter_map(|(key, _)| key.parse::<u64>().ok())
            .filter(|id| *id != 0)
            .map(UserId::new)
            .collect()
    }

    fn usage_count(&self, user_id: UserId) -> u64 {
        self.get(USAGE, &user_id.to_string())
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    fn record_usage(&mut self, user_id: UserId) -> u64 {
        let count = self.usage_count(user_id) + 1;
        self.set(USAGE, &user_id.to_string(), Value::from(count));
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn empty_state() -> (tempfile::TempDir, PersistentState) {
        let dir = tempfile::tempdir().unwrap();
        let state = PersistentState::load_from(dir.path().join("state.json"))
            .await
            .unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn missing_file_is_empty_state() {
        let (_dir, state) = empty_state().await;
        assert_eq!(state.list(BANS).count(), 0);
        assert_eq!(state.usage_count(UserId::new(1)), 0);
    }

    #[tokio::test]
    async fn key_value_basics() {
        let (_dir, mut state) = empty_state().await;

        state.set("t", "a", Value::from(1));
        state.set("t", "b", Value::from("two"));
        assert_eq!(state.get("t", "a"), Some(&Value::from(1)));
        assert_eq!(state.get("other", "a"), None);

        let keys: Vec<&str> = state.list("t").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);

        assert_eq!(state.remove("t", "a"), Some(Value::from(1)));
        assert_eq!(state.remove("t", "a"), None);
        assert_eq!(state.list("t").count(), 1);
    }

    #[tokio::test]
    async fn ban_toggles() {
        let (_dir, mut state) = empty_state().await;
        let user = UserId::new(42);

        assert!(!state.is_banned(user));
        assert!(state.toggle_ban(user));
        assert!(state.is_banned(user));
        assert_eq!(state.banned_users(), vec![user]);
        assert!(!state.toggle_ban(user));
        assert!(!state.is_banned(user));
        assert!(state.banned_users().is_empty());
    }

    #[tokio::test]
    async fn usage_counts_per_user() {
        let (_dir, mut state) = empty_state().await;
        let alice = UserId::new(1);
        let bob = UserId::new(2);

        assert_eq!(state.record_usage(alice), 1);
        assert_eq!(state.record_usage(alice), 2);
        assert_eq!(state.record_usage(bob), 1);
        assert_eq!(state.usage_count(alice), 2);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut state = PersistentState::load_from(path.clone()).await.unwrap();
        state.toggle_ban(UserId::new(7));
        state.record_usage(UserId::new(8));
        state.save().await.unwrap();
        assert!(!path.with_extension("json.new").exists());

        let reloaded = PersistentState::load_from(path).await.unwrap();
        assert!(reloaded.is_banned(UserId::new(7)));
        assert_eq!(reloaded.usage_count(UserId::new(8)), 1);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = PersistentState::load_from(path).await.err().unwrap();
        assert!(err.to_string().contains("Could not parse state"));
    }
}
