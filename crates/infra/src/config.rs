//! Store configuration.

use std::path::PathBuf;

use anyhow::Context;

/// Slot key the inventory state is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "inventory-storage";

/// Name written into history entries the store records itself.
pub const DEFAULT_ACTOR: &str = "Admin";

const APP_DIR: &str = "stockroom";

pub const DATA_DIR_VAR: &str = "STOCKROOM_DATA_DIR";
pub const ACTOR_VAR: &str = "STOCKROOM_ACTOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_key: String,
    pub actor: String,
    /// Directory holding file-backed slots.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Defaults, overridden by `STOCKROOM_DATA_DIR` and `STOCKROOM_ACTOR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for the
    /// `STOCKROOM_*` names. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(dir) = present(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(actor) = present(ACTOR_VAR) {
            config.actor = actor;
        }

        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let data_dir = default_data_dir().unwrap_or_else(|err| {
            let fallback = std::env::temp_dir().join(APP_DIR);
            tracing::warn!(error = %err, fallback = %fallback.display(), "using temporary data directory");
            fallback
        });

        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            actor: DEFAULT_ACTOR.to_string(),
            data_dir,
        }
    }
}

/// `{app_data_dir}/stockroom`
fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join(APP_DIR))
}
