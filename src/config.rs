use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

pub const DEFAULT_MAX_ITEMS: usize = 20;
pub const DEFAULT_MAX_ITEM_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_PREVIEW_LIMIT: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default = "default_max_item_bytes")]
    pub max_item_bytes: u64,
    #[serde(default = "default_accepted_mime_types")]
    pub accepted_mime_types: Vec<String>,
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

fn default_max_item_bytes() -> u64 {
    DEFAULT_MAX_ITEM_BYTES
}

fn default_accepted_mime_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/gif", "image/webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            max_item_bytes: default_max_item_bytes(),
            accepted_mime_types: default_accepted_mime_types(),
            preview_limit: default_preview_limit(),
        }
    }
}

impl SessionConfig {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: SessionConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;

        if config.max_items == 0 {
            anyhow::bail!("config: max_items must be at least 1");
        }
        if config.max_items > DEFAULT_MAX_ITEMS {
            anyhow::bail!(
                "config: max_items is {}, the sequence holds at most {}",
                config.max_items,
                DEFAULT_MAX_ITEMS
            );
        }
        if config.accepted_mime_types.is_empty() {
            anyhow::bail!("config: accepted_mime_types is empty");
        }

        Ok(config)
    }
}
