//! Local JSON snapshot: the whole conversation as a JSON array.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use casper_common::SessionId;
use tracing::{debug, warn};

use super::{ConversationSink, StoreError};
use crate::message::Message;

/// Overwrites one file with `[{"origin": .., "message": ..}, ..]` on every save.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConversationSink for JsonFileSink {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn save(
        &self,
        session_id: &SessionId,
        conversation: &[Message],
    ) -> Result<(), StoreError> {
        let json = serde_json::to_vec(conversation)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write to .tmp, then rename
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            warn!("atomic rename failed ({e}), falling back to direct write");
            let result = tokio::fs::write(&self.path, &json).await;
            let _ = tokio::fs::remove_file(&tmp_path).await;
            result?;
        }

        debug!(
            session = %session_id,
            messages = conversation.len(),
            "saved chat history to {}",
            self.path.display()
        );
        Ok(())
    }
}
