use crate::error::{BookDistillerError, Result};
use crate::types::KnowledgeBase;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Persistent per-document knowledge checkpoints.
///
/// Each document gets one JSON file under the knowledge directory. The file
/// is rewritten wholesale after every processed page, so a rerun can pick up
/// exactly where the previous run stopped.
pub struct KnowledgeStore {
    dir: PathBuf,
}

impl KnowledgeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn checkpoint_path(&self, document: &str) -> PathBuf {
        self.dir.join(format!("{}_knowledge.json", document))
    }

    /// Load the checkpoint for `document`, or an empty base when none exists.
    ///
    /// A present but unreadable checkpoint is an error rather than a silent
    /// restart, so accumulated knowledge is never thrown away by accident.
    pub async fn load(&self, document: &str) -> Result<KnowledgeBase> {
        let path = self.checkpoint_path(document);
        if !path.exists() {
            debug!("No checkpoint at {}, starting fresh", path.display());
            return Ok(KnowledgeBase::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| BookDistillerError::Checkpoint {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;
        let base: KnowledgeBase =
            serde_json::from_str(&content).map_err(|e| BookDistillerError::Checkpoint {
                reason: format!("failed to parse {}: {}", path.display(), e),
            })?;

        debug!(
            "Loaded checkpoint for '{}': {} items, {} pages done",
            document,
            base.len(),
            base.pages_done
        );
        Ok(base)
    }

    /// Persist `base` as the complete checkpoint for `document`.
    ///
    /// Written to a temporary sibling first and renamed into place, so a
    /// crash mid-write leaves the previous checkpoint intact.
    pub async fn checkpoint(&self, document: &str, base: &KnowledgeBase) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BookDistillerError::Checkpoint {
                reason: format!("failed to create {}: {}", self.dir.display(), e),
            })?;

        let path = self.checkpoint_path(document);
        let tmp = path.with_extension("json.tmp");

        let content =
            serde_json::to_string_pretty(base).map_err(|e| BookDistillerError::Checkpoint {
                reason: format!("failed to serialize checkpoint: {}", e),
            })?;

        fs::write(&tmp, content)
            .await
            .map_err(|e| BookDistillerError::Checkpoint {
                reason: format!("failed to write {}: {}", tmp.display(), e),
            })?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| BookDistillerError::Checkpoint {
                reason: format!("failed to replace {}: {}", path.display(), e),
            })?;

        debug!(
            "Checkpointed '{}': {} items, {} pages done",
            document,
            base.len(),
            base.pages_done
        );
        Ok(())
    }

    /// Delete the checkpoint for `document` if one exists. Summary files are
    /// left alone.
    pub async fn clear(&self, document: &str) -> Result<()> {
        let path = self.checkpoint_path(document);
        if path.exists() {
            fs::remove_file(&path)
                .await
                .map_err(|e| BookDistillerError::Checkpoint {
                    reason: format!("failed to remove {}: {}", path.display(), e),
                })?;
            info!("Cleared checkpoint for '{}'", document);
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
