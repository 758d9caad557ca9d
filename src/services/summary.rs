use crate::error::{BookDistillerError, Result};
use crate::types::SummaryKind;
use chrono::Utc;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Writes numbered summary records under the summaries directory.
///
/// Files are named `{document}_{kind}_{NNN}.md`. The ordinal is derived from
/// how many matching files already exist, which keeps numbering stable across
/// resumed runs. If files were deleted out of order the derived name can
/// collide with a survivor, so the writer advances past taken names rather
/// than overwrite.
pub struct SummaryWriter {
    dir: PathBuf,
}

impl SummaryWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist `summary` as the next record of `kind` for `document`.
    ///
    /// An empty or whitespace-only summary is skipped and reported as `None`.
    pub async fn write(
        &self,
        document: &str,
        kind: SummaryKind,
        summary: &str,
    ) -> Result<Option<PathBuf>> {
        if summary.trim().is_empty() {
            warn!(
                "Skipping empty {} summary for '{}'",
                kind.as_str(),
                document
            );
            return Ok(None);
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BookDistillerError::SummaryWrite {
                reason: format!("failed to create {}: {}", self.dir.display(), e),
            })?;

        let mut ordinal = self.count_existing(document, kind).await? + 1;
        let mut path = self.record_path(document, kind, ordinal);
        while path.exists() {
            ordinal += 1;
            path = self.record_path(document, kind, ordinal);
        }

        let record = Self::compose_record(document, summary);
        fs::write(&path, record)
            .await
            .map_err(|e| BookDistillerError::SummaryWrite {
                reason: format!("failed to write {}: {}", path.display(), e),
            })?;

        info!("Wrote {} summary: {}", kind.as_str(), path.display());
        Ok(Some(path))
    }

    /// Count existing records of `kind` for `document`. A missing summaries
    /// directory counts as zero.
    pub async fn count_existing(&self, document: &str, kind: SummaryKind) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let pattern = format!(
            r"^{}_{}_\d{{3}}\.md$",
            regex::escape(document),
            kind.as_str()
        );
        let matcher = Regex::new(&pattern).map_err(|e| BookDistillerError::SummaryWrite {
            reason: format!("bad summary name pattern: {}", e),
        })?;

        let mut count = 0;
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| BookDistillerError::SummaryWrite {
                reason: format!("failed to list {}: {}", self.dir.display(), e),
            })?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            BookDistillerError::SummaryWrite {
                reason: format!("failed to list {}: {}", self.dir.display(), e),
            }
        })? {
            if let Some(name) = entry.file_name().to_str() {
                if matcher.is_match(name) {
                    count += 1;
                }
            }
        }

        Ok(count)
    }

    fn record_path(&self, document: &str, kind: SummaryKind, ordinal: usize) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{:03}.md", document, kind.as_str(), ordinal))
    }

    fn compose_record(document: &str, summary: &str) -> String {
        let mut record = format!("# Book analysis: {}\n\n", document);
        record.push_str(&format!(
            "Generated: {}\n\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        record.push_str(summary);
        record.push_str("\n\n---\n*Generated by book-distill*\n");
        record
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> (tempfile::TempDir, SummaryWriter) {
        let dir = tempfile::tempdir().unwrap();
        let writer = SummaryWriter::new(dir.path().join("summaries"));
        (dir, writer)
    }

    #[tokio::test]
    async fn test_sequential_ordinals() {
        let (_dir, writer) = writer();

        for expected in ["book_interval_001.md", "book_interval_002.md", "book_interval_003.md"] {
            let path = writer
                .write("book", SummaryKind::Interval, "some summary")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_kinds_are_numbered_independently() {
        let (_dir, writer) = writer();

        // Interval records written in between never disturb final numbering.
        let mut final_names = Vec::new();
        for round in 0..3 {
            let path = writer
                .write("book", SummaryKind::Final, "final")
                .await
                .unwrap()
                .unwrap();
            final_names.push(path.file_name().unwrap().to_str().unwrap().to_string());

            if round < 2 {
                writer
                    .write("book", SummaryKind::Interval, "interval")
                    .await
                    .unwrap();
            }
        }

        assert_eq!(
            final_names,
            vec!["book_final_001.md", "book_final_002.md", "book_final_003.md"]
        );
    }

    #[tokio::test]
    async fn test_never_overwrites_surviving_records() {
        let (_dir, writer) = writer();
        std::fs::create_dir_all(writer.dir()).unwrap();
        std::fs::write(writer.dir().join("book_interval_001.md"), "first").unwrap();
        std::fs::write(writer.dir().join("book_interval_003.md"), "third").unwrap();

        // Two files exist, so the derived ordinal is 3, which is taken.
        let path = writer
            .write("book", SummaryKind::Interval, "fourth")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "book_interval_004.md"
        );
        assert_eq!(
            std::fs::read_to_string(writer.dir().join("book_interval_003.md")).unwrap(),
            "third"
        );
    }

    #[tokio::test]
    async fn test_empty_summary_is_skipped() {
        let (_dir, writer) = writer();

        let result = writer
            .write("book", SummaryKind::Final, "   \n  ")
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(!writer.dir().exists());
    }

    #[tokio::test]
    async fn test_record_layout() {
        let (_dir, writer) = writer();
        let path = writer
            .write("meditations", SummaryKind::Final, "## Themes\n\n- virtue")
            .await
            .unwrap()
            .unwrap();

        let record = std::fs::read_to_string(path).unwrap();
        assert!(record.starts_with("# Book analysis: meditations\n"));
        assert!(record.contains("Generated: "));
        assert!(record.contains("## Themes\n\n- virtue"));
        assert!(record.ends_with("---\n*Generated by book-distill*\n"));
    }

    #[tokio::test]
    async fn test_count_ignores_foreign_files() {
        let (_dir, writer) = writer();
        std::fs::create_dir_all(writer.dir()).unwrap();
        std::fs::write(writer.dir().join("book_interval_001.md"), "ours").unwrap();
        std::fs::write(writer.dir().join("other_interval_001.md"), "other doc").unwrap();
        std::fs::write(writer.dir().join("book_final_001.md"), "other kind").unwrap();
        std::fs::write(writer.dir().join("book_interval_12.md"), "bad ordinal").unwrap();
        std::fs::write(writer.dir().join("notes.txt"), "not a record").unwrap();

        let count = writer
            .count_existing("book", SummaryKind::Interval)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_count_with_missing_directory() {
        let (_dir, writer) = writer();
        let count = writer
            .count_existing("book", SummaryKind::Interval)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_document_stems_with_regex_metacharacters() {
        let (_dir, writer) = writer();

        let path = writer
            .write("c++ (2nd ed.)", SummaryKind::Final, "body")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "c++ (2nd ed.)_final_001.md"
        );

        let count = writer
            .count_existing("c++ (2nd ed.)", SummaryKind::Final)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
