use crate::error::Result;
use crate::services::extractor::{KnowledgeSummarizer, PageAnalyzer};
use crate::services::reader::PageSource;
use crate::services::store::KnowledgeStore;
use crate::services::summary::SummaryWriter;
use crate::types::{DistillConfig, KnowledgeBase, RunMode, RunReport, SummaryKind};
use std::path::PathBuf;
use tracing::{info, warn};

/// Drives the page loop: analyze a page, fold its knowledge into the base,
/// checkpoint, and emit interval/final summaries at the configured boundaries.
///
/// Pages are processed strictly in order, one at a time. The checkpoint after
/// every page is what makes an aborted run resumable.
pub struct PipelineDriver<'a> {
    store: &'a KnowledgeStore,
    writer: &'a SummaryWriter,
    analyzer: &'a dyn PageAnalyzer,
    summarizer: &'a dyn KnowledgeSummarizer,
}

impl<'a> PipelineDriver<'a> {
    pub fn new(
        store: &'a KnowledgeStore,
        writer: &'a SummaryWriter,
        analyzer: &'a dyn PageAnalyzer,
        summarizer: &'a dyn KnowledgeSummarizer,
    ) -> Self {
        Self {
            store,
            writer,
            analyzer,
            summarizer,
        }
    }

    pub async fn run(
        &self,
        document: &str,
        pages: &dyn PageSource,
        config: &DistillConfig,
    ) -> Result<RunReport> {
        let total_pages = pages.page_count();
        let page_count = config.max_pages.map_or(total_pages, |n| n.min(total_pages));

        let mut base = match config.mode {
            RunMode::Restart => {
                self.store.clear(document).await?;
                KnowledgeBase::default()
            }
            RunMode::Resume => self.store.load(document).await?,
        };
        let start = base.pages_done.min(page_count);

        if page_count == 0 {
            warn!("'{}' has no pages to process", document);
        } else if start >= page_count {
            info!(
                "'{}' is already processed through page {}, nothing to do",
                document, page_count
            );
        } else if start > 0 {
            info!(
                "Resuming '{}' at page {} with {} known points",
                document,
                start + 1,
                base.len()
            );
        } else {
            info!("Processing {} pages of '{}'", page_count, document);
        }

        let mut pages_with_content = 0;
        let mut knowledge_added = 0;
        let mut summary_files: Vec<PathBuf> = Vec::new();

        for page_index in start..page_count {
            info!("Processing page {}/{}", page_index + 1, page_count);
            let text = pages.page_text(page_index)?;
            let result = self.analyzer.analyze_page(&text).await?;

            if result.has_content {
                info!("Found {} new knowledge points", result.knowledge.len());
                pages_with_content += 1;
                knowledge_added += result.knowledge.len();
                base = base.appended(&result.knowledge);
            } else {
                info!("Skipping page (no relevant content)");
            }
            base.pages_done = page_index + 1;
            self.store.checkpoint(document, &base).await?;

            let processed = page_index + 1;
            let is_interval = config
                .interval
                .map_or(false, |iv| iv > 0 && processed % iv == 0);
            let is_last = processed == page_count;

            if is_interval && !is_last {
                info!("Progress: {}/{} pages processed", processed, page_count);
                if let Some(path) = self
                    .summarize_and_write(document, &base, SummaryKind::Interval)
                    .await?
                {
                    summary_files.push(path);
                }
            }

            if is_last {
                info!("Last page ({}/{}) processed", processed, page_count);
                if let Some(path) = self
                    .summarize_and_write(document, &base, SummaryKind::Final)
                    .await?
                {
                    summary_files.push(path);
                }
            }
        }

        Ok(RunReport {
            document: document.to_string(),
            pages_processed: page_count.saturating_sub(start),
            pages_with_content,
            knowledge_added,
            total_knowledge: base.len(),
            summary_files,
        })
    }

    /// Produce a final summary from whatever the checkpoint already holds,
    /// without touching any pages.
    pub async fn summarize_existing(&self, document: &str) -> Result<Option<PathBuf>> {
        let base = self.store.load(document).await?;
        self.summarize_and_write(document, &base, SummaryKind::Final)
            .await
    }

    async fn summarize_and_write(
        &self,
        document: &str,
        base: &KnowledgeBase,
        kind: SummaryKind,
    ) -> Result<Option<PathBuf>> {
        if base.is_empty() {
            warn!(
                "Skipping {} summary for '{}': no knowledge collected",
                kind.as_str(),
                document
            );
            return Ok(None);
        }

        info!(
            "Generating {} summary from {} knowledge points",
            kind.as_str(),
            base.len()
        );
        let summary = self.summarizer.summarize(&base.knowledge).await?;
        self.writer.write(document, kind, &summary).await
    }
}
