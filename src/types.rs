use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub knowledge: Vec<String>,
    // Resume cursor: pages already processed. Older checkpoints lack the
    // field and load as 0, i.e. they resume from the first page.
    #[serde(default)]
    pub pages_done: usize,
}

impl KnowledgeBase {
    pub fn len(&self) -> usize {
        self.knowledge.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knowledge.is_empty()
    }

    /// Returns a new base equal to `self` with `items` appended, preserving
    /// order. Leaves `self` untouched.
    pub fn appended(&self, items: &[String]) -> KnowledgeBase {
        let mut next = self.clone();
        next.knowledge.extend(items.iter().cloned());
        next
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageKnowledge {
    pub has_content: bool,
    #[serde(default)]
    pub knowledge: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Interval,
    Final,
}

impl SummaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryKind::Interval => "interval",
            SummaryKind::Final => "final",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Resume,
    Restart,
}

#[derive(Debug, Clone)]
pub struct DistillConfig {
    pub source: String,
    pub output_dir: PathBuf,
    pub max_pages: Option<usize>,
    pub interval: Option<usize>,
    pub mode: RunMode,
}

impl DistillConfig {
    pub fn pdf_dir(&self) -> PathBuf {
        self.output_dir.join("pdfs")
    }

    pub fn knowledge_dir(&self) -> PathBuf {
        self.output_dir.join("knowledge_bases")
    }

    pub fn summaries_dir(&self) -> PathBuf {
        self.output_dir.join("summaries")
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub extract_model: String,
    pub summary_model: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub document: String,
    pub pages_processed: usize,
    pub pages_with_content: usize,
    pub knowledge_added: usize,
    pub total_knowledge: usize,
    pub summary_files: Vec<PathBuf>,
}
