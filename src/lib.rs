//! # Book Distiller Library
//!
//! A library for distilling page-oriented books into a growing knowledge base
//! and markdown summaries, using an OpenAI-compatible model for page analysis.
//! Supports local files, remote URLs, resumable runs and interval summaries.
//!
//! ## Example Usage
//!
//! ```no_run
//! use book_distiller::{
//!     open_pages, DistillConfig, KnowledgeStore, ModelConfig, OpenAiAnalyzer,
//!     PipelineDriver, RunMode, SourceFetcher, SummaryWriter,
//! };
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DistillConfig {
//!         source: "meditations.pdf".to_string(),
//!         output_dir: PathBuf::from("./book_analysis"),
//!         max_pages: Some(60),
//!         interval: Some(20),
//!         mode: RunMode::Resume,
//!     };
//!
//!     for dir in [config.pdf_dir(), config.knowledge_dir(), config.summaries_dir()] {
//!         tokio::fs::create_dir_all(&dir).await?;
//!     }
//!
//!     // Stage the book and open it page by page
//!     let (staged, document) = SourceFetcher::stage(&config.source, &config.pdf_dir()).await?;
//!     let pages = open_pages(&staged).await?;
//!
//!     // Wire up the pipeline
//!     let analyzer = OpenAiAnalyzer::new(ModelConfig {
//!         base_url: "https://api.openai.com".to_string(),
//!         api_key: std::env::var("OPENAI_API_KEY")?,
//!         extract_model: "gpt-4o-mini".to_string(),
//!         summary_model: "gpt-4o-mini".to_string(),
//!     });
//!     let store = KnowledgeStore::new(config.knowledge_dir());
//!     let writer = SummaryWriter::new(config.summaries_dir());
//!     let driver = PipelineDriver::new(&store, &writer, &analyzer, &analyzer);
//!
//!     let report = driver.run(&document, pages.as_ref(), &config).await?;
//!
//!     println!("Collected {} knowledge points", report.total_knowledge);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use error::{BookDistillerError, Result};
pub use services::{
    open_pages, KnowledgeStore, KnowledgeSummarizer, OpenAiAnalyzer, PageAnalyzer, PageSource,
    PdfPages, PipelineDriver, SourceFetcher, SummaryWriter, TextPages,
};
pub use types::{
    DistillConfig, KnowledgeBase, ModelConfig, PageKnowledge, RunMode, RunReport, SummaryKind,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
