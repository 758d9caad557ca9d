use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "book-distill")]
#[command(about = "A CLI tool for distilling page-oriented books into knowledge bases and summaries")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis directory holding pdfs, knowledge bases and summaries
    #[arg(short, long, global = true, default_value = "./book_analysis")]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a book page by page, extracting knowledge and writing summaries
    Run(RunArgs),

    /// Produce a final summary from an existing knowledge base
    Summarize(SummarizeArgs),

    /// Show the analysis state of a document
    Status(StatusArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Book source (file path or URL)
    #[arg(required = true, value_name = "SOURCE")]
    pub source: String,

    /// Maximum number of pages to process
    #[arg(short = 'n', long, value_name = "PAGES")]
    pub max_pages: Option<usize>,

    /// Generate an interval summary every N pages (0 disables)
    #[arg(short, long, value_name = "PAGES")]
    pub interval: Option<usize>,

    /// Discard the existing knowledge base and start over
    #[arg(long)]
    pub restart: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args)]
pub struct SummarizeArgs {
    /// Document identifier (the staged file's stem, e.g. "meditations")
    #[arg(required = true, value_name = "DOCUMENT")]
    pub document: String,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Document identifier (the staged file's stem, e.g. "meditations")
    #[arg(required = true, value_name = "DOCUMENT")]
    pub document: String,

    /// Show the most recent knowledge points
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args)]
pub struct ModelArgs {
    /// API key for the model endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com")]
    pub base_url: String,

    /// Model used for per-page knowledge extraction
    #[arg(long, default_value = "gpt-4o-mini")]
    pub extract_model: String,

    /// Model used for summaries
    #[arg(long, default_value = "gpt-4o-mini")]
    pub summary_model: String,
}

impl ModelArgs {
    pub fn to_config(&self) -> crate::types::ModelConfig {
        crate::types::ModelConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            extract_model: self.extract_model.clone(),
            summary_model: self.summary_model.clone(),
        }
    }
}
