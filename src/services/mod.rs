pub mod extractor;
pub mod pipeline;
pub mod reader;
pub mod store;
pub mod summary;

pub use extractor::{KnowledgeSummarizer, OpenAiAnalyzer, PageAnalyzer};
pub use pipeline::PipelineDriver;
pub use reader::{open_pages, PageSource, PdfPages, SourceFetcher, TextPages};
pub use store::KnowledgeStore;
pub use summary::SummaryWriter;
