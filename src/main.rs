mod cli;
mod error;
mod services;
mod types;

use clap::Parser;
use cli::{Cli, Commands, RunArgs, StatusArgs, SummarizeArgs};
use error::Result;
use services::{
    open_pages, KnowledgeStore, OpenAiAnalyzer, PipelineDriver, SourceFetcher, SummaryWriter,
};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber;
use types::{DistillConfig, RunMode, SummaryKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Run(args) => handle_run_command(args, &cli.output).await,
        Commands::Summarize(args) => handle_summarize_command(args, &cli.output).await,
        Commands::Status(args) => handle_status_command(args, &cli.output).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_run_command(args: &RunArgs, output_dir: &PathBuf) -> Result<()> {
    let config = DistillConfig {
        source: args.source.clone(),
        output_dir: output_dir.clone(),
        max_pages: args.max_pages,
        interval: args.interval,
        mode: if args.restart {
            RunMode::Restart
        } else {
            RunMode::Resume
        },
    };

    setup_directories(&config).await?;

    let (staged, document) = SourceFetcher::stage(&config.source, &config.pdf_dir()).await?;
    let pages = open_pages(&staged).await?;
    info!("'{}' has {} pages", document, pages.page_count());

    let analyzer = OpenAiAnalyzer::new(args.model.to_config());
    let store = KnowledgeStore::new(config.knowledge_dir());
    let writer = SummaryWriter::new(config.summaries_dir());
    let driver = PipelineDriver::new(&store, &writer, &analyzer, &analyzer);

    let report = driver.run(&document, pages.as_ref(), &config).await?;

    info!("Analysis of '{}' complete:", report.document);
    info!("  Pages processed: {}", report.pages_processed);
    info!("  Pages with content: {}", report.pages_with_content);
    info!(
        "  Knowledge points added: {} ({} total)",
        report.knowledge_added, report.total_knowledge
    );
    for file in &report.summary_files {
        info!("  - {}", file.display());
    }

    Ok(())
}

async fn handle_summarize_command(args: &SummarizeArgs, output_dir: &PathBuf) -> Result<()> {
    info!("Summarizing existing knowledge base for '{}'", args.document);

    let analyzer = OpenAiAnalyzer::new(args.model.to_config());
    let store = KnowledgeStore::new(output_dir.join("knowledge_bases"));
    let writer = SummaryWriter::new(output_dir.join("summaries"));
    let driver = PipelineDriver::new(&store, &writer, &analyzer, &analyzer);

    match driver.summarize_existing(&args.document).await? {
        Some(path) => info!("Summary written to {}", path.display()),
        None => info!("Nothing to summarize for '{}'", args.document),
    }

    Ok(())
}

async fn handle_status_command(args: &StatusArgs, output_dir: &PathBuf) -> Result<()> {
    let store = KnowledgeStore::new(output_dir.join("knowledge_bases"));
    let writer = SummaryWriter::new(output_dir.join("summaries"));

    let base = store.load(&args.document).await?;
    let intervals = writer
        .count_existing(&args.document, SummaryKind::Interval)
        .await?;
    let finals = writer
        .count_existing(&args.document, SummaryKind::Final)
        .await?;

    println!("\n=== Status for '{}' ===", args.document);
    println!("Pages processed: {}", base.pages_done);
    println!("Knowledge points: {}", base.len());
    println!("Interval summaries: {}", intervals);
    println!("Final summaries: {}", finals);

    if args.detailed && !base.is_empty() {
        println!("\nMost recent knowledge points:");
        for point in base.knowledge.iter().skip(base.len().saturating_sub(10)) {
            println!("  - {}", point);
        }
    }

    Ok(())
}

async fn setup_directories(config: &DistillConfig) -> Result<()> {
    for dir in [
        config.pdf_dir(),
        config.knowledge_dir(),
        config.summaries_dir(),
    ] {
        tokio::fs::create_dir_all(&dir).await?;
    }
    Ok(())
}
