// PageMood entry point
// Wires the classifier, the page source, the cache and the display together.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagemood_core::actors::display::{DisplayHandle, PopupView};
use pagemood_core::actors::messages::ExtensionMessage;
use pagemood_core::actors::orchestrator::OrchestratorHandle;
use pagemood_core::cache::AnalysisCache;
use pagemood_core::config::AppConfig;
use pagemood_core::database::{self, SqliteCache};
use pagemood_core::fs_manager::PortablePathManager;
use pagemood_core::page_extract::FilePageSource;
use pagemood_core::telemetry::init_tracing;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "pagemood")]
#[command(about = "Emotional tone analysis of page text", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a page file (.html, .htm, .txt, .md)
    Analyze {
        /// Path of the page to analyze
        page: String,

        /// Print the analysisComplete message as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the last stored analysis
    Last {
        #[arg(long)]
        json: bool,
    },
    /// Print the active lexicon as JSON
    Lexicon,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Invalid configuration")?;
    init_tracing(config.log_format);

    match cli.command {
        Commands::Analyze { page, json } => {
            let cache = open_cache(&config).await?;
            analyze(&config, cache, &page, json).await
        }
        Commands::Last { json } => {
            let cache = open_cache(&config).await?;
            show_last(cache, json).await
        }
        Commands::Lexicon => {
            let lexicon = config.lexicon()?;
            println!("{}", serde_json::to_string_pretty(&lexicon)?);
            Ok(())
        }
    }
}

async fn open_cache(config: &AppConfig) -> Result<Arc<dyn AnalysisCache>> {
    let paths = PortablePathManager::from_home(config.home.as_deref());
    paths
        .init()
        .context("Failed to initialize the data directory")?;
    let pool = database::init_db(&paths.db_path())
        .await
        .context("Failed to initialize database")?;
    Ok(Arc::new(SqliteCache::new(pool)))
}

async fn analyze(
    config: &AppConfig,
    cache: Arc<dyn AnalysisCache>,
    page: &str,
    json: bool,
) -> Result<()> {
    let classifier = config.build_classifier()?;
    let pages = Arc::new(FilePageSource::new());
    let orchestrator =
        OrchestratorHandle::with_timeout(classifier, pages, cache.clone(), config.request_timeout());

    let mut display = DisplayHandle::new(orchestrator.clone(), cache).await;

    if let Err(e) = display.click_analyze(page).await {
        // The view already shows the error
        print!("{}", display.render().await);
        return Err(e).context(format!("Analysis of {} failed", page));
    }

    let record = display.next_analysis(config.request_timeout()).await?;
    info!(tone = %record.emotional_tone, "Analysis delivered");

    if json {
        let message = ExtensionMessage::AnalysisComplete(record);
        println!("{}", serde_json::to_string_pretty(&message)?);
    } else {
        print!("{}", display.render().await);
    }

    orchestrator.shutdown().await?;
    Ok(())
}

async fn show_last(cache: Arc<dyn AnalysisCache>, json: bool) -> Result<()> {
    let Some(record) = cache.get().await? else {
        println!("No analysis stored yet");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        let mut view = PopupView::new();
        view.update(&record);
        print!("{}", view.render());
    }
    Ok(())
}
