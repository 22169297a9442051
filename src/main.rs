// src/main.rs
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_importer::api::{NotionHttpClient, NotionRepository};
use notion_importer::cache::DocumentCache;
use notion_importer::config::{Command, CommandLineInput, ImporterConfig};
use notion_importer::importer::DocumentImporter;
use notion_importer::server;
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion_importer.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}"
    } else {
        "{d(%H:%M:%S)} [{l}] {m}{n}"
    };

    // stdout is reserved for the imported record.
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

async fn build_importer(config: &ImporterConfig) -> anyhow::Result<Arc<DocumentImporter>> {
    let client: Arc<dyn NotionRepository> = Arc::new(NotionHttpClient::new(&config.api_key)?);
    let cache = Arc::new(DocumentCache::open(&config.cache_dir).await?);
    log::info!("Using cache directory {}", cache.cache_dir().display());
    Ok(Arc::new(DocumentImporter::new(client, cache, config.fetch)))
}

async fn run(cli: CommandLineInput) -> anyhow::Result<()> {
    let config = ImporterConfig::resolve(&cli)?;
    let importer = build_importer(&config).await?;

    match cli.command {
        Command::Serve { .. } => server::serve(importer, &config.bind_addr).await,
        Command::Import(args) => {
            let record = importer.import(&args.url, args.options()).await?;
            let json = serde_json::to_string_pretty(&record)?;
            match &args.output {
                Some(path) => {
                    fs::write(path, json)?;
                    eprintln!("✓ Saved '{}' to {}", record.title, path.display());
                }
                None => println!("{}", json),
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    run(cli).await?;

    Ok(())
}
