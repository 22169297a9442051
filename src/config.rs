// src/config.rs
use crate::api::FetchSettings;
use crate::cache::DocumentCache;
use crate::constants::DEFAULT_BIND_ADDRESS;
use crate::error::AppError;
use crate::importer::ImportOptions;
use crate::model::OutputFormat;
use crate::types::ApiKey;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Directory holding cached documents (overrides NOTION_IMPORTER_CACHE_DIR)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (defaults to 0.0.0.0:$PORT, or 0.0.0.0:3000)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Import one page and print the JSON record
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Notion page URL or ID (e.g., "https://www.notion.so/...")
    pub url: String,

    /// Which outputs to include: all, markdown, html or json
    #[arg(short, long, default_value = "all")]
    pub format: OutputFormat,

    /// Skip the document cache entirely
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Fetch only top-level blocks; nested content is fetched while rendering
    #[arg(long, default_value_t = false)]
    pub no_children: bool,

    /// Write the record to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ImportArgs {
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            format: self.format,
            use_cache: !self.no_cache,
            include_children: !self.no_children,
        }
    }
}

/// Resolved configuration, validated and ready to build an importer.
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    pub api_key: ApiKey,
    pub cache_dir: PathBuf,
    pub bind_addr: String,
    pub fetch: FetchSettings,
}

impl ImporterConfig {
    /// Resolves configuration from CLI input and the process environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves configuration with `env` standing in for the environment.
    pub fn resolve_with(
        cli: &CommandLineInput,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let api_key_str = env("NOTION_API_KEY").ok_or_else(|| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;
        let api_key = ApiKey::new(api_key_str)?;

        let cache_dir = cli
            .cache_dir
            .clone()
            .or_else(|| env("NOTION_IMPORTER_CACHE_DIR").map(PathBuf::from))
            .unwrap_or_else(DocumentCache::default_cache_dir);

        let explicit_bind = match &cli.command {
            Command::Serve { bind } => bind.clone(),
            Command::Import(_) => None,
        };
        let bind_addr = match explicit_bind {
            Some(bind) => bind,
            None => match env("PORT") {
                Some(port) => {
                    let port: u16 = port.trim().parse().map_err(|_| {
                        AppError::MissingConfiguration(format!(
                            "PORT must be a port number, got '{}'",
                            port
                        ))
                    })?;
                    format!("0.0.0.0:{}", port)
                }
                None => DEFAULT_BIND_ADDRESS.to_string(),
            },
        };

        Ok(ImporterConfig {
            api_key,
            cache_dir,
            bind_addr,
            fetch: FetchSettings::default(),
        })
    }
}
