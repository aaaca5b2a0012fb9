//! CLI command definitions and handlers

use crate::extract::json_ld_blocks;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sdocheck_core::VerificationReport;
use sdocheck_engine::{Verifier, VerifierConfig};
use sdocheck_vocab::{bundled::reduced_vocabulary, SchemaVocabulary, Vocabulary};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "sdocheck")]
#[command(about = "Semantic verification of schema.org JSON-LD annotations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Verify a single annotation
    Validate {
        /// Annotation as JSON file
        #[arg(short, long, required_unless_present = "json", conflicts_with = "json")]
        file: Option<PathBuf>,

        /// Annotation as JSON string
        #[arg(short, long)]
        json: Option<String>,

        #[command(flatten)]
        options: VerifyOptions,
    },

    /// Verify every JSON-LD block embedded in an HTML page
    Extract {
        /// HTML page
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        options: VerifyOptions,
    },

    /// Show system information
    Info,
}

/// Options shared by the verifying commands
#[derive(clap::Args, Clone, Debug, Default, PartialEq)]
pub struct VerifyOptions {
    /// schema.org vocabulary document (JSON-LD); the bundled reduced vocabulary otherwise
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// Verifier configuration (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// Command execution result
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Execute CLI commands
#[derive(Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Validate { file, json, options } => self.execute_validate(file, json, options).await,
            Commands::Extract { file, options } => self.execute_extract(file, options).await,
            Commands::Info => self.execute_info(),
        }
    }

    async fn execute_validate(
        &mut self,
        file: Option<PathBuf>,
        json: Option<String>,
        options: VerifyOptions,
    ) -> Result<CommandResult> {
        let annotation = if let Some(file_path) = file {
            read_file(&file_path)?
        } else if let Some(json_str) = json {
            json_str
        } else {
            return Err(anyhow::anyhow!("Either --file or --json must be specified"));
        };

        let verifier = build_verifier(&options)?;
        let report = verifier.validate(annotation).await;
        println!("{}", render_report(&report, options.format)?);

        Ok(CommandResult {
            success: report.is_valid(),
            message: format!("Annotation is {}", report.verification_result()),
            data: Some(serde_json::to_value(&report)?),
        })
    }

    async fn execute_extract(&mut self, file: PathBuf, options: VerifyOptions) -> Result<CommandResult> {
        let html = read_file(&file)?;
        let blocks = json_ld_blocks(&html);
        info!("Found {} JSON-LD blocks in {}", blocks.len(), file.display());

        let verifier = build_verifier(&options)?;
        let reports = verifier.validate_all(blocks).await;
        println!("{}", render_reports(&reports, options.format)?);

        let invalid = reports.iter().filter(|r| !r.is_valid()).count();
        Ok(CommandResult {
            success: invalid == 0,
            message: format!("Verified {} annotations, {} invalid", reports.len(), invalid),
            data: Some(serde_json::to_value(&reports)?),
        })
    }

    fn execute_info(&self) -> Result<CommandResult> {
        let vocabulary = reduced_vocabulary().context("Failed to load the bundled vocabulary")?;
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "repository": env!("CARGO_PKG_REPOSITORY"),
            "bundled_vocabulary": {
                "classes": vocabulary.classes().len(),
                "enumerations": vocabulary.enumerations().len(),
                "data_types": vocabulary.data_types().len(),
                "properties": vocabulary.properties().len()
            },
            "defaults": VerifierConfig::default()
        });

        let result = serde_json::to_string_pretty(&info)?;
        println!("{}", result);

        Ok(CommandResult {
            success: true,
            message: "System information".to_string(),
            data: Some(info),
        })
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Verifier for the given vocabulary and configuration files
pub fn build_verifier(options: &VerifyOptions) -> Result<Verifier> {
    let vocabulary = match &options.vocabulary {
        Some(path) => SchemaVocabulary::from_path(path)
            .with_context(|| format!("Failed to load vocabulary from {}", path.display()))?,
        None => reduced_vocabulary().context("Failed to load the bundled vocabulary")?,
    };
    let config = match &options.config {
        Some(path) => VerifierConfig::from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => VerifierConfig::default(),
    };
    Ok(Verifier::with_config(Arc::new(vocabulary), config)?)
}

pub fn render_report(report: &VerificationReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => report.to_simple_string(),
        OutputFormat::Json => serde_json::to_string(report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(report)?,
    })
}

pub fn render_reports(reports: &[VerificationReport], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => {
            let mut output = format!("Found {} annotations\n", reports.len());
            for (i, report) in reports.iter().enumerate() {
                output.push_str(&format!("\n--- Annotation {} ---\n", i + 1));
                output.push_str(&report.to_simple_string());
            }
            output
        }
        OutputFormat::Json => serde_json::to_string(reports)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(reports)?,
    })
}
