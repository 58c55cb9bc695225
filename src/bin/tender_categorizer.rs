//! Command line front end for the tender categorizer.
//!
//! Subcommands:
//! - `classify`: Categorize one tender
//! - `batch`: Categorize a JSON array of tenders
//! - `categories`: List the category set

use clap::{Parser, Subcommand};
use std::{collections::BTreeMap, path::PathBuf};
use tender_categorizer::prelude::*;

#[derive(Parser)]
#[command(name = "tender-categorizer")]
#[command(about = "Classify procurement tenders into a fixed category set")]
#[command(version)]
struct Cli {
    /// Use keyword matching only, even when GROQ_API_KEY is set
    #[arg(long, global = true)]
    no_remote: bool,

    /// Log at DEBUG
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Categorize a single tender and print the category label
    Classify {
        #[arg(long)]
        title: String,

        #[arg(long)]
        department: Option<String>,

        #[arg(long)]
        item_category: Option<String>,
    },

    /// Categorize tenders from a JSON file of `{id, title, department?, itemCategory?}`
    Batch {
        file: PathBuf,

        /// Items classified concurrently per chunk
        #[arg(long, default_value_t = 5)]
        chunk_size: usize,

        /// Pause between chunks, in milliseconds
        #[arg(long, default_value_t = 200)]
        chunk_delay_ms: u64,
    },

    /// Print every category label, one per line
    Categories,
}

impl Cli {
    fn classifier(&self) -> anyhow::Result<TenderClassifier> {
        let mut builder = if self.no_remote {
            TenderCategorizer::keyword_only()
        } else {
            TenderCategorizer::groq()
        }
        .logger_name("tender_categorizer_cli")
        .logging_enabled(!self.quiet);
        if self.verbose {
            builder = builder.log_level_debug();
        }
        if let Some(log_dir) = &self.log_dir {
            builder = builder.log_dir(log_dir.clone());
        }
        builder.init()
    }

    async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Command::Categories => {
                for category in Category::ALL {
                    println!("{category}");
                }
            }
            Command::Classify {
                title,
                department,
                item_category,
            } => {
                let classifier = self.classifier()?;
                let category = classifier
                    .classify(title, department.as_deref(), item_category.as_deref())
                    .await;
                println!("{category}");
            }
            Command::Batch {
                file,
                chunk_size,
                chunk_delay_ms,
            } => {
                let raw = tokio::fs::read_to_string(file)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
                let items: Vec<BatchItem> = serde_json::from_str(&raw)
                    .map_err(|e| anyhow::anyhow!("Invalid batch file {}: {e}", file.display()))?;

                let config = BatchConfig::new()
                    .with_chunk_size(*chunk_size)
                    .with_chunk_delay(std::time::Duration::from_millis(*chunk_delay_ms));
                let classifier = self.classifier()?;
                let results: BTreeMap<TenderId, Category> = classifier
                    .classify_batch(&items, &config)
                    .await
                    .into_iter()
                    .collect();
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Cli::parse().run().await
}
