//! nexus - generate QA artifacts from requirement documents using AI

mod batch;
mod chat;
mod chunker;
mod extract;
mod llm;
mod output;
mod parse;
mod prompt;
mod record;

use anyhow::{Context, Result};
use batch::{MatrixOptions, StoriesOptions};
use clap::{Parser, Subcommand};
use genai_client::{Config, ModelPreset};
use indicatif::{ProgressBar, ProgressStyle};
use llm::LlmClient;
use prompt::StoryKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nexus",
    about = "Generate QA artifacts from requirement documents using AI",
    long_about = "Turns requirement documents (.docx/.pdf) into test-case matrices and \
                  user stories by running them through a generative-language model, and \
                  answers Jira/QA questions grounded on a knowledge deck"
)]
#[command(version)]
struct Args {
    /// Model preset to use (overrides default from config)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Enable debug output
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate test-case matrix CSVs from a folder of requirement documents
    Matrix {
        /// Folder containing .docx/.pdf requirement documents
        input: PathBuf,

        /// Folder to write the generated CSV matrices to
        output: PathBuf,

        /// General context for the requirements (e.g. the module they belong to)
        #[arg(long, default_value = "")]
        context: String,

        /// Process flow description, one numbered step per line
        #[arg(long, default_value = "")]
        flow: String,

        /// Search subdirectories recursively
        #[arg(short, long)]
        recursive: bool,
    },

    /// Generate user-story DOCX reports from a folder of requirement documents
    Stories {
        /// Folder containing .docx/.pdf requirement documents
        input: PathBuf,

        /// Folder to write the generated reports to
        output: PathBuf,

        /// Role the stories are written for
        #[arg(long, default_value = "User")]
        role: String,

        /// Artifact type to generate
        #[arg(long, value_enum, default_value_t = StoryKind::Functional)]
        kind: StoryKind,

        /// Search subdirectories recursively
        #[arg(short, long)]
        recursive: bool,
    },

    /// Answer Jira/QA questions grounded on a .pptx knowledge deck
    Chat {
        /// Path to the knowledge deck (.pptx)
        #[arg(long)]
        deck: PathBuf,

        /// Question to answer; omit for an interactive session
        question: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Set the default model preset
    SetDefault {
        /// Name of the preset to use as default
        preset: String,
    },
    /// List available presets
    List,
    /// Show current configuration
    Show,
    /// Add a new preset
    AddPreset {
        /// Preset name
        name: String,
        /// Provider (gemini)
        #[arg(short, long)]
        provider: String,
        /// Model identifier
        #[arg(short = 'M', long)]
        model: String,
    },
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::SetDefault { preset } => {
            let mut config = Config::load()?;
            // Verify preset exists
            config.get_preset(preset)?;
            config.defaults.insert("nexus".to_string(), preset.clone());
            config.save()?;
            println!("Default preset for nexus set to: {}", preset);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let current_default = config.get_default_for_program("nexus");
            println!("Available presets:");
            for (name, preset) in &config.presets {
                let default_marker = if name == current_default {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "  {} - {} / {}{}",
                    name, preset.provider, preset.model, default_marker
                );
            }
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            let path = Config::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            println!("{:#?}", config);
        }
        ConfigAction::AddPreset {
            name,
            provider,
            model,
        } => {
            let mut config = Config::load()?;
            config.presets.insert(
                name.clone(),
                ModelPreset {
                    provider: provider.clone(),
                    model: model.clone(),
                },
            );
            config.save()?;
            println!("Added preset: {}", name);
        }
    }
    Ok(())
}

/// Build the batch progress bar and a callback that drives it.
fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} files")
            .context("Invalid progress bar template")?,
    );
    Ok(bar)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Config subcommands run before any provider initialization
    if let Commands::Config { action } = &args.command {
        return handle_config_command(action);
    }

    let llm = LlmClient::new(args.model.as_deref(), args.debug)?;

    match &args.command {
        Commands::Matrix {
            input,
            output,
            context,
            flow,
            recursive,
        } => {
            std::fs::create_dir_all(output)
                .with_context(|| format!("Cannot create output folder {}", output.display()))?;
            let opts = MatrixOptions {
                input_dir: input,
                output_dir: output,
                context,
                flow,
                recursive: *recursive,
            };

            let bar = progress_bar()?;
            let mut on_progress = |done: usize, total: usize| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            };
            let summary = batch::run_matrix(&opts, &llm, &mut on_progress).await?;
            bar.finish_and_clear();
            println!("{}", summary.render());
        }

        Commands::Stories {
            input,
            output,
            role,
            kind,
            recursive,
        } => {
            std::fs::create_dir_all(output)
                .with_context(|| format!("Cannot create output folder {}", output.display()))?;
            let opts = StoriesOptions {
                input_dir: input,
                output_dir: output,
                role,
                kind: *kind,
                recursive: *recursive,
            };

            let bar = progress_bar()?;
            let mut on_progress = |done: usize, total: usize| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            };
            let summary = batch::run_stories(&opts, &llm, &mut on_progress).await?;
            bar.finish_and_clear();
            println!("{}", summary.render());
        }

        Commands::Chat { deck, question } => {
            let deck = chat::load_deck(deck)?;
            match question {
                Some(question) => {
                    let answer = chat::ask(&llm, &deck, question).await?;
                    println!("{}", answer.trim());
                }
                None => chat::interactive(&llm, &deck).await?,
            }
        }

        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}
