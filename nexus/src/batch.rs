//! Batch orchestration: iterate a folder of requirement documents, run the
//! pipeline per file, and accumulate a per-file summary.
//!
//! No failure aborts a batch. Extraction, remote-call, and parse failures
//! each degrade to zero records for that file, logged and noted in the
//! summary, and processing continues with the next file.

use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::path::Path;

use crate::chunker::{DEFAULT_MAX_CHUNK_SIZE, split_into_chunks};
use crate::extract::{extract_text, find_documents};
use crate::llm::LlmClient;
use crate::output::{write_docx, write_matrix_csv};
use crate::parse::parse_test_cases;
use crate::prompt::{
    PromptPlan, STORY_BATCH_SIZE, StoryKind, analysis_prompt, plan_story_prompt,
    story_batch_prompt, test_matrix_prompt,
};
use crate::record::RunSummary;

/// Progress callback: (files done, files total).
pub type Progress<'a> = &'a mut dyn FnMut(usize, usize);

/// Inputs for a test-matrix batch run.
pub struct MatrixOptions<'a> {
    pub input_dir: &'a Path,
    pub output_dir: &'a Path,
    pub context: &'a str,
    pub flow: &'a str,
    pub recursive: bool,
}

/// Inputs for a stories batch run.
pub struct StoriesOptions<'a> {
    pub input_dir: &'a Path,
    pub output_dir: &'a Path,
    pub role: &'a str,
    pub kind: StoryKind,
    pub recursive: bool,
}

/// Generate one test-case matrix CSV per requirement document.
pub async fn run_matrix(
    opts: &MatrixOptions<'_>,
    llm: &LlmClient,
    progress: Progress<'_>,
) -> Result<RunSummary> {
    let files = find_documents(opts.input_dir, opts.recursive)
        .with_context(|| format!("Failed to list {}", opts.input_dir.display()))?;

    let mut summary = RunSummary::default();
    if files.is_empty() {
        summary.push(format!(
            "No .docx or .pdf files found in {}",
            opts.input_dir.display()
        ));
        return Ok(summary);
    }

    let total = files.len();
    progress(0, total);

    for (i, path) in files.iter().enumerate() {
        let name = display_name(path);
        log::info!("Processing {}", name);

        match process_matrix_file(opts, llm, path).await {
            Ok(count) => {
                summary.files_processed += 1;
                summary.push(format!("{} -> {} test cases", name, count));
            }
            Err(e) => {
                log::warn!("{}: {:#}", name, e);
                summary.files_failed += 1;
                summary.push(format!("{} -> 0 test cases ({})", name, root_cause(&e)));
            }
        }

        progress(i + 1, total);
    }

    Ok(summary)
}

/// Run the matrix pipeline for one file; returns the record count.
async fn process_matrix_file(
    opts: &MatrixOptions<'_>,
    llm: &LlmClient,
    path: &Path,
) -> Result<usize> {
    let text = extract_text(path)?;
    if text.trim().is_empty() {
        bail!("empty document");
    }

    let prompt = test_matrix_prompt(&text, opts.context, opts.flow);
    let reply = llm.complete(&prompt, None).await?;
    let cases = parse_test_cases(&reply).context("unparseable model reply")?;

    if !cases.is_empty() {
        let out_path = opts
            .output_dir
            .join(format!("{}_matrix.csv", file_stem(path)));
        write_matrix_csv(&out_path, &cases)?;
    }
    Ok(cases.len())
}

/// Generate one user-story DOCX report per requirement document.
pub async fn run_stories(
    opts: &StoriesOptions<'_>,
    llm: &LlmClient,
    progress: Progress<'_>,
) -> Result<RunSummary> {
    let files = find_documents(opts.input_dir, opts.recursive)
        .with_context(|| format!("Failed to list {}", opts.input_dir.display()))?;

    let mut summary = RunSummary::default();
    if files.is_empty() {
        summary.push(format!(
            "No .docx or .pdf files found in {}",
            opts.input_dir.display()
        ));
        return Ok(summary);
    }

    let total = files.len();
    progress(0, total);

    for (i, path) in files.iter().enumerate() {
        let name = display_name(path);
        log::info!("Processing {}", name);

        match process_stories_file(opts, llm, path).await {
            Ok(out_name) => {
                summary.files_processed += 1;
                summary.push(format!("{} -> {}", name, out_name));
            }
            Err(e) => {
                log::warn!("{}: {:#}", name, e);
                summary.files_failed += 1;
                summary.push(format!("{} -> no report ({})", name, root_cause(&e)));
            }
        }

        progress(i + 1, total);
    }

    Ok(summary)
}

/// Run the stories pipeline for one file; returns the output file name.
async fn process_stories_file(
    opts: &StoriesOptions<'_>,
    llm: &LlmClient,
    path: &Path,
) -> Result<String> {
    let text = extract_text(path)?;
    if text.trim().is_empty() {
        bail!("empty document");
    }
    log::info!("{}: {} characters extracted", display_name(path), text.len());

    let report = match plan_story_prompt(&text, opts.role, opts.kind) {
        PromptPlan::Single(prompt) => llm.complete(&prompt, None).await?,
        PromptPlan::Phased => generate_phased_report(llm, &text, opts.role).await?,
    };

    if report.trim().is_empty() {
        bail!("model returned no content");
    }

    let out_name = format!("{}_stories.docx", file_stem(path));
    write_docx(&opts.output_dir.join(&out_name), &report)?;
    Ok(out_name)
}

/// Two-phase flow for large documents: identify functionalities per chunk,
/// then generate stories in batches over the merged list.
async fn generate_phased_report(llm: &LlmClient, text: &str, role: &str) -> Result<String> {
    let chunks = split_into_chunks(text, DEFAULT_MAX_CHUNK_SIZE);
    log::info!(
        "Large document: analysing {} chunk(s) before generation",
        chunks.len()
    );

    // Phase 1: collect the numbered functionality list across chunks
    let mut functionalities = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let reply = llm
            .complete(&analysis_prompt(chunk, role), None)
            .await
            .with_context(|| format!("analysis of chunk {} failed", i + 1))?;
        functionalities.extend(numbered_lines(&reply));
    }

    if functionalities.is_empty() {
        bail!("no functionalities identified");
    }
    log::info!("Identified {} functionalities", functionalities.len());

    // Phase 2: stories in batches; a failed batch degrades, it does not abort
    let total_batches = functionalities.len().div_ceil(STORY_BATCH_SIZE);
    let mut stories = Vec::new();
    for batch_num in 0..total_batches {
        let start = batch_num * STORY_BATCH_SIZE;
        let prompt = story_batch_prompt(&functionalities, text, role, start);
        match llm.complete(&prompt, None).await {
            Ok(reply) => stories.push(reply),
            Err(e) => log::warn!(
                "Story batch {}/{} failed: {:#}",
                batch_num + 1,
                total_batches,
                e
            ),
        }
    }

    Ok(assemble_report(&functionalities, &stories, total_batches))
}

/// Extract "1. ..." style lines from an analysis reply.
fn numbered_lines(reply: &str) -> Vec<String> {
    static NUMBERED: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    let re = NUMBERED
        .get_or_init(|| regex::Regex::new(r"^\d+\.").expect("numbered line regex should compile"));

    reply
        .lines()
        .map(str::trim)
        .filter(|line| re.is_match(line))
        .map(str::to_string)
        .collect()
}

fn assemble_report(functionalities: &[String], stories: &[String], batches: usize) -> String {
    let rule = "=".repeat(70);
    format!(
        "COMPLETE ANALYSIS - {} FUNCTIONALITIES IDENTIFIED\n{rule}\n\n\
         IDENTIFIED FUNCTIONALITIES:\n{}\n\n\
         {rule}\nDETAILED USER STORIES\n{rule}\n\n\
         {}\n\n\
         {rule}\nFINAL SUMMARY\n{rule}\n\
         Functionalities processed: {}\n\
         Story batches generated: {} of {}",
        functionalities.len(),
        functionalities.join("\n"),
        stories.join("\n\n"),
        functionalities.len(),
        stories.len(),
        batches,
    )
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("output")
        .to_string()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("unknown")
        .to_string()
}

fn root_cause(e: &anyhow::Error) -> String {
    e.root_cause().to_string()
}
