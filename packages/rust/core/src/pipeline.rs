//! End-to-end `parse` pipeline: select files → parse → extract → build graph → assemble.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use edadoc_shared::{EdaDocError, ParseConfig, Result};

use crate::assembler::{self, AssembleConfig};
use crate::discovery::{self, FileFilter};
use crate::graph::{DocGraph, GraphBuilder};

/// Result of a documentation run.
#[derive(Debug)]
pub struct GenerateResult {
    pub out_dir: PathBuf,
    /// Number of XML files processed.
    pub source_count: usize,
    pub event_count: usize,
    pub service_count: usize,
    pub process_count: usize,
    /// Candidates whose key was already taken by an earlier event.
    pub duplicate_count: usize,
    /// Number of Markdown documents written.
    pub document_count: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a source file has been parsed and absorbed.
    fn file_parsed(&self, path: &Path, current: usize, total: usize);
    /// Called after a document has been written.
    fn document_written(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_parsed(&self, _path: &Path, _current: usize, _total: usize) {}
    fn document_written(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Run the full pipeline.
///
/// 1. Refuse to overwrite a non-empty output directory unless forced
/// 2. Select source files (explicit list, or discovery under the working dir)
/// 3. Parse and extract each file, folding candidates into one graph
/// 4. Render and write the documents
#[instrument(skip_all, fields(working_dir = %config.working_dir.display(), out_dir = %config.out_dir.display()))]
pub fn generate_docs(config: &ParseConfig, progress: &dyn ProgressReporter) -> Result<GenerateResult> {
    let start = Instant::now();

    ensure_out_dir_writable(&config.out_dir, config.force)?;

    progress.phase("Selecting XML files");
    let files = select_files(config)?;
    info!(files = files.len(), "starting documentation run");

    progress.phase("Parsing documentation");
    let (graph, duplicate_count) = build_graph(&files, progress)?;
    if graph.is_empty() {
        warn!(files = files.len(), "no event types found in the selected files");
    }

    progress.phase("Writing documents");
    let assemble_config = AssembleConfig {
        out_dir: config.out_dir.clone(),
        tool_version: config.tool_version.clone(),
        sources: files
            .iter()
            .map(|p| display_relative(p, &config.working_dir))
            .collect(),
    };
    let assembled = assembler::assemble(&assemble_config, &graph, progress)?;

    let result = GenerateResult {
        out_dir: assembled.out_dir,
        source_count: files.len(),
        event_count: graph.events.len(),
        service_count: graph.services.len(),
        process_count: graph.processes.len(),
        duplicate_count,
        document_count: assembled.manifest.documents.len(),
        elapsed: start.elapsed(),
    };

    info!(
        events = result.event_count,
        services = result.service_count,
        processes = result.process_count,
        duplicates = result.duplicate_count,
        "documentation run complete"
    );
    progress.done(&result);

    Ok(result)
}

/// Parse every file in order and fold its events into one graph.
///
/// Stops at the first file that cannot be read or is not well-formed XML.
/// Returns the graph and the number of duplicate candidates dropped.
pub fn build_graph(files: &[PathBuf], progress: &dyn ProgressReporter) -> Result<(DocGraph, usize)> {
    let mut builder = GraphBuilder::new();
    let total = files.len();

    for (i, path) in files.iter().enumerate() {
        let text = std::fs::read_to_string(path).map_err(|e| EdaDocError::io(path, e))?;
        let doc = edadoc_xmldoc::parse_document(path, &text)?;
        let candidates = edadoc_xmldoc::extract_events(&doc);
        let found = candidates.len();
        let inserted = builder.absorb_all(candidates);

        debug!(path = %path.display(), found, inserted, "file processed");
        progress.file_parsed(path, i + 1, total);
    }

    let duplicates = builder.duplicate_count();
    Ok((builder.finish(), duplicates))
}

/// Resolve the source files for a run, in processing order.
pub fn select_files(config: &ParseConfig) -> Result<Vec<PathBuf>> {
    let files = if config.files.is_empty() {
        let filter = FileFilter::new(&config.include_patterns, &config.exclude_patterns)?;
        discovery::discover_xml_files(&config.working_dir, &filter)?
    } else {
        for file in &config.files {
            if !file.is_file() {
                return Err(EdaDocError::validation(format!(
                    "selected file '{}' does not exist",
                    file.display()
                )));
            }
        }
        config.files.clone()
    };

    if files.is_empty() {
        return Err(EdaDocError::validation(format!(
            "no XML documentation files found under '{}'",
            config.working_dir.display()
        )));
    }

    Ok(files)
}

/// Fail when `out_dir` already holds files and `force` is not set.
pub fn ensure_out_dir_writable(out_dir: &Path, force: bool) -> Result<()> {
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(EdaDocError::validation(format!(
            "output path '{}' is not a directory",
            out_dir.display()
        )));
    }
    if force || !out_dir.is_dir() {
        return Ok(());
    }

    let mut entries = std::fs::read_dir(out_dir).map_err(|e| EdaDocError::io(out_dir, e))?;
    if entries.next().is_some() {
        return Err(EdaDocError::validation(format!(
            "output directory '{}' already contains files; pass --force to replace them",
            out_dir.display()
        )));
    }
    Ok(())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
