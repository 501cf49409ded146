//! Output assembler.
//!
//! Renders every graph entity and writes the output tree to disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use edadoc_shared::{CURRENT_SCHEMA_VERSION, DocsManifest, DocumentMeta, EdaDocError, Result};

use crate::graph::DocGraph;
use crate::pipeline::ProgressReporter;
use crate::render;

const EVENTS_DIR: &str = "events";
const SERVICES_DIR: &str = "services";
const PROCESSES_DIR: &str = "processes";

/// Configuration for output assembly.
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    /// Output root directory.
    pub out_dir: PathBuf,
    /// Tool version string.
    pub tool_version: String,
    /// Source files the graph was built from, for the manifest.
    pub sources: Vec<String>,
}

/// Output from a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    pub out_dir: PathBuf,
    /// The manifest that was written.
    pub manifest: DocsManifest,
}

/// Write the full documentation tree.
///
/// Creates the following layout:
/// ```text
/// <out_dir>/
/// ├── manifest.json
/// ├── graph.json
/// ├── events/<Key>.md
/// ├── services/<Name>.md
/// └── processes/<Name>.md
/// ```
#[instrument(skip_all, fields(out_dir = %config.out_dir.display()))]
pub fn assemble(
    config: &AssembleConfig,
    graph: &DocGraph,
    progress: &dyn ProgressReporter,
) -> Result<AssembleResult> {
    let out_dir = &config.out_dir;
    for dir in [EVENTS_DIR, SERVICES_DIR, PROCESSES_DIR] {
        let path = out_dir.join(dir);
        std::fs::create_dir_all(&path).map_err(|e| EdaDocError::io(&path, e))?;
    }

    let mut paths = DocumentPaths::default();
    let mut pending: Vec<(String, String)> =
        Vec::with_capacity(graph.events.len() + graph.services.len() + graph.processes.len());
    for event in &graph.events {
        pending.push((paths.claim(EVENTS_DIR, &event.key), render::render_event(event)));
    }
    for service in &graph.services {
        pending.push((
            paths.claim(SERVICES_DIR, &service.name),
            render::render_service(service),
        ));
    }
    for process in &graph.processes {
        pending.push((
            paths.claim(PROCESSES_DIR, &process.name),
            render::render_process(process),
        ));
    }

    let total = pending.len();
    let mut documents = Vec::with_capacity(total);
    for (i, (rel_path, content)) in pending.iter().enumerate() {
        write_atomic(&out_dir.join(rel_path), content)?;
        progress.document_written(rel_path, i + 1, total);
        documents.push(DocumentMeta {
            path: rel_path.clone(),
            sha256: sha256_hex(content),
            size_bytes: content.len(),
        });
    }

    write_json(&out_dir.join("graph.json"), graph)?;

    let manifest = DocsManifest {
        schema_version: CURRENT_SCHEMA_VERSION,
        tool_version: config.tool_version.clone(),
        generated_at: Utc::now(),
        sources: config.sources.clone(),
        event_count: graph.events.len(),
        service_count: graph.services.len(),
        process_count: graph.processes.len(),
        documents,
    };
    write_json(&out_dir.join("manifest.json"), &manifest)?;

    info!(documents = total, "documentation assembly complete");

    Ok(AssembleResult {
        out_dir: out_dir.clone(),
        manifest,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `name` with characters that are unsafe in file names replaced.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Hands out one distinct document path per entity.
///
/// Two names can sanitize to the same stem (`Orders/Api` and `Orders_Api`).
/// Later claims get a numeric suffix. Paths compare case-insensitively.
#[derive(Debug, Default)]
struct DocumentPaths {
    taken: HashSet<String>,
}

impl DocumentPaths {
    fn claim(&mut self, dir: &str, name: &str) -> String {
        let stem = file_stem(name);
        let mut path = format!("{dir}/{stem}.md");
        let mut n = 2;
        while !self.taken.insert(path.to_lowercase()) {
            path = format!("{dir}/{stem}-{n}.md");
            n += 1;
        }
        if n > 2 {
            warn!(name, path = %path, "document name collides after sanitizing, using suffixed path");
        }
        path
    }
}

/// Write to a temp file next to `target`, then rename over it.
fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| EdaDocError::io(&temp, e))?;
    std::fs::rename(&temp, target).map_err(|e| EdaDocError::io(target, e))?;

    debug!(path = %target.display(), size = content.len(), "wrote document");
    Ok(())
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Write a JSON file (pretty-printed).
fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| EdaDocError::Render(format!("JSON serialization failed: {e}")))?;
    write_atomic(path, &json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use edadoc_shared::{Event, Process, Service};

    use super::*;
    use crate::pipeline::SilentProgress;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "edadoc-assembler-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_graph() -> DocGraph {
        let mut event = Event::new("Shop.OrderPlacedEvent");
        event.producers = vec!["Checkout".into()];
        event.processes = vec!["Order/Fulfilment".into()];

        let mut service = Service::new("Checkout");
        service.add_producing_event("OrderPlacedEvent");

        let mut process = Process::new("Order/Fulfilment");
        process.add_event_data(&event, "1");

        DocGraph {
            events: vec![event],
            services: vec![service],
            processes: vec![process],
        }
    }

    fn make_config(out_dir: &Path) -> AssembleConfig {
        AssembleConfig {
            out_dir: out_dir.to_path_buf(),
            tool_version: "0.1.0-test".into(),
            sources: vec!["Shop.xml".into()],
        }
    }

    #[test]
    fn assemble_writes_one_document_per_entity() {
        let tmp = temp_dir();
        let result = assemble(&make_config(&tmp), &make_graph(), &SilentProgress).unwrap();

        assert!(tmp.join("events/Shop.OrderPlacedEvent.md").exists());
        assert!(tmp.join("services/Checkout.md").exists());
        assert!(tmp.join("processes/Order_Fulfilment.md").exists());
        assert_eq!(result.manifest.documents.len(), 3);

        let content = std::fs::read_to_string(tmp.join("services/Checkout.md")).unwrap();
        assert!(content.contains("- producing events:\n  - OrderPlacedEvent"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn assemble_writes_manifest_with_checksums() {
        let tmp = temp_dir();
        assemble(&make_config(&tmp), &make_graph(), &SilentProgress).unwrap();

        let manifest: DocsManifest =
            serde_json::from_str(&std::fs::read_to_string(tmp.join("manifest.json")).unwrap())
                .unwrap();
        assert_eq!(manifest.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(manifest.sources, vec!["Shop.xml"]);
        assert_eq!(manifest.event_count, 1);
        assert_eq!(manifest.service_count, 1);
        assert_eq!(manifest.process_count, 1);

        for doc in &manifest.documents {
            let content = std::fs::read_to_string(tmp.join(&doc.path)).unwrap();
            assert_eq!(doc.sha256, sha256_hex(&content));
            assert_eq!(doc.sha256.len(), 64);
            assert_eq!(doc.size_bytes, content.len());
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn assemble_writes_graph_json() {
        let tmp = temp_dir();
        assemble(&make_config(&tmp), &make_graph(), &SilentProgress).unwrap();

        let graph: DocGraph =
            serde_json::from_str(&std::fs::read_to_string(tmp.join("graph.json")).unwrap())
                .unwrap();
        assert_eq!(graph.events[0].key, "Shop.OrderPlacedEvent");
        assert_eq!(graph.processes[0].events[0].order, "1");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn assemble_replaces_existing_documents_without_temp_files() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        std::fs::create_dir_all(tmp.join("services")).unwrap();
        std::fs::write(tmp.join("services/Checkout.md"), "stale").unwrap();

        assemble(&config, &make_graph(), &SilentProgress).unwrap();
        assemble(&config, &make_graph(), &SilentProgress).unwrap();

        let content = std::fs::read_to_string(tmp.join("services/Checkout.md")).unwrap();
        assert!(content.starts_with("---\n- name: Checkout"));

        for dir in ["", "events", "services", "processes"] {
            for entry in std::fs::read_dir(tmp.join(dir)).unwrap() {
                let name = entry.unwrap().file_name().to_string_lossy().to_string();
                assert!(!name.ends_with(".tmp"), "temp file left behind: {name}");
            }
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn document_paths_are_file_system_safe() {
        let mut paths = DocumentPaths::default();
        assert_eq!(paths.claim("events", "Ns.AEvent"), "events/Ns.AEvent.md");
        assert_eq!(paths.claim("processes", "A/B: C?"), "processes/A_B_ C_.md");
    }

    #[test]
    fn document_paths_disambiguate_colliding_names() {
        let mut paths = DocumentPaths::default();
        assert_eq!(paths.claim("services", "Orders/Api"), "services/Orders_Api.md");
        assert_eq!(paths.claim("services", "Orders_Api"), "services/Orders_Api-2.md");
        assert_eq!(paths.claim("services", "orders_api"), "services/orders_api-3.md");
        assert_eq!(paths.claim("processes", "Orders_Api"), "processes/Orders_Api.md");
    }

    #[test]
    fn colliding_services_get_separate_documents() {
        let tmp = temp_dir();
        let mut slash = Service::new("Orders/Api");
        slash.add_producing_event("AEvent");
        let mut underscore = Service::new("Orders_Api");
        underscore.add_producing_event("BEvent");
        let graph = DocGraph {
            events: Vec::new(),
            services: vec![slash, underscore],
            processes: Vec::new(),
        };

        let result = assemble(&make_config(&tmp), &graph, &SilentProgress).unwrap();

        let listed: Vec<&str> = result.manifest.documents.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(listed, vec!["services/Orders_Api.md", "services/Orders_Api-2.md"]);

        let first = std::fs::read_to_string(tmp.join("services/Orders_Api.md")).unwrap();
        assert!(first.contains("- name: Orders/Api\n"));
        assert!(first.contains("  - AEvent\n"));
        let second = std::fs::read_to_string(tmp.join("services/Orders_Api-2.md")).unwrap();
        assert!(second.contains("- name: Orders_Api\n"));
        assert!(second.contains("  - BEvent\n"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
