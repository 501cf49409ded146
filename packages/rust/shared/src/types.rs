//! Core domain types: the Event / Service / Process graph and the output manifest.
//!
//! The graph is keyed by name strings, not object references. Services and
//! processes point at events by name; resolution is a lookup, never a pointer.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version for the `manifest.json` format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Order token assigned to a process membership without an explicit `eventOrder`.
pub const DEFAULT_EVENT_ORDER: &str = "99";

/// Suffix appended to preceding/succeeding entries that describe a human action.
pub const USER_INTERACTION_SUFFIX: &str = "(user interaction)";

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A documented event type.
///
/// Identity is the fully-qualified [`key`](Event::key) alone; two events with
/// the same key compare equal regardless of any other field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    /// Fully-qualified type name, e.g. `TestProject.InvoicePayedEvent`.
    pub key: String,
    /// Last path segment of the key.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Process names in order of appearance. Not deduplicated.
    #[serde(default)]
    pub processes: Vec<String>,
    #[serde(default)]
    pub producers: Vec<String>,
    #[serde(default)]
    pub consumers: Vec<String>,
    /// Resolved event keys or `...(user interaction)` descriptions.
    #[serde(default)]
    pub preceding_events: Vec<String>,
    #[serde(default)]
    pub succeeding_events: Vec<String>,
}

impl Event {
    /// Create an empty event for a fully-qualified key, deriving its short name.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let name = short_name(&key).to_string();
        Self {
            key,
            name,
            ..Default::default()
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Substring after the last `.` of a dotted type name (the whole input if none).
pub fn short_name(key: &str) -> &str {
    key.rsplit_once('.').map_or(key, |(_, name)| name)
}

// ---------------------------------------------------------------------------
// Candidate events
// ---------------------------------------------------------------------------

/// Process membership declared by one event, with its raw order token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRef {
    pub name: String,
    pub order: String,
}

impl ProcessRef {
    /// Membership with an explicit or defaulted (`"99"`) order token.
    pub fn new(name: impl Into<String>, order: Option<&str>) -> Self {
        Self {
            name: name.into(),
            order: order.unwrap_or(DEFAULT_EVENT_ORDER).to_string(),
        }
    }
}

/// An event extracted from one source fragment, before it is merged into the graph.
#[derive(Debug, Clone)]
pub struct CandidateEvent {
    pub event: Event,
    /// `(name, order)` tuples, parallel to `event.processes`.
    pub process_refs: Vec<ProcessRef>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// A named component that produces and/or consumes events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// Event names, append-once, in discovery order.
    #[serde(default)]
    pub consuming_events: Vec<String>,
    #[serde(default)]
    pub producing_events: Vec<String>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record that this service consumes `event_name`. Duplicates are ignored.
    pub fn add_consuming_event(&mut self, event_name: &str) {
        push_unique(&mut self.consuming_events, event_name);
    }

    /// Record that this service produces `event_name`. Duplicates are ignored.
    pub fn add_producing_event(&mut self, event_name: &str) {
        push_unique(&mut self.producing_events, event_name);
    }
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

/// One event's position inside a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub event_name: String,
    /// Compared as a string, so `"10"` sorts before `"2"`.
    pub order: String,
}

/// A named, ordered sequence of events spanning one or more services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    #[serde(default)]
    pub events: Vec<ProcessStep>,
    /// Service names touched by any member event, append-once.
    #[serde(default)]
    pub services: Vec<String>,
}

impl Process {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Register an event at `order` along with every producer and consumer it names.
    ///
    /// An event name already listed keeps its first order token.
    pub fn add_event_data(&mut self, event: &Event, order: &str) {
        if !self.events.iter().any(|step| step.event_name == event.name) {
            self.events.push(ProcessStep {
                event_name: event.name.clone(),
                order: order.to_string(),
            });
        }

        for service in event.producers.iter().chain(&event.consumers) {
            push_unique(&mut self.services, service);
        }
    }

    /// Member events sorted by order token (lexicographic, stable).
    pub fn ordered_events(&self) -> Vec<&ProcessStep> {
        let mut steps: Vec<&ProcessStep> = self.events.iter().collect();
        steps.sort_by(|a, b| a.order.cmp(&b.order));
        steps
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

// ---------------------------------------------------------------------------
// DocsManifest
// ---------------------------------------------------------------------------

/// The `manifest.json` written at the root of every output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsManifest {
    pub schema_version: u32,
    /// Tool version that generated the documents.
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    /// Source XML files, in processing order.
    pub sources: Vec<String>,
    pub event_count: usize,
    pub service_count: usize,
    pub process_count: usize,
    /// Every written document, relative to the output root.
    #[serde(default)]
    pub documents: Vec<DocumentMeta>,
}

/// Checksum record for a single written document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Path relative to the output root, e.g. `events/Ns.OrderPlacedEvent.md`.
    pub path: String,
    pub sha256: String,
    pub size_bytes: usize,
}
