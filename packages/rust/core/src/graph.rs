//! Graph builder: folds candidate events into the Event / Service / Process sets.
//!
//! Each collection owns its entities by value in discovery order, with a
//! name-to-index map beside it. Relationships are name strings resolved by
//! lookup, so there are no reference cycles between the three kinds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use edadoc_shared::{CandidateEvent, Event, Process, Service};

/// What happened to a candidate handed to [`GraphBuilder::absorb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorbed {
    /// First occurrence of its key; the event and its relationships were recorded.
    Inserted,
    /// An event with the same key already exists. The first record is kept,
    /// but the candidate's services and processes were still wired in.
    Duplicate,
}

/// Cumulative state for one documentation run.
///
/// Owned by a single caller and mutated sequentially; extraction may happen
/// anywhere, but every candidate passes through [`absorb`](Self::absorb) in order.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    events: Vec<Event>,
    event_index: HashMap<String, usize>,
    services: Vec<Service>,
    service_index: HashMap<String, usize>,
    processes: Vec<Process>,
    process_index: HashMap<String, usize>,
    duplicates: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one candidate into the graph.
    ///
    /// The first candidate for a key wins the event record. A later candidate
    /// with the same key is not stored as an event, but its processes,
    /// consumers and producers are still recorded.
    pub fn absorb(&mut self, candidate: CandidateEvent) -> Absorbed {
        let CandidateEvent {
            event,
            process_refs,
        } = candidate;

        let duplicate = self.event_index.contains_key(&event.key);
        if duplicate {
            self.duplicates += 1;
            warn!(key = %event.key, "duplicate event key, keeping first occurrence");
        }

        for process_ref in &process_refs {
            let process = find_or_create(
                &mut self.processes,
                &mut self.process_index,
                &process_ref.name,
                Process::new,
            );
            process.add_event_data(&event, &process_ref.order);
        }

        for consumer in &event.consumers {
            find_or_create(
                &mut self.services,
                &mut self.service_index,
                consumer,
                Service::new,
            )
            .add_consuming_event(&event.name);
        }

        for producer in &event.producers {
            find_or_create(
                &mut self.services,
                &mut self.service_index,
                producer,
                Service::new,
            )
            .add_producing_event(&event.name);
        }

        if duplicate {
            return Absorbed::Duplicate;
        }

        debug!(key = %event.key, "event absorbed");
        self.event_index.insert(event.key.clone(), self.events.len());
        self.events.push(event);
        Absorbed::Inserted
    }

    /// Absorb a stream of candidates in order. Returns how many were inserted.
    pub fn absorb_all(&mut self, candidates: impl IntoIterator<Item = CandidateEvent>) -> usize {
        candidates
            .into_iter()
            .map(|candidate| self.absorb(candidate))
            .filter(|outcome| *outcome == Absorbed::Inserted)
            .count()
    }

    /// Number of candidates dropped as duplicates so far.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    pub fn event(&self, key: &str) -> Option<&Event> {
        self.event_index.get(key).map(|&i| &self.events[i])
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.service_index.get(name).map(|&i| &self.services[i])
    }

    pub fn process(&self, name: &str) -> Option<&Process> {
        self.process_index.get(name).map(|&i| &self.processes[i])
    }

    /// Consume the builder into the finished graph.
    pub fn finish(self) -> DocGraph {
        DocGraph {
            events: self.events,
            services: self.services,
            processes: self.processes,
        }
    }
}

fn find_or_create<'a, T>(
    items: &'a mut Vec<T>,
    index: &mut HashMap<String, usize>,
    name: &str,
    create: impl FnOnce(String) -> T,
) -> &'a mut T {
    let i = match index.get(name) {
        Some(&i) => i,
        None => {
            debug!(name, "creating graph node");
            items.push(create(name.to_string()));
            index.insert(name.to_string(), items.len() - 1);
            items.len() - 1
        }
    };
    &mut items[i]
}

// ---------------------------------------------------------------------------
// DocGraph
// ---------------------------------------------------------------------------

/// The finished graph handed to the renderer. Each list is in discovery order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocGraph {
    pub events: Vec<Event>,
    pub services: Vec<Service>,
    pub processes: Vec<Process>,
}

impl DocGraph {
    pub fn event(&self, key: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.key == key)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn process(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
