//! Markdown rendering of graph entities.
//!
//! Every document opens with a `---` fenced block of `- key: value` lines and
//! indented lists. Empty lists are omitted.

use edadoc_shared::{Event, Process, Service};

const INDENT: &str = "  ";

/// Render one event document.
pub fn render_event(event: &Event) -> String {
    let mut doc = String::from("---\n");
    doc.push_str(&format!("- name: {}\n", event.name));
    doc.push_str(&format!("- key: {}\n", event.key));
    if let Some(summary) = event.summary.as_deref().filter(|s| !s.is_empty()) {
        doc.push_str(&format!("- summary: {}\n", inline(summary)));
    }
    push_list(&mut doc, "consumers", &event.consumers);
    push_list(&mut doc, "producers", &event.producers);
    push_list(&mut doc, "processes", &event.processes);
    push_list(&mut doc, "preceding events", &event.preceding_events);
    push_list(&mut doc, "succeeding events", &event.succeeding_events);
    doc.push_str("---\n\n");

    if let Some(description) = event.description.as_deref() {
        if !description.trim().is_empty() {
            doc.push_str("# Description\n");
            doc.push_str(description);
            doc.push_str("\n\n");
        }
    }

    doc
}

/// Render one service document.
pub fn render_service(service: &Service) -> String {
    let mut doc = String::from("---\n");
    doc.push_str(&format!("- name: {}\n", service.name));
    push_list(&mut doc, "consuming events", &service.consuming_events);
    push_list(&mut doc, "producing events", &service.producing_events);
    doc.push_str("---\n\n");
    doc
}

/// Render one process document. Events are listed by order token.
pub fn render_process(process: &Process) -> String {
    let mut doc = String::from("---\n");
    doc.push_str(&format!("- name: {}\n", process.name));
    push_list(&mut doc, "services", &process.services);

    let events: Vec<String> = process
        .ordered_events()
        .into_iter()
        .map(|step| step.event_name.clone())
        .collect();
    push_list(&mut doc, "events", &events);

    doc.push_str("---\n\n");
    doc
}

fn push_list(doc: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    doc.push_str(&format!("- {label}:\n"));
    for item in items {
        doc.push_str(&format!("{INDENT}- {}\n", inline(item)));
    }
}

/// Collapse a multi-line value onto one line so it stays inside its list item.
fn inline(value: &str) -> String {
    value.lines().collect::<Vec<_>>().join(" ")
}
