//! Event extraction from compiler-generated XML documentation files.
//!
//! A documentation file lists one `<member>` per documented symbol. Type-level
//! members (`name="T:..."`) that look like events are turned into
//! [`CandidateEvent`]s: the event record plus its raw process memberships.
//! Extraction is best-effort and never fails on a single bad member; only a
//! document that is not well-formed XML is an error (see [`parse_document`]).

mod normalize;
mod reference;

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, instrument};

use edadoc_shared::{CandidateEvent, EdaDocError, Event, ProcessRef, Result};

pub use normalize::{full_trim, normalize};
pub use reference::{EventReference, resolve_reference};

/// Documentation-id prefix of type members.
pub const TYPE_MARKER: &str = "T:";

/// Type-name suffix that marks a type as an event without an explicit opt-in.
const EVENT_SUFFIX: &str = "Event";

/// Parse XML documentation text. Errors carry the source path.
pub fn parse_document<'input>(path: &Path, text: &'input str) -> Result<Document<'input>> {
    Document::parse(text).map_err(|e| EdaDocError::xml(path, e.to_string()))
}

/// Extract every event candidate from one parsed documentation tree, in document order.
#[instrument(skip_all)]
pub fn extract_events(doc: &Document<'_>) -> Vec<CandidateEvent> {
    let Some(members) = doc
        .root_element()
        .children()
        .find(|node| node.has_tag_name("members"))
    else {
        debug!("document has no <members> element");
        return Vec::new();
    };

    let candidates: Vec<CandidateEvent> = members
        .children()
        .filter(|node| node.has_tag_name("member"))
        .filter_map(extract_member)
        .collect();

    debug!(events = candidates.len(), "extracted event candidates");
    candidates
}

/// Extract one `<member>` element, or `None` when it does not document an event type.
pub fn extract_member(member: Node<'_, '_>) -> Option<CandidateEvent> {
    let type_name = member.attribute("name")?.strip_prefix(TYPE_MARKER)?;

    let opted_in = member.children().any(|child| child.has_tag_name("isEvent"));
    if !type_name.ends_with(EVENT_SUFFIX) && !opted_in {
        return None;
    }

    debug!(type_name, "processing event type");

    let process_refs: Vec<ProcessRef> = elements(member, "process")
        .filter_map(|node| {
            let name = non_blank_text(node)?;
            Some(ProcessRef::new(name, node.attribute("eventOrder")))
        })
        .collect();

    let mut event = Event::new(type_name);
    event.summary = normalize(first_element(member, "summary").map(text_content).as_deref());
    event.description =
        normalize(first_element(member, "description").map(text_content).as_deref());
    event.processes = process_refs.iter().map(|p| p.name.clone()).collect();
    event.producers = elements(member, "producer").filter_map(non_blank_text).collect();
    event.consumers = elements(member, "consumer").filter_map(non_blank_text).collect();
    event.preceding_events = references(member, "preceedingEvent");
    event.succeeding_events = references(member, "succeedingEvent");

    Some(CandidateEvent {
        event,
        process_refs,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Concatenated text of a node and all its descendants.
pub(crate) fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |child| child.has_tag_name(tag))
}

fn first_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

/// Normalized element text, or `None` when blank.
fn non_blank_text(node: Node<'_, '_>) -> Option<String> {
    let text = full_trim(&text_content(node));
    (!normalize::is_blank(&text)).then_some(text)
}

fn references(member: Node<'_, '_>, tag: &str) -> Vec<String> {
    elements(member, tag)
        .map(resolve_reference)
        .filter(|resolved| !normalize::is_blank(resolved))
        .collect()
}
