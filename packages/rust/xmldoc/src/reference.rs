//! Resolution of `<preceedingEvent>` / `<succeedingEvent>` annotations.
//!
//! An annotation body takes one of three shapes:
//! - `<see cref="T:Ns.OtherEvent"/>`: a symbolic link to another event
//! - `<userInteraction>text</userInteraction>`: a human action
//! - anything else: raw text, treated as a human action
//!
//! Resolution never fails. Malformed bodies fall through to the raw branch.

use roxmltree::Node;

use edadoc_shared::USER_INTERACTION_SUFFIX;

use crate::normalize::{full_trim, is_blank};
use crate::text_content;

/// A classified preceding/succeeding annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventReference {
    /// Identifier of another event, member-kind prefix already stripped.
    Symbol(String),
    /// Normalized description of a user interaction.
    UserInteraction(String),
    /// Unstructured node text, kept verbatim.
    Raw(String),
}

impl EventReference {
    /// Classify an annotation node by inspecting its shape.
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let has_elements = node.children().any(|child| child.is_element());

        if has_elements {
            if let Some(see) = child_element(node, "see") {
                let cref = see.attribute("cref").map(full_trim).unwrap_or_default();
                if !is_blank(&cref) {
                    return Self::Symbol(full_trim(strip_member_prefix(&cref)));
                }
            } else if let Some(interaction) = child_element(node, "userInteraction") {
                let text = full_trim(&text_content(interaction));
                if !is_blank(&text) {
                    return Self::UserInteraction(text);
                }
            }
        }

        Self::Raw(text_content(node))
    }

    /// The string recorded on the event for this reference.
    pub fn resolve(&self) -> String {
        match self {
            Self::Symbol(key) => key.clone(),
            Self::UserInteraction(text) | Self::Raw(text) => {
                format!("{text}{USER_INTERACTION_SUFFIX}")
            }
        }
    }
}

/// Classify and resolve an annotation node in one step.
pub fn resolve_reference(node: Node<'_, '_>) -> String {
    EventReference::from_node(node).resolve()
}

/// Drop a documentation-id kind marker such as `T:`, `M:` or `!:`.
fn strip_member_prefix(cref: &str) -> &str {
    let mut chars = cref.chars();
    match (chars.next(), chars.next()) {
        (Some(kind), Some(':')) if kind.is_ascii_alphabetic() || kind == '!' => &cref[2..],
        _ => cref,
    }
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}
