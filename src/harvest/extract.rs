use tracing::debug;

use crate::renderer::Renderer;

/// One post as read off the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub content: String,
    pub raw_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingContent,
    MissingTimestamp,
    ReadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    Extracted(PostRecord),
    Skipped(SkipReason),
}

/// Read one node. Blank regions count as absent.
pub fn extract_node<R: Renderer>(renderer: &R, node: &R::Node) -> NodeOutcome {
    let content = match renderer.read_content(node) {
        Ok(Some(c)) if !c.trim().is_empty() => c.trim().to_string(),
        Ok(_) => return NodeOutcome::Skipped(SkipReason::MissingContent),
        Err(e) => return NodeOutcome::Skipped(SkipReason::ReadFailed(e.to_string())),
    };
    let raw_timestamp = match renderer.read_timestamp_text(node) {
        Ok(Some(t)) if !t.trim().is_empty() => t.trim().to_string(),
        Ok(_) => return NodeOutcome::Skipped(SkipReason::MissingTimestamp),
        Err(e) => return NodeOutcome::Skipped(SkipReason::ReadFailed(e.to_string())),
    };
    NodeOutcome::Extracted(PostRecord {
        content,
        raw_timestamp,
    })
}

/// Extract every node in input order. A bad node never aborts the batch.
pub fn extract<R: Renderer>(renderer: &R, nodes: &[R::Node]) -> Vec<NodeOutcome> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let outcome = extract_node(renderer, node);
            if let NodeOutcome::Skipped(reason) = &outcome {
                debug!("Skipped node {}: {:?}", i, reason);
            }
            outcome
        })
        .collect()
}

// ── Tests ──
