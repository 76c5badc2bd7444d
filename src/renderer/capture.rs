use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::Renderer;
use crate::error::RenderError;

const ROW_HEIGHT: u64 = 480;

#[derive(Debug, Clone, Deserialize)]
pub struct CapturedNode {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub unreadable: bool,
}

#[derive(Debug, Deserialize)]
struct Capture {
    batches: Vec<Vec<CapturedNode>>,
}

/// Replays a recorded feed: batch 0 is on screen at load, every scroll
/// reveals one more batch.
#[derive(Debug)]
pub struct CaptureRenderer {
    batches: Vec<Vec<CapturedNode>>,
    revealed: usize,
    open: bool,
}

impl CaptureRenderer {
    pub fn open(path: &Path) -> Result<Self, RenderError> {
        let raw = std::fs::read_to_string(path)?;
        let renderer = Self::from_json(&raw)?;
        info!(
            "Loaded capture {} ({} batches)",
            path.display(),
            renderer.batches.len()
        );
        Ok(renderer)
    }

    pub fn from_json(raw: &str) -> Result<Self, RenderError> {
        let capture: Capture = serde_json::from_str(raw)?;
        Ok(Self {
            revealed: usize::from(!capture.batches.is_empty()),
            batches: capture.batches,
            open: true,
        })
    }

    fn ensure_open(&self) -> Result<(), RenderError> {
        if self.open {
            Ok(())
        } else {
            Err(RenderError::Unavailable("capture already released".into()))
        }
    }

    fn visible(&self) -> impl Iterator<Item = &CapturedNode> {
        self.batches[..self.revealed].iter().flatten()
    }

    fn node(&self, index: usize) -> Result<&CapturedNode, RenderError> {
        self.ensure_open()?;
        let node = self
            .visible()
            .nth(index)
            .ok_or_else(|| RenderError::NodeUnreadable {
                index,
                reason: "not on screen".into(),
            })?;
        if node.unreadable {
            return Err(RenderError::NodeUnreadable {
                index,
                reason: "element detached".into(),
            });
        }
        Ok(node)
    }
}

impl Renderer for CaptureRenderer {
    /// Position within the revealed nodes.
    type Node = usize;

    fn current_height(&mut self) -> Result<u64, RenderError> {
        self.ensure_open()?;
        Ok(self.visible().count() as u64 * ROW_HEIGHT)
    }

    fn scroll_to_bottom(&mut self) -> Result<(), RenderError> {
        self.ensure_open()?;
        if self.revealed < self.batches.len() {
            self.revealed += 1;
            debug!("Revealed batch {}/{}", self.revealed, self.batches.len());
        }
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn visible_post_nodes(&mut self) -> Result<Vec<usize>, RenderError> {
        self.ensure_open()?;
        Ok((0..self.visible().count()).collect())
    }

    fn read_content(&self, node: &usize) -> Result<Option<String>, RenderError> {
        Ok(self.node(*node)?.content.clone())
    }

    fn read_timestamp_text(&self, node: &usize) -> Result<Option<String>, RenderError> {
        Ok(self.node(*node)?.timestamp.clone())
    }

    fn release(&mut self) -> Result<(), RenderError> {
        self.open = false;
        Ok(())
    }
}

// ── Tests ──
