pub mod capture;

use std::time::Duration;

use crate::error::RenderError;

pub use capture::CaptureRenderer;

/// What the harvest core needs from whatever is presenting the feed.
///
/// Node handles are only valid for the run that produced them.
pub trait Renderer {
    type Node;

    fn current_height(&mut self) -> Result<u64, RenderError>;
    fn scroll_to_bottom(&mut self) -> Result<(), RenderError>;
    fn wait(&mut self, duration: Duration);
    fn visible_post_nodes(&mut self) -> Result<Vec<Self::Node>, RenderError>;
    fn read_content(&self, node: &Self::Node) -> Result<Option<String>, RenderError>;
    fn read_timestamp_text(&self, node: &Self::Node) -> Result<Option<String>, RenderError>;

    /// Give the underlying session back. Called once per run on every exit path.
    fn release(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}
