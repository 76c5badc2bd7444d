use std::time::Duration;

use indicatif::ProgressBar;
use tracing::debug;

use crate::error::RenderError;
use crate::renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    pub iterations: usize,
    pub stabilized: bool,
    pub final_height: u64,
}

/// Scroll until the page height stops changing or `max_iterations` scrolls
/// have been made, waiting `delay` after each scroll.
pub fn load_more<R: Renderer>(
    renderer: &mut R,
    max_iterations: usize,
    delay: Duration,
    pb: &ProgressBar,
) -> Result<ScrollReport, RenderError> {
    let mut last_height = renderer.current_height()?;
    let mut iterations = 0;
    let mut stabilized = false;

    while iterations < max_iterations {
        iterations += 1;
        renderer.scroll_to_bottom()?;
        renderer.wait(delay);
        let height = renderer.current_height()?;
        debug!("Scroll {}/{}: height {} -> {}", iterations, max_iterations, last_height, height);
        pb.set_message(format!("scroll {iterations}/{max_iterations}, height {height}"));
        pb.tick();

        if height == last_height {
            stabilized = true;
            break;
        }
        last_height = height;
    }

    Ok(ScrollReport {
        iterations,
        stabilized,
        final_height: last_height,
    })
}

// ── Tests ──
