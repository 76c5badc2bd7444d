pub mod digest;
pub mod extract;
pub mod relevance;
pub mod scroll;
pub mod timeago;

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::error::HarvestError;
use crate::renderer::Renderer;
use extract::{NodeOutcome, PostRecord, SkipReason};
use relevance::RelevanceClassifier;
use scroll::ScrollReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPost {
    pub record: PostRecord,
    pub resolved_time: Option<DateTime<Utc>>,
    pub is_relevant: bool,
}

/// Recency cutoff for one run.
#[derive(Debug, Clone, Copy)]
pub struct FilterWindow {
    pub now: DateTime<Utc>,
    pub max_age: TimeDelta,
}

impl FilterWindow {
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.now
            .checked_sub_signed(self.max_age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Unresolved timestamps are never admitted.
    pub fn admits(&self, post: &ResolvedPost) -> bool {
        post.is_relevant && post.resolved_time.is_some_and(|t| t >= self.cutoff())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStats {
    pub scroll_iterations: usize,
    pub stabilized: bool,
    pub nodes: usize,
    pub extracted: usize,
    pub missing_content: usize,
    pub missing_timestamp: usize,
    pub read_failures: usize,
    pub unresolved: usize,
    pub irrelevant: usize,
    pub too_old: usize,
    pub included: usize,
}

impl HarvestStats {
    pub fn skipped(&self) -> usize {
        self.missing_content + self.missing_timestamp + self.read_failures
    }

    pub fn print(&self) {
        println!(
            "Scrolled {} times ({}).",
            self.scroll_iterations,
            if self.stabilized { "page settled" } else { "hit iteration cap" }
        );
        println!(
            "Nodes: {} seen, {} extracted, {} skipped ({} no content, {} no timestamp, {} unreadable).",
            self.nodes,
            self.extracted,
            self.skipped(),
            self.missing_content,
            self.missing_timestamp,
            self.read_failures,
        );
        println!(
            "Posts: {} included, {} irrelevant, {} too old, {} unresolved time.",
            self.included, self.irrelevant, self.too_old, self.unresolved,
        );
    }
}

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub max_scroll_iterations: usize,
    pub scroll_delay: Duration,
    pub max_age: TimeDelta,
}

#[derive(Debug)]
pub struct Harvest {
    pub posts: Vec<ResolvedPost>,
    pub stats: HarvestStats,
}

/// Scroll, extract, resolve, classify, and window the feed on `renderer`.
///
/// The renderer is released before returning, on success or failure.
pub fn run<R: Renderer>(
    renderer: &mut R,
    config: &HarvestConfig,
    classifier: &RelevanceClassifier,
    now: DateTime<Utc>,
    pb: &ProgressBar,
) -> Result<Harvest, HarvestError> {
    let result = run_inner(renderer, config, classifier, now, pb);
    if let Err(e) = renderer.release() {
        warn!("Failed to release renderer: {}", e);
    }
    result
}

fn run_inner<R: Renderer>(
    renderer: &mut R,
    config: &HarvestConfig,
    classifier: &RelevanceClassifier,
    now: DateTime<Utc>,
    pb: &ProgressBar,
) -> Result<Harvest, HarvestError> {
    let ScrollReport {
        iterations,
        stabilized,
        final_height,
    } = scroll::load_more(renderer, config.max_scroll_iterations, config.scroll_delay, pb)?;
    debug!("Scrolling done after {} iterations at height {}", iterations, final_height);

    let nodes = renderer.visible_post_nodes()?;
    let window = FilterWindow {
        now,
        max_age: config.max_age,
    };
    let mut stats = HarvestStats {
        scroll_iterations: iterations,
        stabilized,
        nodes: nodes.len(),
        ..Default::default()
    };

    let mut posts = Vec::new();
    for outcome in extract::extract(renderer, &nodes) {
        let record = match outcome {
            NodeOutcome::Extracted(record) => record,
            NodeOutcome::Skipped(SkipReason::MissingContent) => {
                stats.missing_content += 1;
                continue;
            }
            NodeOutcome::Skipped(SkipReason::MissingTimestamp) => {
                stats.missing_timestamp += 1;
                continue;
            }
            NodeOutcome::Skipped(SkipReason::ReadFailed(reason)) => {
                warn!("Unreadable post node: {}", reason);
                stats.read_failures += 1;
                continue;
            }
        };
        stats.extracted += 1;

        let post = ResolvedPost {
            resolved_time: timeago::resolve(&record.raw_timestamp, now),
            is_relevant: classifier.is_relevant(&record.content),
            record,
        };

        if window.admits(&post) {
            stats.included += 1;
            posts.push(post);
        } else if !post.is_relevant {
            stats.irrelevant += 1;
        } else if post.resolved_time.is_none() {
            stats.unresolved += 1;
        } else {
            stats.too_old += 1;
        }
    }

    info!(
        "Harvested {} nodes: {} extracted, {} included",
        stats.nodes, stats.extracted, stats.included
    );
    Ok(Harvest { posts, stats })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::fake::{FakeNode, FakeRenderer};
    use crate::renderer::CaptureRenderer;
    use chrono::TimeZone;
    use std::path::Path;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn config() -> HarvestConfig {
        HarvestConfig {
            max_scroll_iterations: 5,
            scroll_delay: Duration::ZERO,
            max_age: TimeDelta::days(4),
        }
    }

    fn classifier() -> RelevanceClassifier {
        let vocab: Vec<String> = ["devops", "kubernetes", "docker", "terraform", "github actions", "jenkins"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        RelevanceClassifier::new(&vocab, 10, 50)
    }

    fn harvest(r: &mut FakeRenderer) -> Harvest {
        run(r, &config(), &classifier(), now(), &ProgressBar::hidden()).unwrap()
    }

    #[test]
    fn keeps_only_recent_relevant_posts() {
        let mut r = FakeRenderer::with_nodes(vec![
            FakeNode {
                content: Some("Kubernetes upgrade notes".into()),
                ..Default::default()
            },
            FakeNode::post("Kubernetes upgrade notes", "2 days ago"),
            FakeNode::post("Kubernetes upgrade notes", "40 days ago"),
        ]);
        let h = harvest(&mut r);
        assert_eq!(h.posts.len(), 1);
        assert_eq!(h.posts[0].record.raw_timestamp, "2 days ago");
        assert_eq!(h.posts[0].resolved_time, Some(now() - TimeDelta::days(2)));
        assert_eq!(h.stats.missing_timestamp, 1);
        assert_eq!(h.stats.too_old, 1);
    }

    #[test]
    fn relevant_but_unresolved_is_excluded() {
        let mut r = FakeRenderer::with_nodes(vec![FakeNode::post("Docker tips", "last month")]);
        let h = harvest(&mut r);
        assert!(h.posts.is_empty());
        assert_eq!(h.stats.unresolved, 1);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let w = FilterWindow {
            now: now(),
            max_age: TimeDelta::days(4),
        };
        let mut post = ResolvedPost {
            record: PostRecord {
                content: "x".into(),
                raw_timestamp: "4 days ago".into(),
            },
            resolved_time: Some(now() - TimeDelta::days(4)),
            is_relevant: true,
        };
        assert!(w.admits(&post));
        post.resolved_time = Some(now() - TimeDelta::days(4) - TimeDelta::minutes(1));
        assert!(!w.admits(&post));
        post.resolved_time = Some(now());
        post.is_relevant = false;
        assert!(!w.admits(&post));
    }

    #[test]
    fn discovery_order_preserved() {
        let mut r = FakeRenderer::with_nodes(vec![
            FakeNode::post("Terraform b", "3 days ago"),
            FakeNode::post("Terraform a", "just now"),
            FakeNode::post("Terraform c", "1 day ago"),
        ]);
        let h = harvest(&mut r);
        let contents: Vec<&str> = h.posts.iter().map(|p| p.record.content.as_str()).collect();
        assert_eq!(contents, vec!["Terraform b", "Terraform a", "Terraform c"]);
    }

    #[test]
    fn renderer_released_on_success_and_failure() {
        let mut ok = FakeRenderer::with_nodes(vec![]);
        harvest(&mut ok);
        assert_eq!(ok.released, 1);

        let mut broken = FakeRenderer::with_nodes(vec![]);
        broken.fail_on_nodes = true;
        let err = run(&mut broken, &config(), &classifier(), now(), &ProgressBar::hidden());
        assert!(matches!(err, Err(HarvestError::Renderer(_))));
        assert_eq!(broken.released, 1);
    }

    #[test]
    fn capture_fixture_end_to_end() {
        let mut r = CaptureRenderer::open(Path::new("tests/fixtures/feed.json")).unwrap();
        let h = run(&mut r, &config(), &classifier(), now(), &ProgressBar::hidden()).unwrap();

        let contents: Vec<&str> = h.posts.iter().map(|p| p.record.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "Migrated our staging cluster to Kubernetes 1.30 this week. Rollout went smoothly with zero downtime.",
                "Our GitHub Actions cache hit rate doubled after pinning runner images.",
            ]
        );
        assert_eq!(h.stats.nodes, 8);
        assert_eq!(h.stats.missing_timestamp, 1);
        assert_eq!(h.stats.read_failures, 1);
        assert_eq!(h.stats.irrelevant, 2);
        assert_eq!(h.stats.too_old, 1);
        assert_eq!(h.stats.unresolved, 1);
        assert!(h.stats.stabilized);
    }
}
