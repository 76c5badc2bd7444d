use super::relevance::strip_hashtags;
use super::ResolvedPost;

pub const SEPARATOR: &str = "\n\n---\n\n";
pub const EMPTY_SUBJECT: &str = "No relevant posts found";
pub const EMPTY_BODY: &str = "No relevant posts were found in the feed during this run.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct DigestOptions {
    pub subject: String,
    /// Per-post character cap; `None` keeps posts whole.
    pub max_chars: Option<usize>,
    pub strip_hashtags: bool,
    pub annotate_timestamps: bool,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            subject: "📣 Relevant posts from your feed".to_string(),
            max_chars: Some(600),
            strip_hashtags: true,
            annotate_timestamps: true,
        }
    }
}

/// Build the one message a run sends. Never has an empty body.
pub fn assemble(posts: &[ResolvedPost], opts: &DigestOptions) -> Digest {
    if posts.is_empty() {
        return Digest {
            subject: EMPTY_SUBJECT.to_string(),
            body: EMPTY_BODY.to_string(),
        };
    }

    let body = posts
        .iter()
        .map(|p| format_post(p, opts))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    Digest {
        subject: format!("{} ({})", opts.subject, posts.len()),
        body,
    }
}

fn format_post(post: &ResolvedPost, opts: &DigestOptions) -> String {
    let mut text = if opts.strip_hashtags {
        clean_whitespace(&strip_hashtags(&post.record.content))
    } else {
        post.record.content.clone()
    };
    if let Some(max) = opts.max_chars {
        text = truncate(&text, max);
    }
    if opts.annotate_timestamps {
        format!("[{}]\n{}", post.record.raw_timestamp, text)
    } else {
        text
    }
}

/// Collapse runs of spaces left behind by removed tags, keeping line breaks.
fn clean_whitespace(s: &str) -> String {
    s.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::extract::PostRecord;

    fn post(content: &str, ts: &str) -> ResolvedPost {
        ResolvedPost {
            record: PostRecord {
                content: content.into(),
                raw_timestamp: ts.into(),
            },
            resolved_time: None,
            is_relevant: true,
        }
    }

    #[test]
    fn empty_input_gives_sentinel() {
        let d = assemble(&[], &DigestOptions::default());
        assert_eq!(d.subject, EMPTY_SUBJECT);
        assert_eq!(d.body, EMPTY_BODY);
        assert!(!d.body.is_empty());
    }

    #[test]
    fn posts_joined_with_separator_and_annotated() {
        let d = assemble(
            &[post("Kubernetes notes", "2 days ago"), post("Docker tips", "just now")],
            &DigestOptions::default(),
        );
        assert_eq!(d.subject, "📣 Relevant posts from your feed (2)");
        assert_eq!(
            d.body,
            "[2 days ago]\nKubernetes notes\n\n---\n\n[just now]\nDocker tips"
        );
    }

    #[test]
    fn hashtags_stripped_and_truncated() {
        let opts = DigestOptions {
            max_chars: Some(10),
            annotate_timestamps: false,
            ..Default::default()
        };
        let d = assemble(&[post("Terraform #iac #cloud modules", "1 day ago")], &opts);
        assert_eq!(d.body, "Terraform ...");
    }

    #[test]
    fn raw_mode_keeps_post_intact() {
        let opts = DigestOptions {
            max_chars: None,
            strip_hashtags: false,
            annotate_timestamps: false,
            ..Default::default()
        };
        let text = "Ansible #automation ".repeat(100);
        let d = assemble(&[post(text.trim(), "1 day ago")], &opts);
        assert_eq!(d.body, text.trim());
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate("ééééé", 3), "ééé...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
