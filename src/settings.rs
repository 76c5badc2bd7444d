use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::TimeDelta;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::harvest::digest::DigestOptions;
use crate::harvest::relevance::RelevanceClassifier;
use crate::harvest::HarvestConfig;

pub const DEFAULT_CONFIG_PATH: &str = "feed_digest.toml";
const ENV_PREFIX: &str = "FEED_DIGEST";

const DEFAULT_VOCABULARY: &[&str] = &[
    "devops",
    "ci/cd",
    "kubernetes",
    "docker",
    "terraform",
    "ansible",
    "github actions",
    "jenkins",
    "sre",
    "infrastructure as code",
    "aws",
    "azure",
    "gcp",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vocabulary: Vec<String>,
    pub max_age_days: i64,
    pub max_scroll_iterations: usize,
    pub scroll_delay_ms: u64,
    pub hashtag_threshold: usize,
    pub token_threshold: usize,
    pub digest: DigestSettings,
    pub mail: MailSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    pub subject: String,
    /// 0 disables truncation.
    pub max_chars: usize,
    pub strip_hashtags: bool,
    pub annotate_timestamps: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub sender: String,
    pub receiver: String,
    pub outbox: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            max_age_days: 4,
            max_scroll_iterations: 5,
            scroll_delay_ms: 2000,
            hashtag_threshold: 10,
            token_threshold: 50,
            digest: DigestSettings::default(),
            mail: MailSettings::default(),
        }
    }
}

impl Default for DigestSettings {
    fn default() -> Self {
        let opts = DigestOptions::default();
        Self {
            subject: opts.subject,
            max_chars: opts.max_chars.unwrap_or(0),
            strip_hashtags: opts.strip_hashtags,
            annotate_timestamps: opts.annotate_timestamps,
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file at `path` if it exists, then `FEED_DIGEST_*` env vars.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// `<prefix>_<FIELD>` for top-level keys, `__` between nested keys
    /// (`<prefix>_DIGEST__MAX_CHARS`).
    fn load_with_env_prefix(path: &Path, prefix: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("vocabulary"),
            )
            .build()
            .with_context(|| format!("Failed to read settings from {}", path.display()))?
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.max_scroll_iterations == 0 {
            bail!("max_scroll_iterations must be at least 1");
        }
        if self.max_age_days < 0 {
            bail!("max_age_days must not be negative");
        }
        if self.vocabulary.iter().all(|t| t.trim().is_empty()) {
            bail!("vocabulary is empty");
        }
        Ok(())
    }

    pub fn classifier(&self) -> RelevanceClassifier {
        RelevanceClassifier::new(&self.vocabulary, self.hashtag_threshold, self.token_threshold)
    }

    pub fn harvest_config(&self) -> HarvestConfig {
        HarvestConfig {
            max_scroll_iterations: self.max_scroll_iterations,
            scroll_delay: Duration::from_millis(self.scroll_delay_ms),
            max_age: TimeDelta::try_days(self.max_age_days).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn digest_options(&self) -> DigestOptions {
        DigestOptions {
            subject: self.digest.subject.clone(),
            max_chars: (self.digest.max_chars > 0).then_some(self.digest.max_chars),
            strip_hashtags: self.digest.strip_hashtags,
            annotate_timestamps: self.digest.annotate_timestamps,
        }
    }
}

// ── Tests ──
