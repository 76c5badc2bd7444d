mod error;
mod harvest;
mod mail;
mod renderer;
mod settings;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use error::HarvestError;
use harvest::relevance::Verdict;
use harvest::Harvest;
use mail::{Mailer, OutboxMailer, StdoutMailer};
use renderer::{CaptureRenderer, Renderer};
use settings::Settings;

#[derive(Parser)]
#[command(name = "feed_digest", about = "Harvest recent relevant feed posts into an email digest")]
struct Cli {
    /// Settings file (TOML); missing file means defaults
    #[arg(short, long, global = true, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest a feed capture and send the digest
    Run {
        /// Recorded feed (JSON batches)
        #[arg(long)]
        capture: PathBuf,
        /// Reference time (RFC 3339), defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Write the digest as .eml into this directory
        #[arg(long)]
        outbox: Option<PathBuf>,
        /// Print the digest instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Explain whether a text counts as relevant
    Classify { text: String },
    /// Resolve a relative time phrase
    Resolve {
        text: String,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    let result = match cli.command {
        Commands::Run {
            capture,
            now,
            outbox,
            dry_run,
        } => {
            let now = now.unwrap_or_else(Utc::now);
            let mut renderer = CaptureRenderer::open(&capture)
                .with_context(|| format!("Failed to open capture {}", capture.display()))?;

            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
            );
            pb.enable_steady_tick(Duration::from_millis(120));

            let outcome = harvest_with_spinner(&mut renderer, &settings, now, &pb)?;

            let digest = harvest::digest::assemble(&outcome.posts, &settings.digest_options());

            let outbox = outbox.or_else(|| settings.mail.outbox.clone());
            let mut mailer: Box<dyn Mailer> = match outbox {
                Some(dir) if !dry_run => Box::new(OutboxMailer::new(
                    &dir,
                    &settings.mail.sender,
                    &settings.mail.receiver,
                    now,
                )?),
                _ => Box::new(StdoutMailer),
            };
            mailer
                .send(&digest.subject, &digest.body)
                .context("Failed to hand off digest")?;

            outcome.stats.print();
            Ok(())
        }
        Commands::Classify { text } => {
            let classifier = settings.classifier();
            match classifier.classify(&text) {
                Verdict::Relevant { term } => println!("relevant (matched \"{}\")", term),
                Verdict::HashtagSpam { hashes, tokens } => println!(
                    "not relevant: hashtag spam ({} '#' in {} words)",
                    hashes, tokens
                ),
                Verdict::NoMatch => println!(
                    "not relevant: no term from [{}]",
                    classifier.vocabulary().join(", ")
                ),
            }
            Ok(())
        }
        Commands::Resolve { text, now } => {
            let now = now.unwrap_or_else(Utc::now);
            match harvest::timeago::resolve(&text, now) {
                Some(t) => println!("{}", t.to_rfc3339()),
                None => println!("unresolved"),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Clears the spinner whether or not the harvest succeeds.
fn harvest_with_spinner<R: Renderer>(
    renderer: &mut R,
    settings: &Settings,
    now: DateTime<Utc>,
    pb: &ProgressBar,
) -> Result<Harvest, HarvestError> {
    let outcome = harvest::run(
        renderer,
        &settings.harvest_config(),
        &settings.classifier(),
        now,
        pb,
    );
    pb.finish_and_clear();
    outcome
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

// ── Tests ──
