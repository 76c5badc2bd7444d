use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::MailError;

/// Delivery end of a run; gets exactly one call per run.
pub trait Mailer {
    fn send(&mut self, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Prints the digest instead of delivering it.
pub struct StdoutMailer;

impl Mailer for StdoutMailer {
    fn send(&mut self, subject: &str, body: &str) -> Result<(), MailError> {
        println!("Subject: {}\n\n{}", subject, body);
        Ok(())
    }
}

/// Drops each message as an `.eml` file for an external transport to pick up.
pub struct OutboxMailer {
    dir: PathBuf,
    sender: String,
    receiver: String,
    now: DateTime<Utc>,
}

impl OutboxMailer {
    pub fn new(dir: &Path, sender: &str, receiver: &str, now: DateTime<Utc>) -> Result<Self, MailError> {
        if receiver.trim().is_empty() {
            return Err(MailError::MissingRecipient);
        }
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            now,
        })
    }

    fn message_path(&self) -> PathBuf {
        let stem = self.now.format("digest-%Y%m%dT%H%M%SZ");
        let mut path = self.dir.join(format!("{stem}.eml"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{stem}-{n}.eml"));
            n += 1;
        }
        path
    }
}

impl Mailer for OutboxMailer {
    fn send(&mut self, subject: &str, body: &str) -> Result<(), MailError> {
        let message = format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            self.sender,
            self.receiver,
            subject,
            self.now.to_rfc2822(),
            body.replace('\n', "\r\n"),
        );
        let path = self.message_path();
        std::fs::write(&path, message)?;
        info!("Wrote digest to {}", path.display());
        Ok(())
    }
}

// ── Tests ──
