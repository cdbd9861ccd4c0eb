//! Periodic reminder scan job.
//!
//! [`ReminderScanner`] wakes on a fixed interval, fetches notes whose
//! reminder falls within the forward horizon and has been neither emailed
//! nor read, cross-checks the owner's pro entitlement, dispatches an email
//! through the [`ReminderMailer`], and marks the note so the same reminder
//! never fires twice.
//!
//! A tick runs to completion before the next sleep begins, so scans never
//! overlap. Per-candidate failures are logged and skipped; a single bad
//! note or a transient SMTP error must never abort the scan or the process.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use notabene_core::{
    defaults, EntitlementRepository, Error, Note, NoteRepository, ReminderWindow, Result,
};

use crate::mailer::ReminderMailer;

/// Configuration for the reminder scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Seconds between scan ticks.
    pub tick_interval_secs: u64,
    /// Forward horizon of the scan window, in minutes.
    pub horizon_mins: i64,
    /// Whether to run the scanner at all.
    pub enabled: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: defaults::SCAN_INTERVAL_SECS,
            horizon_mins: defaults::SCAN_HORIZON_MINS,
            enabled: true,
        }
    }
}

impl ScannerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `REMINDER_SCAN_ENABLED` | `true` | Enable/disable the scanner |
    /// | `REMINDER_SCAN_INTERVAL_SECS` | `10` | Seconds between ticks |
    /// | `REMINDER_HORIZON_MINS` | `10` | Forward scan window in minutes |
    pub fn from_env() -> Self {
        let enabled = std::env::var("REMINDER_SCAN_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let tick_interval_secs = std::env::var("REMINDER_SCAN_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::SCAN_INTERVAL_SECS)
            .max(1);

        let horizon_mins = std::env::var("REMINDER_HORIZON_MINS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults::SCAN_HORIZON_MINS)
            .max(1);

        Self {
            tick_interval_secs,
            horizon_mins,
            enabled,
        }
    }

    /// Set the tick interval in seconds.
    pub fn with_tick_interval(mut self, secs: u64) -> Self {
        self.tick_interval_secs = secs;
        self
    }

    /// Set the forward horizon in minutes.
    pub fn with_horizon_mins(mut self, mins: i64) -> Self {
        self.horizon_mins = mins;
        self
    }
}

/// Counters for a single scan tick. Returned by [`ReminderScanner::scan_once`]
/// so callers (and tests) can observe what the tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Notes matching the due/unsent/unread window query.
    pub candidates: usize,
    /// Emails dispatched and flagged this tick.
    pub sent: usize,
    /// Candidates skipped because the owner has no pro entitlement.
    pub skipped_unentitled: usize,
    /// Candidates that failed (entitlement lookup, dispatch, or flag write).
    pub failed: usize,
}

/// Handle for controlling a running scanner.
pub struct ScannerHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl ScannerHandle {
    /// Signal the scanner to shut down after the current tick.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| Error::Internal("Failed to send shutdown signal".into()))?;
        Ok(())
    }
}

/// Outcome of processing one candidate note.
enum CandidateOutcome {
    Sent,
    SkippedUnentitled,
}

/// The reminder scan job.
///
/// Dependencies are injected explicitly at construction; the scanner owns no
/// global state and can run against in-memory fakes in tests.
pub struct ReminderScanner {
    notes: Arc<dyn NoteRepository>,
    entitlements: Arc<dyn EntitlementRepository>,
    mailer: Arc<dyn ReminderMailer>,
    config: ScannerConfig,
}

impl ReminderScanner {
    /// Create a new scanner over the given stores and mailer.
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        entitlements: Arc<dyn EntitlementRepository>,
        mailer: Arc<dyn ReminderMailer>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            notes,
            entitlements,
            mailer,
            config,
        }
    }

    /// Start the scan loop on a background task and return a control handle.
    pub fn start(self) -> ScannerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            self.run(&mut shutdown_rx).await;
        });

        ScannerHandle { shutdown_tx }
    }

    /// Run the scan loop until shutdown.
    ///
    /// Contract: each tick runs to completion before the next sleep begins,
    /// so two scans never overlap within one process.
    async fn run(&self, shutdown_rx: &mut mpsc::Receiver<()>) {
        if !self.config.enabled {
            info!(
                subsystem = "jobs",
                component = "scanner",
                "Reminder scanner disabled, not starting"
            );
            return;
        }

        info!(
            subsystem = "jobs",
            component = "scanner",
            tick_interval_secs = self.config.tick_interval_secs,
            horizon_mins = self.config.horizon_mins,
            "Reminder scanner started"
        );

        let tick = std::time::Duration::from_secs(self.config.tick_interval_secs);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(
                        subsystem = "jobs",
                        component = "scanner",
                        "Reminder scanner stopped"
                    );
                    return;
                }
                _ = sleep(tick) => {
                    self.scan_once().await;
                }
            }
        }
    }

    /// Execute a single scan tick.
    pub async fn scan_once(&self) -> ScanStats {
        let start = Instant::now();
        let now = Utc::now();
        let window = ReminderWindow::from_now(now, Duration::minutes(self.config.horizon_mins));

        let mut stats = ScanStats::default();

        let candidates = match self.notes.list_due_unnotified(window).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(
                    subsystem = "jobs",
                    component = "scanner",
                    op = "scan",
                    error = %e,
                    "Failed to query due reminders, skipping tick"
                );
                return stats;
            }
        };

        stats.candidates = candidates.len();
        if candidates.is_empty() {
            debug!(
                subsystem = "jobs",
                component = "scanner",
                op = "scan",
                result_count = 0usize,
                "No due reminders this tick"
            );
            return stats;
        }

        info!(
            subsystem = "jobs",
            component = "scanner",
            op = "scan",
            result_count = stats.candidates,
            "Found notes with due reminders"
        );

        for note in candidates {
            let note_id = note.id;
            match self.process_candidate(&note).await {
                Ok(CandidateOutcome::Sent) => stats.sent += 1,
                Ok(CandidateOutcome::SkippedUnentitled) => stats.skipped_unentitled += 1,
                Err(e) => {
                    // The note keeps email_sent = false and stays a candidate
                    // on the next tick.
                    stats.failed += 1;
                    warn!(
                        subsystem = "jobs",
                        component = "scanner",
                        op = "scan",
                        note_id = %note_id,
                        error = %e,
                        "Failed to process reminder candidate, continuing"
                    );
                }
            }
        }

        info!(
            subsystem = "jobs",
            component = "scanner",
            op = "scan",
            sent = stats.sent,
            skipped = stats.skipped_unentitled,
            failed = stats.failed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Reminder scan tick complete"
        );
        stats
    }

    /// Check entitlement, dispatch, and flag one candidate.
    async fn process_candidate(&self, note: &Note) -> Result<CandidateOutcome> {
        if !self.entitlements.has_pro(&note.owner_id).await? {
            debug!(
                subsystem = "jobs",
                component = "scanner",
                note_id = %note.id,
                owner_id = %note.owner_id,
                "Owner not entitled to reminder emails, skipping"
            );
            return Ok(CandidateOutcome::SkippedUnentitled);
        }

        self.mailer.send_reminder(note).await?;

        // Only flag after a successful dispatch; a failure above leaves the
        // note eligible for the next tick.
        self.mark_sent(note.id).await?;
        info!(
            subsystem = "jobs",
            component = "scanner",
            note_id = %note.id,
            owner_id = %note.owner_id,
            recipient = %note.owner_email,
            "Reminder dispatched and note flagged"
        );
        Ok(CandidateOutcome::Sent)
    }

    async fn mark_sent(&self, id: Uuid) -> Result<()> {
        self.notes.mark_email_sent(id).await
    }
}
