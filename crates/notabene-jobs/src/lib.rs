//! # notabene-jobs
//!
//! Background reminder scan job for notabene.
//!
//! This crate provides:
//! - [`ReminderScanner`]: a fixed-interval scan over due, unsent, unread
//!   reminders with per-candidate failure isolation
//! - [`ReminderMailer`]: the notifier seam, with an SMTP implementation
//!   ([`SmtpMailer`]) built on lettre
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use notabene_db::Database;
//! use notabene_jobs::{EmailConfig, ReminderScanner, ScannerConfig, SmtpMailer};
//!
//! let db = Database::connect("postgres://...").await?;
//! let mailer = Arc::new(SmtpMailer::new(EmailConfig::from_env().unwrap()));
//!
//! let scanner = ReminderScanner::new(
//!     Arc::new(db.notes.clone()),
//!     Arc::new(db.entitlements.clone()),
//!     mailer,
//!     ScannerConfig::from_env(),
//! );
//! let handle = scanner.start();
//!
//! // Graceful shutdown
//! handle.shutdown().await?;
//! ```

pub mod mailer;
pub mod scanner;

// Re-export core types
pub use notabene_core::*;

pub use mailer::{
    compose_body, compose_html_body, format_time_remaining, EmailConfig, ReminderMailer,
    SmtpMailer, TIME_PASSED_MESSAGE,
};
pub use scanner::{ReminderScanner, ScanStats, ScannerConfig, ScannerHandle};
