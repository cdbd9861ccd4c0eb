//! Reminder email composition and SMTP dispatch.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed (the reminder scanner is not started in that case).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use notabene_core::{Error, Note, Result};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "reminders@notabene.local";

/// Message shown when a reminder timestamp is not in the future.
pub const TIME_PASSED_MESSAGE: &str = "Reminder time has passed";

/// Render the time remaining until `reminder` as a human-readable string.
///
/// Integer arithmetic on the millisecond difference, truncating division
/// into days, hours mod 24, minutes mod 60. A zero or negative difference
/// yields [`TIME_PASSED_MESSAGE`].
pub fn format_time_remaining(reminder: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_millis = (reminder - now).num_milliseconds();
    if diff_millis <= 0 {
        return TIME_PASSED_MESSAGE.to_string();
    }

    let diff_seconds = diff_millis / 1000;
    let diff_minutes = diff_seconds / 60;
    let diff_hours = diff_minutes / 60;
    let days = diff_hours / 24;
    let hours = diff_hours % 24;
    let minutes = diff_minutes % 60;
    format!("{} days, {} hours, {} minutes", days, hours, minutes)
}

/// Compose the plain-text body of a reminder email.
pub fn compose_body(note: &Note, now: DateTime<Utc>) -> String {
    let reminder = note.reminder.unwrap_or(now);
    format!(
        "Dear user,\n\n\
         This is a reminder for your note:\n\n\
         Title: {}\n\
         Content: {}\n\
         Reminder Time: {}\n\
         Time Remaining: {}\n\n\
         Please take necessary actions.\n\n\
         Best regards,\n\
         Your Notabene Reminder Service\n",
        note.title,
        note.content,
        reminder.to_rfc3339(),
        format_time_remaining(reminder, now),
    )
}

/// Minimal HTML escaping for user-supplied note fields.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Compose the HTML variant of a reminder email body. Sent alongside the
/// plain-text body as a multipart/alternative message.
pub fn compose_html_body(note: &Note, now: DateTime<Utc>) -> String {
    let reminder = note.reminder.unwrap_or(now);
    format!(
        "<html><body>\
         <p>Dear user,</p>\
         <p>This is a reminder for your note:</p>\
         <p><strong>Title:</strong> {}<br>\
         <strong>Content:</strong> {}<br>\
         <strong>Reminder Time:</strong> {}<br>\
         <strong>Time Remaining:</strong> {}</p>\
         <p>Please take necessary actions.</p>\
         <p>Best regards,<br>Your Notabene Reminder Service</p>\
         </body></html>",
        escape_html(&note.title),
        escape_html(&note.content),
        reminder.to_rfc3339(),
        format_time_remaining(reminder, now),
    )
}

/// Dispatches a reminder email for a single note.
///
/// Implementations return success/failure and never retry internally; the
/// scanner leaves the note a candidate for the next tick on failure.
#[async_trait]
pub trait ReminderMailer: Send + Sync {
    /// Compose and send the reminder email for `note` to its owner.
    async fn send_reminder(&self, note: &Note) -> Result<()>;
}

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that mail
    /// delivery is not configured.
    ///
    /// | Variable        | Required | Default                      |
    /// |-----------------|----------|------------------------------|
    /// | `SMTP_HOST`     | yes      | —                            |
    /// | `SMTP_PORT`     | no       | `587`                        |
    /// | `SMTP_FROM`     | no       | `reminders@notabene.local`   |
    /// | `SMTP_USER`     | no       | —                            |
    /// | `SMTP_PASSWORD` | no       | —                            |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends reminder emails via SMTP.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ReminderMailer for SmtpMailer {
    async fn send_reminder(&self, note: &Note) -> Result<()> {
        use lettre::{
            message::MultiPart, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
            AsyncTransport, Message, Tokio1Executor,
        };

        let now = Utc::now();
        let email = Message::builder()
            .from(
                self.config
                    .from_address
                    .parse()
                    .map_err(|e| Error::Mail(format!("invalid from address: {}", e)))?,
            )
            .to(note
                .owner_email
                .parse()
                .map_err(|e| Error::Mail(format!("invalid recipient address: {}", e)))?)
            .subject(format!("Reminder: {}", note.title))
            .multipart(MultiPart::alternative_plain_html(
                compose_body(note, now),
                compose_html_body(note, now),
            ))
            .map_err(|e| Error::Mail(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|e| Error::Mail(e.to_string()))?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer
            .send(email)
            .await
            .map_err(|e| Error::Mail(e.to_string()))?;

        info!(
            subsystem = "mail",
            component = "smtp",
            op = "send",
            note_id = %note.id,
            recipient = %note.owner_email,
            "Reminder email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn note_with_reminder(reminder: Option<DateTime<Utc>>) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: "dentist".to_string(),
            content: "appointment at 9am".to_string(),
            color: "blue".to_string(),
            pinned: false,
            archived: false,
            reminder,
            owner_id: "user-1".to_string(),
            owner_email: "user@example.com".to_string(),
            email_sent: false,
            read_notification: false,
            created_at_utc: Utc::now(),
            updated_at_utc: Utc::now(),
        }
    }

    #[test]
    fn time_remaining_renders_days_hours_minutes() {
        let now = Utc::now();
        let reminder = now + Duration::days(1) + Duration::hours(2) + Duration::minutes(3);
        assert_eq!(
            format_time_remaining(reminder, now),
            "1 days, 2 hours, 3 minutes"
        );
    }

    #[test]
    fn time_remaining_truncates_seconds() {
        let now = Utc::now();
        let reminder = now + Duration::minutes(5) + Duration::seconds(59);
        assert_eq!(
            format_time_remaining(reminder, now),
            "0 days, 0 hours, 5 minutes"
        );
    }

    #[test]
    fn time_remaining_past_yields_passed_message() {
        let now = Utc::now();
        assert_eq!(
            format_time_remaining(now - Duration::minutes(1), now),
            TIME_PASSED_MESSAGE
        );
    }

    #[test]
    fn time_remaining_exact_now_yields_passed_message() {
        let now = Utc::now();
        assert_eq!(format_time_remaining(now, now), TIME_PASSED_MESSAGE);
    }

    #[test]
    fn body_includes_note_fields_and_remaining_time() {
        let now = Utc::now();
        let note = note_with_reminder(Some(now + Duration::hours(26) + Duration::minutes(3)));
        let body = compose_body(&note, now);

        assert!(body.contains("Title: dentist"));
        assert!(body.contains("Content: appointment at 9am"));
        assert!(body.contains("1 days, 2 hours, 3 minutes"));
    }

    #[test]
    fn body_for_past_reminder_mentions_passed() {
        let now = Utc::now();
        let note = note_with_reminder(Some(now - Duration::minutes(2)));
        let body = compose_body(&note, now);
        assert!(body.contains(TIME_PASSED_MESSAGE));
    }

    #[test]
    fn html_body_includes_note_fields() {
        let now = Utc::now();
        let note = note_with_reminder(Some(now + Duration::hours(26) + Duration::minutes(3)));
        let html = compose_html_body(&note, now);

        assert!(html.contains("<strong>Title:</strong> dentist"));
        assert!(html.contains("appointment at 9am"));
        assert!(html.contains("1 days, 2 hours, 3 minutes"));
    }

    #[test]
    fn html_body_escapes_markup_in_note_fields() {
        let now = Utc::now();
        let mut note = note_with_reminder(Some(now + Duration::minutes(5)));
        note.title = "<script>alert(1)</script>".to_string();
        note.content = "a & b".to_string();
        let html = compose_html_body(&note, now);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn email_config_defaults() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            smtp_user: None,
            smtp_password: None,
        };
        assert_eq!(config.smtp_port, 587);
    }
}
